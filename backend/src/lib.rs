pub mod config;
pub mod db;
pub mod stock;

pub mod error;
