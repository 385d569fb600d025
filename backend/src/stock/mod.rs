pub mod company;
pub mod loader;
pub mod model;
pub mod registry;
pub mod repository;
pub mod repository_sqlx;

#[cfg(test)]
pub(crate) mod testing;
