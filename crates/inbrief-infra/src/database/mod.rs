//! PostgreSQL storage.

mod connections;

#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod postgres_repo;

pub use connections::{DatabaseConfig, DatabaseConnections};

#[cfg(feature = "postgres")]
pub use postgres_repo::{PostgresAllowList, PostgresPostRepository};

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
