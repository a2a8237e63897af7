//! # InBrief Infrastructure
//!
//! Concrete implementations of the ports defined in `inbrief-core`:
//! post storage, the admin allow-list, session caches, the image store and
//! the employee directory.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external storage, in-memory only
//! - `postgres` - PostgreSQL storage via SeaORM
//! - `rate-limit` - Login rate limiting via governor
//! - `redis` - Redis-backed session cache

pub mod allow_list;
pub mod cache;
pub mod database;
pub mod directory;
pub mod image_store;
pub mod repository;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-exports - In-Memory
pub use allow_list::InMemoryAllowList;
pub use cache::InMemoryCache;
pub use database::DatabaseConnections;
pub use image_store::InMemoryImageStore;
pub use repository::InMemoryPostRepository;

// Re-exports - External services
pub use directory::{DirectoryConfig, SuccessFactorsDirectory};
pub use image_store::{CloudinaryConfig, CloudinaryImageStore};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};

#[cfg(feature = "redis")]
pub use cache::{RedisCache, RedisConfig};

#[cfg(feature = "postgres")]
pub use database::{PostgresAllowList, PostgresPostRepository};
