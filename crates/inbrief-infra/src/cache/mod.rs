//! Session cache implementations - Redis and in-memory fallback.

mod memory;

#[cfg(feature = "redis")]
mod redis;

pub use memory::InMemoryCache;

#[cfg(feature = "redis")]
pub use self::redis::{RedisCache, RedisConfig};
