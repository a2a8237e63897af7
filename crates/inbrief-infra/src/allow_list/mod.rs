//! Admin allow-list implementations.

mod memory;

pub use memory::InMemoryAllowList;
