//! Post repositories that need no external storage.

mod memory;

pub use memory::InMemoryPostRepository;
