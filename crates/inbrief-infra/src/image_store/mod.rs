//! Image store implementations.

mod cloudinary;
mod memory;

pub use cloudinary::{CloudinaryConfig, CloudinaryImageStore};
pub use memory::InMemoryImageStore;
