//! Employee directory implementations.

mod successfactors;

pub use successfactors::{DirectoryConfig, SuccessFactorsDirectory};
