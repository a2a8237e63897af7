//! # InBrief Core
//!
//! The domain layer of the InBrief news backend.
//! This crate holds the post lifecycle, the edit-window policy and the access
//! guard. Storage, image hosting and the employee directory are reached only
//! through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::{DomainError, RepoError};
pub use service::{AccessService, PostOutcome, PostService};
