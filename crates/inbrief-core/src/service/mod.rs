//! Application services - the post lifecycle and the access guard.

mod access_service;
mod post_service;

pub use access_service::AccessService;
pub use post_service::{PostOutcome, PostService};
