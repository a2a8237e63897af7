//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod allow_list;
mod auth;
mod cache;
mod clock;
mod directory;
mod image_store;
mod rate_limit;
mod repository;

pub use allow_list::AdminAllowList;
pub use auth::AuthError;
pub use cache::{Cache, CacheError};
pub use clock::{Clock, SystemClock};
pub use directory::{DirectoryError, DirectoryService, EmployeeRecord};
pub use image_store::{FailedUpload, ImageStore, ImageStoreError, ImageUpload, UploadBatch};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::PostRepository;
