//! Domain entities - the core business objects.

mod edit_window;
mod identity;
mod post;
mod public;

pub use edit_window::EditWindow;
pub use identity::{Identity, Session, is_valid_employee_id, phone_suffix_matches};
pub use post::{Category, Post, PostChanges, StoredImage, Submission};
pub use public::PublicPost;
