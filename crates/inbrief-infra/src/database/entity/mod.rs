//! SeaORM entities.

pub mod admin_id;
pub mod news_post;
