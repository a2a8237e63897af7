//! Public projection of a post for the mobile client.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Post;

/// Display format of the `date` field.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whitelisted view of a [`Post`].
///
/// Fields are copied one by one; anything added to `Post` stays private
/// until it is listed here. Deletion handles and the category are never
/// exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicPost {
    pub id: Uuid,
    pub headline: String,
    pub description: String,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// `created_at` rendered in the display timezone. Display only.
    pub date: String,
    pub author: String,
}

impl PublicPost {
    pub fn project(post: &Post, display_tz: Tz) -> Self {
        Self {
            id: post.id,
            headline: post.headline.clone(),
            description: post.description.clone(),
            image_urls: post.image_urls(),
            created_at: post.created_at,
            date: post
                .created_at
                .with_timezone(&display_tz)
                .format(DATE_FORMAT)
                .to_string(),
            author: post.author.clone(),
        }
    }
}
