use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::ports::ImageUpload;

/// Closed set of post categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Finance,
    Healthcare,
    Achievement,
    Notice,
    Urgent,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Finance,
        Category::Healthcare,
        Category::Achievement,
        Category::Notice,
        Category::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Finance => "Finance",
            Category::Healthcare => "Healthcare",
            Category::Achievement => "Achievement",
            Category::Notice => "Notice",
            Category::Urgent => "Urgent",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Invalid category: {s}")))
    }
}

/// An uploaded image: the public URL plus the handle needed to delete it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    pub url: String,
    pub handle: String,
}

/// Post entity - a short news item.
///
/// Image URLs and deletion handles live in the same [`StoredImage`] list, so
/// they can never drift out of alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub headline: String,
    pub description: String,
    pub images: Vec<StoredImage>,
    pub category: Option<Category>,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with a generated id.
    pub fn new(
        headline: String,
        description: String,
        category: Option<Category>,
        images: Vec<StoredImage>,
        author: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            headline,
            description,
            images,
            category,
            author,
            created_at,
        }
    }

    pub fn image_urls(&self) -> Vec<String> {
        self.images.iter().map(|img| img.url.clone()).collect()
    }

    pub fn image_handles(&self) -> impl Iterator<Item = &str> {
        self.images.iter().map(|img| img.handle.as_str())
    }

    /// Apply content changes. `created_at`, `id` and `author` are untouched.
    pub fn apply(&mut self, changes: PostChanges) {
        self.headline = changes.headline;
        self.description = changes.description;
        if let Some(category) = changes.category {
            self.category = Some(category);
        }
        if let Some(images) = changes.images {
            self.images = images;
        }
    }
}

/// Content changes applied by an edit.
///
/// `None` for `category` or `images` keeps the stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct PostChanges {
    pub headline: String,
    pub description: String,
    pub category: Option<Category>,
    pub images: Option<Vec<StoredImage>>,
}

/// A create or edit request as submitted by staff.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub headline: String,
    pub description: String,
    pub category: Option<String>,
    pub images: Vec<ImageUpload>,
}

impl Submission {
    pub fn has_text(&self) -> bool {
        !self.headline.trim().is_empty() || !self.description.trim().is_empty()
    }

    /// Check the content rules and parse the category.
    ///
    /// An empty category field counts as not supplied.
    pub fn validate(&self) -> Result<Option<Category>, DomainError> {
        if !self.has_text() && self.images.is_empty() {
            return Err(DomainError::validation(
                "Post must have at least a headline, description, or image.",
            ));
        }

        match self.category.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str) -> ImageUpload {
        ImageUpload {
            filename: name.to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_empty_submission_is_rejected() {
        let submission = Submission {
            headline: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            submission.validate(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_any_single_field_is_enough() {
        let headline_only = Submission {
            headline: "Quarterly results".to_string(),
            ..Default::default()
        };
        let description_only = Submission {
            description: "Canteen closed on Friday".to_string(),
            ..Default::default()
        };
        let image_only = Submission {
            images: vec![image("a.png")],
            ..Default::default()
        };

        assert!(headline_only.validate().is_ok());
        assert!(description_only.validate().is_ok());
        assert!(image_only.validate().is_ok());
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let submission = Submission {
            headline: "Match report".to_string(),
            category: Some("Sports".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            submission.validate(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_category_is_case_sensitive() {
        assert!("finance".parse::<Category>().is_err());
        assert_eq!("Finance".parse::<Category>().unwrap(), Category::Finance);
    }

    #[test]
    fn test_blank_category_means_none() {
        let submission = Submission {
            headline: "Hello".to_string(),
            category: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(submission.validate().unwrap(), None);
    }

    #[test]
    fn test_apply_keeps_category_and_images_when_absent() {
        let created_at = Utc::now();
        let mut post = Post::new(
            "Old".to_string(),
            "Old body".to_string(),
            Some(Category::Notice),
            vec![StoredImage {
                url: "https://img/1".to_string(),
                handle: "h1".to_string(),
            }],
            "Asha Rao".to_string(),
            created_at,
        );
        let id = post.id;

        post.apply(PostChanges {
            headline: "New".to_string(),
            description: String::new(),
            category: None,
            images: None,
        });

        assert_eq!(post.id, id);
        assert_eq!(post.created_at, created_at);
        assert_eq!(post.headline, "New");
        assert_eq!(post.category, Some(Category::Notice));
        assert_eq!(post.image_urls(), vec!["https://img/1".to_string()]);
    }
}
