//! Post entity: a blog entry owned by a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

/// A stored blog post.
///
/// Serializes to the shape the single-page frontend consumes: camelCase keys,
/// the id under `_id` as a string and the creation time under `timeOfPost`.
/// `image_link` is the legacy single-image field and always mirrors the first
/// entry of `images` whenever the image list is written.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    #[serde_as(as = "DisplayFromStr")]
    pub id: i64,
    pub title: String,
    pub author_name: String,
    #[serde_as(as = "DisplayFromStr")]
    pub author_id: i64,
    pub image_link: String,
    pub images: Vec<String>,
    pub categories: Vec<String>,
    pub description: String,
    #[serde(rename = "isFeaturedPost")]
    pub is_featured: bool,
    #[serde(rename = "timeOfPost")]
    pub created_at: DateTime<Utc>,
}

/// Input data for inserting a post. Ids and timestamps are assigned by storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub author_name: String,
    pub author_id: i64,
    pub image_link: String,
    pub images: Vec<String>,
    pub categories: Vec<String>,
    pub description: String,
    pub is_featured: bool,
}

/// Partial update for an existing post.
///
/// `None` fields are left unchanged. Use [`PostPatch::set_images`] rather than
/// assigning `images` directly so the legacy `image_link` stays in step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub author_name: Option<String>,
    pub description: Option<String>,
    pub categories: Option<Vec<String>>,
    pub is_featured: Option<bool>,
    pub images: Option<Vec<String>>,
    pub image_link: Option<String>,
}

impl PostPatch {
    /// Replaces the image list; `image_link` becomes its first entry, or empty.
    pub fn set_images(&mut self, images: Vec<String>) {
        self.image_link = Some(images.first().cloned().unwrap_or_default());
        self.images = Some(images);
    }

    /// Applies the patch in place. Used by storage backends that update in memory.
    pub fn apply_to(&self, post: &mut Post) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(author_name) = &self.author_name {
            post.author_name = author_name.clone();
        }
        if let Some(description) = &self.description {
            post.description = description.clone();
        }
        if let Some(categories) = &self.categories {
            post.categories = categories.clone();
        }
        if let Some(is_featured) = self.is_featured {
            post.is_featured = is_featured;
        }
        if let Some(images) = &self.images {
            post.images = images.clone();
        }
        if let Some(image_link) = &self.image_link {
            post.image_link = image_link.clone();
        }
    }
}

/// The list queries the post repository answers.
#[derive(Debug, Clone, PartialEq)]
pub enum PostQuery {
    /// Every post in insertion order.
    All,
    /// Posts with the featured flag set, in insertion order.
    Featured,
    /// Every post, newest first.
    Latest,
    /// Posts tagged with the given category.
    Category(String),
    /// Posts sharing at least one category with the given list.
    AnyCategory(Vec<String>),
}

impl PostQuery {
    /// Returns true if `post` belongs in the result of this query.
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            PostQuery::All | PostQuery::Latest => true,
            PostQuery::Featured => post.is_featured,
            PostQuery::Category(category) => post.categories.contains(category),
            PostQuery::AnyCategory(categories) => {
                post.categories.iter().any(|c| categories.contains(c))
            }
        }
    }
}
