//! Post creation, retrieval, update and deletion.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::domain::entities::{Category, NewPost, Post, PostPatch, PostQuery};
use crate::domain::form_value::{CategoryError, FormValue, parse_categories, parse_list_field};
use crate::domain::repositories::PostRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, CacheSlot, slots};
use crate::utils::image_format::is_image_link;

/// Fields submitted to create a post, before validation.
///
/// `uploaded_images` holds URLs of files already stored by the media store.
#[derive(Debug, Clone, Default)]
pub struct CreatePostInput {
    pub title: Option<String>,
    pub author_name: Option<String>,
    pub description: Option<String>,
    pub image_link: Option<String>,
    pub categories: Option<FormValue>,
    pub is_featured: bool,
    pub uploaded_images: Vec<String>,
}

/// Fields submitted to update a post. Absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdatePostInput {
    pub title: Option<String>,
    pub author_name: Option<String>,
    pub description: Option<String>,
    pub image_link: Option<String>,
    pub categories: Option<FormValue>,
    pub is_featured: Option<bool>,
    /// The client's view of which stored images remain, in order.
    pub existing_images: Option<FormValue>,
    pub uploaded_images: Vec<String>,
}

/// Service for managing posts and keeping the listing cache honest.
///
/// Every successful mutation deletes all listing slots. Listing reads always
/// go to storage and then overwrite their slot.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    cache: Arc<dyn CacheService>,
}

impl PostService {
    /// Creates a new post service.
    pub fn new(posts: Arc<dyn PostRepository>, cache: Arc<dyn CacheService>) -> Self {
        Self { posts, cache }
    }

    /// Creates a post owned by `author_id`.
    ///
    /// Validation runs in a fixed order and stops at the first failure:
    /// required text fields, presence of an image, the image-link format
    /// (only when no files were uploaded), then the categories.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if any rule fails; storage is not touched.
    /// Returns [`AppError::NotFound`] if the author does not exist.
    /// Returns [`AppError::Persistence`] on storage failures.
    pub async fn create_post(
        &self,
        input: CreatePostInput,
        author_id: i64,
    ) -> Result<Post, AppError> {
        let missing: Vec<&str> = [
            ("title", blank(&input.title)),
            ("authorName", blank(&input.author_name)),
            ("description", blank(&input.description)),
            (
                "categories",
                input.categories.as_ref().is_none_or(FormValue::is_blank),
            ),
        ]
        .into_iter()
        .filter_map(|(field, is_missing)| is_missing.then_some(field))
        .collect();

        if !missing.is_empty() {
            return Err(AppError::bad_request(
                "All fields are required",
                json!({ "missing": missing }),
            ));
        }

        let image_link = input.image_link.filter(|link| !link.trim().is_empty());

        let images = if !input.uploaded_images.is_empty() {
            input.uploaded_images
        } else if let Some(link) = image_link {
            if !is_image_link(&link) {
                return Err(invalid_image_link(&link));
            }
            vec![link]
        } else {
            return Err(AppError::bad_request(
                "At least one image is required",
                json!({ "fields": ["images", "imageLink"] }),
            ));
        };

        let categories = match &input.categories {
            Some(raw) => parse_categories(raw).map_err(category_error)?,
            None => Vec::new(),
        };

        let new_post = NewPost {
            title: input.title.unwrap_or_default(),
            author_name: input.author_name.unwrap_or_default(),
            author_id,
            image_link: images[0].clone(),
            images,
            categories,
            description: input.description.unwrap_or_default(),
            is_featured: input.is_featured,
        };

        let post = self.posts.create(new_post).await?;

        self.invalidate_listings().await;
        metrics::counter!("posts_created_total").increment(1);
        info!(post_id = post.id, author_id, "Post created");

        Ok(post)
    }

    /// Lists every post and refreshes the all-posts cache slot.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage failures and
    /// [`AppError::Cache`] if the slot cannot be written.
    pub async fn list_all(&self) -> Result<Vec<Post>, AppError> {
        self.list_and_store(PostQuery::All, CacheSlot::AllPosts).await
    }

    /// Lists featured posts and refreshes the featured cache slot.
    pub async fn list_featured(&self) -> Result<Vec<Post>, AppError> {
        self.list_and_store(PostQuery::Featured, CacheSlot::FeaturedPosts).await
    }

    /// Lists posts newest first and refreshes the latest cache slot.
    pub async fn list_latest(&self) -> Result<Vec<Post>, AppError> {
        self.list_and_store(PostQuery::Latest, CacheSlot::LatestPosts).await
    }

    /// Lists posts tagged with `category`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `category` is not a known category;
    /// storage is not queried in that case.
    pub async fn list_by_category(&self, category: &str) -> Result<Vec<Post>, AppError> {
        if !Category::is_valid(category) {
            return Err(AppError::bad_request(
                "Invalid category",
                json!({ "category": category }),
            ));
        }

        self.posts
            .list(PostQuery::Category(category.to_string()))
            .await
    }

    /// Lists posts sharing at least one category with `categories`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if `categories` is empty.
    pub async fn list_related(&self, categories: Vec<String>) -> Result<Vec<Post>, AppError> {
        if categories.is_empty() {
            return Err(AppError::not_found(
                "Invalid category",
                json!({ "reason": "No categories supplied" }),
            ));
        }

        self.posts.list(PostQuery::AnyCategory(categories)).await
    }

    /// Retrieves a post by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no post has this id.
    pub async fn get_by_id(&self, id: i64) -> Result<Post, AppError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| post_not_found(id))
    }

    /// Applies a partial update.
    ///
    /// # Images
    ///
    /// - `existing_images` present (even as `[]`): it replaces the stored
    ///   list and uploaded files are appended
    /// - only files uploaded: the list becomes the uploaded files
    /// - neither: the list is left as it is, and a non-blank `image_link`
    ///   only replaces the legacy `image_link` field
    ///
    /// Whenever the list is rewritten, the legacy `image_link` becomes its
    /// first entry, or empty.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for blank text fields, bad categories,
    /// a malformed `existing_images` or a bad image link.
    /// Returns [`AppError::NotFound`] if no post has this id.
    pub async fn update_post(&self, id: i64, input: UpdatePostInput) -> Result<Post, AppError> {
        let mut patch = PostPatch {
            title: non_blank("title", input.title)?,
            author_name: non_blank("authorName", input.author_name)?,
            description: non_blank("description", input.description)?,
            is_featured: input.is_featured,
            ..Default::default()
        };

        if let Some(raw) = input.categories.filter(|raw| !raw.is_blank()) {
            patch.categories = Some(parse_categories(&raw).map_err(category_error)?);
        }

        let existing_images = input.existing_images.filter(|raw| !raw.is_blank());

        if existing_images.is_some() || !input.uploaded_images.is_empty() {
            let mut images = match &existing_images {
                Some(raw) => parse_list_field(raw).map_err(|e| {
                    AppError::bad_request(
                        "Invalid existing images",
                        json!({ "field": "existingImages", "reason": e.to_string() }),
                    )
                })?,
                None => Vec::new(),
            };
            images.extend(input.uploaded_images);
            patch.set_images(images);
        } else if let Some(link) = input.image_link.filter(|link| !link.trim().is_empty()) {
            if !is_image_link(&link) {
                return Err(invalid_image_link(&link));
            }
            patch.image_link = Some(link);
        }

        let post = self
            .posts
            .update(id, patch)
            .await?
            .ok_or_else(|| post_not_found(id))?;

        self.invalidate_listings().await;
        metrics::counter!("posts_updated_total").increment(1);
        info!(post_id = id, "Post updated");

        Ok(post)
    }

    /// Deletes a post and removes it from its owner's post list.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no post has this id.
    pub async fn delete_post(&self, id: i64) -> Result<Post, AppError> {
        let post = self
            .posts
            .delete(id)
            .await?
            .ok_or_else(|| post_not_found(id))?;

        self.invalidate_listings().await;
        metrics::counter!("posts_deleted_total").increment(1);
        info!(post_id = id, author_id = post.author_id, "Post deleted");

        Ok(post)
    }

    /// Checks that storage answers.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.posts.ping().await
    }

    async fn list_and_store(
        &self,
        query: PostQuery,
        slot: CacheSlot,
    ) -> Result<Vec<Post>, AppError> {
        let posts = self.posts.list(query).await?;

        slots::store(self.cache.as_ref(), slot, &posts)
            .await
            .map_err(|e| AppError::cache(e.to_string()))?;

        Ok(posts)
    }

    async fn invalidate_listings(&self) {
        slots::invalidate_all(self.cache.as_ref()).await;
    }
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

/// Passes `None` through, rejects a supplied value that is only whitespace.
fn non_blank(field: &str, value: Option<String>) -> Result<Option<String>, AppError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(AppError::bad_request(
            format!("{} cannot be empty", field),
            json!({ "field": field }),
        )),
        other => Ok(other),
    }
}

fn post_not_found(id: i64) -> AppError {
    AppError::not_found("Post not found", json!({ "id": id }))
}

fn invalid_image_link(link: &str) -> AppError {
    AppError::bad_request(
        "Image URL must end with .jpg, .jpeg, .png or .webp",
        json!({ "imageLink": link }),
    )
}

fn category_error(e: CategoryError) -> AppError {
    AppError::bad_request(e.to_string(), json!({ "field": "categories" }))
}
