//! Multipart post form extractor.
//!
//! Text fields are collected by name, repeated names become lists. Files sent
//! under `images` are handed to the media store while the body is read, so
//! handlers only ever see their public URLs.

use axum::extract::{FromRequest, Multipart, Request};
use serde_json::json;
use std::collections::HashMap;
use tracing::debug;

use crate::application::services::{CreatePostInput, UpdatePostInput};
use crate::domain::form_value::{FormValue, parse_flag};
use crate::error::AppError;
use crate::infrastructure::media::Upload;
use crate::state::AppState;

const IMAGES_FIELD: &str = "images";

/// A parsed post form.
#[derive(Debug, Default)]
pub struct PostForm {
    fields: HashMap<String, FormValue>,
    uploaded_images: Vec<String>,
}

impl FromRequest<AppState> for PostForm {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text(), json!({})))?;

        let mut form = PostForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if name == IMAGES_FIELD && field.file_name().is_some() {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;

                // Browsers send an empty part when no file was chosen.
                if bytes.is_empty() && file_name.as_deref().is_none_or(str::is_empty) {
                    continue;
                }

                let stored = state
                    .media
                    .store(Upload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    })
                    .await?;
                debug!(url = %stored.url, "Stored uploaded image");
                form.uploaded_images.push(stored.url);
                continue;
            }

            let value = field.text().await?;
            form.push(name, value);
        }

        Ok(form)
    }
}

impl PostForm {
    fn push(&mut self, name: String, value: String) {
        let merged = match self.fields.remove(&name) {
            Some(existing) => existing.push(value),
            None => FormValue::Text(value),
        };
        self.fields.insert(name, merged);
    }

    /// Last value sent for a single-valued field.
    fn text(&mut self, name: &str) -> Option<String> {
        match self.fields.remove(name)? {
            FormValue::Text(value) => Some(value),
            FormValue::List(mut values) => values.pop(),
        }
    }

    fn flag(&mut self, name: &str) -> Result<Option<bool>, AppError> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => parse_flag(&raw).map(Some).ok_or_else(|| {
                AppError::bad_request(
                    format!("{} must be true or false", name),
                    json!({ "field": name, "value": raw }),
                )
            }),
        }
    }

    pub fn into_create_input(mut self) -> Result<CreatePostInput, AppError> {
        Ok(CreatePostInput {
            title: self.text("title"),
            author_name: self.text("authorName"),
            description: self.text("description"),
            image_link: self.text("imageLink"),
            is_featured: self.flag("isFeaturedPost")?.unwrap_or(false),
            categories: self.fields.remove("categories"),
            uploaded_images: self.uploaded_images,
        })
    }

    pub fn into_update_input(mut self) -> Result<UpdatePostInput, AppError> {
        Ok(UpdatePostInput {
            title: self.text("title"),
            author_name: self.text("authorName"),
            description: self.text("description"),
            image_link: self.text("imageLink"),
            is_featured: self.flag("isFeaturedPost")?,
            categories: self.fields.remove("categories"),
            existing_images: self.fields.remove("existingImages"),
            uploaded_images: self.uploaded_images,
        })
    }
}
