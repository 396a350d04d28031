//! Helpers shared across layers.
//!
//! - [`image_format`] - Accepted image formats and image-link checks
//! - [`random_name`] - Random identifiers for stored files and secrets

pub mod image_format;
pub mod random_name;
