//! Storage for uploaded images.
//!
//! Handlers hand raw uploads to a [`MediaStore`] and receive stable URLs back.
//! [`LocalMediaStore`] writes to a directory the server exposes at `/uploads`.

mod local;
mod service;

pub use local::LocalMediaStore;
pub use service::{MediaStore, StoredMedia, Upload};
