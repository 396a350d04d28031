//! Request extractors shared by several handlers.

pub mod post_form;

pub use post_form::PostForm;
