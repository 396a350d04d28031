//! Accepted image formats.

use regex::Regex;
use std::sync::LazyLock;

/// A direct image link must end in one of the accepted extensions.
static IMAGE_LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|webp)$").expect("valid image link regex"));

/// Image formats accepted for upload and as direct links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
}

impl ImageFormat {
    /// File extension used when storing an upload of this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "webp" => Some(ImageFormat::Webp),
            _ => None,
        }
    }

    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            "image/webp" => Some(ImageFormat::Webp),
            _ => None,
        }
    }

    /// Detects the format from the file name first, then the content type.
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Option<Self> {
        file_name
            .and_then(|name| name.rsplit_once('.'))
            .and_then(|(_, ext)| Self::from_extension(ext))
            .or_else(|| content_type.and_then(Self::from_content_type))
    }
}

/// Returns true if `link` ends in `.jpg`, `.jpeg`, `.png` or `.webp` (any case).
pub fn is_image_link(link: &str) -> bool {
    IMAGE_LINK_REGEX.is_match(link)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_links() {
        assert!(is_image_link("https://cdn.example.com/a.jpg"));
        assert!(is_image_link("https://cdn.example.com/a.JPEG"));
        assert!(is_image_link("photo.webp"));
        assert!(is_image_link("photo.Png"));
        assert!(!is_image_link("https://images.unsplash.com/photo-1570077188670"));
        assert!(!is_image_link("https://cdn.example.com/a.gif"));
        assert!(!is_image_link("https://cdn.example.com/a.jpg?w=200"));
    }

    #[test]
    fn test_detect_prefers_file_name() {
        assert_eq!(
            ImageFormat::detect(Some("beach.PNG"), Some("image/jpeg")),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::detect(Some("blob"), Some("image/webp")),
            Some(ImageFormat::Webp)
        );
        assert_eq!(ImageFormat::detect(Some("doc.pdf"), Some("application/pdf")), None);
        assert_eq!(ImageFormat::detect(None, None), None);
    }

    #[test]
    fn test_jpeg_extension_is_normalized() {
        assert_eq!(ImageFormat::from_extension("jpeg").unwrap().extension(), "jpg");
    }
}
