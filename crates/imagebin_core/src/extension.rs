//! Accepted image file extensions.

use std::path::Path;

/// File extensions accepted for upload.
///
/// Validation is purely by the extension of the client-supplied filename;
/// file contents are never inspected.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    derive_more::Display,
)]
pub enum ImageExtension {
    /// `.jpg`
    #[display(".jpg")]
    Jpg,
    /// `.jpeg`
    #[display(".jpeg")]
    Jpeg,
    /// `.png`
    #[display(".png")]
    Png,
    /// `.webp`
    #[display(".webp")]
    Webp,
}

impl ImageExtension {
    /// Extension including the leading dot, lowercase.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageExtension::Jpg => ".jpg",
            ImageExtension::Jpeg => ".jpeg",
            ImageExtension::Png => ".png",
            ImageExtension::Webp => ".webp",
        }
    }

    /// Conventional MIME type, used when the upload declares none.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageExtension::Jpg | ImageExtension::Jpeg => "image/jpeg",
            ImageExtension::Png => "image/png",
            ImageExtension::Webp => "image/webp",
        }
    }

    /// Extract an accepted extension from an original filename.
    ///
    /// Matching is case-insensitive. Returns `None` when the name has no
    /// extension or an extension outside the accepted set.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename).extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "jpg" => Some(ImageExtension::Jpg),
            "jpeg" => Some(ImageExtension::Jpeg),
            "png" => Some(ImageExtension::Png),
            "webp" => Some(ImageExtension::Webp),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_accepts_allowed_extensions_case_insensitively() {
        assert_eq!(ImageExtension::from_filename("a.jpg"), Some(ImageExtension::Jpg));
        assert_eq!(ImageExtension::from_filename("a.JPEG"), Some(ImageExtension::Jpeg));
        assert_eq!(ImageExtension::from_filename("dir/a.b.Png"), Some(ImageExtension::Png));
        assert_eq!(ImageExtension::from_filename("a.webp"), Some(ImageExtension::Webp));
    }

    #[test]
    fn test_rejects_other_extensions() {
        for name in ["a.gif", "a.svg", "a.png.exe", "png", ".png", "a.", "noext", ""] {
            assert_eq!(ImageExtension::from_filename(name), None, "{name}");
        }
    }

    #[test]
    fn test_display_matches_as_str() {
        for ext in ImageExtension::iter() {
            assert_eq!(ext.to_string(), ext.as_str());
            assert!(ext.mime_type().starts_with("image/"));
        }
    }
}
