//! Validation and naming for uploaded media files.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];
const IMAGE_OR_GIF_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg"];

/// Upload destinations; each maps to a folder under the media root.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UploadKind {
    HeroImages,
    PageImages,
    BlogImages,
    BlogContentImages,
    BlogVideos,
    BlogVideoThumbnails,
    GalleryImages,
    GalleryVideos,
    GalleryVideoThumbnails,
}

impl UploadKind {
    pub fn folder(&self) -> &'static str {
        match self {
            Self::HeroImages => "hero_images",
            Self::PageImages => "page_images",
            Self::BlogImages => "blog_images",
            Self::BlogContentImages => "blog_content_images",
            Self::BlogVideos => "blog_videos",
            Self::BlogVideoThumbnails => "blog_video_thumbnails",
            Self::GalleryImages => "gallery_images",
            Self::GalleryVideos => "gallery_videos",
            Self::GalleryVideoThumbnails => "gallery_video_thumbnails",
        }
    }

    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::BlogContentImages | Self::GalleryImages => IMAGE_OR_GIF_EXTENSIONS,
            Self::BlogVideos | Self::GalleryVideos => VIDEO_EXTENSIONS,
            _ => IMAGE_EXTENSIONS,
        }
    }
}

impl std::str::FromStr for UploadKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hero_images" => Ok(Self::HeroImages),
            "page_images" => Ok(Self::PageImages),
            "blog_images" => Ok(Self::BlogImages),
            "blog_content_images" => Ok(Self::BlogContentImages),
            "blog_videos" => Ok(Self::BlogVideos),
            "blog_video_thumbnails" => Ok(Self::BlogVideoThumbnails),
            "gallery_images" => Ok(Self::GalleryImages),
            "gallery_videos" => Ok(Self::GalleryVideos),
            "gallery_video_thumbnails" => Ok(Self::GalleryVideoThumbnails),
            _ => Err(format!("Unknown upload kind: {}", s)),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum UploadError {
    #[error("File extension \"{extension}\" is not allowed. Allowed extensions are: {allowed}.")]
    ExtensionNotAllowed { extension: String, allowed: String },
    #[error("File size exceeds maximum allowed size of {max_mb:.1}MB.")]
    TooLarge { max_mb: f64 },
    #[error("The submitted file is empty.")]
    Empty,
}

/// Lowercased extension of `filename` if `kind` accepts it.
pub fn check_extension(kind: UploadKind, filename: &str) -> Result<String, UploadError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let allowed = kind.allowed_extensions();
    if !allowed.contains(&extension.as_str()) {
        return Err(UploadError::ExtensionNotAllowed {
            extension,
            allowed: allowed.join(", "),
        });
    }
    Ok(extension)
}

/// Check an upload's extension and size, returning the normalised extension.
pub fn validate_upload(
    kind: UploadKind,
    filename: &str,
    size: u64,
    max_size: u64,
) -> Result<String, UploadError> {
    let extension = check_extension(kind, filename)?;

    if size == 0 {
        return Err(UploadError::Empty);
    }

    if size > max_size {
        return Err(UploadError::TooLarge {
            max_mb: max_size as f64 / (1024.0 * 1024.0),
        });
    }

    Ok(extension)
}

/// Relative storage path for a new upload, e.g. `hero_images/<uuid>.jpg`
pub fn storage_path(kind: UploadKind, extension: &str) -> String {
    format!("{}/{}.{}", kind.folder(), uuid::Uuid::new_v4(), extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;

    #[test]
    fn test_accepts_allowed_extension() {
        assert_eq!(
            validate_upload(UploadKind::HeroImages, "banner.JPG", 2 * MB, 10 * MB),
            Ok("jpg".to_string())
        );
        assert_eq!(
            validate_upload(UploadKind::GalleryVideos, "event.webm", MB, 10 * MB),
            Ok("webm".to_string())
        );
    }

    #[test]
    fn test_gif_only_where_allowed() {
        assert!(validate_upload(UploadKind::GalleryImages, "a.gif", MB, 10 * MB).is_ok());
        assert!(validate_upload(UploadKind::HeroImages, "a.gif", MB, 10 * MB).is_err());
    }

    #[test]
    fn test_rejects_missing_extension() {
        let err = validate_upload(UploadKind::PageImages, "README", MB, 10 * MB).unwrap_err();
        assert!(matches!(err, UploadError::ExtensionNotAllowed { .. }));
    }

    #[test]
    fn test_rejects_oversize() {
        let err = validate_upload(UploadKind::HeroImages, "big.png", 11 * MB, 10 * MB).unwrap_err();
        assert_eq!(err.to_string(), "File size exceeds maximum allowed size of 10.0MB.");
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(
            validate_upload(UploadKind::HeroImages, "x.png", 0, 10 * MB),
            Err(UploadError::Empty)
        );
    }

    #[test]
    fn test_storage_path_uses_folder() {
        let path = storage_path(UploadKind::BlogVideos, "mp4");
        assert!(path.starts_with("blog_videos/"));
        assert!(path.ends_with(".mp4"));
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("page_images".parse::<UploadKind>(), Ok(UploadKind::PageImages));
        assert!("../etc".parse::<UploadKind>().is_err());
    }
}
