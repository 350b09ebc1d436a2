//! Input validation for API requests.
//!
//! Each check returns `Err(message)` with a user-facing message; handlers
//! collect them per field with `ValidationErrorBuilder` from the `error`
//! module.

use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;

use crate::content::{check_extension, validate_video_url, UploadKind, VideoType};

lazy_static! {
    /// Loose email check: something@domain.tld, no whitespace
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$"
    ).unwrap();

    /// Calendar date as YYYY-MM-DD
    static ref DATE_REGEX: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
}

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";

/// Required text: present and not only whitespace
pub fn validate_required(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(BLANK.to_string());
    }
    Ok(())
}

pub fn validate_max_length(value: &str, max: usize) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!(
            "Ensure this field has no more than {} characters.",
            max
        ));
    }
    Ok(())
}

/// Required text with a length cap
pub fn validate_text(value: &str, max: usize) -> Result<(), String> {
    validate_required(value)?;
    validate_max_length(value, max)
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.len() > 254 || !EMAIL_REGEX.is_match(email) {
        return Err("Enter a valid email address.".to_string());
    }
    Ok(())
}

/// Email that may be left blank
pub fn validate_optional_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Ok(());
    }
    validate_email(email)
}

/// http(s) URL with a host; blank is allowed
pub fn validate_optional_url(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Ok(());
    }
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => Ok(()),
        _ => Err("Enter a valid URL.".to_string()),
    }
}

/// Value must parse as one of the choice enum's keys
pub fn validate_choice<T: FromStr<Err = String>>(value: &str) -> Result<(), String> {
    value.parse::<T>().map(|_| ())
}

pub fn validate_video_type(value: &str) -> Result<(), String> {
    if VideoType::ALL.iter().any(|t| t.as_str() == value) {
        Ok(())
    } else {
        Err(format!("\"{}\" is not a valid choice.", value))
    }
}

/// Video URL checked against its declared host
pub fn validate_video(video_url: &str, video_type: &str) -> Result<(), String> {
    let video_type = video_type.parse::<VideoType>().unwrap_or_default();
    validate_video_url(video_url, video_type).map_err(|e| e.to_string())
}

pub fn validate_rating(rating: i64) -> Result<(), String> {
    if rating < 1 {
        return Err("Ensure this value is greater than or equal to 1.".to_string());
    }
    if rating > 5 {
        return Err("Ensure this value is less than or equal to 5.".to_string());
    }
    Ok(())
}

/// Optional YYYY-MM-DD date
pub fn validate_optional_date(value: Option<&str>) -> Result<(), String> {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Ok(());
    };
    if DATE_REGEX.is_match(value)
        && chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
    {
        Ok(())
    } else {
        Err("Date has wrong format. Use one of these formats instead: YYYY-MM-DD.".to_string())
    }
}

/// Stored media paths are relative to the media root and may not escape it.
/// The file extension must be one `kind` accepts for uploads.
pub fn validate_media_path(path: &str, kind: UploadKind) -> Result<(), String> {
    if path.trim().is_empty() {
        return Err(BLANK.to_string());
    }
    let file = if path.starts_with("http://") || path.starts_with("https://") {
        let url = url::Url::parse(path).map_err(|_| "Enter a valid URL.".to_string())?;
        url.path().to_string()
    } else {
        if path.starts_with('/') || path.split('/').any(|part| part == "..") {
            return Err("Invalid media path.".to_string());
        }
        path.to_string()
    };
    check_extension(kind, &file).map_err(|e| e.to_string())?;
    validate_max_length(path, 255)
}

pub fn validate_optional_media_path(path: Option<&str>, kind: UploadKind) -> Result<(), String> {
    match path {
        Some(p) if !p.is_empty() => validate_media_path(p, kind),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{BlogCategory, ServiceType};

    #[test]
    fn test_validate_text() {
        assert!(validate_text("Savings", 200).is_ok());
        assert_eq!(validate_text("   ", 200), Err(BLANK.to_string()));
        assert_eq!(
            validate_text("abcdef", 5),
            Err("Ensure this field has no more than 5 characters.".to_string())
        );
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ama@example.com").is_ok());
        assert!(validate_email("kofi.mensah+susu@mail.example.gh").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("a b@example.com").is_err());
        assert!(validate_optional_email("").is_ok());
    }

    #[test]
    fn test_validate_optional_url() {
        assert!(validate_optional_url("").is_ok());
        assert!(validate_optional_url("https://facebook.com/bencyn").is_ok());
        assert!(validate_optional_url("ftp://example.com").is_err());
        assert!(validate_optional_url("facebook").is_err());
    }

    #[test]
    fn test_validate_choice() {
        assert!(validate_choice::<ServiceType>("loans").is_ok());
        assert!(validate_choice::<BlogCategory>("Investment").is_ok());
        assert_eq!(
            validate_choice::<ServiceType>("crypto"),
            Err("\"crypto\" is not a valid choice.".to_string())
        );
        assert!(validate_video_type("vimeo").is_ok());
        assert!(validate_video_type("tiktok").is_err());
    }

    #[test]
    fn test_validate_video() {
        assert!(validate_video("", "youtube").is_ok());
        assert!(validate_video("https://youtu.be/dQw4w9WgXcQ", "youtube").is_ok());
        assert!(validate_video("https://vimeo.com/watch", "vimeo").is_err());
        assert!(validate_video("https://example.com/v.mp4", "upload").is_ok());
    }

    #[test]
    fn test_validate_rating() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_validate_optional_date() {
        assert!(validate_optional_date(None).is_ok());
        assert!(validate_optional_date(Some("2024-02-29")).is_ok());
        assert!(validate_optional_date(Some("2023-02-29")).is_err());
        assert!(validate_optional_date(Some("29/02/2024")).is_err());
    }

    #[test]
    fn test_validate_media_path() {
        assert!(validate_media_path("hero_images/a.jpg", UploadKind::HeroImages).is_ok());
        assert!(validate_media_path("https://cdn.example/a.jpg", UploadKind::HeroImages).is_ok());
        assert!(validate_media_path("../etc/passwd", UploadKind::HeroImages).is_err());
        assert!(validate_media_path("/etc/a.jpg", UploadKind::HeroImages).is_err());
        assert!(validate_optional_media_path(None, UploadKind::GalleryVideos).is_ok());
    }

    #[test]
    fn test_media_path_extension_follows_field() {
        assert_eq!(
            validate_media_path("gallery_videos/x.mp4", UploadKind::HeroImages),
            Err("File extension \"mp4\" is not allowed. Allowed extensions are: jpg, jpeg, png, webp.".to_string())
        );
        assert!(validate_media_path("hero_images/a.gif", UploadKind::HeroImages).is_err());
        assert!(validate_media_path("gallery_images/a.gif", UploadKind::GalleryImages).is_ok());
        assert!(validate_media_path("blog_videos/clip.webm", UploadKind::BlogVideos).is_ok());
        assert!(validate_media_path("blog_videos/clip.jpg", UploadKind::BlogVideos).is_err());
        assert!(validate_media_path("hero_images/noext", UploadKind::HeroImages).is_err());
    }
}
