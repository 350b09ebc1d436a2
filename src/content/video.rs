//! YouTube / Vimeo URL handling: embed URLs, thumbnails and format checks.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

lazy_static! {
    /// watch?v=, youtu.be/ and embed/ forms, capturing the 11 character video id
    static ref YOUTUBE_ID_REGEX: Regex = Regex::new(
        r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([a-zA-Z0-9_-]{11})"
    ).unwrap();

    static ref VIMEO_ID_REGEX: Regex = Regex::new(r"vimeo\.com/(\d+)").unwrap();
}

/// Where a video is hosted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VideoType {
    #[default]
    Youtube,
    Vimeo,
    Upload,
}

impl VideoType {
    pub const ALL: [VideoType; 3] = [Self::Youtube, Self::Vimeo, Self::Upload];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Vimeo => "vimeo",
            Self::Upload => "upload",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Youtube => "YouTube",
            Self::Vimeo => "Vimeo",
            Self::Upload => "Uploaded Video",
        }
    }
}

impl std::fmt::Display for VideoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VideoType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "youtube" => Ok(Self::Youtube),
            "vimeo" => Ok(Self::Vimeo),
            "upload" => Ok(Self::Upload),
            _ => Err(format!("Unknown video type: {}", s)),
        }
    }
}

impl From<String> for VideoType {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VideoUrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),
    #[error("URL must use http or https protocol: {0}")]
    UnsupportedScheme(String),
    #[error("Invalid YouTube URL format. Expected formats: https://www.youtube.com/watch?v=VIDEO_ID or https://youtu.be/VIDEO_ID")]
    InvalidYoutube,
    #[error("Invalid Vimeo URL format. Expected format: https://vimeo.com/VIDEO_ID")]
    InvalidVimeo,
}

fn youtube_id(video_url: &str) -> Option<&str> {
    YOUTUBE_ID_REGEX
        .captures(video_url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn vimeo_id(video_url: &str) -> Option<&str> {
    VIMEO_ID_REGEX
        .captures(video_url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// `https://www.youtube.com/embed/{id}` for any recognised YouTube URL
pub fn youtube_embed_url(video_url: &str) -> Option<String> {
    youtube_id(video_url).map(|id| format!("https://www.youtube.com/embed/{}", id))
}

/// `https://player.vimeo.com/video/{id}` for any recognised Vimeo URL
pub fn vimeo_embed_url(video_url: &str) -> Option<String> {
    vimeo_id(video_url).map(|id| format!("https://player.vimeo.com/video/{}", id))
}

/// Embed URL for a video of the given type.
///
/// Uploaded videos have no embed form and get their URL back unchanged.
/// Callers fall back to the raw URL when this returns `None`.
pub fn embed_url(video_url: &str, video_type: VideoType) -> Option<String> {
    if video_url.is_empty() {
        return None;
    }

    match video_type {
        VideoType::Youtube => youtube_embed_url(video_url),
        VideoType::Vimeo => vimeo_embed_url(video_url),
        VideoType::Upload => Some(video_url.to_string()),
    }
}

/// Preview image derived from the hosting service
pub fn video_thumbnail_url(video_url: &str, video_type: VideoType) -> Option<String> {
    match video_type {
        VideoType::Youtube => youtube_id(video_url)
            .map(|id| format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", id)),
        VideoType::Vimeo => vimeo_id(video_url).map(|id| format!("https://vumbnail.com/{}.jpg", id)),
        VideoType::Upload => None,
    }
}

/// Check a video URL against its declared type. An empty URL is accepted.
pub fn validate_video_url(video_url: &str, video_type: VideoType) -> Result<(), VideoUrlError> {
    if video_url.is_empty() {
        return Ok(());
    }

    let parsed = url::Url::parse(video_url)
        .map_err(|_| VideoUrlError::InvalidFormat(video_url.to_string()))?;
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(VideoUrlError::InvalidFormat(video_url.to_string()));
    }
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(VideoUrlError::UnsupportedScheme(video_url.to_string()));
    }

    match video_type {
        VideoType::Youtube if youtube_id(video_url).is_none() => Err(VideoUrlError::InvalidYoutube),
        VideoType::Vimeo if vimeo_id(video_url).is_none() => Err(VideoUrlError::InvalidVimeo),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_watch_and_short_urls_share_embed() {
        let watch = youtube_embed_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        let short = youtube_embed_url("https://youtu.be/dQw4w9WgXcQ");
        let embed = youtube_embed_url("https://www.youtube.com/embed/dQw4w9WgXcQ");

        assert_eq!(
            watch.as_deref(),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
        );
        assert_eq!(watch, short);
        assert_eq!(watch, embed);
    }

    #[test]
    fn test_youtube_extra_query_params() {
        assert_eq!(
            youtube_embed_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s").as_deref(),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_youtube_invalid() {
        assert!(youtube_embed_url("https://www.youtube.com/channel/abc").is_none());
        assert!(youtube_embed_url("https://youtu.be/short").is_none());
    }

    #[test]
    fn test_vimeo_embed() {
        assert_eq!(
            vimeo_embed_url("https://vimeo.com/76979871").as_deref(),
            Some("https://player.vimeo.com/video/76979871")
        );
        assert!(vimeo_embed_url("https://vimeo.com/channels/staffpicks").is_none());
    }

    #[test]
    fn test_embed_url_dispatch() {
        assert_eq!(embed_url("", VideoType::Youtube), None);
        assert_eq!(
            embed_url("https://cdn.example.com/v.mp4", VideoType::Upload).as_deref(),
            Some("https://cdn.example.com/v.mp4")
        );
        assert_eq!(
            embed_url("https://vimeo.com/123", VideoType::Vimeo).as_deref(),
            Some("https://player.vimeo.com/video/123")
        );
        // a Vimeo link declared as YouTube yields nothing
        assert_eq!(embed_url("https://vimeo.com/123", VideoType::Youtube), None);
    }

    #[test]
    fn test_thumbnails() {
        assert_eq!(
            video_thumbnail_url("https://youtu.be/dQw4w9WgXcQ", VideoType::Youtube).as_deref(),
            Some("https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg")
        );
        assert_eq!(
            video_thumbnail_url("https://vimeo.com/123", VideoType::Vimeo).as_deref(),
            Some("https://vumbnail.com/123.jpg")
        );
        assert_eq!(video_thumbnail_url("https://x.test/a.mp4", VideoType::Upload), None);
    }

    #[test]
    fn test_validate_video_url() {
        assert!(validate_video_url("", VideoType::Youtube).is_ok());
        assert!(validate_video_url("https://youtu.be/dQw4w9WgXcQ", VideoType::Youtube).is_ok());
        assert!(validate_video_url("http://vimeo.com/123", VideoType::Vimeo).is_ok());
        assert!(validate_video_url("https://files.example.com/clip.mp4", VideoType::Upload).is_ok());

        assert_eq!(
            validate_video_url("youtube.com/watch?v=dQw4w9WgXcQ", VideoType::Youtube),
            Err(VideoUrlError::InvalidFormat(
                "youtube.com/watch?v=dQw4w9WgXcQ".to_string()
            ))
        );
        assert_eq!(
            validate_video_url("ftp://youtu.be/dQw4w9WgXcQ", VideoType::Youtube),
            Err(VideoUrlError::UnsupportedScheme(
                "ftp://youtu.be/dQw4w9WgXcQ".to_string()
            ))
        );
        assert_eq!(
            validate_video_url("https://www.youtube.com/", VideoType::Youtube),
            Err(VideoUrlError::InvalidYoutube)
        );
        assert_eq!(
            validate_video_url("https://vimeo.com/about", VideoType::Vimeo),
            Err(VideoUrlError::InvalidVimeo)
        );
    }

    #[test]
    fn test_video_type_parse() {
        assert_eq!("vimeo".parse::<VideoType>(), Ok(VideoType::Vimeo));
        assert!("dailymotion".parse::<VideoType>().is_err());
        assert_eq!(VideoType::from("bogus".to_string()), VideoType::Youtube);
    }
}
