//! Pure content helpers shared by the models and the API layer.
//!
//! Nothing in here touches the database or the request; everything is a
//! plain function over strings so it can be tested in isolation.

pub mod media;
pub mod sanitize;
pub mod slug;
pub mod upload;
pub mod video;

pub use media::MediaUrls;
pub use sanitize::sanitize_html;
pub use slug::slugify;
pub use upload::{check_extension, validate_upload, UploadError, UploadKind};
pub use video::{
    embed_url, validate_video_url, video_thumbnail_url, vimeo_embed_url, youtube_embed_url,
    VideoType, VideoUrlError,
};
