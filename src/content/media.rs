/// Mount point for uploaded files
pub const MEDIA_PREFIX: &str = "/media";

/// Turns stored media paths into public URLs.
///
/// Stored values are relative to the media root (`hero_images/abc.jpg`);
/// anything that already looks like an absolute URL is passed through.
#[derive(Debug, Clone, Default)]
pub struct MediaUrls {
    origin: Option<String>,
}

impl MediaUrls {
    pub fn new(origin: Option<String>) -> Self {
        Self {
            origin: origin.map(|o| o.trim_end_matches('/').to_string()),
        }
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// `/media/<path>`
    pub fn relative(&self, path: &str) -> String {
        if is_absolute_url(path) {
            return path.to_string();
        }
        format!("{}/{}", MEDIA_PREFIX, path.trim_start_matches('/'))
    }

    /// `<origin>/media/<path>`, or the relative form when no origin is known
    pub fn absolute(&self, path: &str) -> String {
        let relative = self.relative(path);
        match &self.origin {
            Some(origin) if !is_absolute_url(&relative) => format!("{}{}", origin, relative),
            _ => relative,
        }
    }

    pub fn relative_opt(&self, path: Option<&str>) -> Option<String> {
        path.filter(|p| !p.is_empty()).map(|p| self.relative(p))
    }

    pub fn absolute_opt(&self, path: Option<&str>) -> Option<String> {
        path.filter(|p| !p.is_empty()).map(|p| self.absolute(p))
    }
}

fn is_absolute_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}
