//! Request extractors shared by the handlers.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header, request::Parts},
    Json,
};
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::sync::Arc;

use super::error::ApiError;
use crate::content::MediaUrls;
use crate::AppState;

/// `Json<T>` whose rejections render as `ApiError`
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Where the request came from: used to build absolute media URLs and
/// pagination links.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub media: MediaUrls,
    origin: Option<String>,
    path: String,
    query: Vec<(String, String)>,
}

impl RequestContext {
    pub fn new(origin: Option<String>, path: &str, query: Option<&str>) -> Self {
        let origin = origin.map(|o| o.trim_end_matches('/').to_string());
        let query = query
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();

        Self {
            media: MediaUrls::new(origin.clone()),
            origin,
            path: path.to_string(),
            query,
        }
    }

    /// Same URL with `key` set to `value`, or removed when `value` is None
    pub fn url_with_param(&self, key: &str, value: Option<&str>) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in self.query.iter().filter(|(k, _)| k != key) {
            serializer.append_pair(k, v);
        }
        if let Some(value) = value {
            serializer.append_pair(key, value);
        }
        let query = serializer.finish();

        let mut url = format!("{}{}", self.origin.as_deref().unwrap_or(""), self.path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        url
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let origin = state.config.server.public_url.clone().or_else(|| {
            let host = parts
                .headers
                .get("x-forwarded-host")
                .or_else(|| parts.headers.get(header::HOST))
                .and_then(|h| h.to_str().ok())?;
            let scheme = parts
                .headers
                .get("x-forwarded-proto")
                .and_then(|h| h.to_str().ok())
                .unwrap_or("http");
            Some(format!("{}://{}", scheme, host))
        });

        // Nested routers see a stripped URI; links need the full one
        let uri = parts
            .extensions
            .get::<axum::extract::OriginalUri>()
            .map(|o| o.0.clone())
            .unwrap_or_else(|| parts.uri.clone());

        Ok(Self::new(origin, uri.path(), uri.query()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_with_param_replaces_page() {
        let ctx = RequestContext::new(
            Some("http://localhost:8000".to_string()),
            "/api/blog-posts/",
            Some("category=Investment&page=2"),
        );
        assert_eq!(
            ctx.url_with_param("page", Some("3")),
            "http://localhost:8000/api/blog-posts/?category=Investment&page=3"
        );
        assert_eq!(
            ctx.url_with_param("page", None),
            "http://localhost:8000/api/blog-posts/?category=Investment"
        );
    }

    #[test]
    fn test_without_origin() {
        let ctx = RequestContext::new(None, "/api/services/", None);
        assert_eq!(ctx.url_with_param("page", Some("2")), "/api/services/?page=2");
        assert_eq!(ctx.media.absolute("a/b.jpg"), "/media/a/b.jpg");
    }
}
