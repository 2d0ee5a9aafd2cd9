//! Wikipedia/Wikimedia image lookup.
//!
//! Two-step lookup: full-text search for the subject's page title, then
//! the page's lead thumbnail via the `pageimages` prop. Either step may
//! legitimately find nothing, which surfaces as `Ok(None)`.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::clients::ImageResolver;
use crate::error::PipelineError;

const THUMBNAIL_SIZE: u32 = 600;

/// Configuration for the image lookup service.
#[derive(Debug, Clone)]
pub struct WikimediaConfig {
    /// MediaWiki API endpoint, default `https://en.wikipedia.org/w/api.php`.
    pub api_url: String,
}

impl Default for WikimediaConfig {
    fn default() -> Self {
        Self {
            api_url: "https://en.wikipedia.org/w/api.php".to_owned(),
        }
    }
}

/// Image resolver backed by the MediaWiki API.
pub struct WikimediaImages {
    http: reqwest::Client,
    config: WikimediaConfig,
}

impl WikimediaImages {
    pub fn new(http: reqwest::Client, config: WikimediaConfig) -> Self {
        Self { http, config }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PageImagesResponse {
    #[serde(default)]
    query: Option<PageImagesQuery>,
}

#[derive(Debug, Deserialize)]
struct PageImagesQuery {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    source: String,
}

/// Pull the first available thumbnail URL out of a `pageimages` reply.
fn first_thumbnail(resp: PageImagesResponse) -> Option<String> {
    resp.query?
        .pages
        .into_values()
        .find_map(|p| p.thumbnail.map(|t| t.source))
}

#[async_trait]
impl ImageResolver for WikimediaImages {
    async fn resolve_image(&self, subject: &str) -> Result<Option<String>, PipelineError> {
        let transport =
            |e| PipelineError::from_transport("image service", e, PipelineError::ImageLookup);
        let decode =
            |e| PipelineError::ImageLookup(format!("invalid image service response: {e}"));

        // Step 1: find the subject's page title.
        let search: SearchResponse = self
            .http
            .get(&self.config.api_url)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", subject),
                ("format", "json"),
                ("origin", "*"),
            ])
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(|e| PipelineError::ImageLookup(format!("image service: {e}")))?
            .json()
            .await
            .map_err(decode)?;

        let title = match search.query.and_then(|q| q.search.into_iter().next()) {
            Some(hit) => hit.title,
            None => {
                debug!(subject, "no wikipedia page found");
                return Ok(None);
            }
        };

        // Step 2: fetch the page's lead thumbnail.
        let size = THUMBNAIL_SIZE.to_string();
        let images: PageImagesResponse = self
            .http
            .get(&self.config.api_url)
            .query(&[
                ("action", "query"),
                ("prop", "pageimages"),
                ("titles", title.as_str()),
                ("format", "json"),
                ("pithumbsize", size.as_str()),
                ("origin", "*"),
            ])
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(|e| PipelineError::ImageLookup(format!("image service: {e}")))?
            .json()
            .await
            .map_err(decode)?;

        let url = first_thumbnail(images);
        debug!(subject, page = %title, found = url.is_some(), "image lookup finished");
        Ok(url)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn thumbnail_extracted_from_pages_map() {
        let raw = r#"{"query":{"pages":{"123":{"thumbnail":{"source":"https://img/x.jpg","width":600}}}}}"#;
        let resp: PageImagesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(first_thumbnail(resp).as_deref(), Some("https://img/x.jpg"));
    }

    #[test]
    fn page_without_thumbnail_yields_none() {
        let raw = r#"{"query":{"pages":{"123":{"title":"Somebody"}}}}"#;
        let resp: PageImagesResponse = serde_json::from_str(raw).unwrap();
        assert!(first_thumbnail(resp).is_none());
    }

    #[test]
    fn missing_query_yields_none() {
        let resp: PageImagesResponse = serde_json::from_str("{}").unwrap();
        assert!(first_thumbnail(resp).is_none());
    }
}
