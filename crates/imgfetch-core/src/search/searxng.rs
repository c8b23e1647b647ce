//! SearXNG image search over its JSON API.
//!
//! `GET {base}/search?q=..&format=json&categories=images&pageno=N` returns a
//! `results` array whose entries carry the full-size image in `img_src`.
//! Pages are walked in order until the batch is full or a page adds nothing.

use super::{HttpClient, ImageHit, ImageSearch};
use crate::config::ImgfetchConfig;
use crate::error::{ItemError, SearchError};
use crate::image_result::ImageResult;
use serde::Deserialize;
use std::collections::HashSet;
use url::Url;

const ACCEPT_JSON: &str = "application/json";
/// Result pages larger than this are rejected.
const MAX_PAGE_BYTES: u64 = 4 * 1024 * 1024;
/// Upper bound on the up-front reservation for a batch.
const HIT_PREALLOC: usize = 64;
const ACCEPT_IMAGE: &str = "image/avif,image/webp,image/png,image/jpeg,image/*;q=0.8,*/*;q=0.5";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<RawResult>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    img_src: Option<String>,
    url: Option<String>,
    title: Option<String>,
}

/// Parse one JSON result page into hits, dropping entries without a usable image URL.
pub fn parse_page(body: &[u8]) -> Result<Vec<ImageHit>, SearchError> {
    let resp: SearchResponse = serde_json::from_slice(body)?;
    Ok(resp
        .results
        .into_iter()
        .filter_map(|r| {
            let image_url = normalize_image_url(r.img_src.as_deref()?)?;
            Some(ImageHit {
                image_url,
                page_url: r.url.filter(|u| !u.is_empty()),
                title: r.title.filter(|t| !t.is_empty()),
            })
        })
        .collect())
}

/// Resolve protocol-relative URLs and keep only http(s).
fn normalize_image_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let candidate = if let Some(rest) = raw.strip_prefix("//") {
        format!("https://{}", rest)
    } else {
        raw.to_string()
    };
    let parsed = Url::parse(&candidate).ok()?;
    match parsed.scheme() {
        "http" | "https" => Some(candidate),
        _ => None,
    }
}

/// Image search backed by a SearXNG instance.
#[derive(Debug, Clone)]
pub struct SearxngSearch {
    base_url: String,
    http: HttpClient,
    max_pages: u32,
    max_page_bytes: u64,
    max_image_bytes: u64,
}

impl SearxngSearch {
    pub fn new(base_url: impl Into<String>, http: HttpClient) -> Self {
        Self {
            base_url: base_url.into(),
            http,
            max_pages: 5,
            max_page_bytes: MAX_PAGE_BYTES,
            max_image_bytes: 32 * 1024 * 1024,
        }
    }

    pub fn from_config(cfg: &ImgfetchConfig) -> Self {
        Self::new(cfg.searx_url.clone(), HttpClient::from_config(cfg))
            .with_max_pages(cfg.max_pages)
            .with_max_image_bytes(cfg.max_image_bytes)
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn with_max_page_bytes(mut self, limit: u64) -> Self {
        self.max_page_bytes = limit;
        self
    }

    pub fn with_max_image_bytes(mut self, limit: u64) -> Self {
        self.max_image_bytes = limit;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of result page `page` (1-based) for `query`.
    pub fn page_url(&self, query: &str, page: u32) -> Result<Url, SearchError> {
        let mut url = Url::parse(&format!("{}/search", self.base_url.trim_end_matches('/')))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("categories", "images")
            .append_pair("pageno", &page.to_string());
        Ok(url)
    }
}

impl ImageSearch for SearxngSearch {
    fn search(&self, query: &str, count: usize) -> Result<Vec<ImageHit>, SearchError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut hits: Vec<ImageHit> = Vec::with_capacity(count.min(HIT_PREALLOC));
        let mut seen: HashSet<String> = HashSet::new();

        for page in 1..=self.max_pages {
            let url = self.page_url(query, page)?;
            tracing::debug!(%url, page, "requesting search page");
            let body = self
                .http
                .get(url.as_str(), ACCEPT_JSON, Some(self.max_page_bytes))?;
            let before = hits.len();
            for hit in parse_page(&body)? {
                if hits.len() == count {
                    break;
                }
                if seen.insert(hit.image_url.clone()) {
                    hits.push(hit);
                }
            }
            if hits.len() == count || hits.len() == before {
                break;
            }
        }

        if hits.len() < count {
            tracing::info!(
                query,
                requested = count,
                returned = hits.len(),
                "search returned fewer images than requested"
            );
        }
        Ok(hits)
    }

    fn fetch(&self, hit: &ImageHit) -> Result<ImageResult, ItemError> {
        let bytes = self
            .http
            .get(&hit.image_url, ACCEPT_IMAGE, Some(self.max_image_bytes))?;
        ImageResult::from_bytes(hit.image_url.clone(), bytes)
    }
}
