//! Image search providers.
//!
//! A provider answers a query with an ordered batch of hits, then fetches each
//! hit on demand. Only `search` failures are fatal to a run; `fetch` is called
//! per item inside the fetcher's isolation boundary.

mod http;
mod searxng;

pub use http::HttpClient;
pub use searxng::{parse_page, SearxngSearch};

use crate::error::{ItemError, SearchError};
use crate::image_result::ImageResult;

/// One entry of a search batch, before its bytes are fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHit {
    /// Direct URL of the full-size image.
    pub image_url: String,
    /// Page the image was found on, if the engine reported one.
    pub page_url: Option<String>,
    pub title: Option<String>,
}

impl ImageHit {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            page_url: None,
            title: None,
        }
    }
}

/// Search capability used by the batch fetcher.
pub trait ImageSearch {
    /// Up to `count` hits for `query`, in rank order. May return fewer.
    fn search(&self, query: &str, count: usize) -> Result<Vec<ImageHit>, SearchError>;

    /// Download and validate the image behind `hit`.
    fn fetch(&self, hit: &ImageHit) -> Result<ImageResult, ItemError>;
}
