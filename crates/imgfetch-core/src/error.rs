//! Error types at the library seams.
//!
//! `SearchError` and `FetchError` end a run; `ItemError` only skips one image.

use std::path::PathBuf;

/// Transport failure for a single HTTP GET.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// Curl reported an error (timeout, connection, TLS, bad URL...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response had a non-2xx status.
    #[error("HTTP {0}")]
    Status(u32),
    /// Body exceeded the configured size cap; the transfer was aborted.
    #[error("response larger than {limit} bytes")]
    TooLarge { limit: u64 },
}

/// Fatal failure of the search request itself.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("invalid search endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("search request failed: {0}")]
    Http(#[from] HttpError),
    #[error("malformed search response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure of one image in the batch (fetch, sniff, resize or write).
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("unrecognized image data: {0}")]
    Format(#[source] image::ImageError),
    #[error("cannot decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("cannot encode image: {0}")]
    Encode(#[source] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure that aborts the whole batch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("cannot create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed download of image {url}: {source}")]
    Aborted {
        url: String,
        #[source]
        source: ItemError,
    },
}
