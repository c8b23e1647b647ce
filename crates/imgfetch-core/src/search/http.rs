//! Blocking HTTP GET over libcurl.

use crate::config::ImgfetchConfig;
use crate::error::HttpError;
use std::time::Duration;

/// Shared request settings for search pages and image bodies.
#[derive(Debug, Clone)]
pub struct HttpClient {
    user_agent: String,
    connect_timeout: Duration,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(user_agent: impl Into<String>, connect_timeout: Duration, timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.into(),
            connect_timeout,
            timeout,
        }
    }

    pub fn from_config(cfg: &ImgfetchConfig) -> Self {
        Self::new(cfg.user_agent.clone(), cfg.connect_timeout(), cfg.timeout())
    }

    /// GET `url` and return the body. Follows redirects.
    ///
    /// When `limit` is set, the transfer is aborted as soon as the body grows
    /// past it.
    pub fn get(&self, url: &str, accept: &str, limit: Option<u64>) -> Result<Vec<u8>, HttpError> {
        let mut body: Vec<u8> = Vec::new();
        let mut overflow = false;

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(&self.user_agent)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        easy.accept_encoding("")?;

        let mut list = curl::easy::List::new();
        list.append(&format!("Accept: {}", accept))?;
        easy.http_headers(list)?;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                if let Some(max) = limit {
                    if (body.len() + data.len()) as u64 > max {
                        overflow = true;
                        return Ok(0); // abort transfer
                    }
                }
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()
        };

        if overflow {
            return Err(HttpError::TooLarge {
                limit: limit.unwrap_or_default(),
            });
        }
        performed?;

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(HttpError::Status(code));
        }
        tracing::trace!(url, bytes = body.len(), "GET complete");
        Ok(body)
    }
}
