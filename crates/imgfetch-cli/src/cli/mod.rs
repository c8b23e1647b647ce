//! CLI for imgfetch.

mod fetch;

use anyhow::Result;
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use imgfetch_core::config::{self, ImgfetchConfig};
use imgfetch_core::fetcher::{FaultPolicy, FetchOptions};
use std::path::PathBuf;

pub use fetch::run_fetch;

/// Do an image search for the supplied query and save the requested number of results.
///
/// Images are written to `<output root>/<query with spaces as underscores>/` as
/// `0.<ext>`, `1.<ext>`, ... numbered by successful downloads.
#[derive(Debug, Parser)]
#[command(name = "imgfetch", version)]
pub struct Cli {
    /// Image search query.
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    pub query: String,

    /// Number of images to download [default: 5, or `default_count` from config].
    #[arg(short = 'n', long, value_name = "N")]
    pub number: Option<usize>,

    /// Max height to download image at (images with larger height will be downscaled).
    #[arg(long, value_name = "H", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_height: Option<u32>,

    /// Stop at the first image that fails instead of skipping it.
    #[arg(long)]
    pub abort_on_error: bool,

    /// Directory holding the per-query folders [default: images].
    #[arg(long, value_name = "DIR")]
    pub output_root: Option<PathBuf>,

    /// SearXNG instance to query (overrides `searx_url` from config).
    #[arg(long, value_name = "URL")]
    pub searx_url: Option<String>,
}

impl Cli {
    /// Merge flags over the loaded config. Flags win.
    pub fn resolve(self, mut cfg: ImgfetchConfig) -> (String, FetchOptions, ImgfetchConfig) {
        if let Some(root) = self.output_root {
            cfg.output_root = root;
        }
        if let Some(url) = self.searx_url {
            cfg.searx_url = url;
        }
        let opts = FetchOptions {
            count: self.number.unwrap_or(cfg.default_count),
            max_height: self.max_height,
            policy: if self.abort_on_error {
                FaultPolicy::Abort
            } else {
                FaultPolicy::Isolate
            },
        };
        (self.query, opts, cfg)
    }
}

pub fn run_from_args() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_or_init().unwrap_or_else(|e| {
        tracing::warn!("config unavailable, using defaults: {:#}", e);
        ImgfetchConfig::default()
    });
    tracing::debug!("loaded config: {:?}", cfg);

    let (query, opts, cfg) = cli.resolve(cfg);
    run_fetch(&query, &opts, &cfg)
}

#[cfg(test)]
mod tests;
