//! The fetch run: search, save, print per-item failures and a summary.

use anyhow::{Context, Result};
use imgfetch_core::config::ImgfetchConfig;
use imgfetch_core::fetcher::{BatchFetcher, FetchOptions, ItemOutcome};
use imgfetch_core::search::SearxngSearch;

/// Console line for a skipped image, `None` for saved ones.
pub(crate) fn failure_line(outcome: &ItemOutcome) -> Option<String> {
    match outcome {
        ItemOutcome::Skipped { error, .. } => Some(format!(
            "Failed download of image {}: {}",
            outcome.url(),
            error
        )),
        ItemOutcome::Saved { .. } => None,
    }
}

pub(crate) fn summary_line(saved: usize) -> String {
    format!("Number of successful downloads: {}", saved)
}

pub fn run_fetch(query: &str, opts: &FetchOptions, cfg: &ImgfetchConfig) -> Result<()> {
    let search = SearxngSearch::from_config(cfg);
    tracing::info!(
        query,
        count = opts.count,
        max_height = ?opts.max_height,
        searx = search.base_url(),
        "starting image fetch"
    );
    let fetcher = BatchFetcher::new(&search, cfg.output_root.clone())
        .sanitize_dirs(cfg.sanitize_query_dirs);

    let report = fetcher
        .fetch_and_save_with(query, opts, |outcome| {
            if let Some(line) = failure_line(outcome) {
                println!("{}", line);
            }
        })
        .with_context(|| format!("image search for {:?}", query))?;

    println!("{}", summary_line(report.saved_count()));
    Ok(())
}
