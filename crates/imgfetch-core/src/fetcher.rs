//! Batch image fetcher: search once, then save each hit in order.
//!
//! Output files are numbered by successful saves, so a skipped hit does not
//! leave a gap. Search and directory-creation failures end the run; per-image
//! failures are skipped or abort the run depending on `FaultPolicy`.

use crate::error::{FetchError, ItemError};
use crate::image_result::ImageResult;
use crate::output::{self, OutputDir};
use crate::resize;
use crate::search::{ImageHit, ImageSearch};
use std::path::{Path, PathBuf};

/// Number of images requested when the caller does not say.
pub const DEFAULT_COUNT: usize = 5;

/// What to do when one image in the batch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultPolicy {
    /// Report the failure, skip the image, keep going.
    #[default]
    Isolate,
    /// Stop the batch at the first failing image.
    Abort,
}

/// Per-run options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Number of results requested from the provider.
    pub count: usize,
    /// Images taller than this are downscaled before saving.
    pub max_height: Option<u32>,
    pub policy: FaultPolicy,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            max_height: None,
            policy: FaultPolicy::Isolate,
        }
    }
}

/// Result of processing one hit.
#[derive(Debug)]
pub enum ItemOutcome {
    Saved {
        url: String,
        path: PathBuf,
        resized: bool,
    },
    Skipped {
        url: String,
        error: ItemError,
    },
}

impl ItemOutcome {
    pub fn url(&self) -> &str {
        match self {
            ItemOutcome::Saved { url, .. } | ItemOutcome::Skipped { url, .. } => url,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, ItemOutcome::Saved { .. })
    }
}

/// Everything that happened in one run, in batch order.
#[derive(Debug)]
pub struct BatchReport {
    pub dir: PathBuf,
    pub requested: usize,
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    /// Number of files written in this run.
    pub fn saved_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_saved()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.saved_count()
    }

    pub fn saved_paths(&self) -> impl Iterator<Item = &Path> {
        self.outcomes.iter().filter_map(|o| match o {
            ItemOutcome::Saved { path, .. } => Some(path.as_path()),
            ItemOutcome::Skipped { .. } => None,
        })
    }
}

/// Runs searches through `S` and writes results under `output_root`.
pub struct BatchFetcher<'a, S: ImageSearch + ?Sized> {
    search: &'a S,
    output_root: PathBuf,
    sanitize_dirs: bool,
}

impl<'a, S: ImageSearch + ?Sized> BatchFetcher<'a, S> {
    pub fn new(search: &'a S, output_root: impl Into<PathBuf>) -> Self {
        Self {
            search,
            output_root: output_root.into(),
            sanitize_dirs: false,
        }
    }

    /// Also strip path separators and control characters from query directory names.
    pub fn sanitize_dirs(mut self, on: bool) -> Self {
        self.sanitize_dirs = on;
        self
    }

    /// Directory name used for `query`.
    pub fn dir_name(&self, query: &str) -> String {
        if self.sanitize_dirs {
            output::sanitize_dir_name(query)
        } else {
            output::normalize_query(query)
        }
    }

    pub fn fetch_and_save(&self, query: &str, opts: &FetchOptions) -> Result<BatchReport, FetchError> {
        self.fetch_and_save_with(query, opts, |_| {})
    }

    /// Like `fetch_and_save`, calling `on_item` after each hit is processed.
    pub fn fetch_and_save_with<F>(
        &self,
        query: &str,
        opts: &FetchOptions,
        mut on_item: F,
    ) -> Result<BatchReport, FetchError>
    where
        F: FnMut(&ItemOutcome),
    {
        let hits = self.search.search(query, opts.count)?;
        tracing::info!(
            query,
            requested = opts.count,
            returned = hits.len(),
            "search complete"
        );

        let dir = OutputDir::create(&self.output_root, &self.dir_name(query))?;

        let mut outcomes = Vec::with_capacity(hits.len());
        let mut saved = 0usize;
        for hit in &hits {
            let outcome = match self.save_one(hit, &dir, saved, opts.max_height) {
                Ok((path, resized)) => {
                    saved += 1;
                    tracing::debug!(
                        url = %hit.image_url,
                        page = hit.page_url.as_deref().unwrap_or("-"),
                        title = hit.title.as_deref().unwrap_or("-"),
                        path = %path.display(),
                        resized,
                        "saved image"
                    );
                    ItemOutcome::Saved {
                        url: hit.image_url.clone(),
                        path,
                        resized,
                    }
                }
                Err(error) => {
                    tracing::warn!(url = %hit.image_url, %error, "failed download of image");
                    if opts.policy == FaultPolicy::Abort {
                        return Err(FetchError::Aborted {
                            url: hit.image_url.clone(),
                            source: error,
                        });
                    }
                    ItemOutcome::Skipped {
                        url: hit.image_url.clone(),
                        error,
                    }
                }
            };
            on_item(&outcome);
            outcomes.push(outcome);
        }

        tracing::info!(query, saved, skipped = outcomes.len() - saved, "batch finished");
        Ok(BatchReport {
            dir: dir.path().to_path_buf(),
            requested: opts.count,
            outcomes,
        })
    }

    fn save_one(
        &self,
        hit: &ImageHit,
        dir: &OutputDir,
        index: usize,
        max_height: Option<u32>,
    ) -> Result<(PathBuf, bool), ItemError> {
        let image = self.search.fetch(hit)?;
        let path = dir.file_path(index, image.extension());
        if let Some(resized) = Self::shrink(&image, max_height)? {
            output::write_encoded(&path, &resized, image.format())?;
            return Ok((path, true));
        }
        output::write_raw(&path, image.content())?;
        Ok((path, false))
    }

    fn shrink(image: &ImageResult, max_height: Option<u32>) -> Result<Option<image::DynamicImage>, ItemError> {
        match max_height {
            Some(max) => resize::downscale(image, max),
            None => Ok(None),
        }
    }
}
