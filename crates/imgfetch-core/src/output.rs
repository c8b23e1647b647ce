//! Output directory layout and file writes.
//!
//! Every query gets `<root>/<normalized query>/`, and images inside it are
//! named `<index>.<ext>` where `index` counts successful saves.

use crate::error::{FetchError, ItemError};
use image::{DynamicImage, ImageFormat};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Directory name for a query: spaces become underscores, nothing else changes.
pub fn normalize_query(query: &str) -> String {
    query.replace(' ', "_")
}

/// Stricter directory name for a query, safe to use as a single path component.
///
/// Applies `normalize_query`, then replaces NUL, `/`, `\` and control characters
/// with `_` and trims leading/trailing dots. An empty result becomes `_`.
pub fn sanitize_dir_name(query: &str) -> String {
    let replaced: String = normalize_query(query)
        .chars()
        .map(|c| {
            if c == '\0' || c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let trimmed = replaced.trim_matches('.');
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

/// A created per-query output directory.
#[derive(Debug, Clone)]
pub struct OutputDir {
    path: PathBuf,
}

impl OutputDir {
    /// Create `root/dir_name` (and parents). An existing directory is fine.
    pub fn create(root: &Path, dir_name: &str) -> Result<Self, FetchError> {
        let path = root.join(dir_name);
        fs::create_dir_all(&path).map_err(|source| FetchError::CreateDir {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("output directory ready: {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the `index`-th saved image with extension `ext`.
    pub fn file_path(&self, index: usize, ext: &str) -> PathBuf {
        self.path.join(format!("{}.{}", index, ext))
    }
}

/// Write `bytes` verbatim to `path`, replacing any existing file.
pub fn write_raw(path: &Path, bytes: &[u8]) -> Result<(), ItemError> {
    let mut f = File::create(path)?;
    f.write_all(bytes)?;
    Ok(())
}

/// Encode `image` as `format` into `path`, replacing any existing file.
pub fn write_encoded(path: &Path, image: &DynamicImage, format: ImageFormat) -> Result<(), ItemError> {
    image
        .save_with_format(path, format)
        .map_err(ItemError::Encode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn normalize_replaces_spaces_only() {
        assert_eq!(normalize_query("red apple"), "red_apple");
        assert_eq!(normalize_query("a  b"), "a__b");
        assert_eq!(normalize_query("Cats/Dogs"), "Cats/Dogs");
    }

    #[test]
    fn sanitize_strips_separators_and_controls() {
        assert_eq!(sanitize_dir_name("cats/dogs"), "cats_dogs");
        assert_eq!(sanitize_dir_name("a\\b\tc"), "a_b_c");
        assert_eq!(sanitize_dir_name("red apple"), "red_apple");
    }

    #[test]
    fn sanitize_handles_dot_names() {
        assert_eq!(sanitize_dir_name(".."), "_");
        assert_eq!(sanitize_dir_name("../etc"), "_etc");
        assert_eq!(sanitize_dir_name(".hidden."), "hidden");
    }

    #[test]
    fn create_is_idempotent_and_makes_parents() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("images");
        let a = OutputDir::create(&root, "red_apple").unwrap();
        assert!(a.path().is_dir());
        let b = OutputDir::create(&root, "red_apple").unwrap();
        assert_eq!(a.path(), b.path());
    }

    #[test]
    fn create_fails_when_root_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("images");
        fs::write(&file, b"x").unwrap();
        let err = OutputDir::create(&file, "q").unwrap_err();
        assert!(matches!(err, FetchError::CreateDir { .. }));
    }

    #[test]
    fn file_names_use_index_and_extension() {
        let out = OutputDir { path: PathBuf::from("images/q") };
        assert_eq!(out.file_path(0, "jpg"), PathBuf::from("images/q/0.jpg"));
        assert_eq!(out.file_path(11, "png"), PathBuf::from("images/q/11.png"));
    }

    #[test]
    fn write_raw_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("0.png");
        write_raw(&p, b"first-longer").unwrap();
        write_raw(&p, b"second").unwrap();
        assert_eq!(fs::read(&p).unwrap(), b"second");
    }

    #[test]
    fn write_encoded_round_trips_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("0.png");
        let img = DynamicImage::ImageRgb8(RgbImage::new(6, 3));
        write_encoded(&p, &img, ImageFormat::Png).unwrap();
        assert_eq!(image::image_dimensions(&p).unwrap(), (6, 3));
    }
}
