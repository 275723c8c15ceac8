// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload directory
//!
//! Every name that touches the filesystem goes through [`sanitize_filename`]
//! first, so a stored file always lands directly inside the upload directory.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info};

/// Names Windows reserves for devices
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM0", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7",
    "COM8", "COM9", "LPT0", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file part in the request")]
    MissingFile,

    #[error("Missing form field: {0}")]
    MissingField(String),

    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),

    #[error("Failed to store upload {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Requested file is absent or was not named in sanitized form
#[derive(Debug, Error, PartialEq)]
#[error("File not found: {0}")]
pub struct NotFoundError(pub String);

/// A file written into the upload directory
#[derive(Debug, Clone, PartialEq)]
pub struct StoredUpload {
    /// Sanitized name, as used in `/get_image/<filename>`
    pub filename: String,
    pub path: PathBuf,
}

fn disallowed_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("filename pattern is valid"))
}

/// Reduce a client-supplied filename to a safe single path component
///
/// Returns an empty string when nothing usable is left.
pub fn sanitize_filename(raw: &str) -> String {
    // Compatibility decomposition splits accents off their base letters
    let ascii: String = raw
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = disallowed_chars().replace_all(&joined, "");
    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c == '_');

    let stem = trimmed.split('.').next().unwrap_or_default();
    if !trimmed.is_empty() && RESERVED_NAMES.contains(&stem.to_ascii_uppercase().as_str()) {
        format!("_{}", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Writes uploads into, and resolves reads from, one directory
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store `data` under the sanitized form of `filename`
    ///
    /// An existing file with the same name is overwritten.
    pub async fn save(&self, filename: &str, data: &[u8]) -> Result<StoredUpload, UploadError> {
        let safe = sanitize_filename(filename);
        if safe.is_empty() {
            return Err(UploadError::InvalidFilename(filename.to_string()));
        }

        let path = self.dir.join(&safe);
        if path.parent() != Some(self.dir.as_path()) {
            return Err(UploadError::InvalidFilename(filename.to_string()));
        }

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| UploadError::Io {
                path: self.dir.display().to_string(),
                source,
            })?;

        tokio::fs::write(&path, data)
            .await
            .map_err(|source| UploadError::Io {
                path: path.display().to_string(),
                source,
            })?;

        if safe != filename {
            debug!("Upload name {:?} stored as {:?}", filename, safe);
        }
        info!("Stored upload {} ({} bytes)", safe, data.len());

        Ok(StoredUpload {
            filename: safe,
            path,
        })
    }

    /// Path of an existing upload
    ///
    /// Only names already in sanitized form are accepted.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, NotFoundError> {
        if filename.is_empty() || sanitize_filename(filename) != filename {
            return Err(NotFoundError(filename.to_string()));
        }

        let path = self.dir.join(filename);
        if path.is_file() {
            Ok(path)
        } else {
            Err(NotFoundError(filename.to_string()))
        }
    }
}
