//! Page file writer
//!
//! Writes each page to `<dir>/<page>.json` and the recovery copy of a failed
//! page to a fixed path.

use super::sink::PageSink;
use crate::error::{Error, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default location of the recovery copy
pub const DEFAULT_RECOVERY_FILE: &str = "failed.json";

/// Directory holding one file per page
#[derive(Debug)]
pub struct PageDirectory {
    /// Directory path
    path: PathBuf,
    /// Number of pages written
    pages_written: usize,
}

impl PageDirectory {
    /// Claim an output directory for a new run
    ///
    /// The directory is created if missing. An existing empty directory is
    /// reused; anything else already at the path is an output conflict.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let reusable = path.is_dir() && fs::read_dir(path)?.next().is_none();
            if !reusable {
                return Err(Error::output_conflict(path.display().to_string()));
            }
        } else {
            fs::create_dir_all(path).map_err(|e| {
                Error::output(format!(
                    "Failed to create output directory '{}': {e}",
                    path.display()
                ))
            })?;
        }

        debug!(path = %path.display(), "Claimed output directory");
        Ok(Self {
            path: path.to_path_buf(),
            pages_written: 0,
        })
    }

    /// Directory path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the file for a page
    pub fn page_path(&self, page_index: usize) -> PathBuf {
        self.path.join(format!("{page_index}.json"))
    }

    /// Number of pages written so far
    pub fn pages_written(&self) -> usize {
        self.pages_written
    }
}

impl PageSink for PageDirectory {
    fn write(&mut self, page_index: usize, raw: &str) -> Result<()> {
        let file_path = self.page_path(page_index);

        // create_new: a page file is never overwritten
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file_path)
            .map_err(|e| {
                if e.kind() == ErrorKind::AlreadyExists {
                    Error::output_conflict(file_path.display().to_string())
                } else {
                    Error::output(format!(
                        "Failed to create '{}': {e}",
                        file_path.display()
                    ))
                }
            })?;

        file.write_all(raw.as_bytes())?;
        self.pages_written += 1;
        Ok(())
    }
}

/// Write the raw text of a page that could not be processed
pub fn write_recovery_file(path: impl AsRef<Path>, raw: &str) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, raw).map_err(|e| {
        Error::output(format!(
            "Failed to write recovery file '{}': {e}",
            path.display()
        ))
    })?;
    warn!(path = %path.display(), bytes = raw.len(), "Wrote unreadable page to recovery file");
    Ok(())
}
