//! Media library scanner.
//!
//! Walks the configured library roots and turns every media file into a
//! [`ScanResult`] carrying the title and year parsed from its name. Nothing
//! here touches the catalog; matching happens in [`crate::library`].

pub mod filename;
pub mod prober;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cinesync_common::paths::{has_extension_in, VIDEO_EXTENSIONS};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::LibraryConfig;

pub use filename::{FilenameParser, ParsedFilename};
pub use prober::{BasicProber, FileProber, ProbeInfo};

/// A media file discovered on disk, with what its name says about it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanResult {
    pub path: PathBuf,
    pub file_name: String,
    pub parsed_title: String,
    pub parsed_year: Option<i32>,
    pub file_size: i64,
    pub is_media_file: bool,
    /// Set when no usable title could be parsed from the name.
    pub parse_error: Option<String>,
}

impl ScanResult {
    /// The path as stored in the catalog.
    pub fn path_str(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Produces scan results for a library.
pub trait Scanner: Send + Sync {
    /// Scan every configured root. Fails once `cancel` fires.
    ///
    /// Blocking; async callers run it off the runtime.
    fn scan(&self, cancel: &CancellationToken) -> Result<Vec<ScanResult>>;

    /// Build the scan result for one file.
    fn scan_file(&self, path: &Path) -> Result<ScanResult>;

    /// Whether `path` has one of the recognised media extensions.
    fn is_media_file(&self, path: &Path) -> bool;
}

/// [`Scanner`] over directories on the local filesystem.
#[derive(Debug, Clone)]
pub struct LibraryScanner {
    roots: Vec<PathBuf>,
    extensions: Vec<String>,
    parser: FilenameParser,
}

impl LibraryScanner {
    /// Create a scanner over `roots`. An empty `extensions` list means the
    /// built-in video extensions.
    pub fn new(roots: Vec<PathBuf>, extensions: Vec<String>) -> Result<Self> {
        let parser = FilenameParser::new().context("failed to compile filename patterns")?;
        Ok(Self {
            roots,
            extensions,
            parser,
        })
    }

    pub fn from_config(config: &LibraryConfig) -> Result<Self> {
        Self::new(config.paths.clone(), config.extensions.clone())
    }

    fn scan_root(
        &self,
        cancel: &CancellationToken,
        root: &Path,
        results: &mut Vec<ScanResult>,
    ) -> Result<()> {
        info!("Scanning directory: {:?}", root);
        let before = results.len();

        for entry in WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
        {
            if cancel.is_cancelled() {
                anyhow::bail!("scan of {} cancelled", root.display());
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {:?}: {}", root, e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.is_media_file(entry.path()) {
                continue;
            }

            match self.scan_file(entry.path()) {
                Ok(result) => results.push(result),
                Err(e) => warn!("Failed to scan file {:?}: {:#}", entry.path(), e),
            }
        }

        info!(
            "Scan complete: {} media files found under {:?}",
            results.len() - before,
            root
        );
        Ok(())
    }
}

impl Scanner for LibraryScanner {
    fn scan(&self, cancel: &CancellationToken) -> Result<Vec<ScanResult>> {
        if self.roots.is_empty() {
            anyhow::bail!("no library paths configured");
        }

        let mut results = Vec::new();
        for root in &self.roots {
            // An unmounted library must not look like an empty one.
            if !root.is_dir() {
                anyhow::bail!("library path does not exist: {}", root.display());
            }
            self.scan_root(cancel, root, &mut results)?;
        }
        Ok(results)
    }

    fn scan_file(&self, path: &Path) -> Result<ScanResult> {
        debug!("Scanning file: {:?}", path);

        let metadata = std::fs::metadata(path)
            .with_context(|| format!("failed to stat {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let parsed = self.parser.parse(&file_name);
        let parse_error = parsed
            .title
            .is_empty()
            .then(|| format!("could not parse a title from {file_name:?}"));

        Ok(ScanResult {
            path: path.to_path_buf(),
            file_name,
            parsed_title: parsed.title,
            parsed_year: parsed.year,
            file_size: i64::try_from(metadata.len()).unwrap_or(i64::MAX),
            is_media_file: self.is_media_file(path),
            parse_error,
        })
    }

    fn is_media_file(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            has_extension_in(path, VIDEO_EXTENSIONS)
        } else {
            has_extension_in(path, &self.extensions)
        }
    }
}
