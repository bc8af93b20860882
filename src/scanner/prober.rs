//! File probing for newly matched library files.
//!
//! Deep container inspection is outside this crate; [`FileProber`] is the
//! seam where a real prober plugs in. [`BasicProber`] reports what the
//! filesystem alone can tell.

use std::path::Path;

use anyhow::Context;

/// Technical details of a media file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeInfo {
    pub file_size: i64,
    pub container: Option<String>,
    pub resolution: Option<String>,
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub bitrate_kbps: Option<i64>,
}

/// Extracts technical details from a file on disk.
pub trait FileProber: Send + Sync {
    fn probe(&self, path: &Path) -> anyhow::Result<ProbeInfo>;
}

/// Prober that reads the file size and infers the container from the extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicProber;

impl BasicProber {
    pub fn new() -> Self {
        Self
    }
}

impl FileProber for BasicProber {
    fn probe(&self, path: &Path) -> anyhow::Result<ProbeInfo> {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("failed to stat {}", path.display()))?;
        if !metadata.is_file() {
            anyhow::bail!("not a regular file: {}", path.display());
        }

        let container = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        Ok(ProbeInfo {
            file_size: i64::try_from(metadata.len()).unwrap_or(i64::MAX),
            container,
            ..Default::default()
        })
    }
}
