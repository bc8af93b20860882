//! Path utilities for detecting media files by extension.
//!
//! The scanner and the single-file match path both use these to decide
//! whether a file on disk is something the catalog cares about.

use std::path::Path;

/// List of supported video file extensions.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "m4v", "ts", "m2ts", "webm", "mov", "wmv", "flv", "mpg", "mpeg",
];

/// Check if a path has a video file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use cinesync_common::paths::is_video_file;
///
/// assert!(is_video_file(Path::new("movie.mkv")));
/// assert!(is_video_file(Path::new("/path/to/video.MP4")));
/// assert!(!is_video_file(Path::new("subtitle.srt")));
/// ```
pub fn is_video_file(path: &Path) -> bool {
    has_extension_in(path, VIDEO_EXTENSIONS)
}

/// Check if a path's extension (case-insensitive) is one of `extensions`.
///
/// Entries in `extensions` may be given with or without a leading dot.
pub fn has_extension_in<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    let ext = ext.to_lowercase();
    extensions
        .iter()
        .any(|e| e.as_ref().trim_start_matches('.').eq_ignore_ascii_case(&ext))
}
