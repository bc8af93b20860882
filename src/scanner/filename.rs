//! Release-name parsing for movie files.
//!
//! Extracts a search title and release year from names such as
//! `The.Matrix.1999.1080p.BluRay.x264-GROUP.mkv` or `Heat (1995).mkv`.

use regex::Regex;

/// Title and year parsed from a file name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedFilename {
    /// Cleaned title; empty when nothing usable was found.
    pub title: String,
    pub year: Option<i32>,
}

/// Compiled patterns for parsing movie file names.
#[derive(Debug, Clone)]
pub struct FilenameParser {
    leading_group: Regex,
    separators: Regex,
    year: Regex,
    quality: Regex,
    whitespace: Regex,
}

impl FilenameParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            leading_group: Regex::new(r"^\s*\[[^\]]*\]\s*")?,
            separators: Regex::new(r"[._]+")?,
            year: Regex::new(r"[(\[]?\b((?:19|20)\d{2})\b[)\]]?")?,
            quality: Regex::new(
                r"(?i)\b(2160p|1080p|1080i|720p|576p|480p|4k|uhd|blu-?ray|brrip|bdrip|web-?dl|web-?rip|hdtv|dvdrip|remux|x264|x265|h 26[45]|hevc|avc|xvid|divx|hdr10?|proper|repack|extended|unrated|remastered|imax)\b",
            )?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    /// Parse a file name (with or without extension).
    pub fn parse(&self, file_name: &str) -> ParsedFilename {
        let stem = strip_extension(file_name);
        let stem = self.leading_group.replace(stem, "");
        let text = self.separators.replace_all(&stem, " ");

        // Everything from the first quality tag on is release noise.
        let cut = self.quality.find(&text).map_or(text.len(), |m| m.start());
        let head = &text[..cut];

        // The last year that is not the whole title wins, so titles that
        // start with a number ("2001 A Space Odyssey 1968") keep it.
        let year_match = self
            .year
            .captures_iter(head)
            .filter(|c| c.get(0).is_some_and(|m| m.start() > 0))
            .last();

        let (title_part, year) = match year_match {
            Some(caps) => {
                let start = caps.get(0).map_or(head.len(), |m| m.start());
                let year = caps.get(1).and_then(|y| y.as_str().parse::<i32>().ok());
                (&head[..start], year)
            }
            None => (head, None),
        };

        let title = self.whitespace.replace_all(title_part, " ");
        let title = title
            .trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '(' | '[' | ','))
            .to_string();

        ParsedFilename { title, year }
    }
}

fn strip_extension(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && (2..=4).contains(&ext.len())
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
                && ext.chars().any(|c| c.is_ascii_alphabetic()) =>
        {
            stem
        }
        _ => file_name,
    }
}
