//! TMDB (The Movie Database) metadata provider.
//!
//! Implements [`MetadataProvider`] against the TMDB v3 REST API.
//!
//! Features:
//! - Token-bucket rate limiting at 4 requests / second via [`governor`].
//! - Automatic retry on HTTP 429 with `Retry-After` header support (max 3 retries).
//! - 30-second request timeout.
//! - Configurable base URL so tests can point it at a mock server.

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use cinesync_common::{CreditType, MovieId};
use governor::{Quota, RateLimiter};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::catalog::{Genre, NewCredit};
use crate::metadata::provider::{MetadataProvider, MovieCandidate};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RETRIES: u32 = 3;
const REQUESTS_PER_SECOND: u32 = 4;

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    results: Vec<TmdbMovieSearchResult>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieSearchResult {
    id: i64,
    title: Option<String>,
    original_title: Option<String>,
    original_language: Option<String>,
    release_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    popularity: Option<f64>,
    vote_average: Option<f64>,
    vote_count: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieDetail {
    imdb_id: Option<String>,
    title: Option<String>,
    original_title: Option<String>,
    overview: Option<String>,
    tagline: Option<String>,
    release_date: Option<String>,
    runtime: Option<i32>,
    status: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    popularity: Option<f64>,
    vote_average: Option<f64>,
    vote_count: Option<i32>,
    #[serde(default)]
    genres: Vec<TmdbGenre>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct TmdbCreditsResponse {
    #[serde(default)]
    cast: Vec<TmdbCastMember>,
    #[serde(default)]
    crew: Vec<TmdbCrewMember>,
}

#[derive(Debug, Deserialize)]
struct TmdbCastMember {
    id: i64,
    name: String,
    character: Option<String>,
    order: Option<i32>,
    profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbCrewMember {
    id: i64,
    name: String,
    job: Option<String>,
    department: Option<String>,
    profile_path: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// TMDB metadata provider.
///
/// # Examples
///
/// ```no_run
/// use cinesync::metadata::providers::TmdbProvider;
///
/// let provider = TmdbProvider::new("your-api-key".into(), "en-US".into());
/// ```
pub struct TmdbProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
    rate_limiter: governor::RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl TmdbProvider {
    /// Create a provider against the public TMDB API.
    ///
    /// `language` is an IETF tag such as `"en-US"`.
    pub fn new(api_key: String, language: String) -> Self {
        Self::with_base_url(api_key, language, TMDB_BASE_URL.to_string())
    }

    /// Create a provider against an alternative API root.
    pub fn with_base_url(api_key: String, language: String, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });

        let per_second = NonZeroU32::new(REQUESTS_PER_SECOND).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(per_second));

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            language,
            rate_limiter,
        }
    }

    /// Execute a GET request with rate limiting and 429-retry logic.
    async fn get(&self, url: &str) -> anyhow::Result<reqwest::Response> {
        let mut retries = 0u32;
        loop {
            self.rate_limiter.until_ready().await;

            let resp = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| e.without_url())
                .with_context(|| format!("TMDB request failed: {}", self.redact(url)))?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                retries += 1;
                let wait = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!(
                    retry = retries,
                    wait_secs = wait,
                    "TMDB returned 429, backing off"
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            let status = resp.status();
            if !status.is_success() {
                anyhow::bail!("TMDB returned {} for {}", status, self.redact(url));
            }

            return Ok(resp);
        }
    }

    /// Build a full API URL with the API key and language query parameters.
    fn url(&self, path: &str, extra_params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}{path}?api_key={}&language={}",
            self.base_url,
            urlencoded(&self.api_key),
            urlencoded(&self.language)
        );
        for (key, value) in extra_params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoded(value));
        }
        url
    }

    /// The URL with the API key stripped, for logs and error messages.
    fn redact(&self, url: &str) -> String {
        if self.api_key.is_empty() {
            return url.to_string();
        }
        url.replace(&urlencoded(&self.api_key), "***")
    }

    async fn movie_detail(&self, tmdb_id: i64) -> anyhow::Result<TmdbMovieDetail> {
        let url = self.url(&format!("/movie/{tmdb_id}"), &[]);
        debug!(tmdb_id, "TMDB get movie detail");

        self.get(&url)
            .await?
            .json()
            .await
            .map_err(|e| e.without_url())
            .context("failed to parse TMDB movie detail response")
    }
}

/// Minimal percent-encoding for query parameter values.
fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push(char::from(HEX[(b >> 4) as usize]));
                out.push(char::from(HEX[(b & 0x0f) as usize]));
            }
        }
    }
    out
}

const HEX: [u8; 16] = *b"0123456789ABCDEF";

/// Parse TMDB's `YYYY-MM-DD` release date. Empty strings are common.
fn parse_date(date: Option<&str>) -> Option<NaiveDate> {
    date.filter(|d| !d.is_empty())
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

impl From<TmdbMovieSearchResult> for MovieCandidate {
    fn from(r: TmdbMovieSearchResult) -> Self {
        MovieCandidate {
            tmdb_id: r.id,
            title: r.title.unwrap_or_default(),
            original_title: non_empty(r.original_title),
            original_language: non_empty(r.original_language),
            release_date: parse_date(r.release_date.as_deref()),
            overview: non_empty(r.overview),
            poster_path: r.poster_path,
            backdrop_path: r.backdrop_path,
            popularity: r.popularity,
            vote_average: r.vote_average,
            vote_count: r.vote_count,
            ..Default::default()
        }
    }
}

#[async_trait]
impl MetadataProvider for TmdbProvider {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn search_movies(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> anyhow::Result<Vec<MovieCandidate>> {
        let mut params = vec![("query", title)];
        let year_str = year.map(|y| y.to_string());
        if let Some(ref y) = year_str {
            params.push(("year", y.as_str()));
        }

        let url = self.url("/search/movie", &params);
        debug!(title, ?year, "TMDB search movie");

        let body: TmdbSearchResponse = self
            .get(&url)
            .await?
            .json()
            .await
            .map_err(|e| e.without_url())
            .context("failed to parse TMDB movie search response")?;

        Ok(body.results.into_iter().map(MovieCandidate::from).collect())
    }

    async fn enrich_movie(&self, candidate: &mut MovieCandidate) -> anyhow::Result<()> {
        let detail = self.movie_detail(candidate.tmdb_id).await?;

        if let Some(title) = non_empty(detail.title) {
            candidate.title = title;
        }
        candidate.imdb_id = non_empty(detail.imdb_id).or(candidate.imdb_id.take());
        candidate.original_title =
            non_empty(detail.original_title).or(candidate.original_title.take());
        candidate.overview = non_empty(detail.overview).or(candidate.overview.take());
        candidate.tagline = non_empty(detail.tagline).or(candidate.tagline.take());
        candidate.release_date =
            parse_date(detail.release_date.as_deref()).or(candidate.release_date);
        candidate.runtime = detail.runtime.filter(|r| *r > 0).or(candidate.runtime);
        candidate.status = non_empty(detail.status).or(candidate.status.take());
        candidate.poster_path = detail.poster_path.or(candidate.poster_path.take());
        candidate.backdrop_path = detail.backdrop_path.or(candidate.backdrop_path.take());
        candidate.popularity = detail.popularity.or(candidate.popularity);
        candidate.vote_average = detail.vote_average.or(candidate.vote_average);
        candidate.vote_count = detail.vote_count.or(candidate.vote_count);

        Ok(())
    }

    async fn get_credits(
        &self,
        movie_id: MovieId,
        tmdb_id: i64,
    ) -> anyhow::Result<Vec<NewCredit>> {
        let url = self.url(&format!("/movie/{tmdb_id}/credits"), &[]);
        debug!(tmdb_id, "TMDB get movie credits");

        let body: TmdbCreditsResponse = self
            .get(&url)
            .await?
            .json()
            .await
            .map_err(|e| e.without_url())
            .context("failed to parse TMDB credits response")?;

        let cast = body.cast.into_iter().map(|c| NewCredit {
            movie_id,
            tmdb_person_id: c.id,
            name: c.name,
            credit_type: CreditType::Cast,
            character: non_empty(c.character),
            job: None,
            department: None,
            billing_order: c.order,
            profile_path: c.profile_path,
        });
        let crew = body.crew.into_iter().map(|c| NewCredit {
            movie_id,
            tmdb_person_id: c.id,
            name: c.name,
            credit_type: CreditType::Crew,
            character: None,
            job: non_empty(c.job),
            department: non_empty(c.department),
            billing_order: None,
            profile_path: c.profile_path,
        });

        Ok(cast.chain(crew).collect())
    }

    async fn get_genres(&self, movie_id: MovieId, tmdb_id: i64) -> anyhow::Result<Vec<Genre>> {
        let detail = self.movie_detail(tmdb_id).await?;

        Ok(detail
            .genres
            .into_iter()
            .map(|g| Genre {
                movie_id,
                tmdb_genre_id: Some(g.id),
                name: g.name,
            })
            .collect())
    }
}
