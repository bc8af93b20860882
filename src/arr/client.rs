use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::types::{RadarrMovie, RadarrMovieFile, RadarrSystemStatus};
use crate::config::RadarrConfig;

/// Request timeout for Radarr API calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Read access to a Radarr instance.
#[async_trait::async_trait]
pub trait RadarrApi: Send + Sync {
    /// Every movie Radarr manages, with or without files.
    async fn get_all_movies(&self) -> Result<Vec<RadarrMovie>>;

    /// A single movie by its Radarr ID.
    async fn get_movie(&self, id: i64) -> Result<RadarrMovie>;

    /// The files Radarr tracks for a movie.
    async fn get_movie_files(&self, movie_id: i64) -> Result<Vec<RadarrMovieFile>>;

    /// Test the connection to the Radarr instance
    async fn test_connection(&self) -> Result<bool>;
}

/// HTTP client for the Radarr v3 API.
pub struct RadarrClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RadarrClient {
    pub fn new(config: &RadarrConfig) -> Self {
        Self::with_credentials(&config.url, &config.api_key)
    }

    pub fn with_credentials(url: &str, api_key: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v3{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response> {
        self.client
            .get(self.url(path))
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .context(format!("Failed to GET {}", path))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.get(path).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("GET {} returned {}: {}", path, status, body.trim());
        }

        response
            .json()
            .await
            .context(format!("Failed to parse response from {}", path))
    }

    /// Radarr's self-reported status.
    pub async fn system_status(&self) -> Result<RadarrSystemStatus> {
        self.get_json("/system/status").await
    }
}

#[async_trait::async_trait]
impl RadarrApi for RadarrClient {
    async fn get_all_movies(&self) -> Result<Vec<RadarrMovie>> {
        self.get_json("/movie").await
    }

    async fn get_movie(&self, id: i64) -> Result<RadarrMovie> {
        self.get_json(&format!("/movie/{id}")).await
    }

    async fn get_movie_files(&self, movie_id: i64) -> Result<Vec<RadarrMovieFile>> {
        self.get_json(&format!("/moviefile?movieId={movie_id}")).await
    }

    async fn test_connection(&self) -> Result<bool> {
        let response = self.get("/system/status").await?;
        Ok(response.status().is_success())
    }
}
