use std::time::Duration;

use async_trait::async_trait;
use cinematch_core::{Candidate, TmdbConfig};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, TmdbError};
use crate::http::{RateLimitedClient, redact_api_key};

/// Search and details collaborator used by the resolver.
///
/// Both calls degrade instead of failing: a transport or API error is
/// logged and reported as "no data".
#[async_trait]
pub trait MovieSource: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, query: &str, year: Option<i32>) -> Vec<Candidate>;

    async fn details(&self, id: u64) -> Option<MovieDetails>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub job: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// Movie details payload (`/movie/{id}?append_to_response=credits`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub credits: Credits,
}

impl MovieDetails {
    /// IMDb id, treating an empty string as absent.
    pub fn imdb_id(&self) -> Option<&str> {
        self.imdb_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn poster_path(&self) -> Option<&str> {
        self.poster_path.as_deref().filter(|p| !p.is_empty())
    }

    /// Crew credited with the `Director` job, in credit order.
    pub fn directors(&self) -> Vec<&CrewMember> {
        self.credits
            .crew
            .iter()
            .filter(|c| c.job == "Director")
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Candidate>,
}

// ─── TmdbSource ───────────────────────────────────────────────────────────────

pub struct TmdbSource {
    client: RateLimitedClient,
    base_url: String,
    api_key: String,
}

impl TmdbSource {
    /// Build from configuration; the API key is read from the configured env var.
    pub fn from_config(config: &TmdbConfig) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| TmdbError::MissingApiKey(config.api_key_env.clone()))?;
        Self::with_params(
            &config.api_base_url,
            &api_key,
            Duration::from_millis(config.request_delay_ms),
            config.max_retries,
            &config.user_agent,
        )
    }

    pub fn with_params(
        base_url: &str,
        api_key: &str,
        min_interval: Duration,
        max_retries: u32,
        user_agent: &str,
    ) -> Result<Self> {
        Ok(Self {
            client: RateLimitedClient::new(min_interval, max_retries, user_agent)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| TmdbError::Parse(format!("invalid URL {}: {e}", self.base_url)))?;
        {
            let mut segs = url
                .path_segments_mut()
                .map_err(|_| TmdbError::Parse("invalid TMDB base URL".to_string()))?;
            segs.pop_if_empty();
            segs.extend(segments);
        }
        url.query_pairs_mut().append_pair("api_key", &self.api_key);
        Ok(url)
    }

    /// `GET /search/movie`, optionally restricted to a primary release year.
    pub async fn search_movies(&self, query: &str, year: Option<i32>) -> Result<Vec<Candidate>> {
        let mut url = self.endpoint(&["search", "movie"])?;
        url.query_pairs_mut().append_pair("query", query);
        if let Some(year) = year {
            url.query_pairs_mut()
                .append_pair("primary_release_year", &year.to_string());
        }

        debug!("search => {}", redact_api_key(url.as_str()));
        let response: SearchResponse = self.client.get_json(url.as_str()).await?;
        Ok(response.results)
    }

    /// `GET /movie/{id}` with credits appended.
    pub async fn movie_details(&self, id: u64) -> Result<MovieDetails> {
        let id = id.to_string();
        let mut url = self.endpoint(&["movie", &id])?;
        url.query_pairs_mut()
            .append_pair("append_to_response", "credits");

        debug!("details => {}", redact_api_key(url.as_str()));
        self.client.get_json(url.as_str()).await
    }
}

#[async_trait]
impl MovieSource for TmdbSource {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn search(&self, query: &str, year: Option<i32>) -> Vec<Candidate> {
        match self.search_movies(query, year).await {
            Ok(results) => results,
            Err(e) => {
                warn!("API request failure: {e}");
                Vec::new()
            }
        }
    }

    async fn details(&self, id: u64) -> Option<MovieDetails> {
        match self.movie_details(id).await {
            Ok(details) => Some(details),
            Err(e) => {
                warn!("API request failure: {e}");
                None
            }
        }
    }
}
