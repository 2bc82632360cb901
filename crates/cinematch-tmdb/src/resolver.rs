//! Resolution of one input record into an output record.
//!
//! Order of precedence for the TMDB id: override table, then search with the
//! main title, then search with the first supplemental title. The chosen id
//! is then expanded through the details call.

use std::fmt;

use cinematch_core::language::language_name;
use cinematch_core::scoring::fuzzy_ratio;
use cinematch_core::{
    AppConfig, Candidate, CandidateScorer, EnrichedRecord, Locale, MovieRecord, Overrides,
    Result, TitleSet,
};
use tracing::{debug, info, warn};

use crate::source::{MovieDetails, MovieSource};

/// Director names scoring below this against TMDB's director are reported.
pub const DIRECTOR_MATCH_THRESHOLD: f64 = 85.0;

/// Years searched around the input year, in order.
const YEAR_WINDOW: [i32; 3] = [0, 1, -1];

const POSTER_SIZE: &str = "w200";

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(Box<EnrichedRecord>),
    Unresolved(Unresolved),
}

/// Why a record was left out of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unresolved {
    NotFound,
    DetailsUnavailable(u64),
    NoImdbId,
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unresolved::NotFound => write!(f, "Not found in TMDB"),
            Unresolved::DetailsUnavailable(id) => write!(f, "No TMDB movie entry for {id}"),
            Unresolved::NoImdbId => write!(f, "No IMDB ID found"),
        }
    }
}

pub struct Resolver<S: MovieSource> {
    source: S,
    scorer: CandidateScorer,
    overrides: Overrides,
    web_base_url: String,
    image_base_url: String,
}

impl<S: MovieSource> Resolver<S> {
    pub fn new(source: S, config: &AppConfig) -> Self {
        Self {
            source,
            scorer: CandidateScorer::new(config.matching.clone()),
            overrides: config.overrides.clone(),
            web_base_url: config.tmdb.web_base_url.trim_end_matches('/').to_string(),
            image_base_url: config.tmdb.image_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve one record. Only a malformed title is an error; everything
    /// else that goes wrong is an [`Unresolved`] outcome.
    pub async fn resolve(&self, record: &MovieRecord) -> Result<Resolution> {
        let titles = TitleSet::parse(&record.title)?;
        let label = record.label();

        let tmdb_id = match self.overrides.tmdb_id(&record.director, &titles.raw_title) {
            Some(id) => {
                info!("Using hardcoded TMDB ID {id}: {label}");
                Some(id)
            }
            None => self.find_candidate(&titles, record.year).await.map(|c| c.id),
        };

        let details = match tmdb_id {
            Some(id) => {
                let details = self.source.details(id).await;
                if details.is_none() {
                    warn!("No TMDB movie entry for {id}: {label}");
                }
                details
            }
            None => {
                debug!("Not found in {}: {label}", self.source.name());
                None
            }
        };

        let imdb_override = self.overrides.imdb_id(&record.director, &record.title);
        if details.is_none() && imdb_override.is_none() {
            return Ok(Resolution::Unresolved(match tmdb_id {
                Some(id) => Unresolved::DetailsUnavailable(id),
                None => Unresolved::NotFound,
            }));
        }

        let imdb_id = match imdb_override {
            Some(id) => {
                info!("Using hardcoded IMDB ID {id}: {label}");
                Some(id.to_string())
            }
            None => details
                .as_ref()
                .and_then(MovieDetails::imdb_id)
                .map(str::to_string),
        };
        let Some(imdb_id) = imdb_id else {
            return Ok(Resolution::Unresolved(Unresolved::NoImdbId));
        };

        if let Some(details) = &details {
            self.check_director(record, details);
        }

        let entry = self.build_record(record, &titles, &imdb_id, details.as_ref());
        if entry.tmdb_poster_url.is_none() {
            warn!("No TMDB poster path: {label}");
        }
        Ok(Resolution::Resolved(Box::new(entry)))
    }

    /// Search with the main title, and only if that finds nothing, with the
    /// first supplemental title. Then rank whatever came back.
    pub async fn find_candidate(&self, titles: &TitleSet, year: i32) -> Option<Candidate> {
        let mut candidates = self.search_around(&titles.main_title.text, year).await;
        if candidates.is_empty() {
            if let Some(fallback) = titles.first_supplemental() {
                candidates = self.search_around(&fallback.text, year).await;
            }
        }

        let best = self.scorer.select(titles, year, &candidates)?;
        if best.id == 0 {
            warn!("Search result without TMDB ID: {} ({year})", titles.raw_title);
            return None;
        }
        Some(best.clone())
    }

    async fn search_around(&self, query: &str, year: i32) -> Vec<Candidate> {
        let mut results = Vec::new();
        for offset in YEAR_WINDOW {
            results.extend(self.source.search(query, Some(year.saturating_add(offset))).await);
        }
        results
    }

    /// Advisory only: director names are transliterated inconsistently.
    fn check_director(&self, record: &MovieRecord, details: &MovieDetails) {
        let Some(first) = details.directors().into_iter().next() else {
            return;
        };
        let director = record.director.to_lowercase();
        let name = first.name.to_lowercase();
        let original_name = first.original_name.as_deref().unwrap_or_default().to_lowercase();
        let score = fuzzy_ratio(&name, &director).max(fuzzy_ratio(&original_name, &director));

        if score < DIRECTOR_MATCH_THRESHOLD && !director.contains(&name) {
            warn!(
                "Director name mismatch: {} {score}, '{}' vs '{}' '{}'",
                record.label(),
                record.director,
                first.name,
                original_name
            );
        }
    }

    fn build_record(
        &self,
        record: &MovieRecord,
        titles: &TitleSet,
        imdb_id: &str,
        details: Option<&MovieDetails>,
    ) -> EnrichedRecord {
        let mut entry = EnrichedRecord::from_input(record);
        entry.set_imdb_id(imdb_id);

        let original_language = details.and_then(|d| d.original_language.clone());

        if let Some(details) = details {
            let directors = details.directors();
            entry.tmdb_url = Some(format!("{}/movie/{}", self.web_base_url, details.id));
            entry.tmdb_original_title = details.original_title.clone();
            entry.tmdb_title = details
                .title
                .clone()
                .filter(|title| Some(title) != details.original_title.as_ref());
            entry.tmdb_original_language = original_language.as_deref().map(language_name);
            entry.tmdb_director_name_1 = directors.first().map(|d| d.name.clone());
            entry.tmdb_director_name_2 = directors.get(1).map(|d| d.name.clone());
            entry.tmdb_num_directors = directors.len();
            entry.tmdb_poster_url = details
                .poster_path()
                .map(|path| format!("{}/{POSTER_SIZE}{path}", self.image_base_url));
        }

        if original_language.as_deref() != Some("ko") {
            let korean = self
                .overrides
                .korean_title(imdb_id)
                .or_else(|| titles.get_title_by_locale(Some(Locale::Korean)));
            entry.custom_korean_title = korean.map(str::to_string);
        }

        entry
    }
}
