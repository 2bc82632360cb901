use serde::{Deserialize, Serialize};

/// One search result being evaluated for an input record.
///
/// Field names follow the TMDB search payload so results can be
/// deserialized directly; anything missing falls back to empty/zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub id: u64,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub original_title: String,

    #[serde(default)]
    pub release_date: Option<String>,

    #[serde(default)]
    pub popularity: f64,
}

impl Candidate {
    pub fn new(id: u64, title: impl Into<String>, original_title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            original_title: original_title.into(),
            ..Default::default()
        }
    }

    pub fn with_release_date(mut self, date: impl Into<String>) -> Self {
        self.release_date = Some(date.into());
        self
    }

    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = popularity;
        self
    }

    /// Year prefix of the release date (`"1995-09-22"` → 1995).
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .and_then(|year| year.trim().parse::<i32>().ok())
    }
}
