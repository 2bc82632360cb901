use std::fmt;

use serde::{Deserialize, Serialize};

use crate::title::is_hangul_syllable;

/// Identity of a movie across input and output: `(director, year, title)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub director: String,
    pub year: i32,
    pub title: String,
}

impl RecordKey {
    pub fn new(director: impl Into<String>, year: i32, title: impl Into<String>) -> Self {
        Self {
            director: director.into(),
            year,
            title: title.into(),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.director, self.year, self.title)
    }
}

/// One row of the input store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieRecord {
    pub director: String,
    pub year: i32,
    pub title: String,
    pub country: String,
    /// Free-text preference marker, e.g. `Masterpiece` or `Special`.
    pub preference: String,
    /// Award marker columns, in input order.
    pub award_markers: Vec<String>,
}

impl MovieRecord {
    pub fn new(director: impl Into<String>, year: i32, title: impl Into<String>) -> Self {
        Self {
            director: director.into(),
            year,
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.director.clone(), self.year, self.title.clone())
    }

    /// Short label used in log lines: `Title (Year)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.title, self.year)
    }
}

/// A resolved movie as written to the output dataset.
///
/// Field order here is the field order of the YAML document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub title: String,
    pub year: i32,
    pub director: String,

    #[serde(default)]
    pub country: String,

    #[serde(default)]
    pub is_korean_director: bool,

    #[serde(default)]
    pub imdb_id: Option<String>,

    #[serde(default)]
    pub imdb_url: Option<String>,

    #[serde(default)]
    pub tmdb_url: Option<String>,

    #[serde(default)]
    pub tmdb_title: Option<String>,

    #[serde(default)]
    pub tmdb_original_title: Option<String>,

    #[serde(default)]
    pub tmdb_original_language: Option<String>,

    #[serde(default)]
    pub tmdb_director_name_1: Option<String>,

    #[serde(default)]
    pub tmdb_director_name_2: Option<String>,

    #[serde(default)]
    pub tmdb_num_directors: usize,

    #[serde(default)]
    pub tmdb_poster_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_korean_title: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub masterpiece: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub my_best: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub awards: Vec<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl EnrichedRecord {
    /// Start an output entry from an input row; identifiers are filled in by the resolver.
    pub fn from_input(record: &MovieRecord) -> Self {
        Self {
            title: record.title.clone(),
            year: record.year,
            director: record.director.clone(),
            country: record.country.clone(),
            is_korean_director: record.director.chars().any(is_hangul_syllable),
            ..Default::default()
        }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.director.clone(), self.year, self.title.clone())
    }

    pub fn set_imdb_id(&mut self, imdb_id: impl Into<String>) {
        let imdb_id = imdb_id.into();
        self.imdb_url = Some(format!("https://www.imdb.com/title/{imdb_id}"));
        self.imdb_id = Some(imdb_id);
    }

    pub fn has_poster(&self) -> bool {
        self.tmdb_poster_url.is_some()
    }
}
