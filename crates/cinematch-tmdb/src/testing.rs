//! In-memory [`MovieSource`] for resolver and pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use cinematch_core::Candidate;

use crate::source::{CrewMember, MovieDetails, MovieSource};

#[derive(Default)]
pub struct FakeSource {
    searches: HashMap<(String, Option<i32>), Vec<Candidate>>,
    details: HashMap<u64, MovieDetails>,
    calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, query: &str, year: i32, results: Vec<Candidate>) -> Self {
        self.searches.insert((query.to_string(), Some(year)), results);
        self
    }

    pub fn with_details(mut self, details: MovieDetails) -> Self {
        self.details.insert(details.id, details);
        self
    }

    /// Every call made so far, as `search:<query>:<year>` or `details:<id>`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MovieSource for FakeSource {
    fn name(&self) -> &str {
        "fake"
    }

    async fn search(&self, query: &str, year: Option<i32>) -> Vec<Candidate> {
        let year_label = year.map(|y| y.to_string()).unwrap_or_default();
        self.calls
            .lock()
            .unwrap()
            .push(format!("search:{query}:{year_label}"));
        self.searches
            .get(&(query.to_string(), year))
            .cloned()
            .unwrap_or_default()
    }

    async fn details(&self, id: u64) -> Option<MovieDetails> {
        self.calls.lock().unwrap().push(format!("details:{id}"));
        self.details.get(&id).cloned()
    }
}

pub fn director(name: &str) -> CrewMember {
    CrewMember {
        name: name.to_string(),
        original_name: Some(name.to_string()),
        job: "Director".to_string(),
    }
}

pub fn details(id: u64, imdb_id: &str, title: &str, language: &str) -> MovieDetails {
    MovieDetails {
        id,
        imdb_id: Some(imdb_id.to_string()),
        title: Some(title.to_string()),
        original_title: Some(title.to_string()),
        original_language: Some(language.to_string()),
        poster_path: Some(format!("/poster{id}.jpg")),
        ..Default::default()
    }
}
