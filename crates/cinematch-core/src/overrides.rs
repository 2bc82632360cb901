use serde::{Deserialize, Serialize};

/// Known-correct TMDB id for a `(director, raw title)` pair; bypasses search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TmdbOverride {
    pub director: String,
    pub title: String,
    pub tmdb_id: u64,
}

/// Known-correct IMDb id for a `(director, title)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImdbOverride {
    pub director: String,
    pub title: String,
    pub imdb_id: String,
}

/// Korean display title to use for a given IMDb id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KoreanTitleOverride {
    pub imdb_id: String,
    pub title: String,
}

/// Manual corrections for titles automatic matching gets wrong
/// (remakes, re-releases, ambiguous international titles).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Overrides {
    pub tmdb_ids: Vec<TmdbOverride>,
    pub imdb_ids: Vec<ImdbOverride>,
    pub korean_titles: Vec<KoreanTitleOverride>,
}

impl Overrides {
    pub fn empty() -> Self {
        Self {
            tmdb_ids: Vec::new(),
            imdb_ids: Vec::new(),
            korean_titles: Vec::new(),
        }
    }

    pub fn tmdb_id(&self, director: &str, title: &str) -> Option<u64> {
        self.tmdb_ids
            .iter()
            .find(|o| o.director == director && o.title == title)
            .map(|o| o.tmdb_id)
    }

    pub fn imdb_id(&self, director: &str, title: &str) -> Option<&str> {
        self.imdb_ids
            .iter()
            .find(|o| o.director == director && o.title == title)
            .map(|o| o.imdb_id.as_str())
    }

    pub fn korean_title(&self, imdb_id: &str) -> Option<&str> {
        self.korean_titles
            .iter()
            .find(|o| o.imdb_id == imdb_id)
            .map(|o| o.title.as_str())
    }

    pub fn with_tmdb_id(mut self, director: &str, title: &str, tmdb_id: u64) -> Self {
        self.tmdb_ids.push(TmdbOverride {
            director: director.to_string(),
            title: title.to_string(),
            tmdb_id,
        });
        self
    }

    pub fn with_imdb_id(mut self, director: &str, title: &str, imdb_id: &str) -> Self {
        self.imdb_ids.push(ImdbOverride {
            director: director.to_string(),
            title: title.to_string(),
            imdb_id: imdb_id.to_string(),
        });
        self
    }

    pub fn with_korean_title(mut self, imdb_id: &str, title: &str) -> Self {
        self.korean_titles.push(KoreanTitleOverride {
            imdb_id: imdb_id.to_string(),
            title: title.to_string(),
        });
        self
    }
}

impl Default for Overrides {
    fn default() -> Self {
        Self::empty()
            .with_tmdb_id("이준익", "님은 먼 곳에", 41538)
            .with_tmdb_id("Robert Zemeckis", "The Witches", 531219)
            .with_tmdb_id("Justin Kurzel", "Macbeth", 225728)
            .with_tmdb_id("John Crowley", "Brooklyn", 167073)
            .with_tmdb_id("Alejandro González Iñárritu", "Birdman", 194662)
            .with_tmdb_id("David Fincher", "Seven", 807)
            .with_imdb_id("Victor Fleming", "The Wizard of Oz at Sphere", "tt38084416")
            .with_korean_title("tt0442268", "지금, 만나러 갑니다")
    }
}
