//! Raw title decomposition.
//!
//! Input titles look like `Parasite`, `기생충 (Parasite)` or
//! `Soul Mate (七月與安生, 안녕 나의 소울메이트)`: a main title optionally
//! followed by a parenthesized, comma-separated list of alternate titles.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CinematchError, Result};

static TRAILING_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\s*\((.*)\)$").expect("valid regex"));

/// Coarse script classification of a title string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    Korean,
    English,
    Other,
    /// Nothing to classify (empty text).
    Unknown,
}

impl Locale {
    /// Korean if any Hangul syllable is present, else English if the text is
    /// pure ASCII, else Other.
    pub fn detect(text: &str) -> Self {
        if text.is_empty() {
            Locale::Unknown
        } else if text.chars().any(is_hangul_syllable) {
            Locale::Korean
        } else if text.is_ascii() {
            Locale::English
        } else {
            Locale::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Korean => "Korean",
            Locale::English => "English",
            Locale::Other => "Other",
            Locale::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// U+AC00..=U+D7A3, the precomposed Hangul syllables block.
pub fn is_hangul_syllable(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleVariant {
    pub text: String,
    pub locale: Locale,
}

impl TitleVariant {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let locale = Locale::detect(&text);
        Self { text, locale }
    }
}

/// A raw title split into its main title and supplemental titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleSet {
    pub raw_title: String,
    pub main_title: TitleVariant,
    pub supplemental_titles: Vec<TitleVariant>,
}

impl TitleSet {
    pub fn parse(raw_title: &str) -> Result<Self> {
        let raw_title = raw_title.trim();

        let (main_text, supplemental_titles) = match TRAILING_BLOCK_RE.captures(raw_title) {
            Some(caps) => {
                let main = caps.get(1).map_or("", |m| m.as_str()).trim();
                let block = caps.get(2).map_or("", |m| m.as_str());
                let supplemental = block
                    .split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(TitleVariant::new)
                    .collect();
                (main, supplemental)
            }
            None => (raw_title, Vec::new()),
        };

        if main_text.is_empty() {
            return Err(CinematchError::MalformedTitle(raw_title.to_string()));
        }

        Ok(Self {
            raw_title: raw_title.to_string(),
            main_title: TitleVariant::new(main_text),
            supplemental_titles,
        })
    }

    /// Main title first, then supplemental titles in order.
    pub fn all_titles(&self) -> impl Iterator<Item = &TitleVariant> {
        std::iter::once(&self.main_title).chain(self.supplemental_titles.iter())
    }

    /// First title tagged with `locale`; the main title when no locale is given.
    pub fn get_title_by_locale(&self, locale: Option<Locale>) -> Option<&str> {
        let Some(locale) = locale else {
            return Some(&self.main_title.text);
        };
        self.all_titles()
            .find(|title| title.locale == locale)
            .map(|title| title.text.as_str())
    }

    pub fn first_supplemental(&self) -> Option<&TitleVariant> {
        self.supplemental_titles.first()
    }
}
