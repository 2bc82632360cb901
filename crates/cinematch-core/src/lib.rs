//! cinematch core — movie identity resolution engine.
//!
//! Title parsing, candidate scoring, incremental dataset merge and the
//! input/output stores. Network access lives in `cinematch-tmdb`.

pub mod config;
pub mod error;
pub mod language;
pub mod merge;
pub mod models;
pub mod overrides;
pub mod rules;
pub mod scoring;
pub mod storage;
pub mod title;

pub use config::{AppConfig, TmdbConfig};
pub use error::{CinematchError, ExitCode, Result};
pub use merge::{Dataset, Diff};
pub use models::*;
pub use overrides::Overrides;
pub use rules::MetadataRules;
pub use scoring::{CandidateScorer, MatchScore, ScoringConfig};
pub use title::{Locale, TitleSet, TitleVariant};
