//! Candidate ranking for a single input record.
//!
//! Each candidate gets a composite score built from three sub-scores on a
//! 0–100 scale: title similarity (dominant), release-year proximity and a
//! log-normalized popularity used as a tie-breaker.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Candidate;
use crate::title::TitleSet;

pub const DEFAULT_TITLE_WEIGHT: f64 = 0.70;
pub const DEFAULT_YEAR_WEIGHT: f64 = 0.25;
pub const DEFAULT_POPULARITY_WEIGHT: f64 = 0.05;
/// Title scores below this are treated as no match at all.
pub const DEFAULT_TITLE_THRESHOLD: f64 = 85.0;
/// A title score above this counts as exact and stops further comparisons.
pub const EXACT_TITLE_SCORE: f64 = 99.9;
pub const DEFAULT_YEAR_PENALTY: f64 = 35.0;
/// `ln(5000) ≈ 8.5`: popularity around 5000 maps to a full score.
pub const DEFAULT_POPULARITY_LOG_SCALE: f64 = 8.5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub title_weight: f64,
    pub year_weight: f64,
    pub popularity_weight: f64,
    pub title_threshold: f64,
    pub year_penalty: f64,
    pub popularity_log_scale: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            title_weight: DEFAULT_TITLE_WEIGHT,
            year_weight: DEFAULT_YEAR_WEIGHT,
            popularity_weight: DEFAULT_POPULARITY_WEIGHT,
            title_threshold: DEFAULT_TITLE_THRESHOLD,
            year_penalty: DEFAULT_YEAR_PENALTY,
            popularity_log_scale: DEFAULT_POPULARITY_LOG_SCALE,
        }
    }
}

/// Score breakdown for one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScore {
    pub title: f64,
    pub year: f64,
    pub popularity: f64,
    pub composite: f64,
}

/// Indel similarity `2 * LCS / (len_a + len_b)` on a 0–100 integer scale,
/// rounded half to even. An empty side scores 0.
pub fn fuzzy_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    (rapidfuzz::fuzz::ratio(a.chars(), b.chars()) * 100.0).round_ties_even()
}

#[derive(Debug, Clone, Default)]
pub struct CandidateScorer {
    config: ScoringConfig,
}

impl CandidateScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Pick the best candidate for `titles` released around `year`.
    ///
    /// A lone candidate is returned as-is. Ties keep the earliest candidate.
    pub fn select<'a>(
        &self,
        titles: &TitleSet,
        year: i32,
        candidates: &'a [Candidate],
    ) -> Option<&'a Candidate> {
        match candidates {
            [] => None,
            [only] => Some(only),
            _ => {
                debug!(
                    "{} candidates for {} ({year})",
                    candidates.len(),
                    titles.raw_title
                );
                let mut best: Option<(&Candidate, f64)> = None;
                for candidate in candidates {
                    let score = self.score(titles, year, candidate);
                    if best.is_none_or(|(_, top)| score.composite > top) {
                        best = Some((candidate, score.composite));
                    }
                }
                best.map(|(candidate, _)| candidate)
            }
        }
    }

    pub fn score(&self, titles: &TitleSet, year: i32, candidate: &Candidate) -> MatchScore {
        let title = self.title_score(titles, candidate);
        let year_score = self.year_score(year, candidate);
        let popularity = self.popularity_score(candidate.popularity);
        let composite = self.composite(title, year_score, popularity);

        if title > 0.0 {
            debug!(
                "  ({}, {}) : title_score={title}, year_score={year_score}, popularity={} => {popularity:.2}, composite={composite:.2}",
                candidate.original_title, candidate.title, candidate.popularity
            );
        }

        MatchScore {
            title,
            year: year_score,
            popularity,
            composite,
        }
    }

    pub fn composite(&self, title: f64, year: f64, popularity: f64) -> f64 {
        title * self.config.title_weight
            + year * self.config.year_weight
            + popularity * self.config.popularity_weight
    }

    /// Best similarity between the candidate's titles and any parsed title.
    pub fn title_score(&self, titles: &TitleSet, candidate: &Candidate) -> f64 {
        let original = candidate.original_title.to_lowercase();
        let localized = candidate.title.to_lowercase();
        let against = |text: &str| {
            let text = text.to_lowercase();
            fuzzy_ratio(&original, &text).max(fuzzy_ratio(&localized, &text))
        };

        let mut score = against(&titles.main_title.text);
        if score < EXACT_TITLE_SCORE {
            for supplemental in &titles.supplemental_titles {
                score = score.max(against(&supplemental.text));
                if score > EXACT_TITLE_SCORE {
                    break;
                }
            }
        }

        if score < self.config.title_threshold {
            0.0
        } else {
            score
        }
    }

    pub fn year_score(&self, target_year: i32, candidate: &Candidate) -> f64 {
        match candidate.release_year() {
            Some(release_year) => {
                let diff = f64::from((release_year - target_year).abs());
                (100.0 - diff * self.config.year_penalty).max(0.0)
            }
            None => 0.0,
        }
    }

    pub fn popularity_score(&self, popularity: f64) -> f64 {
        let popularity = popularity.max(0.0);
        ((popularity + 1.0).ln() / self.config.popularity_log_scale * 100.0).min(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seven_candidates() -> Vec<Candidate> {
        vec![
            Candidate::new(807, "Seven", "Se7en")
                .with_release_date("1995-09-22")
                .with_popularity(50.0),
            Candidate::new(9999, "Se7en Remake", "Se7en Remake")
                .with_release_date("2020-01-01")
                .with_popularity(5.0),
        ]
    }

    #[test]
    fn empty_candidates_select_nothing() {
        let titles = TitleSet::parse("Seven").unwrap();
        assert!(CandidateScorer::default().select(&titles, 1995, &[]).is_none());
    }

    #[test]
    fn single_candidate_is_returned_unscored() {
        let titles = TitleSet::parse("Seven").unwrap();
        let only = vec![Candidate::new(1, "Completely Unrelated", "Nope")];
        let picked = CandidateScorer::default().select(&titles, 1995, &only).unwrap();
        assert_eq!(picked.id, 1);
    }

    #[test]
    fn seven_prefers_original_release() {
        let titles = TitleSet::parse("Seven").unwrap();
        let candidates = seven_candidates();
        let picked = CandidateScorer::default().select(&titles, 1995, &candidates).unwrap();
        assert_eq!(picked.id, 807);
    }

    #[test]
    fn selection_is_order_independent() {
        let titles = TitleSet::parse("Seven").unwrap();
        let mut candidates = seven_candidates();
        candidates.push(
            Candidate::new(42, "Seven Samurai", "七人の侍")
                .with_release_date("1954-04-26")
                .with_popularity(40.0),
        );
        let scorer = CandidateScorer::default();
        let expected = scorer.select(&titles, 1995, &candidates).unwrap().id;

        candidates.reverse();
        assert_eq!(scorer.select(&titles, 1995, &candidates).unwrap().id, expected);
        candidates.rotate_left(1);
        assert_eq!(scorer.select(&titles, 1995, &candidates).unwrap().id, expected);
    }

    #[test]
    fn ties_keep_input_order() {
        let titles = TitleSet::parse("Brooklyn").unwrap();
        let candidates = vec![
            Candidate::new(1, "Brooklyn", "Brooklyn").with_release_date("2015-01-01"),
            Candidate::new(2, "Brooklyn", "Brooklyn").with_release_date("2015-06-01"),
        ];
        let picked = CandidateScorer::default().select(&titles, 2015, &candidates).unwrap();
        assert_eq!(picked.id, 1);
    }

    #[test]
    fn weak_title_match_scores_zero() {
        let scorer = CandidateScorer::default();
        let titles = TitleSet::parse("Seven").unwrap();
        // "se7en" vs "seven" is one substitution away: 80, below threshold.
        let candidate = Candidate::new(1, "Se7en", "Se7en")
            .with_release_date("1995-01-01")
            .with_popularity(5000.0);
        let score = scorer.score(&titles, 1995, &candidate);
        assert_eq!(score.title, 0.0);
        assert!(score.composite <= 0.25 * 100.0 + 0.05 * 100.0);
    }

    #[test]
    fn supplemental_titles_are_considered() {
        let scorer = CandidateScorer::default();
        let titles = TitleSet::parse("기생충 (Parasite)").unwrap();
        let candidate = Candidate::new(496243, "Parasite", "기생충");
        assert_eq!(scorer.title_score(&titles, &candidate), 100.0);

        let titles = TitleSet::parse("The Host (Gwoemul)").unwrap();
        let candidate = Candidate::new(1255, "GWOEMUL", "괴물");
        assert_eq!(scorer.title_score(&titles, &candidate), 100.0);
    }

    #[test]
    fn title_matching_ignores_case() {
        let scorer = CandidateScorer::default();
        let titles = TitleSet::parse("the witches").unwrap();
        let candidate = Candidate::new(531219, "The Witches", "The Witches");
        assert_eq!(scorer.title_score(&titles, &candidate), 100.0);
    }

    #[test]
    fn year_score_decays_by_distance() {
        let scorer = CandidateScorer::default();
        let at = |date: &str| {
            scorer.year_score(2000, &Candidate::new(1, "x", "x").with_release_date(date))
        };
        assert_eq!(at("2000-05-05"), 100.0);
        assert_eq!(at("2001-05-05"), 65.0);
        assert_eq!(at("1998-05-05"), 30.0);
        assert_eq!(at("1997-05-05"), 0.0);
        assert_eq!(at(""), 0.0);
        assert_eq!(scorer.year_score(2000, &Candidate::new(1, "x", "x")), 0.0);
    }

    #[test]
    fn popularity_is_log_scaled_and_capped() {
        let scorer = CandidateScorer::default();
        assert_eq!(scorer.popularity_score(0.0), 0.0);
        assert!(scorer.popularity_score(50.0) > 40.0);
        assert!(scorer.popularity_score(50.0) < 50.0);
        assert_eq!(scorer.popularity_score(1_000_000.0), 100.0);
        assert_eq!(scorer.popularity_score(-3.0), 0.0);
    }

    #[test]
    fn composite_is_monotonic_in_title_score() {
        let scorer = CandidateScorer::default();
        let mut previous = f64::MIN;
        for title in [0.0, 85.0, 90.0, 95.0, 100.0] {
            let composite = scorer.composite(title, 65.0, 40.0);
            assert!(composite >= previous);
            previous = composite;
        }
    }

    #[test]
    fn fuzzy_ratio_scale() {
        assert_eq!(fuzzy_ratio("seven", "seven"), 100.0);
        assert_eq!(fuzzy_ratio("seven", "se7en"), 80.0);
        assert_eq!(fuzzy_ratio("abc", "xyz"), 0.0);
        assert_eq!(fuzzy_ratio("", "seven"), 0.0);
        assert_eq!(fuzzy_ratio("", ""), 0.0);
    }

    #[test]
    fn fuzzy_ratio_counts_insertions_and_deletions() {
        assert_eq!(fuzzy_ratio("brooklyn", "brooklyn 2"), 89.0);
        assert_eq!(fuzzy_ratio("the witches", "witches"), 78.0);
        assert_eq!(fuzzy_ratio("kitten", "sitting"), 62.0);
        assert_eq!(fuzzy_ratio("macbeth", "macbeth (2015)"), 67.0);
    }

    #[test]
    fn sequel_title_beats_unrelated_popular_film() {
        let titles = TitleSet::parse("Brooklyn").unwrap();
        let candidates = vec![
            Candidate::new(1, "Brooklyn 2", "Brooklyn 2")
                .with_release_date("2015-01-01")
                .with_popularity(1.0),
            Candidate::new(2, "Totally Different", "Totally Different")
                .with_release_date("2015-01-01")
                .with_popularity(200.0),
        ];
        let scorer = CandidateScorer::default();
        assert_eq!(scorer.title_score(&titles, &candidates[0]), 89.0);
        let picked = scorer.select(&titles, 2015, &candidates).unwrap();
        assert_eq!(picked.id, 1);
    }
}
