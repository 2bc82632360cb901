//! Post-resolution metadata pass.
//!
//! Preference flags and awards come from the input list, not from the
//! metadata service, so they are recomputed for every output record
//! (including survivors) on each run.

use serde::{Deserialize, Serialize};

use crate::merge::Dataset;
use crate::models::MovieRecord;

/// Award marker text → award slug. Order decides the order of slugs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwardName {
    pub marker: String,
    pub slug: String,
}

/// Fixed award list for a `(director, title)` pair, ignoring input markers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwardOverride {
    pub director: String,
    pub title: String,
    pub awards: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MetadataRules {
    pub masterpiece_marker: String,
    pub my_best_marker: String,
    pub awards: Vec<AwardName>,
    pub award_overrides: Vec<AwardOverride>,
}

impl Default for MetadataRules {
    fn default() -> Self {
        let award = |marker: &str, slug: &str| AwardName {
            marker: marker.to_string(),
            slug: slug.to_string(),
        };
        Self {
            masterpiece_marker: "Masterpiece".to_string(),
            my_best_marker: "Special".to_string(),
            awards: vec![
                award("청룡영화제 최우수 작품상", "blue_dragon"),
                award("Oscar Best Picture", "oscar"),
                award("Oscar Best International Film", "oscar"),
                award("Cannes Palme d'Or", "cannes"),
                award("Venice Leone d’oro", "venice"),
                award("Berlin Goldener Bär", "berlin"),
            ],
            award_overrides: vec![AwardOverride {
                director: "봉준호".to_string(),
                title: "기생충 (Parasite)".to_string(),
                awards: vec![
                    "blue_dragon".to_string(),
                    "oscar".to_string(),
                    "cannes".to_string(),
                ],
            }],
        }
    }
}

impl MetadataRules {
    /// Refresh preference flags and awards of every record listed in `inputs`.
    ///
    /// `my_best` and `awards` are cleared first; `masterpiece` is only set.
    pub fn apply(&self, dataset: &mut Dataset, inputs: &[MovieRecord]) {
        for input in inputs {
            let Some(entry) = dataset.get_mut(&input.key()) else {
                continue;
            };

            entry.my_best = false;
            if input.preference == self.masterpiece_marker {
                entry.masterpiece = true;
            }
            if input.preference == self.my_best_marker {
                entry.my_best = true;
            }

            entry.awards = self.awards_for(input);
        }
    }

    pub fn awards_for(&self, input: &MovieRecord) -> Vec<String> {
        if let Some(fixed) = self
            .award_overrides
            .iter()
            .find(|o| o.director == input.director && o.title == input.title)
        {
            return fixed.awards.clone();
        }

        let mut slugs: Vec<String> = Vec::new();
        for award in &self.awards {
            let listed = input.award_markers.iter().any(|m| *m == award.marker);
            if listed && !slugs.contains(&award.slug) {
                slugs.push(award.slug.clone());
            }
        }
        slugs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EnrichedRecord;

    fn input(director: &str, title: &str, preference: &str, markers: &[&str]) -> MovieRecord {
        MovieRecord {
            preference: preference.to_string(),
            award_markers: markers.iter().map(|m| m.to_string()).collect(),
            ..MovieRecord::new(director, 2019, title)
        }
    }

    fn dataset_for(inputs: &[MovieRecord]) -> Dataset {
        let mut dataset = Dataset::new();
        for rec in inputs {
            dataset.insert(EnrichedRecord::from_input(rec)).unwrap();
        }
        dataset
    }

    #[test]
    fn preference_markers_set_flags() {
        let inputs = vec![
            input("A", "a", "Masterpiece", &[]),
            input("B", "b", "Special", &[]),
            input("C", "c", "", &[]),
        ];
        let mut dataset = dataset_for(&inputs);
        MetadataRules::default().apply(&mut dataset, &inputs);

        let a = dataset.get(&inputs[0].key()).unwrap();
        assert!(a.masterpiece && !a.my_best);
        let b = dataset.get(&inputs[1].key()).unwrap();
        assert!(!b.masterpiece && b.my_best);
        let c = dataset.get(&inputs[2].key()).unwrap();
        assert!(!c.masterpiece && !c.my_best);
    }

    #[test]
    fn my_best_and_awards_are_recomputed() {
        let inputs = vec![input("A", "a", "", &[])];
        let mut dataset = dataset_for(&inputs);
        {
            let entry = dataset.get_mut(&inputs[0].key()).unwrap();
            entry.my_best = true;
            entry.masterpiece = true;
            entry.awards = vec!["cannes".to_string()];
        }

        MetadataRules::default().apply(&mut dataset, &inputs);
        let entry = dataset.get(&inputs[0].key()).unwrap();
        assert!(!entry.my_best);
        assert!(entry.awards.is_empty());
        assert!(entry.masterpiece);
    }

    #[test]
    fn award_markers_map_to_slugs_in_table_order() {
        let rules = MetadataRules::default();
        let rec = input("X", "x", "", &["Cannes Palme d'Or", "Oscar Best Picture"]);
        assert_eq!(rules.awards_for(&rec), vec!["oscar", "cannes"]);

        let rec = input("X", "x", "", &["Oscar Best Picture", "Oscar Best International Film"]);
        assert_eq!(rules.awards_for(&rec), vec!["oscar"]);

        let rec = input("X", "x", "", &["Golden Globe", ""]);
        assert!(rules.awards_for(&rec).is_empty());
    }

    #[test]
    fn hardcoded_awards_win() {
        let rules = MetadataRules::default();
        let rec = input("봉준호", "기생충 (Parasite)", "", &["Cannes Palme d'Or"]);
        assert_eq!(rules.awards_for(&rec), vec!["blue_dragon", "oscar", "cannes"]);
    }

    #[test]
    fn records_missing_from_dataset_are_ignored() {
        let inputs = vec![input("A", "a", "Masterpiece", &[])];
        let mut dataset = Dataset::new();
        MetadataRules::default().apply(&mut dataset, &inputs);
        assert!(dataset.is_empty());
    }
}
