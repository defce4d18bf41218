//! Positional match scoring.
//!
//! Algorithm, per occupation:
//! 1. For each selected competency found among the occupation's top-3, take
//!    its rank position: 1st → weight 3, 2nd → weight 2, 3rd → weight 1.
//! 2. accumulator = Σ(score_at_position × weight), total_weight = Σ(weight)
//! 3. percentage = accumulator / total_weight (0 when total_weight is 0),
//!    clamped to [0, 100] and rounded to an integer.

use serde::{Deserialize, Serialize};

use crate::models::occupation::{CompetencyMappingRow, MappedOccupationRow};

const UNKNOWN_TITLE: &str = "Unknown Title";
const NO_DESCRIPTION: &str = "No description available";

/// One ranked occupation returned by a competency match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMatch {
    pub onetsoc_code: String,
    pub title: String,
    pub description: String,
    pub match_score: u32, // 0 – 100
}

/// Intermediate sums for one occupation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedScore {
    pub accumulator: f64,
    pub total_weight: u32,
}

impl WeightedScore {
    pub fn percentage(&self) -> f64 {
        if self.total_weight > 0 {
            self.accumulator / f64::from(self.total_weight)
        } else {
            0.0
        }
    }

    /// Clamped, rounded 0–100 score.
    pub fn match_score(&self) -> u32 {
        let pct = self.percentage();
        if pct.is_nan() {
            return 0;
        }
        pct.clamp(0.0, 100.0).round() as u32
    }

    pub fn is_match(&self) -> bool {
        self.total_weight > 0
    }
}

/// Weight for a 0-based rank index.
pub fn positional_weight(rank_index: usize) -> u32 {
    match rank_index {
        0 => 3,
        1 => 2,
        2 => 1,
        _ => 0,
    }
}

/// Computes the weighted sums of `selected` against one mapping row.
/// `selected` is expected to be deduplicated.
pub fn weigh_mapping(mapping: &CompetencyMappingRow, selected: &[String]) -> WeightedScore {
    let ranked = mapping.ranked();
    let mut accumulator = 0.0_f64;
    let mut total_weight = 0_u32;

    for competency in selected {
        if let Some(index) = ranked.iter().position(|(name, _)| *name == competency.as_str()) {
            let weight = positional_weight(index);
            accumulator += ranked[index].1 * f64::from(weight);
            total_weight += weight;
        }
    }

    WeightedScore {
        accumulator,
        total_weight,
    }
}

/// Scores every row, dropping occupations that share no competency with the
/// selection. Output keeps the input (store) order.
pub fn score_rows(rows: Vec<MappedOccupationRow>, selected: &[String]) -> Vec<JobMatch> {
    rows.into_iter()
        .filter_map(|row| {
            let weighted = weigh_mapping(&row.mapping, selected);
            if !weighted.is_match() {
                return None;
            }
            Some(JobMatch {
                onetsoc_code: row.mapping.onetsoc_code,
                title: row.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
                description: row
                    .description
                    .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
                match_score: weighted.match_score(),
            })
        })
        .collect()
}

/// Sorts by match score, highest first. Stable, so equal scores keep store order.
pub fn rank_by_score(matches: &mut [JobMatch]) {
    matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(code: &str, comps: [(&str, f64); 3]) -> CompetencyMappingRow {
        CompetencyMappingRow {
            onetsoc_code: code.to_string(),
            competency_1: comps[0].0.to_string(),
            competency_1_score: comps[0].1,
            competency_2: comps[1].0.to_string(),
            competency_2_score: comps[1].1,
            competency_3: comps[2].0.to_string(),
            competency_3_score: comps[2].1,
        }
    }

    fn selection(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn software_developer() -> CompetencyMappingRow {
        mapping(
            "15-1252.00",
            [
                ("Technology", 90.0),
                ("Critical Thinking", 70.0),
                ("Teamwork", 50.0),
            ],
        )
    }

    #[test]
    fn test_first_and_third_position_weighting() {
        let weighted = weigh_mapping(&software_developer(), &selection(&["Technology", "Teamwork"]));
        assert_eq!(weighted.accumulator, 320.0);
        assert_eq!(weighted.total_weight, 4);
        assert_eq!(weighted.match_score(), 80);
    }

    #[test]
    fn test_all_three_positions() {
        // (90*3 + 70*2 + 50*1) / 6 = 460 / 6 = 76.67
        let weighted = weigh_mapping(
            &software_developer(),
            &selection(&["Critical Thinking", "Teamwork", "Technology"]),
        );
        assert_eq!(weighted.total_weight, 6);
        assert_eq!(weighted.match_score(), 77);
    }

    #[test]
    fn test_no_overlap_has_zero_weight() {
        let weighted = weigh_mapping(&software_developer(), &selection(&["Leadership"]));
        assert_eq!(weighted.total_weight, 0);
        assert_eq!(weighted.percentage(), 0.0);
        assert!(!weighted.is_match());
    }

    #[test]
    fn test_score_clamped_to_100() {
        let row = mapping(
            "11-1011.00",
            [("Leadership", 140.0), ("Communication", 20.0), ("Teamwork", 10.0)],
        );
        let weighted = weigh_mapping(&row, &selection(&["Leadership"]));
        assert_eq!(weighted.match_score(), 100);
    }

    #[test]
    fn test_score_clamped_to_0() {
        let row = mapping(
            "11-1011.00",
            [("Leadership", -5.0), ("Communication", 20.0), ("Teamwork", 10.0)],
        );
        assert_eq!(weigh_mapping(&row, &selection(&["Leadership"])).match_score(), 0);
    }

    #[test]
    fn test_rounds_half_up() {
        let weighted = WeightedScore {
            accumulator: 1.5,
            total_weight: 3,
        };
        assert_eq!(weighted.match_score(), 1);
        let weighted = WeightedScore {
            accumulator: 42.5,
            total_weight: 1,
        };
        assert_eq!(weighted.match_score(), 43);
    }

    #[test]
    fn test_positional_weights() {
        assert_eq!(positional_weight(0), 3);
        assert_eq!(positional_weight(1), 2);
        assert_eq!(positional_weight(2), 1);
        assert_eq!(positional_weight(3), 0);
    }

    #[test]
    fn test_score_rows_drops_non_matching_and_fills_defaults() {
        let rows = vec![
            MappedOccupationRow {
                mapping: software_developer(),
                title: None,
                description: None,
            },
            MappedOccupationRow {
                mapping: mapping(
                    "11-1011.00",
                    [("Leadership", 95.0), ("Communication", 80.0), ("Professionalism", 60.0)],
                ),
                title: Some("Chief Executives".to_string()),
                description: Some("Plan and direct.".to_string()),
            },
        ];

        let matches = score_rows(rows, &selection(&["Technology"]));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].onetsoc_code, "15-1252.00");
        assert_eq!(matches[0].title, "Unknown Title");
        assert_eq!(matches[0].description, "No description available");
        assert_eq!(matches[0].match_score, 90);
    }

    #[test]
    fn test_rank_by_score_is_stable() {
        let job = |code: &str, score: u32| JobMatch {
            onetsoc_code: code.to_string(),
            title: code.to_string(),
            description: String::new(),
            match_score: score,
        };
        let mut matches = vec![job("a", 50), job("b", 80), job("c", 50), job("d", 90)];
        rank_by_score(&mut matches);
        let codes: Vec<_> = matches.iter().map(|m| m.onetsoc_code.as_str()).collect();
        assert_eq!(codes, vec!["d", "b", "a", "c"]);
    }
}
