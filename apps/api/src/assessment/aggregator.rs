//! Level Aggregator: groups responses by target level and computes pass statistics.

use std::collections::BTreeMap;

use tracing::warn;

use crate::assessment::classifier::{is_correct, LEVEL_PASS_THRESHOLD};
use crate::assessment::models::{LevelResult, LevelResults, ResponseRecord};

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 7;

/// Per-level results plus the assessment-wide totals they were built from.
#[derive(Debug, Clone, Default)]
pub struct LevelAggregate {
    pub level_results: LevelResults,
    pub total_questions: u32,
    pub total_correct: u32,
}

impl LevelAggregate {
    /// Lowest and highest level that received responses.
    pub fn response_bounds(&self) -> Option<(u8, u8)> {
        let min = *self.level_results.keys().next()?;
        let max = *self.level_results.keys().next_back()?;
        Some((min, max))
    }

    pub fn overall_percentage(&self) -> f64 {
        percentage(self.total_correct, self.total_questions)
    }
}

/// Maps a raw target level onto 1..=7. Anything outside the range counts as level 1.
pub fn effective_level(raw: i64) -> u8 {
    match u8::try_from(raw) {
        Ok(level) if (MIN_LEVEL..=MAX_LEVEL).contains(&level) => level,
        _ => {
            warn!("Invalid target_level: {raw}, defaulting to {MIN_LEVEL}");
            MIN_LEVEL
        }
    }
}

pub fn aggregate(responses: &[ResponseRecord]) -> LevelAggregate {
    let mut buckets: BTreeMap<u8, Vec<&ResponseRecord>> = BTreeMap::new();
    for response in responses {
        buckets
            .entry(effective_level(response.target_level))
            .or_default()
            .push(response);
    }

    let mut level_results = LevelResults::new();
    let mut total_correct = 0;

    for (level, bucket) in buckets {
        let total = bucket.len() as u32;
        let correct = bucket.iter().filter(|r| is_correct(r)).count() as u32;
        let pct = percentage(correct, total);

        total_correct += correct;
        level_results.insert(
            level,
            LevelResult {
                total,
                correct,
                percentage: pct,
                passed: pct >= LEVEL_PASS_THRESHOLD * 100.0,
            },
        );
    }

    LevelAggregate {
        level_results,
        total_questions: responses.len() as u32,
        total_correct,
    }
}

/// `part / whole * 100`, rounded to one decimal. 0.0 for an empty whole.
pub fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_one_decimal(part as f64 / whole as f64 * 100.0)
}

/// Rounds to one decimal, sending exact halves to the even neighbour.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::models::CorrectnessSignal;

    fn responses_at(level: i64, correct: usize, total: usize) -> Vec<ResponseRecord> {
        (0..total)
            .map(|i| ResponseRecord {
                question_id: format!("L{level}-q{i}"),
                question_type: "MultipleChoice".to_string(),
                target_level: level,
                signal: CorrectnessSignal::Boolean(i < correct),
            })
            .collect()
    }

    #[test]
    fn test_effective_level_in_range() {
        for level in 1..=7 {
            assert_eq!(effective_level(level), level as u8);
        }
    }

    #[test]
    fn test_effective_level_out_of_range_defaults_to_one() {
        assert_eq!(effective_level(0), 1);
        assert_eq!(effective_level(8), 1);
        assert_eq!(effective_level(-3), 1);
        assert_eq!(effective_level(300), 1);
    }

    #[test]
    fn test_levels_without_responses_are_absent() {
        let mut responses = responses_at(1, 4, 5);
        responses.extend(responses_at(3, 5, 5));
        let agg = aggregate(&responses);

        assert!(agg.level_results.contains_key(&1));
        assert!(!agg.level_results.contains_key(&2));
        assert!(agg.level_results.contains_key(&3));
        assert_eq!(agg.response_bounds(), Some((1, 3)));
    }

    #[test]
    fn test_per_level_statistics() {
        let agg = aggregate(&responses_at(2, 4, 5));
        let l2 = &agg.level_results[&2];
        assert_eq!(l2.total, 5);
        assert_eq!(l2.correct, 4);
        assert_eq!(l2.percentage, 80.0);
        assert!(l2.passed);
    }

    #[test]
    fn test_exactly_seventy_percent_passes() {
        let agg = aggregate(&responses_at(1, 7, 10));
        assert_eq!(agg.level_results[&1].percentage, 70.0);
        assert!(agg.level_results[&1].passed);
    }

    #[test]
    fn test_sixty_nine_point_nine_fails() {
        let agg = aggregate(&responses_at(1, 699, 1000));
        assert_eq!(agg.level_results[&1].percentage, 69.9);
        assert!(!agg.level_results[&1].passed);
    }

    #[test]
    fn test_percentage_rounds_to_one_decimal() {
        let agg = aggregate(&responses_at(4, 2, 3));
        assert_eq!(agg.level_results[&4].percentage, 66.7);
    }

    #[test]
    fn test_halves_round_to_even() {
        assert_eq!(percentage(1, 16), 6.2);
        assert_eq!(percentage(5, 16), 31.2);
        assert_eq!(percentage(3, 16), 18.8);
        assert_eq!(round_one_decimal(2.25), 2.2);
        assert_eq!(round_one_decimal(1.75), 1.8);
    }

    #[test]
    fn test_out_of_range_responses_land_in_level_one() {
        let mut responses = responses_at(1, 1, 1);
        responses.extend(responses_at(9, 0, 1));
        let agg = aggregate(&responses);
        assert_eq!(agg.level_results.len(), 1);
        assert_eq!(agg.level_results[&1].total, 2);
        assert_eq!(agg.level_results[&1].correct, 1);
    }

    #[test]
    fn test_missing_signal_counts_in_denominator() {
        let mut responses = responses_at(2, 3, 3);
        responses.push(ResponseRecord {
            question_id: "broken".to_string(),
            question_type: "LongAnswer".to_string(),
            target_level: 2,
            signal: CorrectnessSignal::Missing,
        });
        let agg = aggregate(&responses);
        assert_eq!(agg.level_results[&2].total, 4);
        assert_eq!(agg.level_results[&2].correct, 3);
        assert_eq!(agg.level_results[&2].percentage, 75.0);
    }

    #[test]
    fn test_totals_span_all_levels() {
        let mut responses = responses_at(1, 5, 5);
        responses.extend(responses_at(2, 2, 5));
        responses.extend(responses_at(3, 5, 5));
        let agg = aggregate(&responses);
        assert_eq!(agg.total_questions, 15);
        assert_eq!(agg.total_correct, 12);
        assert_eq!(agg.overall_percentage(), 80.0);
    }

    #[test]
    fn test_empty_input() {
        let agg = aggregate(&[]);
        assert!(agg.level_results.is_empty());
        assert_eq!(agg.response_bounds(), None);
        assert_eq!(agg.overall_percentage(), 0.0);
    }
}
