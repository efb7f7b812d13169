//! Response Classifier: decides whether one answered question counts as correct.

use tracing::warn;

use crate::assessment::models::{CorrectnessSignal, ResponseRecord};

/// Fraction of a level (or of a graded question's max score) needed to pass.
pub const LEVEL_PASS_THRESHOLD: f64 = 0.70;

/// Returns `true` when the response counts toward its level's numerator.
///
/// Malformed responses (no signal, non-positive `max_score`) degrade to
/// incorrect instead of failing the whole assessment.
pub fn is_correct(response: &ResponseRecord) -> bool {
    match response.signal {
        CorrectnessSignal::Boolean(flag) => flag,
        CorrectnessSignal::Scored { score, max_score } if max_score > 0.0 => {
            score / max_score >= LEVEL_PASS_THRESHOLD
        }
        CorrectnessSignal::Scored { max_score, .. } => {
            warn!(
                question_id = %response.question_id,
                "Response has non-positive max_score {max_score}, counting as incorrect"
            );
            false
        }
        CorrectnessSignal::Missing => {
            warn!(
                question_id = %response.question_id,
                question_type = %response.question_type,
                "Response missing is_correct or score, counting as incorrect"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(signal: CorrectnessSignal) -> ResponseRecord {
        ResponseRecord {
            question_id: "q".to_string(),
            question_type: "ShortAnswer".to_string(),
            target_level: 2,
            signal,
        }
    }

    fn scored(score: f64, max_score: f64) -> ResponseRecord {
        record(CorrectnessSignal::Scored { score, max_score })
    }

    #[test]
    fn test_boolean_signal_used_directly() {
        assert!(is_correct(&record(CorrectnessSignal::Boolean(true))));
        assert!(!is_correct(&record(CorrectnessSignal::Boolean(false))));
    }

    #[test]
    fn test_score_at_threshold_is_correct() {
        assert!(is_correct(&scored(70.0, 100.0)));
    }

    #[test]
    fn test_score_below_threshold_is_incorrect() {
        assert!(!is_correct(&scored(69.0, 100.0)));
    }

    #[test]
    fn test_non_hundred_scale() {
        assert!(is_correct(&scored(7.0, 10.0)));
        assert!(!is_correct(&scored(6.0, 10.0)));
    }

    #[test]
    fn test_zero_max_score_is_incorrect() {
        assert!(!is_correct(&scored(5.0, 0.0)));
        assert!(!is_correct(&scored(5.0, -10.0)));
    }

    #[test]
    fn test_missing_signal_is_incorrect() {
        assert!(!is_correct(&record(CorrectnessSignal::Missing)));
    }
}
