use crate::domain::song::{HistoryProperty, SectionHistory, SongSection};

/// Turns a section's history into scores.
#[cfg_attr(test, mockall::automock)]
pub trait ProgressProcessor: Send + Sync {
    fn compute_rehearsals_score(&self, history: &[SectionHistory]) -> f64;

    fn compute_confidence_score(&self, history: &[SectionHistory]) -> f64;

    /// Combined progress of a section whose scores are already up to date
    fn compute_progress(&self, section: &SongSection) -> f64;
}

/// Default scoring:
/// - rehearsals score: total rehearsals ever added
/// - confidence score: most recent confidence
/// - progress: rehearsals score weighted by confidence percentage
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryProgressProcessor;

impl HistoryProgressProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressProcessor for HistoryProgressProcessor {
    fn compute_rehearsals_score(&self, history: &[SectionHistory]) -> f64 {
        history
            .iter()
            .filter(|record| record.property == HistoryProperty::Rehearsals)
            .map(|record| record.to.saturating_sub(record.from) as f64)
            .sum()
    }

    fn compute_confidence_score(&self, history: &[SectionHistory]) -> f64 {
        history
            .iter()
            .filter(|record| record.property == HistoryProperty::Confidence)
            .max_by_key(|record| record.created_at)
            .map(|record| record.to as f64)
            .unwrap_or(0.0)
    }

    fn compute_progress(&self, section: &SongSection) -> f64 {
        section.rehearsals_score * section.confidence_score / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn record(property: HistoryProperty, from: u32, to: u32, minutes_ago: i64) -> SectionHistory {
        SectionHistory::new(
            Uuid::nil(),
            property,
            from,
            to,
            Utc::now() - Duration::minutes(minutes_ago),
        )
    }

    #[test]
    fn test_empty_history_scores_zero() {
        let processor = HistoryProgressProcessor::new();

        assert_eq!(processor.compute_rehearsals_score(&[]), 0.0);
        assert_eq!(processor.compute_confidence_score(&[]), 0.0);

        let section = SongSection::new(Uuid::new_v4(), "Verse".to_string(), 0);
        assert_eq!(processor.compute_progress(&section), 0.0);
    }

    #[test]
    fn test_rehearsals_score_grows_with_history() {
        let processor = HistoryProgressProcessor::new();
        let mut history = vec![record(HistoryProperty::Rehearsals, 0, 3, 10)];
        let first = processor.compute_rehearsals_score(&history);

        history.push(record(HistoryProperty::Rehearsals, 3, 4, 5));
        let second = processor.compute_rehearsals_score(&history);

        assert_eq!(first, 3.0);
        assert_eq!(second, 4.0);
    }

    #[test]
    fn test_confidence_score_uses_latest_record() {
        let processor = HistoryProgressProcessor::new();
        let history = vec![
            record(HistoryProperty::Confidence, 0, 90, 30),
            record(HistoryProperty::Confidence, 90, 60, 1),
            record(HistoryProperty::Rehearsals, 0, 100, 0),
        ];

        assert_eq!(processor.compute_confidence_score(&history), 60.0);
    }

    #[test]
    fn test_progress_combines_scores() {
        let processor = HistoryProgressProcessor::new();
        let mut section = SongSection::new(Uuid::new_v4(), "Solo".to_string(), 0);
        section.rehearsals_score = 10.0;
        section.confidence_score = 50.0;

        assert_eq!(processor.compute_progress(&section), 5.0);
    }
}
