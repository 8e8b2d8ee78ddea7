use serde::{Deserialize, Serialize};

/// A child entity contributing to its parent's rollup.
pub trait ScoredChild {
    fn confidence(&self) -> f64;
    fn rehearsals(&self) -> f64;
    fn progress(&self) -> f64;
}

/// Rollup of a parent's children
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParentStats {
    pub confidence: f64,
    pub rehearsals: f64,
    pub progress: f64,
}

/// Arithmetic mean of every field across `children`; zeros when empty.
pub fn recompute_parent_stats<C: ScoredChild>(children: &[C]) -> ParentStats {
    if children.is_empty() {
        return ParentStats::default();
    }

    let count = children.len() as f64;
    let (confidence, rehearsals, progress) =
        children
            .iter()
            .fold((0.0, 0.0, 0.0), |(confidence, rehearsals, progress), child| {
                (
                    confidence + child.confidence(),
                    rehearsals + child.rehearsals(),
                    progress + child.progress(),
                )
            });

    ParentStats {
        confidence: confidence / count,
        rehearsals: rehearsals / count,
        progress: progress / count,
    }
}
