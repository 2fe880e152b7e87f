//! Distribution statistics over a finished grid run.

use serde::{Deserialize, Serialize};

use crate::orchestrator::PointOutcome;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSearchSummary {
    /// Mean rank over found points, one decimal place.
    pub avg_rank: Option<f64>,
    pub found_count: usize,
    pub not_found_count: usize,
    pub top3_count: usize,
    pub top3_percent: u32,
    pub top10_count: usize,
    pub top10_percent: u32,
    pub top20_count: usize,
    pub top20_percent: u32,
}

/// Folds per-point outcomes into summary statistics.
///
/// Percentages use the total number of outcomes as the denominator, not just
/// the found ones. Rank bands are cumulative: rank 2 counts toward top 3, 10
/// and 20.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(outcomes: &[PointOutcome]) -> GridSearchSummary {
    let total = outcomes.len();
    let ranks: Vec<u32> = outcomes.iter().filter_map(|o| o.rank).collect();
    let found_count = ranks.len();

    let avg_rank = if ranks.is_empty() {
        None
    } else {
        let sum: f64 = ranks.iter().copied().map(f64::from).sum();
        let mean = sum / ranks.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    };

    let within = |limit: u32| ranks.iter().filter(|&&r| r <= limit).count();
    let top3_count = within(3);
    let top10_count = within(10);
    let top20_count = within(20);

    GridSearchSummary {
        avg_rank,
        found_count,
        not_found_count: total - found_count,
        top3_count,
        top3_percent: percent(top3_count, total),
        top10_count,
        top10_percent: percent(top10_count, total),
        top20_count,
        top20_percent: percent(top20_count, total),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}
