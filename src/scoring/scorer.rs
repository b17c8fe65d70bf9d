use log::warn;

use crate::models::ViewCount;
use crate::scoring::config::ScoringConfig;
use crate::scoring::neighbors::select_neighbors;
use crate::store::RecordStore;
use crate::utils::median_u64;

/// Why a record could not be scored. None of these are failures: a sparse or
/// partially hidden listing routinely produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unscorable {
    NotFound,
    ViewsUnavailable,
    NoNeighbors,
    NoValidNeighbors,
    ZeroMedian,
    /// The ratio came out non-finite or negative. Indicates a bug upstream.
    InvalidResult,
}

impl Unscorable {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unscorable::NotFound => "not found",
            Unscorable::ViewsUnavailable => "views unavailable",
            Unscorable::NoNeighbors => "no neighbors",
            Unscorable::NoValidNeighbors => "no valid neighbors",
            Unscorable::ZeroMedian => "neighbor median is zero",
            Unscorable::InvalidResult => "invalid result",
        }
    }
}

/// Outlier score of one record: its views over the median views of its
/// neighbor window, or `None` when it cannot be evaluated.
pub fn calculate_score(store: &RecordStore, id: &str, config: &ScoringConfig) -> Option<f64> {
    evaluate_score(store, id, config).ok()
}

/// Same as [`calculate_score`] but reports which guard stopped evaluation.
///
/// A target with zero views scores exactly `0.0` as long as its neighbor
/// median is positive.
pub fn evaluate_score(
    store: &RecordStore,
    id: &str,
    config: &ScoringConfig,
) -> Result<f64, Unscorable> {
    let record = store.get_by_id(id).ok_or(Unscorable::NotFound)?;
    let ViewCount::Known(views) = record.view_count else {
        return Err(Unscorable::ViewsUnavailable);
    };

    let window = select_neighbors(store, id, config);
    if window.is_empty() {
        return Err(Unscorable::NoNeighbors);
    }

    // The window only ever holds known counts; u64 rules out negatives.
    let neighbor_views = window.views;
    let median_views = median_u64(&neighbor_views).ok_or(Unscorable::NoValidNeighbors)?;

    if median_views == 0.0 {
        return Err(Unscorable::ZeroMedian);
    }
    if views == 0 {
        return Ok(0.0);
    }

    let score = views as f64 / median_views;
    if !score.is_finite() || score < 0.0 {
        warn!("Invalid score calculated for {id}: {score}");
        return Err(Unscorable::InvalidResult);
    }

    Ok(score)
}
