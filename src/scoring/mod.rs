pub mod config;
pub mod driver;
pub mod neighbors;
pub mod scorer;

pub use config::ScoringConfig;
pub use driver::{calculate_all_scores, recompute_affected_scores, ScoringPass};
pub use neighbors::{select_neighbors, NeighborWindow};
pub use scorer::{calculate_score, evaluate_score, Unscorable};

use crate::store::RecordStore;

/// Median of all positive stored scores; the base consumers multiply by a
/// filter factor. `0.0` when nothing has a positive score yet.
pub fn median_outlier_score(store: &RecordStore) -> f64 {
    store.median_score()
}
