use crate::models::VideoRecord;
use crate::scoring::config::ScoringConfig;
use crate::store::RecordStore;

/// The comparison baseline chosen for one target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborWindow {
    /// Valid records taken from positions before the target.
    pub before: usize,
    /// Valid records taken from positions after the target.
    pub after: usize,
    /// Neighbor view counts in listing order, target excluded.
    pub views: Vec<u64>,
}

impl NeighborWindow {
    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

/// Select up to `config.neighbor_count` valid neighbors of `target_id`.
///
/// Only records with a known view count take part, both as target and as
/// neighbors. The window prefers floor(N/2) before and ceil(N/2) after; when
/// one side runs short the other side fills in, capped by what it has.
/// An unknown target, or one without a known view count, yields an empty
/// window.
pub fn select_neighbors(
    store: &RecordStore,
    target_id: &str,
    config: &ScoringConfig,
) -> NeighborWindow {
    let valid: Vec<&VideoRecord> = store.get_all().iter().filter(|r| r.is_valid()).collect();

    let Some(target) = valid.iter().position(|r| r.id == target_id) else {
        return NeighborWindow::default();
    };

    let (before, after) = balance(
        target,
        valid.len() - target - 1,
        config.neighbor_count,
        config.ideal_before(),
        config.ideal_after(),
    );

    let views = valid[target - before..target]
        .iter()
        .chain(valid[target + 1..=target + after].iter())
        .filter_map(|r| r.views())
        .collect();

    NeighborWindow {
        before,
        after,
        views,
    }
}

/// How many neighbors to take on each side given what each side offers.
fn balance(
    max_before: usize,
    max_after: usize,
    count: usize,
    ideal_before: usize,
    ideal_after: usize,
) -> (usize, usize) {
    if max_before >= ideal_before && max_after >= ideal_after {
        (ideal_before, ideal_after)
    } else if max_before < ideal_before {
        (max_before, max_after.min(count - max_before))
    } else {
        (max_before.min(count - max_after), max_after)
    }
}
