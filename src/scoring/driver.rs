use log::{debug, info};

use crate::models::{VideoId, VideoPatch};
use crate::scoring::config::ScoringConfig;
use crate::scoring::scorer::{calculate_score, evaluate_score};
use crate::store::RecordStore;

/// Outcome of a scoring pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoringPass {
    /// Records whose score was written back.
    pub scored: usize,
    /// Records visited.
    pub visited: usize,
}

/// Score every record in listing order and write back each result that is
/// not `None`. Records that stay unscorable keep whatever score they had.
pub fn calculate_all_scores(store: &mut RecordStore, config: &ScoringConfig) -> ScoringPass {
    let ids: Vec<VideoId> = store.get_all().iter().map(|r| r.id.clone()).collect();
    let mut pass = ScoringPass {
        visited: ids.len(),
        ..ScoringPass::default()
    };

    for id in &ids {
        match evaluate_score(store, id, config) {
            Ok(score) => {
                store.update(id, VideoPatch::score(score));
                pass.scored += 1;
            }
            Err(reason) => debug!("Skipped {id}: {}", reason.as_str()),
        }
    }

    info!("Calculated scores for {}/{} videos", pass.scored, pass.visited);
    pass
}

/// Re-score the records whose neighbor window may have shifted after a record
/// landed at `changed_position`: the inclusive range
/// `[changed_position - N, changed_position + N]`, clamped to the listing.
///
/// Only records with known views are visited, and a score is written only
/// when it differs from the stored one.
pub fn recompute_affected_scores(
    store: &mut RecordStore,
    changed_position: usize,
    config: &ScoringConfig,
) -> ScoringPass {
    let mut pass = ScoringPass::default();
    if store.is_empty() {
        return pass;
    }

    let start = changed_position.saturating_sub(config.neighbor_count);
    let end = changed_position
        .saturating_add(config.neighbor_count)
        .min(store.len() - 1);
    if start > end {
        return pass;
    }

    let affected: Vec<(VideoId, Option<f64>)> = store.get_all()[start..=end]
        .iter()
        .filter(|r| r.is_valid())
        .map(|r| (r.id.clone(), r.score))
        .collect();
    pass.visited = affected.len();

    for (id, current) in affected {
        let Some(score) = calculate_score(store, &id, config) else {
            continue;
        };
        if current != Some(score) {
            store.update(&id, VideoPatch::score(score));
            pass.scored += 1;
        }
    }

    if pass.scored > 0 {
        debug!("Recomputed {} scores around position {changed_position}", pass.scored);
    }
    pass
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{VideoDraft, ViewCount};
    use std::cell::Cell;
    use std::rc::Rc;

    fn store_with(views: &[u64]) -> RecordStore {
        let mut store = RecordStore::new();
        for (i, v) in views.iter().enumerate() {
            store.upsert(VideoDraft::new(format!("v{i}"), ViewCount::Known(*v)));
        }
        store
    }

    #[test]
    fn full_pass_scores_every_scorable_record() {
        let views: Vec<u64> = (0..15).map(|i| 1000 + i * 100).collect();
        let mut store = store_with(&views);

        let pass = calculate_all_scores(&mut store, &ScoringConfig::default());

        assert_eq!(pass, ScoringPass { scored: 15, visited: 15 });
        assert!(store.get_all().iter().all(|r| r.score.is_some()));
    }

    #[test]
    fn full_pass_keeps_previous_score_when_unscorable() {
        let mut store = store_with(&[100, 100]);
        store.update("v0", VideoPatch::score(4.0));
        store.update("v1", VideoPatch::view_count(ViewCount::Unavailable));

        calculate_all_scores(&mut store, &ScoringConfig::default());

        assert_eq!(store.get_by_id("v0").unwrap().score, Some(4.0));
    }

    #[test]
    fn incremental_pass_skips_unchanged_scores() {
        let mut store = store_with(&[100; 12]);
        calculate_all_scores(&mut store, &ScoringConfig::default());

        let updates = Rc::new(Cell::new(0));
        let counter = Rc::clone(&updates);
        store.subscribe(move |_, _| counter.set(counter.get() + 1));

        let pass = recompute_affected_scores(&mut store, 6, &ScoringConfig::default());

        assert_eq!(pass.scored, 0);
        assert_eq!(pass.visited, 12);
        assert_eq!(updates.get(), 0);
    }

    #[test]
    fn incremental_pass_is_bounded_by_neighbor_count() {
        let mut store = store_with(&[100; 30]);
        let config = ScoringConfig::with_neighbor_count(4);
        calculate_all_scores(&mut store, &config);
        store.upsert(VideoDraft::new("v20", ViewCount::Known(900)));

        let pass = recompute_affected_scores(&mut store, 20, &config);

        assert_eq!(pass.visited, 9);
        // Untouched outside [16, 24].
        assert_eq!(store.get_by_id("v15").unwrap().score, Some(1.0));
        assert_eq!(store.get_by_id("v25").unwrap().score, Some(1.0));
    }

    #[test]
    fn incremental_pass_on_empty_store_is_noop() {
        let mut store = RecordStore::new();
        assert_eq!(
            recompute_affected_scores(&mut store, 3, &ScoringConfig::default()),
            ScoringPass::default()
        );
    }

    #[test]
    fn incremental_pass_clamps_past_the_end() {
        let mut store = store_with(&[100; 3]);
        let pass = recompute_affected_scores(&mut store, 50, &ScoringConfig::default());
        assert_eq!(pass, ScoringPass::default());
    }
}
