//! Ordered per-channel record store.
//!
//! Holds the listing in display order (newest first) plus an id index. Every
//! mutating call notifies subscribers synchronously once the mutation is
//! complete. Listeners only ever see `&RecordStore`, so they cannot re-enter a
//! mutation while a notification is in flight.

mod events;

pub use events::{StoreEvent, SubscriptionId};

use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};

use crate::models::{VideoDraft, VideoId, VideoPatch, VideoRecord, VideoStatus};
use crate::utils::median;

type StoreListener = Box<dyn FnMut(&StoreEvent, &RecordStore)>;

#[derive(Default)]
pub struct RecordStore {
    list: Vec<VideoRecord>,
    by_id: HashMap<VideoId, usize>,
    listeners: Vec<(SubscriptionId, StoreListener)>,
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("list", &self.list)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener, called after every mutation in subscription order.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent, &RecordStore) + 'static,
    {
        let id = SubscriptionId::new();
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, event: StoreEvent) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for (_, listener) in listeners.iter_mut() {
            listener(&event, self);
        }
        self.listeners = listeners;
    }

    /// Insert an unseen video at the end of the listing, or merge the draft
    /// into the existing record with the same id. Returns the record's position.
    pub fn upsert(&mut self, draft: VideoDraft) -> usize {
        if let Some(&index) = self.by_id.get(&draft.id) {
            let record = &mut self.list[index];
            record.merge_draft(draft);
            let id = record.id.clone();
            self.notify(StoreEvent::Merged { id });
            return index;
        }

        let position = self.list.len();
        let record = VideoRecord::from_draft(draft, position);
        let id = record.id.clone();
        self.by_id.insert(id.clone(), position);
        self.list.push(record);
        self.notify(StoreEvent::Inserted { id, position });
        position
    }

    /// Merge `patch` into the record with `id`. Returns `false` when the id is
    /// unknown, in which case nothing happens.
    ///
    /// Score patches that are not finite, are negative, or target a record
    /// without a known view count are dropped. A requested status is checked
    /// after the view count and score are applied, and dropped when the
    /// record's state does not support it.
    pub fn update(&mut self, id: &str, patch: VideoPatch) -> bool {
        let Some(&index) = self.by_id.get(id) else {
            return false;
        };
        let record = &mut self.list[index];

        if let Some(title) = patch.title {
            record.title = title;
        }
        if let Some(view_count) = patch.view_count {
            record.set_view_count(view_count);
        }
        match patch.score {
            Some(Some(score)) if !score.is_finite() || score < 0.0 => {
                warn!("Rejected invalid score {score} for {id}");
            }
            Some(Some(_)) if !record.is_valid() => {
                warn!("Rejected score for {id}: view count unavailable");
            }
            Some(Some(score)) => {
                record.score = Some(score);
                if record.status != VideoStatus::Injected {
                    record.status = VideoStatus::Scored;
                }
            }
            Some(None) => {
                record.score = None;
                if record.is_valid() {
                    record.status = VideoStatus::Parsed;
                }
            }
            None => {}
        }
        match patch.status {
            Some(status) if !record.admits_status(status) => {
                warn!(
                    "Rejected status {} for {id}: views {:?}, score {:?}",
                    status.as_str(),
                    record.views(),
                    record.score
                );
            }
            Some(status) => record.status = status,
            None => {}
        }

        let id = record.id.clone();
        self.notify(StoreEvent::Updated { id });
        true
    }

    pub fn get_by_id(&self, id: &str) -> Option<&VideoRecord> {
        self.by_id.get(id).map(|&index| &self.list[index])
    }

    pub fn get_at(&self, position: usize) -> Option<&VideoRecord> {
        self.list.get(position)
    }

    /// The listing in display order. The slice borrows the store, so it cannot
    /// outlive the next mutation.
    pub fn get_all(&self) -> &[VideoRecord] {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Number of records with a known view count.
    pub fn valid_count(&self) -> usize {
        self.list.iter().filter(|r| r.is_valid()).count()
    }

    /// Drop every record. Used when the channel context changes; subscribers
    /// stay registered.
    pub fn clear(&mut self) {
        debug!("Clearing store ({} records)", self.list.len());
        self.list.clear();
        self.by_id.clear();
        self.notify(StoreEvent::Cleared);
    }

    /// Full re-index: the listing becomes `drafts` in the given order with
    /// positions reassigned from zero. Records that were already known keep
    /// their score, status and first-seen time; a repeated id is merged into
    /// its first occurrence.
    pub fn replace_list(&mut self, drafts: Vec<VideoDraft>) {
        let mut previous: HashMap<VideoId, VideoRecord> = self
            .list
            .drain(..)
            .map(|record| (record.id.clone(), record))
            .collect();
        self.by_id.clear();

        for draft in drafts {
            if let Some(&index) = self.by_id.get(&draft.id) {
                self.list[index].merge_draft(draft);
                continue;
            }

            let position = self.list.len();
            let record = match previous.remove(&draft.id) {
                Some(mut record) => {
                    record.position = position;
                    record.merge_draft(draft);
                    record
                }
                None => VideoRecord::from_draft(draft, position),
            };
            self.by_id.insert(record.id.clone(), position);
            self.list.push(record);
        }

        let len = self.list.len();
        self.notify(StoreEvent::Reindexed { len });
    }

    /// Median of all strictly positive scores, or `0.0` when there are none.
    ///
    /// Consumers multiply this by a filter factor, so a zero or negative base
    /// is never reported.
    pub fn median_score(&self) -> f64 {
        let scores: Vec<f64> = self
            .list
            .iter()
            .filter_map(|r| r.score)
            .filter(|score| *score > 0.0)
            .collect();

        median(&scores).unwrap_or(0.0)
    }
}
