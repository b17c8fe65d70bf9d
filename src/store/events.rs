use serde::Serialize;
use uuid::Uuid;

use crate::models::VideoId;

/// What changed in the store. Delivered after the change is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StoreEvent {
    Inserted { id: VideoId, position: usize },
    Merged { id: VideoId },
    Updated { id: VideoId },
    Cleared,
    Reindexed { len: usize },
}

/// Handle returned by [`super::RecordStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub(super) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}
