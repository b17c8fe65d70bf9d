use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform video identifier. Stable across re-observation of the same card.
pub type VideoId = String;

/// A view count as reported by the listing.
///
/// `Unavailable` covers members-only, scheduled and premiere content where the
/// platform hides the count. It is distinct from `Known(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum ViewCount {
    Known(u64),
    Unavailable,
}

impl ViewCount {
    pub fn known(&self) -> Option<u64> {
        match self {
            ViewCount::Known(views) => Some(*views),
            ViewCount::Unavailable => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, ViewCount::Known(_))
    }
}

impl From<Option<u64>> for ViewCount {
    fn from(value: Option<u64>) -> Self {
        match value {
            Some(views) => ViewCount::Known(views),
            None => ViewCount::Unavailable,
        }
    }
}

impl From<ViewCount> for Option<u64> {
    fn from(value: ViewCount) -> Self {
        value.known()
    }
}

/// Where a record is in its lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    /// Observed, view count not available.
    New,
    /// View count known, no score yet.
    Parsed,
    /// At least one scoring pass produced a score.
    Scored,
    /// A consumer has rendered the score.
    Injected,
}

impl VideoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::New => "new",
            VideoStatus::Parsed => "parsed",
            VideoStatus::Scored => "scored",
            VideoStatus::Injected => "injected",
        }
    }

    /// Initial status for a freshly observed record.
    pub fn for_views(view_count: ViewCount) -> Self {
        if view_count.is_known() {
            VideoStatus::Parsed
        } else {
            VideoStatus::New
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoFlags {
    pub member_only: bool,
    pub live: bool,
    pub scheduled: bool,
}

/// One entry per video observed on a channel listing.
///
/// Records are owned by [`crate::store::RecordStore`]; `position` and
/// `first_seen_at` are assigned there and never change except through a full
/// re-index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: VideoId,
    pub url: String,
    pub title: String,
    pub position: usize,
    pub view_count: ViewCount,
    pub score: Option<f64>,
    pub status: VideoStatus,
    pub flags: VideoFlags,
    pub first_seen_at: DateTime<Utc>,
}

impl VideoRecord {
    pub(crate) fn from_draft(draft: VideoDraft, position: usize) -> Self {
        Self {
            status: VideoStatus::for_views(draft.view_count),
            id: draft.id,
            url: draft.url,
            title: draft.title,
            position,
            view_count: draft.view_count,
            score: None,
            flags: draft.flags,
            first_seen_at: Utc::now(),
        }
    }

    /// Merge the fields an upsert carries. Identity and position stay put.
    pub(crate) fn merge_draft(&mut self, draft: VideoDraft) {
        self.url = draft.url;
        self.title = draft.title;
        self.flags = draft.flags;
        self.set_view_count(draft.view_count);
    }

    pub(crate) fn set_view_count(&mut self, view_count: ViewCount) {
        self.view_count = view_count;
        match view_count {
            ViewCount::Unavailable => {
                // A score can never outlive the count it was derived from.
                self.score = None;
                self.status = VideoStatus::New;
            }
            ViewCount::Known(_) => {
                if self.status == VideoStatus::New {
                    self.status = VideoStatus::Parsed;
                }
            }
        }
    }

    pub fn views(&self) -> Option<u64> {
        self.view_count.known()
    }

    pub fn is_valid(&self) -> bool {
        self.view_count.is_known()
    }

    /// Whether `status` is consistent with the record's views and score.
    pub fn admits_status(&self, status: VideoStatus) -> bool {
        match status {
            VideoStatus::New => !self.is_valid(),
            VideoStatus::Parsed => self.is_valid(),
            VideoStatus::Scored | VideoStatus::Injected => {
                self.is_valid() && self.score.is_some()
            }
        }
    }
}

/// The fields an ingestion collaborator supplies for one observed video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoDraft {
    pub id: VideoId,
    pub url: String,
    pub title: String,
    pub view_count: ViewCount,
    pub flags: VideoFlags,
}

impl VideoDraft {
    pub fn new(id: impl Into<VideoId>, view_count: ViewCount) -> Self {
        let id = id.into();
        Self {
            url: format!("https://www.youtube.com/watch?v={id}"),
            title: String::new(),
            id,
            view_count,
            flags: VideoFlags::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_flags(mut self, flags: VideoFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Partial update applied through [`crate::store::RecordStore::update`].
///
/// `score: Some(None)` clears a score; `score: None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoPatch {
    pub title: Option<String>,
    pub view_count: Option<ViewCount>,
    pub score: Option<Option<f64>>,
    pub status: Option<VideoStatus>,
}

impl VideoPatch {
    pub fn score(score: f64) -> Self {
        Self {
            score: Some(Some(score)),
            ..Self::default()
        }
    }

    pub fn clear_score() -> Self {
        Self {
            score: Some(None),
            ..Self::default()
        }
    }

    pub fn status(status: VideoStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn view_count(view_count: ViewCount) -> Self {
        Self {
            view_count: Some(view_count),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_count_serializes_as_nullable_integer() {
        assert_eq!(serde_json::to_string(&ViewCount::Known(0)).unwrap(), "0");
        assert_eq!(serde_json::to_string(&ViewCount::Unavailable).unwrap(), "null");
        let parsed: ViewCount = serde_json::from_str("1200").unwrap();
        assert_eq!(parsed, ViewCount::Known(1200));
    }

    #[test]
    fn unavailable_views_drop_score_and_reset_status() {
        let mut record = VideoRecord::from_draft(VideoDraft::new("a", ViewCount::Known(10)), 0);
        record.score = Some(1.5);
        record.status = VideoStatus::Scored;

        record.set_view_count(ViewCount::Unavailable);

        assert_eq!(record.score, None);
        assert_eq!(record.status, VideoStatus::New);
    }

    #[test]
    fn parsed_views_promote_new_records() {
        let mut record = VideoRecord::from_draft(VideoDraft::new("a", ViewCount::Unavailable), 3);
        assert_eq!(record.status, VideoStatus::New);

        record.set_view_count(ViewCount::Known(0));

        assert_eq!(record.status, VideoStatus::Parsed);
        assert_eq!(record.position, 3);
    }

    #[test]
    fn admitted_status_tracks_views_and_score() {
        let mut record = VideoRecord::from_draft(VideoDraft::new("a", ViewCount::Known(10)), 0);
        assert!(record.admits_status(VideoStatus::Parsed));
        assert!(!record.admits_status(VideoStatus::New));
        assert!(!record.admits_status(VideoStatus::Scored));

        record.score = Some(2.0);
        assert!(record.admits_status(VideoStatus::Injected));

        record.set_view_count(ViewCount::Unavailable);
        assert!(record.admits_status(VideoStatus::New));
        assert!(!record.admits_status(VideoStatus::Injected));
        assert_eq!(record.status.as_str(), "new");
    }
}
