use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{VideoId, VideoStatus};
use crate::ranking::{filter_threshold, FilterMultiplier, ScoreTier};
use crate::store::RecordStore;
use crate::utils::{format_count, format_score, median_u64};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotVideo {
    pub id: VideoId,
    pub url: String,
    pub title: String,
    /// `null` when the platform hides the count.
    pub views: Option<u64>,
    /// `null` when the video could not be evaluated.
    pub score: Option<f64>,
    pub status: VideoStatus,
    /// Badge text such as `2.8x`.
    pub badge: Option<String>,
    pub tier: Option<ScoreTier>,
    /// Abbreviated count such as `1.2K`.
    pub views_label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    pub total_videos: usize,
    pub videos_with_scores: usize,
    /// Median of the strictly positive view counts, `0.0` when there are none.
    pub median_views: f64,
}

impl ChannelStats {
    pub fn from_store(store: &RecordStore) -> Self {
        let records = store.get_all();
        let positive_views: Vec<u64> = records
            .iter()
            .filter_map(|r| r.views())
            .filter(|views| *views > 0)
            .collect();

        Self {
            total_videos: records.len(),
            videos_with_scores: records.iter().filter(|r| r.score.is_some()).count(),
            median_views: median_u64(&positive_views).unwrap_or(0.0),
        }
    }
}

/// Everything an outside consumer needs to render the scored listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnapshot {
    pub videos: Vec<SnapshotVideo>,
    pub median_score: f64,
    pub filter: Option<FilterMultiplier>,
    /// Absolute cutoff for `filter`, when one applies.
    pub threshold: Option<f64>,
    pub stats: ChannelStats,
}

impl ChannelSnapshot {
    pub fn capture(store: &RecordStore, filter: Option<FilterMultiplier>) -> Self {
        let videos = store
            .get_all()
            .iter()
            .map(|r| SnapshotVideo {
                id: r.id.clone(),
                url: r.url.clone(),
                title: r.title.clone(),
                views: r.views(),
                score: r.score,
                status: r.status,
                badge: r.score.map(format_score),
                tier: r.score.map(ScoreTier::from_score),
                views_label: r.views().map(format_count),
            })
            .collect();

        Self {
            videos,
            median_score: store.median_score(),
            filter,
            threshold: filter.and_then(|multiplier| filter_threshold(store, multiplier)),
            stats: ChannelStats::from_store(store),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("failed to serialize channel snapshot")
    }
}
