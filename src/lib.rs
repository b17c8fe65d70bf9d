//! Outlier scoring for channel video listings.
//!
//! A video's outlier score is its view count divided by the median view count
//! of up to N nearby videos in the same listing. The [`store::RecordStore`]
//! holds one channel's listing, [`scoring`] computes and maintains scores, and
//! [`ranking`] / [`snapshot`] serve consumers that filter or display them.

pub mod ingest;
pub mod models;
pub mod ranking;
pub mod scoring;
pub mod settings;
pub mod snapshot;
pub mod store;
pub mod utils;

pub use ingest::{ingest_batch, IngestSummary, Observation, ViewCountNormalizer};
pub use models::{VideoDraft, VideoFlags, VideoId, VideoPatch, VideoRecord, VideoStatus, ViewCount};
pub use ranking::{FilterMultiplier, ScoreTier, SortDirection};
pub use scoring::{
    calculate_all_scores, calculate_score, median_outlier_score, recompute_affected_scores,
    ScoringConfig,
};
pub use settings::{EngineSettings, SettingsStore};
pub use snapshot::{ChannelSnapshot, ChannelStats};
pub use store::{RecordStore, StoreEvent, SubscriptionId};

/// Install the `env_logger` backend (reads `RUST_LOG`). Safe to call more
/// than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}
