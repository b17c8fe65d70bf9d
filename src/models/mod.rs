pub mod video;

pub use video::{VideoDraft, VideoFlags, VideoId, VideoPatch, VideoRecord, VideoStatus, ViewCount};
