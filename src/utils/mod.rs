pub mod number;

pub use number::{format_count, format_score, median, median_u64};
