//! Read-side helpers for filtering and sorting scored listings.

use serde::{Deserialize, Serialize};

use crate::models::VideoRecord;
use crate::store::RecordStore;

/// Filter cutoff expressed as a multiple of the median score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FilterMultiplier {
    X2,
    X5,
    X10,
}

impl FilterMultiplier {
    pub const ALL: [FilterMultiplier; 3] =
        [FilterMultiplier::X2, FilterMultiplier::X5, FilterMultiplier::X10];

    pub fn value(&self) -> u8 {
        match self {
            FilterMultiplier::X2 => 2,
            FilterMultiplier::X5 => 5,
            FilterMultiplier::X10 => 10,
        }
    }
}

impl TryFrom<u8> for FilterMultiplier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(FilterMultiplier::X2),
            5 => Ok(FilterMultiplier::X5),
            10 => Ok(FilterMultiplier::X10),
            other => Err(format!("unsupported filter multiplier {other}")),
        }
    }
}

impl From<FilterMultiplier> for u8 {
    fn from(value: FilterMultiplier) -> Self {
        value.value()
    }
}

/// Badge bucket for an absolute score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    Exceptional,
    Excellent,
    Good,
    Below,
}

impl ScoreTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 10.0 {
            ScoreTier::Exceptional
        } else if score >= 5.0 {
            ScoreTier::Excellent
        } else if score >= 2.0 {
            ScoreTier::Good
        } else {
            ScoreTier::Below
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// Absolute cutoff for `multiplier`, or `None` while no positive median
/// score exists.
pub fn filter_threshold(store: &RecordStore, multiplier: FilterMultiplier) -> Option<f64> {
    let median = store.median_score();
    if median <= 0.0 {
        return None;
    }
    Some(median * f64::from(multiplier.value()))
}

/// Records passing the filter, in listing order. Without a multiplier every
/// record passes; with one, only records scoring strictly above the cutoff.
pub fn filter_matches(
    store: &RecordStore,
    multiplier: Option<FilterMultiplier>,
) -> Vec<&VideoRecord> {
    let Some(multiplier) = multiplier else {
        return store.get_all().iter().collect();
    };
    let Some(threshold) = filter_threshold(store, multiplier) else {
        return Vec::new();
    };

    store
        .get_all()
        .iter()
        .filter(|r| r.score.is_some_and(|score| score > threshold))
        .collect()
}

/// Stable sort by score. Unscored records rank below every score.
pub fn sorted_by_score<'a>(
    mut records: Vec<&'a VideoRecord>,
    direction: SortDirection,
) -> Vec<&'a VideoRecord> {
    let key = |r: &VideoRecord| r.score.unwrap_or(f64::NEG_INFINITY);
    records.sort_by(|a, b| {
        let ordering = key(*a).total_cmp(&key(*b));
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    records
}
