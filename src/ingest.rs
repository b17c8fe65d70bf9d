use log::info;

use crate::models::{VideoDraft, VideoFlags, VideoId, ViewCount};
use crate::scoring::{calculate_all_scores, ScoringConfig};
use crate::store::RecordStore;

/// Turns the count text shown on a card ("1.2K views", "Scheduled", ...) into
/// a [`ViewCount`]. Hidden or not-yet-available counts must map to
/// `ViewCount::Unavailable`, never to `Known(0)`.
pub trait ViewCountNormalizer {
    fn normalize(&self, raw: &str) -> ViewCount;
}

impl<F> ViewCountNormalizer for F
where
    F: Fn(&str) -> ViewCount,
{
    fn normalize(&self, raw: &str) -> ViewCount {
        self(raw)
    }
}

/// One card as handed over by the page scraper, in display order.
#[derive(Debug, Clone, Default)]
pub struct Observation {
    pub id: VideoId,
    pub url: String,
    pub title: String,
    pub views_text: Option<String>,
    pub flags: VideoFlags,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestSummary {
    pub added: usize,
    pub skipped: usize,
    pub total: usize,
    pub scored: usize,
    pub median_score: f64,
}

/// Add every previously unseen observation to the end of the listing and,
/// when anything was added, rescore the whole store.
///
/// Observations whose id is already stored are skipped, as are repeated ids
/// within the batch. A card without any count text is treated as unavailable.
pub fn ingest_batch<N>(
    store: &mut RecordStore,
    observations: impl IntoIterator<Item = Observation>,
    normalizer: &N,
    config: &ScoringConfig,
) -> IngestSummary
where
    N: ViewCountNormalizer + ?Sized,
{
    let mut summary = IngestSummary::default();

    for observation in observations {
        if store.get_by_id(&observation.id).is_some() {
            summary.skipped += 1;
            continue;
        }

        let view_count = observation
            .views_text
            .as_deref()
            .map(|raw| normalizer.normalize(raw))
            .unwrap_or(ViewCount::Unavailable);

        let draft = VideoDraft {
            id: observation.id,
            url: observation.url,
            title: observation.title,
            view_count,
            flags: observation.flags,
        };
        store.upsert(draft);
        summary.added += 1;
    }

    summary.total = store.len();
    if summary.added == 0 {
        summary.median_score = store.median_score();
        return summary;
    }

    info!("Added {} new videos to store", summary.added);
    calculate_all_scores(store, config);

    summary.scored = store.get_all().iter().filter(|r| r.score.is_some()).count();
    summary.median_score = store.median_score();
    info!(
        "Processed: {} total videos | {} scored | Median: {:.2}x",
        summary.total, summary.scored, summary.median_score
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VideoStatus;

    fn digits(raw: &str) -> ViewCount {
        raw.trim_end_matches(" views")
            .parse::<u64>()
            .map(ViewCount::Known)
            .unwrap_or(ViewCount::Unavailable)
    }

    fn card(id: &str, views: Option<&str>) -> Observation {
        Observation {
            id: id.to_string(),
            url: format!("https://www.youtube.com/watch?v={id}"),
            title: format!("Video {id}"),
            views_text: views.map(str::to_string),
            flags: VideoFlags::default(),
        }
    }

    #[test]
    fn new_cards_are_appended_and_scored() {
        let mut store = RecordStore::new();
        let batch = vec![
            card("a", Some("1000 views")),
            card("b", Some("2000 views")),
            card("c", Some("Scheduled")),
            card("d", Some("1000 views")),
        ];

        let summary = ingest_batch(&mut store, batch, &digits, &ScoringConfig::default());

        assert_eq!(summary.added, 4);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.scored, 3);
        assert_eq!(store.get_by_id("b").unwrap().score, Some(2.0));
        let hidden = store.get_by_id("c").unwrap();
        assert_eq!(hidden.view_count, ViewCount::Unavailable);
        assert_eq!(hidden.status, VideoStatus::New);
        assert_eq!(hidden.position, 2);
    }

    #[test]
    fn known_cards_are_skipped() {
        let mut store = RecordStore::new();
        ingest_batch(
            &mut store,
            vec![card("a", Some("10")), card("b", Some("10"))],
            &digits,
            &ScoringConfig::default(),
        );

        let summary = ingest_batch(
            &mut store,
            vec![card("a", Some("999")), card("c", None), card("c", Some("5"))],
            &digits,
            &ScoringConfig::default(),
        );

        assert_eq!(summary.added, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(store.get_by_id("a").unwrap().views(), Some(10));
        assert_eq!(store.get_by_id("c").unwrap().view_count, ViewCount::Unavailable);
    }

    #[test]
    fn empty_batch_does_not_rescore() {
        let mut store = RecordStore::new();
        let summary = ingest_batch(&mut store, Vec::new(), &digits, &ScoringConfig::default());
        assert_eq!(summary, IngestSummary::default());
    }
}
