/// Median of a set of values: middle element for odd counts, mean of the two
/// middle elements for even counts. `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Median over integer view counts.
pub fn median_u64(values: &[u64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        // Average in f64 so two large counts cannot overflow.
        Some((sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0)
    } else {
        Some(sorted[mid] as f64)
    }
}

/// Badge text for a score, always one decimal digit: `0.3x`, `12.7x`.
pub fn format_score(score: f64) -> String {
    format!("{score:.1}x")
}

/// Abbreviated count: `950`, `1.2K`, `3.4M`, `1.0B`.
pub fn format_count(count: u64) -> String {
    let value = count as f64;
    if count >= 1_000_000_000 {
        format!("{:.1}B", value / 1_000_000_000.0)
    } else if count >= 1_000_000 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        count.to_string()
    }
}
