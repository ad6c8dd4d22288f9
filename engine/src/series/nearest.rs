//! Cursor lookups for interactive charts.

use corelib::PriceDataPoint;

/// Returns the sample closest in time to `target_ms`.
///
/// The series must be sorted ascending by timestamp. Exact matches win (the
/// first one among duplicates); otherwise the closer of the two straddling
/// neighbours is returned, ties going to the earlier one. Targets outside the
/// series clamp to the first or last sample.
pub fn nearest_by_timestamp(
    series: &[PriceDataPoint],
    target_ms: i64,
) -> Option<&PriceDataPoint> {
    match series.len() {
        0 => return None,
        1 => return series.first(),
        _ => {}
    }

    let idx = series.partition_point(|p| p.timestamp_ms < target_ms);

    if idx == 0 {
        return series.first();
    }
    if idx == series.len() {
        return series.last();
    }

    let upper = &series[idx];
    if upper.timestamp_ms == target_ms {
        return Some(upper);
    }

    let lower = &series[idx - 1];
    if target_ms.abs_diff(lower.timestamp_ms) <= upper.timestamp_ms.abs_diff(target_ms) {
        Some(lower)
    } else {
        Some(upper)
    }
}

/// Maps a normalized position in `[0, 1]` onto the series index range.
///
/// The scaled index is truncated toward zero and clamped into range, so values
/// outside `[0, 1]` (and NaN) land on an end point.
pub fn nearest_by_index(series: &[PriceDataPoint], position: f64) -> Option<&PriceDataPoint> {
    if series.is_empty() {
        return None;
    }

    let last = series.len() - 1;
    // Float-to-int `as` truncates, saturates negatives to 0 and maps NaN to 0.
    let idx = (position * last as f64) as usize;
    series.get(idx.min(last))
}
