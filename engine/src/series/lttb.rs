//! Largest-Triangle-Three-Buckets downsampling.
//!
//! Keeps the first and last samples, splits the interior into equal-width
//! buckets and from each bucket keeps the sample that spans the largest
//! triangle with the previously kept sample and the average of the next
//! bucket. Peaks and troughs survive, flat stretches collapse.

use corelib::PriceDataPoint;

/// Downsamples `series` to exactly `target` points.
///
/// Returns the input unchanged when `series.len() <= target` or `target < 3`
/// (first and last points are always reserved, so fewer than three output
/// points leaves no room for a bucket).
pub fn downsample(series: &[PriceDataPoint], target: usize) -> Vec<PriceDataPoint> {
    let len = series.len();
    if len <= target || target < 3 {
        return series.to_vec();
    }

    let buckets = target - 2;
    let width = (len - 2) as f64 / buckets as f64;

    let mut out = Vec::with_capacity(target);
    out.push(series[0]);

    let mut prev = series[0];

    for i in 1..=buckets {
        let (start, end) = bucket_bounds(i, width, buckets, len);

        let (avg_ts, avg_price) = if i == buckets {
            let last = series[len - 1];
            (last.timestamp_ms as f64, last.price)
        } else {
            let (next_start, next_end) = bucket_bounds(i + 1, width, buckets, len);
            mean(&series[next_start..next_end]).unwrap_or_else(|| {
                let last = series[len - 1];
                (last.timestamp_ms as f64, last.price)
            })
        };

        let prev_ts = prev.timestamp_ms as f64;
        let mut best_idx = start;
        let mut best_area = -1.0_f64;

        for (j, p) in series.iter().enumerate().take(end).skip(start) {
            let area = 0.5
                * ((prev_ts - avg_ts) * (p.price - prev.price)
                    - (prev_ts - p.timestamp_ms as f64) * (avg_price - prev.price))
                    .abs();

            // Strict comparison: ties keep the earliest index.
            if area > best_area {
                best_area = area;
                best_idx = j;
            }
        }

        prev = series[best_idx];
        out.push(prev);
    }

    out.push(series[len - 1]);
    out
}

/// Half-open source index range `[start, end)` of interior bucket `i` (1-based).
fn bucket_bounds(i: usize, width: f64, buckets: usize, len: usize) -> (usize, usize) {
    let start = ((i - 1) as f64 * width).floor() as usize + 1;
    let end = if i == buckets {
        // Pin the final bucket so float rounding never drops the last interior sample.
        len - 1
    } else {
        ((i as f64 * width).floor() as usize + 1).min(len - 1)
    };
    (start.min(len - 2), end.max(start + 1).min(len - 1))
}

fn mean(points: &[PriceDataPoint]) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (ts_sum, price_sum) = points.iter().fold((0.0, 0.0), |(ts, px), p| {
        (ts + p.timestamp_ms as f64, px + p.price)
    });
    Some((ts_sum / n, price_sum / n))
}
