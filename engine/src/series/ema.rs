// Exponential moving average over chart prices
use corelib::PriceDataPoint;

/// Smallest span accepted by [`smooth`]; a span of 0 is clamped up to this.
/// With span 1, alpha is 1.0 and the output equals the input.
pub const MIN_EMA_SPAN: usize = 1;

/// Smooths prices with an EMA seeded on the first sample.
///
/// `alpha = 2 / (span + 1)`. Timestamps pass through unchanged and the output
/// has the same length as the input.
pub fn smooth(series: &[PriceDataPoint], span: usize) -> Vec<PriceDataPoint> {
    if series.len() <= 1 {
        return series.to_vec();
    }

    let span = span.max(MIN_EMA_SPAN);
    let alpha = 2.0 / (span as f64 + 1.0);

    let mut out = Vec::with_capacity(series.len());
    let mut previous = series[0].price;
    out.push(series[0]);

    for p in &series[1..] {
        let ema = alpha * p.price + (1.0 - alpha) * previous;
        out.push(PriceDataPoint::new(p.timestamp_ms, ema));
        previous = ema;
    }

    out
}
