//! Time-series compression for charts.
//!
//! Everything here is pure: no I/O, no shared state, callable from any thread.
//! Input series are expected to be sorted by timestamp (non-decreasing).

pub mod ema;
pub mod lttb;
pub mod nearest;

pub use ema::{MIN_EMA_SPAN, smooth};
pub use lttb::downsample;
pub use nearest::{nearest_by_index, nearest_by_timestamp};
