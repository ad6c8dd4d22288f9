pub mod alerts;
pub mod series;

pub use alerts::{
    AlertEvaluator, AlertOutcome, AlertState, DEFAULT_COOLDOWN, Evaluation, evaluate,
};
pub use series::{MIN_EMA_SPAN, downsample, nearest_by_index, nearest_by_timestamp, smooth};
