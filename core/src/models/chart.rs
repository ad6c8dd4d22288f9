use std::fmt;

use serde::{Deserialize, Serialize};

/// Display ranges offered by the price chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartRange {
    #[serde(rename = "1D")]
    Day,
    #[serde(rename = "7D")]
    Week,
    #[serde(rename = "1M")]
    Month,
    #[serde(rename = "1Y")]
    Year,
    #[serde(rename = "ALL")]
    All,
}

impl ChartRange {
    pub const ALL_RANGES: [ChartRange; 5] = [
        ChartRange::Day,
        ChartRange::Week,
        ChartRange::Month,
        ChartRange::Year,
        ChartRange::All,
    ];

    /// Number of points kept after downsampling.
    pub fn target_points(self) -> usize {
        match self {
            ChartRange::Day => 96,
            ChartRange::Week => 168,
            ChartRange::Month => 180,
            ChartRange::Year => 365,
            ChartRange::All => 500,
        }
    }

    /// Sampling interval requested from the chart provider.
    pub fn interval_hint(self) -> &'static str {
        match self {
            ChartRange::Day => "15m",
            ChartRange::Week => "1h",
            ChartRange::Month => "4h",
            ChartRange::Year => "1d",
            ChartRange::All => "7d",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChartRange::Day => "1D",
            ChartRange::Week => "7D",
            ChartRange::Month => "1M",
            ChartRange::Year => "1Y",
            ChartRange::All => "ALL",
        }
    }
}

impl fmt::Display for ChartRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
