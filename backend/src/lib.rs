pub mod alerts;
pub mod chart;
pub mod config;
pub mod db;
pub mod feed;
pub mod metrics;
pub mod price_cache;

pub mod error;
pub mod logger;
pub mod time;
