pub mod models;

pub use models::alert::{AlertCondition, AlertValidationError, PriceAlert};
pub use models::chart::ChartRange;
pub use models::currency::{CURRENCY_TABLE, Currency, CurrencyInfo};
pub use models::price::{CurrencySnapshot, PriceDataPoint, PriceSnapshot};
