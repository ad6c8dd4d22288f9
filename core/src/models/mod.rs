pub mod alert;
pub mod chart;
pub mod currency;
pub mod price;
