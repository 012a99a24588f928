pub mod kpi_card;
pub mod toast;
pub mod trend_strip;

pub use kpi_card::KpiCard;
