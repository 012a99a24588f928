//! Pure KPI logic: records, formatting, card state and presentation rules.

pub mod app_state;
pub mod card_state;
pub mod format;
pub mod kpi;
pub mod presentation;
pub mod settings;
pub mod trend;

pub use app_state::{DashboardState, RefreshCounter};
pub use card_state::{CardState, MeasureTrigger};
pub use format::Formatter;
pub use kpi::{
    DailyPnLData, DrawdownData, EquityData, KpiData, KpiSnapshot, KpiVariant, PeriodPnLData,
};
pub use settings::{DashboardSettings, DataSource};
