pub mod dashboard;
pub mod settings;

pub use dashboard::DashboardPage;
pub use settings::SettingsPage;
