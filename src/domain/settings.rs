use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8002";
/// Overrides the persisted base URL when set (also read from `.env`).
pub const API_BASE_URL_ENV: &str = "KPI_API_BASE_URL";
pub const DEFAULT_REFRESH_SECS: u64 = 60;

/// Where the dashboard takes its numbers from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Built-in sample values, no network.
    #[default]
    Sample,
    /// The KPI service at `api_base_url`.
    Service,
}

impl DataSource {
    pub fn label(&self) -> &'static str {
        match self {
            DataSource::Sample => "Sample data",
            DataSource::Service => "KPI service",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardSettings {
    #[serde(default = "default_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub data_source: DataSource,
    /// Seconds between automatic refreshes; 0 disables them.
    #[serde(default = "default_refresh_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default)]
    pub default_expanded: bool,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_refresh_secs() -> u64 {
    DEFAULT_REFRESH_SECS
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_base_url(),
            data_source: DataSource::default(),
            refresh_interval_secs: DEFAULT_REFRESH_SECS,
            default_expanded: false,
        }
    }
}

impl DashboardSettings {
    /// Applies an environment override for the base URL, ignoring blanks.
    pub fn with_env_override(mut self, env_base_url: Option<String>) -> Self {
        if let Some(url) = env_base_url.map(|v| v.trim().to_string()) {
            if !url.is_empty() {
                self.api_base_url = url;
            }
        }
        self
    }

    pub fn with_process_env(self) -> Self {
        self.with_env_override(std::env::var(API_BASE_URL_ENV).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let settings: DashboardSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, DashboardSettings::default());
        assert_eq!(settings.api_base_url, "http://localhost:8002");
        assert_eq!(settings.data_source, DataSource::Sample);
    }

    #[test]
    fn test_data_source_wire_name() {
        let settings: DashboardSettings =
            serde_json::from_str(r#"{"data_source": "service", "refresh_interval_secs": 0}"#)
                .unwrap();
        assert_eq!(settings.data_source, DataSource::Service);
        assert_eq!(settings.refresh_interval_secs, 0);
    }

    #[test]
    fn test_env_override() {
        let base = DashboardSettings::default();
        let overridden = base
            .clone()
            .with_env_override(Some(" http://kpis.internal:9000 ".to_string()));
        assert_eq!(overridden.api_base_url, "http://kpis.internal:9000");

        assert_eq!(base.clone().with_env_override(Some("  ".to_string())), base);
        assert_eq!(base.clone().with_env_override(None), base);
    }
}
