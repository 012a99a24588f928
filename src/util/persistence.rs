use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde_json::Error as SerdeError;
use tracing::{debug, warn};

use crate::domain::DashboardSettings;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "KpiDashboard";
const APP_NAME: &str = "KpiDashboard";

fn data_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join("settings.json"))
}

/// Persisted settings with the environment override applied.
pub fn load_settings() -> DashboardSettings {
    data_file()
        .and_then(|path| read_settings(&path))
        .unwrap_or_default()
        .with_process_env()
}

pub fn save_settings(settings: &DashboardSettings) -> Result<(), PersistSaveError> {
    let path = data_file().ok_or(PersistSaveError::StorageUnavailable)?;
    write_settings(&path, settings)
}

fn read_settings(path: &Path) -> Option<DashboardSettings> {
    let data = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(settings) => {
            debug!(path = %path.display(), "Loaded dashboard settings");
            Some(settings)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Ignoring unreadable settings file");
            None
        }
    }
}

fn write_settings(path: &Path, settings: &DashboardSettings) -> Result<(), PersistSaveError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum PersistSaveError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DataSource;

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("kpi-dashboard-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_settings_survive_write_and_read() {
        let path = scratch_file("settings.json");
        let settings = DashboardSettings {
            api_base_url: "http://kpis:8002".to_string(),
            data_source: DataSource::Service,
            refresh_interval_secs: 15,
            default_expanded: true,
        };
        write_settings(&path, &settings).unwrap();
        assert_eq!(read_settings(&path), Some(settings));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let path = scratch_file("corrupt.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(read_settings(&path), None);
        fs::remove_file(&path).ok();
    }
}
