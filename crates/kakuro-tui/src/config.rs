use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persisted user preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Endpoint of the solver service
    pub solver_url: String,
    /// Theme name (see `Theme::from_name`)
    pub theme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            solver_url: "http://127.0.0.1:8000/solve".to_string(),
            theme: "dark".to_string(),
        }
    }
}

impl Config {
    fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kakuro").join("config.json"))
    }

    /// Load the saved config, falling back to defaults on any problem
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    /// Best-effort save; the app keeps running if the disk says no
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            return;
        };
        if let Some(dir) = path.parent() {
            if fs::create_dir_all(dir).is_err() {
                return;
            }
        }
        if let Ok(json) = serde_json::to_string_pretty(self) {
            let _ = fs::write(path, json);
        }
    }
}
