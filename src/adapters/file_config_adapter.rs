//! INI file configuration adapter.
//!
//! When no file is given, `DBSMONITOR_*` environment variables stand in
//! for the INI keys (see [`ENV_KEYS`]).

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

/// Environment variable -> (section, key).
pub const ENV_KEYS: [(&str, &str, &str); 12] = [
    ("DBSMONITOR_DATA_DIR", "data", "dir"),
    ("DBSMONITOR_WEEKS", "data", "weeks"),
    ("DBSMONITOR_SECTOR", "symbols", "sector"),
    ("DBSMONITOR_MARKET", "symbols", "market"),
    ("DBSMONITOR_REFERENCE", "symbols", "reference"),
    ("DBSMONITOR_ROC_PERIOD", "indicator", "roc_period"),
    ("DBSMONITOR_DBS_PERIOD", "indicator", "dbs_period"),
    ("DBSMONITOR_DBS_LIMIT", "indicator", "dbs_limit"),
    ("DBSMONITOR_CHART_URL", "alert", "chart_url"),
    ("DBSMONITOR_REPO_URL", "alert", "repo_url"),
    ("DBSMONITOR_OUTBOX", "notify", "outbox"),
    ("DBSMONITOR_CHART", "chart", "path"),
];

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    /// Build from `(name, value)` pairs, keeping only names in [`ENV_KEYS`].
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = Ini::new();
        for (name, value) in vars {
            if let Some((_, section, key)) = ENV_KEYS.iter().find(|(n, _, _)| *n == name) {
                config.set(section, key, Some(value));
            }
        }
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}
