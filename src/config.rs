use serde::Deserialize;
use std::{fs, io, path::PathBuf};

const DEFAULT_STORE_PATH: &str = "light_results.csv";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the comparison results are appended.
    pub store_path: PathBuf,
    /// When set, the electricity rate prompt is skipped and this rate is used
    /// for every record in the run.
    pub default_rate_per_kwh: Option<f64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            default_rate_per_kwh: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the file named by LUMEN_COMPARE_CONFIG
    /// (default "lumen-compare.toml"). A missing file falls back to the
    /// built-in defaults so the tool runs with zero setup.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path =
            env::var("LUMEN_COMPARE_CONFIG").unwrap_or_else(|_| "lumen-compare.toml".to_string());
        Self::from_file(&path)
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}
