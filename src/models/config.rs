use super::Platform;
use crate::constants::{
    BUSINESS_FILE, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, GEMINI_TIMEOUT_SECS,
};
use crate::utils::{get_dataset_dir, non_empty_env};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Location of the four input tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetConfig {
    /// Directory holding Facebook.csv, Google.csv, TikTok.csv and business.csv
    pub dir: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            dir: get_dataset_dir(),
        }
    }
}

impl DatasetConfig {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Use `dir` when given, otherwise `DATASET_DIR` / `dataset`
    pub fn resolve(dir: Option<PathBuf>) -> Self {
        dir.map(Self::new).unwrap_or_default()
    }

    pub fn platform_path(&self, platform: Platform) -> PathBuf {
        self.dir.join(platform.file_name())
    }

    pub fn business_path(&self) -> PathBuf {
        self.dir.join(BUSINESS_FILE)
    }
}

/// Settings for the external text service
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// `None` leaves the assistant unavailable
    pub api_key: Option<String>,

    /// Generative model name (e.g., "gemini-2.5-flash")
    pub model: String,

    /// API base URL without trailing slash
    pub base_url: String,

    pub timeout: Duration,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout: Duration::from_secs(GEMINI_TIMEOUT_SECS),
        }
    }
}

impl AssistantConfig {
    /// Read `GEMINI_API_KEY`, `GEMINI_MODEL` and `GEMINI_BASE_URL`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: non_empty_env("GEMINI_API_KEY"),
            model: non_empty_env("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: non_empty_env("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            timeout: defaults.timeout,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
