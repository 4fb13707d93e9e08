//! Advertising platform a marketing row originates from
//!
//! Each platform has its own source table; the label is attached to every
//! row before the three tables are combined.
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// Data source: Facebook.csv
    #[serde(alias = "facebook", alias = "meta")]
    Facebook,

    /// Data source: Google.csv
    #[serde(alias = "google")]
    Google,

    /// Data source: TikTok.csv
    #[serde(rename = "TikTok", alias = "tiktok")]
    TikTok,
}

impl Platform {
    /// All platforms in load order
    pub fn all() -> [Platform; 3] {
        [Platform::Facebook, Platform::Google, Platform::TikTok]
    }

    /// Get the source file name for this platform
    pub fn file_name(&self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook.csv",
            Platform::Google => "Google.csv",
            Platform::TikTok => "TikTok.csv",
        }
    }

    /// Convert to the label stored in the `platform` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Google => "Google",
            Platform::TikTok => "TikTok",
        }
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "facebook" | "meta" => Ok(Platform::Facebook),
            "google" => Ok(Platform::Google),
            "tiktok" => Ok(Platform::TikTok),
            _ => Err(format!(
                "Invalid platform: '{}'. Valid values: facebook, google, tiktok",
                s
            )),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
