use super::MarketingRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical dimension used to slice the marketing table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Platform,
    State,
    Tactic,
    Date,
}

impl Dimension {
    /// Grouping key of a record along this dimension, `None` when the
    /// record has no value for it
    ///
    /// Dates render as `YYYY-MM-DD` so string order is chronological.
    pub fn key(&self, record: &MarketingRecord) -> Option<String> {
        match self {
            Dimension::Platform => Some(record.platform.as_str().to_string()),
            Dimension::State => record.state.clone(),
            Dimension::Tactic => record.tactic.clone(),
            Dimension::Date => Some(record.date.format("%Y-%m-%d").to_string()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Platform => "platform",
            Dimension::State => "state",
            Dimension::Tactic => "tactic",
            Dimension::Date => "date",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
