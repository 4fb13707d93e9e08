use super::metrics::{calculate_cpc, calculate_cpm, calculate_ctr, calculate_roas};
use super::Platform;
use crate::constants::marketing_column;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One campaign-day on one channel
///
/// # Missing values
/// Numeric cells that were empty in the source are `None`. Derived ratios
/// are `None` whenever their denominator is zero or missing; they are never
/// infinite.
///
/// # Rounding
/// `ctr`, `cpc`, `roas` and `cpm` are stored rounded to two decimals
/// (ties to even). Aggregations average these stored values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingRecord {
    /// Calendar day of the campaign activity
    pub date: NaiveDate,

    /// Channel the row was loaded from
    pub platform: Platform,

    /// `None` when the source cell was blank
    pub tactic: Option<String>,

    /// `None` when the source cell was blank
    pub state: Option<String>,

    /// Ad impressions
    pub impression: Option<u64>,

    /// Ad clicks (expected `<= impression`, not enforced)
    pub clicks: Option<u64>,

    /// Spend in currency units
    pub spend: Option<f64>,

    /// Revenue credited to this channel/day
    #[serde(rename = "attributed revenue")]
    pub attributed_revenue: Option<f64>,

    /// Columns outside the required schema, `None` where the source lacked them
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, Option<String>>,

    // Derived metrics
    /// Click-through rate in percent: clicks / impression * 100
    pub ctr: Option<f64>,

    /// Cost per click: spend / clicks
    pub cpc: Option<f64>,

    /// Return on ad spend: attributed revenue / spend
    pub roas: Option<f64>,

    /// Cost per mille: spend / (impression / 1000)
    pub cpm: Option<f64>,
}

impl MarketingRecord {
    /// Create a record with raw fields only; derived metrics start undefined
    ///
    /// A blank `tactic` or `state` is stored as `None`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        platform: Platform,
        tactic: String,
        state: String,
        impression: Option<u64>,
        clicks: Option<u64>,
        spend: Option<f64>,
        attributed_revenue: Option<f64>,
    ) -> Self {
        Self {
            date,
            platform,
            tactic: non_blank(tactic),
            state: non_blank(state),
            impression,
            clicks,
            spend,
            attributed_revenue,
            extras: BTreeMap::new(),
            ctr: None,
            cpc: None,
            roas: None,
            cpm: None,
        }
    }

    /// Calculate and set the derived ratios from this row's raw fields
    pub fn calculate_metrics(&mut self) {
        self.ctr = calculate_ctr(self.clicks, self.impression);
        self.cpc = calculate_cpc(self.spend, self.clicks);
        self.roas = calculate_roas(self.attributed_revenue, self.spend);
        self.cpm = calculate_cpm(self.spend, self.impression);
    }

    /// Value of an extra column, `None` for both "absent" and "empty"
    pub fn extra(&self, column: &str) -> Option<&str> {
        self.extras.get(column).and_then(|v| v.as_deref())
    }
}

/// Unified marketing table: the union of the three channel tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketingTable {
    /// Union of non-required columns across channels, first-seen order
    pub extra_columns: Vec<String>,

    pub records: Vec<MarketingRecord>,
}

impl MarketingTable {
    pub fn new(extra_columns: Vec<String>, records: Vec<MarketingRecord>) -> Self {
        Self {
            extra_columns,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MarketingRecord> {
        self.records.iter()
    }

    /// All column names: raw, platform tag, extras, then derived
    pub fn column_names(&self) -> Vec<String> {
        let mut columns: Vec<String> = marketing_column::REQUIRED
            .iter()
            .map(|c| c.to_string())
            .collect();
        columns.push(marketing_column::PLATFORM.to_string());
        columns.extend(self.extra_columns.iter().cloned());
        columns.extend(["ctr", "cpc", "roas", "cpm"].iter().map(|c| c.to_string()));
        columns
    }

    /// Earliest and latest date, `None` for an empty table
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// Number of rows from the given platform
    pub fn count_platform(&self, platform: Platform) -> usize {
        self.records.iter().filter(|r| r.platform == platform).count()
    }

    /// Distinct platforms in first-seen order
    pub fn platforms(&self) -> Vec<Platform> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.platform)
            .filter(|p| seen.insert(*p))
            .collect()
    }

    /// Distinct non-blank states in first-seen order
    pub fn states(&self) -> Vec<String> {
        distinct(self.records.iter().filter_map(|r| r.state.as_deref()))
    }

    /// Distinct non-blank tactics in first-seen order
    pub fn tactics(&self) -> Vec<String> {
        distinct(self.records.iter().filter_map(|r| r.tactic.as_deref()))
    }
}

impl<'a> IntoIterator for &'a MarketingTable {
    type Item = &'a MarketingRecord;
    type IntoIter = std::slice::Iter<'a, MarketingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn non_blank(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(|v| v.to_string())
        .collect()
}
