use crate::models::metrics::{mean_defined, round2, round2_opt, sum_defined};
use crate::models::{Dimension, MarketingRecord, MarketingTable};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Totals and mean ratios for one group of marketing rows
///
/// # Undefined values
/// Sums skip missing raw values (an all-missing group sums to 0).
/// Means average only the defined per-row ratios and are `None` when no
/// row in the group has one. All figures are rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub rows: usize,
    pub spend: f64,
    #[serde(rename = "attributed revenue")]
    pub attributed_revenue: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub roas: Option<f64>,
    pub ctr: Option<f64>,
    pub cpc: Option<f64>,
    pub cpm: Option<f64>,
}

/// Service for grouping the marketing table along a dimension
pub struct Aggregator;

impl Aggregator {
    /// Group rows by `dimension` and aggregate each group
    ///
    /// # Returns
    /// One summary per distinct key, sorted by key; rows with a blank key
    /// are skipped
    pub fn group_by(table: &MarketingTable, dimension: Dimension) -> Vec<GroupSummary> {
        if table.is_empty() {
            return vec![];
        }

        let mut buckets: HashMap<String, Vec<&MarketingRecord>> = HashMap::new();
        // Rows without a key are left out of every group
        for record in table.iter() {
            if let Some(key) = dimension.key(record) {
                buckets.entry(key).or_default().push(record);
            }
        }

        let mut result: Vec<GroupSummary> = buckets
            .into_iter()
            .map(|(key, records)| Self::summarize(key, &records))
            .collect();

        result.sort_by(|a, b| a.key.cmp(&b.key));

        debug!("Grouped {} rows by {} into {} groups", table.len(), dimension, result.len());
        result
    }

    /// Aggregate a slice of rows into one summary
    pub fn summarize(key: String, records: &[&MarketingRecord]) -> GroupSummary {
        GroupSummary {
            key,
            rows: records.len(),
            spend: round2(sum_defined(records.iter().map(|r| r.spend))),
            attributed_revenue: round2(sum_defined(records.iter().map(|r| r.attributed_revenue))),
            impressions: records.iter().filter_map(|r| r.impression).sum(),
            clicks: records.iter().filter_map(|r| r.clicks).sum(),
            roas: round2_opt(mean_defined(records.iter().map(|r| r.roas))),
            ctr: round2_opt(mean_defined(records.iter().map(|r| r.ctr))),
            cpc: round2_opt(mean_defined(records.iter().map(|r| r.cpc))),
            cpm: round2_opt(mean_defined(records.iter().map(|r| r.cpm))),
        }
    }
}

/// Group with the highest value of `metric`, skipping undefined groups
pub fn argmax<F>(groups: &[GroupSummary], metric: F) -> Option<&GroupSummary>
where
    F: Fn(&GroupSummary) -> Option<f64>,
{
    groups
        .iter()
        .filter_map(|g| metric(g).map(|v| (g, v)))
        .fold(None, |best: Option<(&GroupSummary, f64)>, (g, v)| match best {
            Some((_, bv)) if bv >= v => best,
            _ => Some((g, v)),
        })
        .map(|(g, _)| g)
}

/// Group with the lowest value of `metric`, skipping undefined groups
pub fn argmin<F>(groups: &[GroupSummary], metric: F) -> Option<&GroupSummary>
where
    F: Fn(&GroupSummary) -> Option<f64>,
{
    argmax(groups, |g| metric(g).map(|v| -v))
}

/// Mean of a metric across groups, skipping undefined groups
pub fn mean_of<F>(groups: &[GroupSummary], metric: F) -> Option<f64>
where
    F: Fn(&GroupSummary) -> Option<f64>,
{
    mean_defined(groups.iter().map(metric))
}
