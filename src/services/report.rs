use super::aggregation::{Aggregator, GroupSummary};
use super::filter::Filter;
use super::recommendations::Recommendations;
use super::summary::ExecutiveSummary;
use super::trends::{business_impact, daily_trends, BusinessImpact, DailyTrend};
use crate::models::{BusinessTable, Dimension, MarketingTable};
use serde::Serialize;
use tracing::debug;

/// Everything the presentation layer shows for one selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub filter: Filter,
    pub marketing_rows: usize,
    pub business_rows: usize,
    pub summary: ExecutiveSummary,
    pub channels: Vec<GroupSummary>,
    pub states: Vec<GroupSummary>,
    pub tactics: Vec<GroupSummary>,
    pub trends: Vec<DailyTrend>,
    pub business_impact: Vec<BusinessImpact>,
    pub recommendations: Option<Recommendations>,
}

impl Report {
    /// Filter copies of the tables and compute every view over them
    pub fn build(marketing: &MarketingTable, business: &BusinessTable, filter: &Filter) -> Self {
        let (marketing, business) = filter.apply(marketing, business);
        debug!(
            "Building report over {} marketing and {} business rows",
            marketing.len(),
            business.len()
        );

        let summary = ExecutiveSummary::compute(&marketing, &business);
        let recommendations = Recommendations::compute(&marketing, summary.roas);

        Self {
            filter: filter.clone(),
            marketing_rows: marketing.len(),
            business_rows: business.len(),
            channels: Aggregator::group_by(&marketing, Dimension::Platform),
            states: Aggregator::group_by(&marketing, Dimension::State),
            tactics: Aggregator::group_by(&marketing, Dimension::Tactic),
            trends: daily_trends(&marketing),
            business_impact: if business.is_empty() {
                vec![]
            } else {
                business_impact(&marketing, &business)
            },
            summary,
            recommendations,
        }
    }
}
