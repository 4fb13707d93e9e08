//! Strategic recommendations
//!
//! Derives growth opportunities, optimization areas and headline insights
//! from channel, state and tactic groupings of the filtered marketing table.

use super::aggregation::{argmax, argmin, mean_of, Aggregator, GroupSummary};
use crate::constants::{
    HIGH_CPC_FACTOR, HIGH_OPPORTUNITY_PERCENT, REALLOCATION_SHARE, ROAS_EFFICIENCY_BASELINE,
    ROAS_TARGET,
};
use crate::models::metrics::ratio;
use crate::models::{Dimension, MarketingTable};
use serde::Serialize;

/// Highest-ROAS channel and how it compares
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleChannel {
    pub platform: String,
    pub roas: f64,
    pub average_roas: Option<f64>,
    /// Channel spend as a percentage of all channel spend
    pub spend_share: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpandState {
    pub state: String,
    pub roas: f64,
    pub spend: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizeTactic {
    pub tactic: String,
    pub roas: f64,
}

/// Lowest-ROAS channel among those below the channel average
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnderperformingChannel {
    pub platform: String,
    pub roas: f64,
    pub average_roas: f64,
    pub cpc: Option<f64>,
    pub average_cpc: Option<f64>,
}

/// Most expensive channel among those with CPC above the threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpensiveChannel {
    pub platform: String,
    pub cpc: f64,
    pub benchmark_cpc: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetReallocation {
    /// Spend of channels below the average ROAS
    pub underperforming_spend: f64,
    pub reallocation_potential: f64,
}

/// Headline metric with a qualitative label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub value: Option<f64>,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategicInsights {
    pub overall_roas: Insight,
    /// overall ROAS / 4 * 100
    pub efficiency_score: Insight,
    /// (max - min) / min * 100 over channel ROAS
    pub growth_potential: Insight,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub scale_channel: Option<ScaleChannel>,
    pub expand_state: Option<ExpandState>,
    pub optimize_tactic: Option<OptimizeTactic>,
    pub improve_channel: Option<UnderperformingChannel>,
    pub reduce_costs: Option<ExpensiveChannel>,
    pub reallocation: Option<BudgetReallocation>,
    pub insights: StrategicInsights,
}

impl Recommendations {
    /// Build recommendations; `None` for an empty selection
    ///
    /// `overall_roas` is the blended ROAS of the selection (see `ExecutiveSummary`).
    pub fn compute(marketing: &MarketingTable, overall_roas: f64) -> Option<Self> {
        if marketing.is_empty() {
            return None;
        }

        let channels = Aggregator::group_by(marketing, Dimension::Platform);
        let states = Aggregator::group_by(marketing, Dimension::State);
        let tactics = Aggregator::group_by(marketing, Dimension::Tactic);

        let avg_roas = mean_of(&channels, |g| g.roas);
        let avg_cpc = mean_of(&channels, |g| g.cpc);

        Some(Self {
            scale_channel: scale_channel(&channels, avg_roas),
            expand_state: argmax(&states, |g| g.roas).and_then(|g| {
                g.roas.map(|roas| ExpandState {
                    state: g.key.clone(),
                    roas,
                    spend: g.spend,
                })
            }),
            optimize_tactic: argmax(&tactics, |g| g.roas).and_then(|g| {
                g.roas.map(|roas| OptimizeTactic {
                    tactic: g.key.clone(),
                    roas,
                })
            }),
            improve_channel: improve_channel(&channels, avg_roas, avg_cpc),
            reduce_costs: reduce_costs(&channels, avg_cpc),
            reallocation: reallocation(&channels, avg_roas),
            insights: insights(&channels, overall_roas),
        })
    }
}

fn scale_channel(channels: &[GroupSummary], avg_roas: Option<f64>) -> Option<ScaleChannel> {
    let best = argmax(channels, |g| g.roas)?;
    let total_spend: f64 = channels.iter().map(|g| g.spend).sum();

    Some(ScaleChannel {
        platform: best.key.clone(),
        roas: best.roas?,
        average_roas: avg_roas,
        spend_share: ratio(Some(best.spend), Some(total_spend)).map(|v| v * 100.0),
    })
}

fn below_average(channels: &[GroupSummary], avg_roas: f64) -> Vec<GroupSummary> {
    channels
        .iter()
        .filter(|g| g.roas.is_some_and(|roas| roas < avg_roas))
        .cloned()
        .collect()
}

fn improve_channel(
    channels: &[GroupSummary],
    avg_roas: Option<f64>,
    avg_cpc: Option<f64>,
) -> Option<UnderperformingChannel> {
    let average_roas = avg_roas?;
    let underperforming = below_average(channels, average_roas);
    let worst = argmin(&underperforming, |g| g.roas)?;

    Some(UnderperformingChannel {
        platform: worst.key.clone(),
        roas: worst.roas?,
        average_roas,
        cpc: worst.cpc,
        average_cpc: avg_cpc,
    })
}

fn reduce_costs(channels: &[GroupSummary], avg_cpc: Option<f64>) -> Option<ExpensiveChannel> {
    let benchmark_cpc = avg_cpc?;
    let threshold = benchmark_cpc * HIGH_CPC_FACTOR;
    let high_cpc: Vec<GroupSummary> = channels
        .iter()
        .filter(|g| g.cpc.is_some_and(|cpc| cpc > threshold))
        .cloned()
        .collect();
    let expensive = argmax(&high_cpc, |g| g.cpc)?;

    Some(ExpensiveChannel {
        platform: expensive.key.clone(),
        cpc: expensive.cpc?,
        benchmark_cpc,
    })
}

fn reallocation(channels: &[GroupSummary], avg_roas: Option<f64>) -> Option<BudgetReallocation> {
    if channels.len() < 2 {
        return None;
    }
    let low_roi = below_average(channels, avg_roas?);
    if low_roi.is_empty() {
        return None;
    }

    let underperforming_spend: f64 = low_roi.iter().map(|g| g.spend).sum();
    Some(BudgetReallocation {
        underperforming_spend,
        reallocation_potential: underperforming_spend * REALLOCATION_SHARE,
    })
}

fn insights(channels: &[GroupSummary], overall_roas: f64) -> StrategicInsights {
    let efficiency = overall_roas / ROAS_EFFICIENCY_BASELINE * 100.0;

    let max = argmax(channels, |g| g.roas).and_then(|g| g.roas);
    let min = argmin(channels, |g| g.roas).and_then(|g| g.roas);
    let growth = match (max, min) {
        (Some(max), Some(min)) => ratio(Some(max - min), Some(min)).map(|v| v * 100.0),
        _ => None,
    };

    StrategicInsights {
        overall_roas: Insight {
            value: Some(overall_roas),
            label: if overall_roas > ROAS_TARGET {
                "Above Target"
            } else {
                "Needs Improvement"
            },
        },
        efficiency_score: Insight {
            value: Some(efficiency),
            label: if efficiency > 80.0 {
                "Excellent"
            } else if efficiency > 60.0 {
                "Good"
            } else {
                "Needs Work"
            },
        },
        growth_potential: Insight {
            value: growth,
            label: if growth.is_some_and(|g| g > HIGH_OPPORTUNITY_PERCENT) {
                "High Opportunity"
            } else {
                "Moderate"
            },
        },
    }
}
