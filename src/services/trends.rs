use crate::models::metrics::{mean_defined, ratio, round2_opt, sum_defined};
use crate::models::{BusinessTable, MarketingTable};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// One day of marketing performance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTrend {
    pub date: NaiveDate,
    pub spend: f64,
    pub attributed_revenue: f64,
    /// Mean of the defined per-row ROAS values of the day
    pub roas: Option<f64>,
    /// Percent change of spend vs the previous day; undefined on the first
    /// day and after a zero-spend day
    pub spend_growth: Option<f64>,
}

/// Marketing and business totals for a day present in both tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessImpact {
    pub date: NaiveDate,
    pub spend: f64,
    pub attributed_revenue: f64,
    pub orders: u64,
    pub total_revenue: f64,
}

/// Daily spend, revenue, ROAS and spend growth, in date order
pub fn daily_trends(marketing: &MarketingTable) -> Vec<DailyTrend> {
    let mut days: BTreeMap<NaiveDate, Vec<_>> = BTreeMap::new();
    for record in marketing.iter() {
        days.entry(record.date).or_default().push(record);
    }

    let mut previous_spend: Option<f64> = None;
    days.into_iter()
        .map(|(date, records)| {
            let spend = sum_defined(records.iter().map(|r| r.spend));
            let spend_growth = ratio(Some(spend), previous_spend)
                .map(|change| (change - 1.0) * 100.0);
            previous_spend = Some(spend);

            DailyTrend {
                date,
                spend,
                attributed_revenue: sum_defined(records.iter().map(|r| r.attributed_revenue)),
                roas: round2_opt(mean_defined(records.iter().map(|r| r.roas))),
                spend_growth,
            }
        })
        .collect()
}

/// Per-day marketing totals inner-joined with per-day business totals
pub fn business_impact(marketing: &MarketingTable, business: &BusinessTable) -> Vec<BusinessImpact> {
    let mut daily_marketing: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for r in marketing.iter() {
        let entry = daily_marketing.entry(r.date).or_insert((0.0, 0.0));
        entry.0 += r.spend.unwrap_or(0.0);
        entry.1 += r.attributed_revenue.unwrap_or(0.0);
    }

    let mut daily_business: BTreeMap<NaiveDate, (u64, f64)> = BTreeMap::new();
    for r in business.iter() {
        let entry = daily_business.entry(r.date).or_insert((0, 0.0));
        entry.0 += r.orders.unwrap_or(0);
        entry.1 += r.total_revenue.unwrap_or(0.0);
    }

    daily_marketing
        .into_iter()
        .filter_map(|(date, (spend, attributed_revenue))| {
            daily_business.get(&date).map(|(orders, total_revenue)| BusinessImpact {
                date,
                spend,
                attributed_revenue,
                orders: *orders,
                total_revenue: *total_revenue,
            })
        })
        .collect()
}
