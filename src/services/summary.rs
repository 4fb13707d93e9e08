use crate::models::metrics::{mean_defined, ratio, round2_opt, sum_defined};
use crate::models::{BusinessTable, MarketingTable};
use serde::Serialize;

/// Headline figures for the current selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveSummary {
    pub total_spend: f64,
    pub total_attributed_revenue: f64,
    /// Blended ROAS: total revenue / total spend, 0 when nothing was spent
    pub roas: f64,
    pub total_orders: u64,
    pub new_customers: u64,
    pub business_revenue: f64,
    /// Customer acquisition cost: total spend / new customers, 0 without new customers
    pub cac: f64,
    /// Mean of the defined per-day average order values
    pub avg_order_value: Option<f64>,
}

impl ExecutiveSummary {
    pub fn compute(marketing: &MarketingTable, business: &BusinessTable) -> Self {
        let total_spend = sum_defined(marketing.iter().map(|r| r.spend));
        let total_attributed_revenue = sum_defined(marketing.iter().map(|r| r.attributed_revenue));
        let total_orders: u64 = business.iter().filter_map(|r| r.orders).sum();
        let new_customers: u64 = business.iter().filter_map(|r| r.new_customers).sum();

        Self {
            total_spend,
            total_attributed_revenue,
            roas: ratio(Some(total_attributed_revenue), Some(total_spend)).unwrap_or(0.0),
            total_orders,
            new_customers,
            business_revenue: sum_defined(business.iter().map(|r| r.total_revenue)),
            cac: ratio(Some(total_spend), Some(new_customers as f64)).unwrap_or(0.0),
            avg_order_value: round2_opt(mean_defined(business.iter().map(|r| r.avg_order_value))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BusinessRecord, MarketingRecord, Platform};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    fn marketing(rows: &[(f64, f64)]) -> MarketingTable {
        MarketingTable::new(
            vec![],
            rows.iter()
                .map(|(spend, revenue)| {
                    MarketingRecord::new(
                        day(1),
                        Platform::Google,
                        "Search".to_string(),
                        "CA".to_string(),
                        Some(100),
                        Some(10),
                        Some(*spend),
                        Some(*revenue),
                    )
                })
                .collect(),
        )
    }

    fn business(rows: &[(u64, f64, u64)]) -> BusinessTable {
        BusinessTable::new(
            rows.iter()
                .enumerate()
                .map(|(i, (orders, revenue, new))| {
                    let mut r = BusinessRecord::new(day(i as u32 + 1), Some(*orders), Some(*revenue), Some(*new));
                    r.calculate_metrics();
                    r
                })
                .collect(),
        )
    }

    #[test]
    fn test_summary_totals() {
        let s = ExecutiveSummary::compute(
            &marketing(&[(100.0, 300.0), (300.0, 500.0)]),
            &business(&[(10, 1000.0, 4), (20, 3000.0, 6)]),
        );

        assert_eq!(s.total_spend, 400.0);
        assert_eq!(s.total_attributed_revenue, 800.0);
        assert_eq!(s.roas, 2.0);
        assert_eq!(s.total_orders, 30);
        assert_eq!(s.new_customers, 10);
        assert_eq!(s.cac, 40.0);
        assert_eq!(s.business_revenue, 4000.0);
        assert_eq!(s.avg_order_value, Some(125.0));
    }

    #[test]
    fn test_empty_selection_defaults_to_zero() {
        let s = ExecutiveSummary::compute(&MarketingTable::default(), &BusinessTable::default());

        assert_eq!(s.total_spend, 0.0);
        assert_eq!(s.roas, 0.0);
        assert_eq!(s.cac, 0.0);
        assert_eq!(s.avg_order_value, None);
    }
}
