//! Efficiency ratio helpers
//!
//! Every derived column is an `Option<f64>`: `None` is the "undefined" marker
//! produced by a zero or missing denominator. Nothing here panics or yields
//! an infinite value.

/// Divide `numerator` by `denominator`, `None` when either side is missing,
/// the denominator is zero, or the quotient is not finite
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let (n, d) = (numerator?, denominator?);
    if d == 0.0 {
        return None;
    }
    let value = n / d;
    value.is_finite().then_some(value)
}

/// Round to two decimals, ties to even
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// `round2` lifted over the undefined marker
pub fn round2_opt(value: Option<f64>) -> Option<f64> {
    value.map(round2)
}

/// Click-through rate in percent: clicks / impressions * 100
pub fn calculate_ctr(clicks: Option<u64>, impressions: Option<u64>) -> Option<f64> {
    round2_opt(ratio(as_f64(clicks), as_f64(impressions)).map(|v| v * 100.0))
}

/// Cost per click: spend / clicks
pub fn calculate_cpc(spend: Option<f64>, clicks: Option<u64>) -> Option<f64> {
    round2_opt(ratio(spend, as_f64(clicks)))
}

/// Return on ad spend: attributed revenue / spend
pub fn calculate_roas(attributed_revenue: Option<f64>, spend: Option<f64>) -> Option<f64> {
    round2_opt(ratio(attributed_revenue, spend))
}

/// Cost per mille: spend / (impressions / 1000)
pub fn calculate_cpm(spend: Option<f64>, impressions: Option<u64>) -> Option<f64> {
    round2_opt(ratio(spend, as_f64(impressions).map(|v| v / 1000.0)))
}

/// Average order value: total revenue / orders
pub fn calculate_avg_order_value(total_revenue: Option<f64>, orders: Option<u64>) -> Option<f64> {
    round2_opt(ratio(total_revenue, as_f64(orders)))
}

/// New customers per order in percent
pub fn calculate_customer_acquisition_rate(
    new_customers: Option<u64>,
    orders: Option<u64>,
) -> Option<f64> {
    round2_opt(ratio(as_f64(new_customers), as_f64(orders)).map(|v| v * 100.0))
}

/// Mean of the defined values; `None` when there are none
pub fn mean_defined<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Sum of the defined values; zero when there are none
pub fn sum_defined<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    values.into_iter().flatten().sum()
}

fn as_f64(value: Option<u64>) -> Option<f64> {
    value.map(|v| v as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_undefined() {
        assert_eq!(ratio(Some(100.0), Some(0.0)), None);
        assert_eq!(ratio(Some(100.0), None), None);
        assert_eq!(ratio(None, Some(4.0)), None);
        assert_eq!(ratio(Some(0.0), Some(0.0)), None);
        assert_eq!(ratio(Some(10.0), Some(4.0)), Some(2.5));
    }

    #[test]
    fn test_round2_ties_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(round2(2.0), 2.0);
    }

    #[test]
    fn test_marketing_metrics() {
        assert_eq!(calculate_ctr(Some(50), Some(1000)), Some(5.0));
        assert_eq!(calculate_ctr(Some(1), Some(3)), Some(33.33));
        assert_eq!(calculate_ctr(Some(5), Some(0)), None);

        assert_eq!(calculate_cpc(Some(100.0), Some(40)), Some(2.5));
        assert_eq!(calculate_cpc(Some(100.0), Some(0)), None);

        assert_eq!(calculate_roas(Some(100.0), Some(0.0)), None);
        assert_eq!(calculate_roas(Some(350.0), Some(100.0)), Some(3.5));

        assert_eq!(calculate_cpm(Some(25.0), Some(5000)), Some(5.0));
        assert_eq!(calculate_cpm(Some(25.0), Some(0)), None);
    }

    #[test]
    fn test_business_metrics() {
        assert_eq!(calculate_avg_order_value(Some(1000.0), Some(8)), Some(125.0));
        assert_eq!(calculate_avg_order_value(Some(1000.0), Some(0)), None);
        assert_eq!(calculate_customer_acquisition_rate(Some(3), Some(8)), Some(37.5));
        assert_eq!(calculate_customer_acquisition_rate(Some(3), None), None);
    }

    #[test]
    fn test_aggregation_skips_undefined() {
        assert_eq!(mean_defined(vec![Some(2.0), None, Some(4.0)]), Some(3.0));
        assert_eq!(mean_defined(vec![None, None]), None);
        assert_eq!(mean_defined(Vec::<Option<f64>>::new()), None);
        assert_eq!(sum_defined(vec![Some(1.5), None, Some(2.5)]), 4.0);
        assert_eq!(sum_defined(vec![None]), 0.0);
    }
}
