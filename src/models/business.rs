use super::metrics::{calculate_avg_order_value, calculate_customer_acquisition_rate};
use crate::constants::business_column;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Platform-independent business figures for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub date: NaiveDate,

    /// Number of orders placed
    #[serde(rename = "# of orders")]
    pub orders: Option<u64>,

    /// Revenue across all channels and organic sources
    #[serde(rename = "total revenue")]
    pub total_revenue: Option<f64>,

    #[serde(rename = "new customers")]
    pub new_customers: Option<u64>,

    /// Columns outside the required schema (e.g. `gross profit`, `COGS`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, Option<String>>,

    /// total revenue / orders, undefined when there are no orders
    pub avg_order_value: Option<f64>,

    /// new customers / orders * 100, undefined when there are no orders
    pub customer_acquisition_rate: Option<f64>,
}

impl BusinessRecord {
    pub fn new(
        date: NaiveDate,
        orders: Option<u64>,
        total_revenue: Option<f64>,
        new_customers: Option<u64>,
    ) -> Self {
        Self {
            date,
            orders,
            total_revenue,
            new_customers,
            extras: BTreeMap::new(),
            avg_order_value: None,
            customer_acquisition_rate: None,
        }
    }

    pub fn calculate_metrics(&mut self) {
        self.avg_order_value = calculate_avg_order_value(self.total_revenue, self.orders);
        self.customer_acquisition_rate =
            calculate_customer_acquisition_rate(self.new_customers, self.orders);
    }

    /// Value of an extra column, `None` for both "absent" and "empty"
    pub fn extra(&self, column: &str) -> Option<&str> {
        self.extras.get(column).and_then(|v| v.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessTable {
    /// Non-required source columns, in source order
    #[serde(default)]
    pub extra_columns: Vec<String>,

    pub records: Vec<BusinessRecord>,
}

impl BusinessTable {
    pub fn new(records: Vec<BusinessRecord>) -> Self {
        Self::with_extra_columns(Vec::new(), records)
    }

    pub fn with_extra_columns(extra_columns: Vec<String>, records: Vec<BusinessRecord>) -> Self {
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

    pub fn iter(&self) -> std::slice::Iter<'_, BusinessRecord> {
        self.records.iter()
    }

    /// All column names: raw, extras, then derived
    pub fn column_names(&self) -> Vec<String> {
        let mut columns: Vec<String> = business_column::REQUIRED
            .iter()
            .map(|c| c.to_string())
            .collect();
        columns.extend(self.extra_columns.iter().cloned());
        columns.extend(
            ["avg_order_value", "customer_acquisition_rate"]
                .iter()
                .map(|c| c.to_string()),
        );
        columns
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }
}

impl<'a> IntoIterator for &'a BusinessTable {
    type Item = &'a BusinessRecord;
    type IntoIter = std::slice::Iter<'a, BusinessRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_metrics() {
        let mut r = BusinessRecord::new(
            NaiveDate::from_ymd_opt(2025, 5, 16).unwrap(),
            Some(8),
            Some(1000.0),
            Some(2),
        );
        r.calculate_metrics();

        assert_eq!(r.avg_order_value, Some(125.0));
        assert_eq!(r.customer_acquisition_rate, Some(25.0));
    }

    #[test]
    fn test_zero_orders_undefined() {
        let mut r = BusinessRecord::new(
            NaiveDate::from_ymd_opt(2025, 5, 16).unwrap(),
            Some(0),
            Some(0.0),
            Some(0),
        );
        r.calculate_metrics();

        assert_eq!(r.avg_order_value, None);
        assert_eq!(r.customer_acquisition_rate, None);
    }

    #[test]
    fn test_serialize_uses_source_column_names() {
        let mut r = BusinessRecord::new(
            NaiveDate::from_ymd_opt(2025, 5, 16).unwrap(),
            Some(4),
            Some(400.0),
            None,
        );
        r.calculate_metrics();

        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["date"], "2025-05-16");
        assert_eq!(json["# of orders"], 4);
        assert_eq!(json["avg_order_value"], 100.0);
        assert!(json["customer_acquisition_rate"].is_null());
    }

    #[test]
    fn test_column_names_include_extras() {
        let table = BusinessTable::with_extra_columns(
            vec!["gross profit".to_string(), "COGS".to_string()],
            vec![],
        );

        assert_eq!(
            table.column_names(),
            vec![
                "date",
                "# of orders",
                "total revenue",
                "new customers",
                "gross profit",
                "COGS",
                "avg_order_value",
                "customer_acquisition_rate",
            ]
        );
    }
}
