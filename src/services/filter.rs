use crate::models::{BusinessTable, MarketingTable, Platform};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date range and platform selection applied before reporting
///
/// The date range is applied only when both bounds are set (inclusive).
/// `platforms: None` keeps every platform; an empty list keeps none.
/// The business table has no platform and is filtered by date only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub platforms: Option<Vec<Platform>>,
}

impl Filter {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>, platforms: Option<Vec<Platform>>) -> Self {
        Self {
            start,
            end,
            platforms,
        }
    }

    fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    fn in_range(&self, date: NaiveDate) -> bool {
        self.date_range()
            .map_or(true, |(start, end)| date >= start && date <= end)
    }

    fn selects(&self, platform: Platform) -> bool {
        self.platforms
            .as_ref()
            .map_or(true, |selected| selected.contains(&platform))
    }

    /// Filtered copy of the marketing table
    pub fn apply_marketing(&self, table: &MarketingTable) -> MarketingTable {
        let records = table
            .iter()
            .filter(|r| self.in_range(r.date) && self.selects(r.platform))
            .cloned()
            .collect();
        MarketingTable::new(table.extra_columns.clone(), records)
    }

    /// Filtered copy of the business table
    pub fn apply_business(&self, table: &BusinessTable) -> BusinessTable {
        let records = table
            .iter()
            .filter(|r| self.in_range(r.date))
            .cloned()
            .collect();
        BusinessTable::with_extra_columns(table.extra_columns.clone(), records)
    }

    pub fn apply(&self, marketing: &MarketingTable, business: &BusinessTable) -> (MarketingTable, BusinessTable) {
        (self.apply_marketing(marketing), self.apply_business(business))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BusinessRecord, MarketingRecord};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    fn marketing() -> MarketingTable {
        let rows = [
            (1, Platform::Facebook),
            (2, Platform::Google),
            (3, Platform::TikTok),
            (4, Platform::Facebook),
        ];
        MarketingTable::new(
            vec![],
            rows.iter()
                .map(|(d, p)| {
                    MarketingRecord::new(
                        day(*d),
                        *p,
                        "ASC".to_string(),
                        "CA".to_string(),
                        Some(100),
                        Some(5),
                        Some(10.0),
                        Some(30.0),
                    )
                })
                .collect(),
        )
    }

    fn business() -> BusinessTable {
        BusinessTable::new(
            (1..=4)
                .map(|d| BusinessRecord::new(day(d), Some(10), Some(100.0), Some(2)))
                .collect(),
        )
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        let (m, b) = Filter::default().apply(&marketing(), &business());
        assert_eq!(m.len(), 4);
        assert_eq!(b.len(), 4);
    }

    #[test]
    fn test_inclusive_date_range() {
        let filter = Filter::new(Some(day(2)), Some(day(3)), None);
        let (m, b) = filter.apply(&marketing(), &business());

        assert_eq!(m.len(), 2);
        assert_eq!(b.len(), 2);
        assert!(m.iter().all(|r| r.date >= day(2) && r.date <= day(3)));
    }

    #[test]
    fn test_single_bound_is_ignored() {
        let filter = Filter::new(Some(day(3)), None, None);
        assert_eq!(filter.apply_marketing(&marketing()).len(), 4);
    }

    #[test]
    fn test_platform_selection() {
        let filter = Filter::new(None, None, Some(vec![Platform::Facebook]));
        let (m, b) = filter.apply(&marketing(), &business());

        assert_eq!(m.len(), 2);
        assert!(m.iter().all(|r| r.platform == Platform::Facebook));
        assert_eq!(b.len(), 4);
    }

    #[test]
    fn test_empty_platform_selection_keeps_nothing() {
        let filter = Filter::new(None, None, Some(vec![]));
        assert!(filter.apply_marketing(&marketing()).is_empty());
    }

    #[test]
    fn test_source_table_untouched() {
        let source = marketing();
        let _ = Filter::new(None, None, Some(vec![])).apply_marketing(&source);
        assert_eq!(source.len(), 4);
    }
}
