//! Metrics Aggregator
//!
//! Turns the three channel tables and the business table into the unified
//! marketing table and the business table, each with its derived metrics.
//!
//! The load is one-shot and atomic: any missing source, missing column,
//! unparseable date or non-numeric cell fails the whole call with a
//! `LoadError` and nothing is returned.

use crate::constants::{business_column, marketing_column};
use crate::error::LoadError;
use crate::models::{
    BusinessRecord, BusinessTable, Dataset, DatasetConfig, MarketingRecord, MarketingTable, Platform,
};
use crate::services::csv_loader::RawTable;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// The four raw inputs of one load
#[derive(Debug, Clone)]
pub struct DatasetSources {
    pub facebook: RawTable,
    pub google: RawTable,
    pub tiktok: RawTable,
    pub business: RawTable,
}

impl DatasetSources {
    /// Read all four sources from the dataset directory
    pub fn read(config: &DatasetConfig) -> Result<Self, LoadError> {
        debug!("Reading dataset from {}", config.dir.display());

        Ok(Self {
            facebook: RawTable::from_path(&config.platform_path(Platform::Facebook))?,
            google: RawTable::from_path(&config.platform_path(Platform::Google))?,
            tiktok: RawTable::from_path(&config.platform_path(Platform::TikTok))?,
            business: RawTable::from_path(&config.business_path())?,
        })
    }

    /// Channel tables paired with their platform, in load order
    pub fn channels(&self) -> [(Platform, &RawTable); 3] {
        [
            (Platform::Facebook, &self.facebook),
            (Platform::Google, &self.google),
            (Platform::TikTok, &self.tiktok),
        ]
    }
}

/// Load the dataset from disk and derive all metrics
pub fn load_and_process_data(config: &DatasetConfig) -> Result<Dataset, LoadError> {
    let sources = DatasetSources::read(config)?;
    process(&sources)
}

/// Derive both output tables from already-acquired sources
pub fn process(sources: &DatasetSources) -> Result<Dataset, LoadError> {
    let marketing = combine_marketing(&sources.channels())?;
    let business = process_business(&sources.business)?;

    info!(
        "Loaded {} marketing rows ({} extra columns) and {} business rows",
        marketing.len(),
        marketing.extra_columns.len(),
        business.len()
    );

    Ok((marketing, business))
}

/// Tag each channel's rows with its platform and concatenate them
///
/// Row order is preserved: all Facebook rows, then Google, then TikTok.
/// Extra columns form a union; a row whose source lacks one holds `None`.
pub fn combine_marketing(channels: &[(Platform, &RawTable)]) -> Result<MarketingTable, LoadError> {
    let extra_columns = union_extra_columns(channels.iter().map(|(_, table)| *table));

    let total_rows: usize = channels.iter().map(|(_, table)| table.len()).sum();
    let mut records = Vec::with_capacity(total_rows);

    for (platform, table) in channels {
        let before = records.len();
        tag_channel(*platform, table, &extra_columns, &mut records)?;
        debug!("{}: {} rows", platform, records.len() - before);
    }

    Ok(MarketingTable::new(extra_columns, records))
}

/// Parse one channel table into records tagged with `platform`
fn tag_channel(
    platform: Platform,
    table: &RawTable,
    extra_columns: &[String],
    out: &mut Vec<MarketingRecord>,
) -> Result<(), LoadError> {
    let date = table.require_column(marketing_column::DATE)?;
    let tactic = table.require_column(marketing_column::TACTIC)?;
    let state = table.require_column(marketing_column::STATE)?;
    let impression = table.require_column(marketing_column::IMPRESSION)?;
    let clicks = table.require_column(marketing_column::CLICKS)?;
    let spend = table.require_column(marketing_column::SPEND)?;
    let revenue = table.require_column(marketing_column::ATTRIBUTED_REVENUE)?;

    let extra_indices: Vec<(&String, Option<usize>)> = extra_columns
        .iter()
        .map(|name| (name, table.column_index(name)))
        .collect();

    for row in 0..table.len() {
        let mut record = MarketingRecord::new(
            table.date(row, date)?,
            platform,
            table.text(row, tactic),
            table.text(row, state),
            table.count(row, impression)?,
            table.count(row, clicks)?,
            table.amount(row, spend)?,
            table.amount(row, revenue)?,
        );

        record.extras = extra_indices
            .iter()
            .map(|(name, idx)| {
                let value = idx.and_then(|i| table.cell(row, i)).map(|v| v.to_string());
                ((*name).clone(), value)
            })
            .collect::<BTreeMap<_, _>>();

        record.calculate_metrics();
        out.push(record);
    }

    Ok(())
}

/// Non-required columns across all channels, first-seen order
///
/// A source `platform` column is not an extra: the tag replaces it.
fn union_extra_columns<'a>(tables: impl Iterator<Item = &'a RawTable>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for table in tables {
        for header in &table.headers {
            let is_known = marketing_column::REQUIRED.contains(&header.as_str())
                || header == marketing_column::PLATFORM;
            if !is_known && !columns.contains(header) {
                columns.push(header.clone());
            }
        }
    }
    columns
}

/// Parse the business table and derive its metrics
pub fn process_business(table: &RawTable) -> Result<BusinessTable, LoadError> {
    let date = table.require_column(business_column::DATE)?;
    let orders = table.require_column(business_column::ORDERS)?;
    let revenue = table.require_column(business_column::TOTAL_REVENUE)?;
    let new_customers = table.require_column(business_column::NEW_CUSTOMERS)?;

    let extras: Vec<(String, usize)> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !business_column::REQUIRED.contains(&h.as_str()))
        .map(|(i, h)| (h.clone(), i))
        .collect();

    let mut records = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let mut record = BusinessRecord::new(
            table.date(row, date)?,
            table.count(row, orders)?,
            table.amount(row, revenue)?,
            table.count(row, new_customers)?,
        );
        record.extras = extras
            .iter()
            .map(|(name, i)| (name.clone(), table.cell(row, *i).map(|v| v.to_string())))
            .collect::<BTreeMap<_, _>>();
        record.calculate_metrics();
        records.push(record);
    }

    let extra_columns = extras.into_iter().map(|(name, _)| name).collect();
    Ok(BusinessTable::with_extra_columns(extra_columns, records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metrics::round2;
    use std::fs;
    use tempfile::TempDir;

    const FACEBOOK: &str = "date,tactic,state,campaign,impression,clicks,spend,attributed revenue\n\
        2025-05-16,ASC,CA,Spring,1000,20,50,175\n\
        2025-05-17,Retargeting,NY,Spring,3000,45,90,210.5\n";

    const GOOGLE: &str = "date,tactic,state,campaign,impression,clicks,spend,attributed revenue\n\
        2025-05-16,Search,CA,Brand,2000,80,120,600\n\
        2025-05-17,Search,NY,Brand,0,0,0,100\n";

    const TIKTOK: &str = "date,tactic,state,impression,clicks,spend,attributed revenue,creative\n\
        2025-05-16,Spark,CA,5000,60,75,150,video-a\n\
        2025-05-17,Spark,NY,4500,30,40,0,video-b\n";

    const BUSINESS: &str = "date,# of orders,# of new orders,new customers,total revenue,gross profit,COGS\n\
        2025-05-16,40,12,10,5000,2000,3000\n\
        2025-05-17,0,0,0,0,0,0\n";

    fn sources() -> DatasetSources {
        DatasetSources {
            facebook: RawTable::from_reader("Facebook.csv", FACEBOOK.as_bytes()).unwrap(),
            google: RawTable::from_reader("Google.csv", GOOGLE.as_bytes()).unwrap(),
            tiktok: RawTable::from_reader("TikTok.csv", TIKTOK.as_bytes()).unwrap(),
            business: RawTable::from_reader("business.csv", BUSINESS.as_bytes()).unwrap(),
        }
    }

    fn write_dataset(dir: &TempDir, facebook: &str) {
        fs::write(dir.path().join("Facebook.csv"), facebook).unwrap();
        fs::write(dir.path().join("Google.csv"), GOOGLE).unwrap();
        fs::write(dir.path().join("TikTok.csv"), TIKTOK).unwrap();
        fs::write(dir.path().join("business.csv"), BUSINESS).unwrap();
    }

    #[test]
    fn test_row_counts_and_platform_tags() {
        let (marketing, business) = process(&sources()).unwrap();

        assert_eq!(marketing.len(), 6);
        assert_eq!(business.len(), 2);
        assert_eq!(marketing.platforms().len(), 3);

        let tags: Vec<Platform> = marketing.iter().map(|r| r.platform).collect();
        assert_eq!(
            tags,
            vec![
                Platform::Facebook,
                Platform::Facebook,
                Platform::Google,
                Platform::Google,
                Platform::TikTok,
                Platform::TikTok,
            ]
        );
    }

    #[test]
    fn test_derived_columns_match_formulas() {
        let (marketing, _) = process(&sources()).unwrap();

        for r in marketing.iter() {
            let impressions = r.impression.unwrap() as f64;
            let clicks = r.clicks.unwrap() as f64;
            let spend = r.spend.unwrap();
            let revenue = r.attributed_revenue.unwrap();

            if impressions > 0.0 {
                assert_eq!(r.ctr, Some(round2(clicks / impressions * 100.0)));
                assert_eq!(r.cpm, Some(round2(spend / (impressions / 1000.0))));
            } else {
                assert_eq!(r.ctr, None);
                assert_eq!(r.cpm, None);
            }
            if spend > 0.0 {
                assert_eq!(r.roas, Some(round2(revenue / spend)));
            } else {
                assert_eq!(r.roas, None);
            }
        }
    }

    #[test]
    fn test_zero_spend_row_is_undefined_not_infinite() {
        let (marketing, _) = process(&sources()).unwrap();
        let google_zero = &marketing.records[3];

        assert_eq!(google_zero.spend, Some(0.0));
        assert_eq!(google_zero.attributed_revenue, Some(100.0));
        assert_eq!(google_zero.roas, None);
        assert_eq!(google_zero.cpc, None);
    }

    #[test]
    fn test_business_metrics() {
        let (_, business) = process(&sources()).unwrap();

        assert_eq!(business.records[0].avg_order_value, Some(125.0));
        assert_eq!(business.records[0].customer_acquisition_rate, Some(25.0));
        assert_eq!(business.records[1].avg_order_value, None);
        assert_eq!(business.records[1].customer_acquisition_rate, None);
    }

    #[test]
    fn test_business_keeps_every_raw_column() {
        let (_, business) = process(&sources()).unwrap();

        assert_eq!(business.extra_columns, vec!["# of new orders", "gross profit", "COGS"]);

        let columns = business.column_names();
        for column in ["date", "# of orders", "# of new orders", "new customers", "total revenue", "gross profit", "COGS"] {
            assert!(columns.contains(&column.to_string()), "{} dropped", column);
        }

        let first = &business.records[0];
        assert_eq!(first.extra("gross profit"), Some("2000"));
        assert_eq!(first.extra("COGS"), Some("3000"));
        assert_eq!(first.extra("# of new orders"), Some("12"));

        let json = serde_json::to_value(first).unwrap();
        assert_eq!(json["extras"]["gross profit"], "2000");
    }

    #[test]
    fn test_blank_state_is_missing_after_load() {
        let csv = "date,tactic,state,impression,clicks,spend,attributed revenue\n\
            2025-05-16,ASC,CA,100,1,10,30\n\
            2025-05-16,ASC,,100,1,10,50\n";
        let table = RawTable::from_reader("Facebook.csv", csv.as_bytes()).unwrap();
        let marketing = combine_marketing(&[(Platform::Facebook, &table)]).unwrap();

        assert_eq!(marketing.len(), 2);
        assert_eq!(marketing.records[1].state, None);
        assert_eq!(marketing.states(), vec!["CA"]);
    }

    #[test]
    fn test_extra_columns_union_with_missing_marker() {
        let (marketing, _) = process(&sources()).unwrap();

        assert_eq!(marketing.extra_columns, vec!["campaign", "creative"]);

        let facebook = &marketing.records[0];
        assert_eq!(facebook.extra("campaign"), Some("Spring"));
        assert_eq!(facebook.extras.get("creative"), Some(&None));

        let tiktok = &marketing.records[4];
        assert_eq!(tiktok.extras.get("campaign"), Some(&None));
        assert_eq!(tiktok.extra("creative"), Some("video-a"));
    }

    #[test]
    fn test_source_platform_column_is_overwritten() {
        let csv = "date,tactic,state,impression,clicks,spend,attributed revenue,platform\n\
            2025-05-16,ASC,CA,100,1,1,1,Bing\n";
        let table = RawTable::from_reader("Facebook.csv", csv.as_bytes()).unwrap();
        let marketing = combine_marketing(&[(Platform::Facebook, &table)]).unwrap();

        assert_eq!(marketing.records[0].platform, Platform::Facebook);
        assert!(marketing.extra_columns.is_empty());
    }

    #[test]
    fn test_missing_required_column_fails() {
        let csv = "date,tactic,state,impression,clicks,spend\n2025-05-16,ASC,CA,100,1,1\n";
        let mut s = sources();
        s.google = RawTable::from_reader("Google.csv", csv.as_bytes()).unwrap();

        let err = process(&s).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingColumn { ref source_name, ref column }
                if source_name == "Google.csv" && column == "attributed revenue"
        ));
    }

    #[test]
    fn test_malformed_date_fails_whole_load() {
        let dir = TempDir::new().unwrap();
        let bad = FACEBOOK.replace("2025-05-17", "yesterday");
        write_dataset(&dir, &bad);

        let err = load_and_process_data(&DatasetConfig::new(dir.path())).unwrap_err();
        match err {
            LoadError::InvalidDate { source_name, row, value } => {
                assert_eq!(source_name, "Facebook.csv");
                assert_eq!(row, 2);
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_source_fails() {
        let dir = TempDir::new().unwrap();
        write_dataset(&dir, FACEBOOK);
        fs::remove_file(dir.path().join("business.csv")).unwrap();

        let err = load_and_process_data(&DatasetConfig::new(dir.path())).unwrap_err();
        assert!(matches!(err, LoadError::MissingSource { .. }));
    }

    #[test]
    fn test_load_from_disk_is_idempotent() {
        let dir = TempDir::new().unwrap();
        write_dataset(&dir, FACEBOOK);
        let config = DatasetConfig::new(dir.path());

        let first = load_and_process_data(&config).unwrap();
        let second = load_and_process_data(&config).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.0.len(), 6);
        assert_eq!(first.1.len(), 2);
    }
}
