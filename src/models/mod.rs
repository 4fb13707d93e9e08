mod business;
mod config;
mod dimension;
mod marketing;
mod platform;
pub mod metrics;

pub use business::{BusinessRecord, BusinessTable};
pub use config::{AssistantConfig, DatasetConfig};
pub use dimension::Dimension;
pub use marketing::{MarketingRecord, MarketingTable};
pub use platform::Platform;

/// Result of one load: the unified marketing table and the business table
pub type Dataset = (MarketingTable, BusinessTable);
