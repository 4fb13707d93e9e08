pub mod ai_insights;
pub mod aggregation;
pub mod csv_loader;
pub mod data_processor;
pub mod filter;
pub mod recommendations;
pub mod report;
pub mod summary;
pub mod trends;

pub use ai_insights::{ask_ai, build_context, shared_client, GeminiClient, TextService};
pub use aggregation::{Aggregator, GroupSummary};
pub use csv_loader::RawTable;
pub use data_processor::{load_and_process_data, process, DatasetSources};
pub use filter::Filter;
pub use recommendations::Recommendations;
pub use report::Report;
pub use summary::ExecutiveSummary;
pub use trends::{BusinessImpact, DailyTrend};
