pub mod ask;
pub mod report;
pub mod status;

use crate::error::AppError;
use crate::models::{Dataset, DatasetConfig};
use crate::services::load_and_process_data;

/// Load the dataset or stop the process; there is no partial load
fn load_or_exit(config: &DatasetConfig) -> Dataset {
    match load_and_process_data(config) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("❌ {} ({})", AppError::from(e), config.dir.display());
            std::process::exit(1);
        }
    }
}
