use clap::{Args, Parser, Subcommand};
use chrono::NaiveDate;
use std::path::PathBuf;

use crate::commands;
use crate::models::{DatasetConfig, Platform};
use crate::services::Filter;

#[derive(Parser)]
#[command(name = "adpulse")]
#[command(about = "Marketing spend and business metrics report", long_about = None)]
pub struct Cli {
    /// Directory holding Facebook.csv, Google.csv, TikTok.csv and business.csv
    /// (default: $DATASET_DIR or ./dataset)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Date range and platform selection shared by report and ask
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// First day to include (YYYY-MM-DD); needs --end
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD); needs --start
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Platform to include, repeatable (facebook, google, tiktok); default all
    #[arg(short, long = "platform", value_parser = parse_platform)]
    pub platforms: Vec<Platform>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> Filter {
        let platforms = (!self.platforms.is_empty()).then(|| self.platforms.clone());
        Filter::new(self.start, self.end, platforms)
    }
}

fn parse_platform(s: &str) -> Result<Platform, String> {
    Platform::from_str(s)
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show row counts, date range and dimensions of the dataset
    Status,
    /// Print the marketing report for a selection
    Report {
        #[command(flatten)]
        filter: FilterArgs,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Ask the AI assistant a question about a selection
    Ask {
        /// The question, e.g. "Which platform should get more budget?"
        question: String,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

pub async fn run() {
    let cli = Cli::parse();
    let config = DatasetConfig::resolve(cli.data_dir);

    match cli.command {
        Commands::Status => {
            commands::status::run(&config);
        }
        Commands::Report { filter, json } => {
            commands::report::run(&config, &filter.to_filter(), json);
        }
        Commands::Ask { question, filter } => {
            commands::ask::run(&config, &question, &filter.to_filter()).await;
        }
    }
}
