pub mod cli;
pub mod config;
pub mod db;
pub mod extraction;
pub mod labeling;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod utils;

use clap::Parser;

pub use config::{AnalyticsConfig, FallbackBasis, MetricsConfig, PredictionSource};
pub use db::Database;
pub use metrics::{AnalyticsReport, MetricAggregator, ReportSections};
pub use pipeline::Dataset;

pub fn run() -> anyhow::Result<()> {
    // Initialize logging (reads RUST_LOG env var); stdout is reserved for the report
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = cli::Cli::parse();
    log::debug!("chatstats {} starting", env!("CARGO_PKG_VERSION"));

    cli::execute(cli)
}
