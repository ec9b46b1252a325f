use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use crate::config::AnalyticsConfig;
use crate::db::Database;
use crate::metrics::{MetricAggregator, ReportSections};
use crate::pipeline::Dataset;
use crate::report::{
    render_report, save_events_table, save_intent_distribution, save_user_intent_pivot,
};

#[derive(Parser)]
#[command(name = "chatstats")]
#[command(about = "Intent accuracy, fallback and satisfaction analytics over chatbot logs")]
pub struct Cli {
    /// JSON settings file; defaults are used when it does not exist
    #[arg(long, global = true, default_value = "chatstats.json")]
    config: PathBuf,

    /// Exported events CSV (overrides `paths.input_csv`)
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Read events straight from a tracker-store SQLite file instead of the CSV
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print the report as JSON instead of text tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Dump the `events` table of a SQLite tracker store to CSV
    Export {
        /// Output CSV (defaults to `paths.input_csv`)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Intent distribution, user x intent pivot and bot fallback actions
    Dashboard {
        /// Skip writing the summary CSV files
        #[arg(long)]
        no_write: bool,
    },

    /// Intent recognition accuracy, confusion matrix and classification report
    Accuracy,

    /// Overview, intent frequency, fallbacks, accuracy and session lengths
    Analyze,

    /// Per-user conversion, CSAT and NPS-style score
    Satisfaction,

    /// Every report section
    Report,

    /// Write the effective settings to the config path
    InitConfig,
}

pub fn execute(cli: Cli) -> Result<()> {
    let mut config = AnalyticsConfig::load(&cli.config)?;
    if let Some(input) = &cli.input {
        config.paths.input_csv = input.clone();
    }

    let write_csvs = matches!(cli.command, Command::Dashboard { no_write: false });

    let sections = match cli.command {
        Command::Export { out } => {
            let db_path = cli.db.unwrap_or_else(|| config.paths.database.clone());
            let out = out.unwrap_or_else(|| config.paths.input_csv.clone());
            return export(db_path, &out);
        }
        Command::InitConfig => {
            config.save(&cli.config)?;
            println!("Wrote settings to {}", cli.config.display());
            return Ok(());
        }
        Command::Dashboard { .. } => ReportSections::dashboard(),
        Command::Accuracy => ReportSections::accuracy_only(),
        Command::Analyze => ReportSections::analysis(),
        Command::Satisfaction => ReportSections::satisfaction_only(),
        Command::Report => ReportSections::all(),
    };

    let dataset = match &cli.db {
        Some(db_path) => Dataset::from_rows(Database::open(db_path.clone())?.load_event_rows()?),
        None => Dataset::load(&config.paths.input_csv)?,
    };

    let report = MetricAggregator::new(&config.metrics).compute(&dataset, sections);

    if write_csvs {
        if let Some(distribution) = &report.intent_distribution {
            save_intent_distribution(&config.paths.intent_distribution_csv, &distribution.frequency)?;
            save_user_intent_pivot(&config.paths.user_intent_csv, &distribution.pivot)?;
            info!(
                "Wrote {} and {}",
                config.paths.intent_distribution_csv.display(),
                config.paths.user_intent_csv.display()
            );
        }
    }

    if cli.json {
        let rendered =
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{rendered}");
    } else {
        print!("{}", render_report(&report));
    }

    Ok(())
}

fn export(db_path: PathBuf, out: &Path) -> Result<()> {
    let db = Database::open(db_path)?;
    let table = db.read_events_table()?;
    save_events_table(out, &table)?;
    println!(
        "Exported {} rows from {} to {}",
        table.rows.len(),
        db.path().display(),
        out.display()
    );
    Ok(())
}
