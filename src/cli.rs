//! Command-line interface definitions and argument parsing

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

use crate::segment::DEFAULT_CLUSTERS;

/// Sales analytics CLI: revenue aggregation, forecasting and RFM
/// customer segmentation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the sales CSV file (one row per order line)
    #[arg(short, long, default_value = "sales.csv")]
    pub input: String,

    /// Optional path to a leads CSV file for the funnel view
    #[arg(long)]
    pub leads: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run both engines and assemble the full dashboard payload
    Report {
        /// Number of clusters for customer segmentation
        #[arg(short = 'k', long, default_value_t = DEFAULT_CLUSTERS)]
        clusters: usize,

        /// Write the payload JSON to this file instead of stdout
        #[arg(long)]
        json: Option<String>,

        /// Render PNG charts next to this base path
        #[arg(long)]
        charts: Option<String>,

        /// Reference date for recency calculation (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Recompute and persist the next-month revenue forecast
    Forecast,
    /// Recompute and persist customer segments
    Segment {
        /// Number of clusters for customer segmentation
        #[arg(short = 'k', long, default_value_t = DEFAULT_CLUSTERS)]
        clusters: usize,

        /// Reference date for recency calculation (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

/// Resolve an optional explicit reference date, defaulting to the current
/// UTC date
pub fn resolve_today(explicit: Option<NaiveDate>) -> NaiveDate {
    explicit.unwrap_or_else(|| Utc::now().date_naive())
}
