//! SalesPulse: sales analytics CLI
//!
//! This is the main entrypoint that orchestrates data loading, the
//! forecasting and segmentation engines, dashboard assembly and chart
//! rendering.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use salespulse::cli::{resolve_today, Command};
use salespulse::{
    assemble, load_ledger, recompute_forecast, recompute_segments, viz, Args, MemoryStore,
    SalesLedger,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    if args.verbose {
        println!("SalesPulse - Sales Analytics Engine");
        println!("===================================\n");
        println!("Loading sales data from: {}", args.input);
    }

    let load_start = Instant::now();
    let ledger = load_ledger(&args.input, args.leads.as_deref())?;
    if args.verbose {
        println!(
            "✓ Ledger loaded: {} orders, {} customers ({:.2}s)",
            ledger.orders().len(),
            ledger.customers().len(),
            load_start.elapsed().as_secs_f64()
        );
    }

    let verbose = args.verbose;
    match args.command {
        Command::Report {
            clusters,
            json,
            charts,
            today,
        } => run_report(verbose, &ledger, clusters, json, charts, resolve_today(today)),
        Command::Forecast => run_forecast(&ledger),
        Command::Segment { clusters, today } => {
            run_segment(&ledger, clusters, resolve_today(today))
        }
    }
}

/// Run both engines, assemble the payload, and emit JSON plus optional
/// charts
fn run_report(
    verbose: bool,
    ledger: &SalesLedger,
    clusters: usize,
    json: Option<String>,
    charts: Option<String>,
    today: chrono::NaiveDate,
) -> Result<()> {
    let mut store = MemoryStore::new();
    let start = Instant::now();

    if verbose {
        println!("\nStep 1: Recomputing forecast");
    }
    match recompute_forecast(ledger, &mut store)? {
        Some(record) => println!("✓ Forecast for {}: {:.2}", record.month, record.value),
        None => println!("✗ Not enough monthly history for a forecast"),
    }

    if verbose {
        println!("\nStep 2: Recomputing customer segments ({clusters} clusters)");
    }
    let written = recompute_segments(ledger, &mut store, today, clusters)?;
    println!("✓ Segments written: {written}");

    if verbose {
        println!("\nStep 3: Assembling dashboard payload");
    }
    let payload = assemble(ledger, &store)?;
    let rendered = serde_json::to_string_pretty(&payload)?;

    match json {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            println!("✓ Payload written to: {path}");
        }
        None => println!("{rendered}"),
    }

    if let Some(base) = charts {
        viz::render_charts(&payload, &base)?;
    }

    if verbose {
        println!("\n=== Report Complete ===");
        println!("Total processing time: {:.2}s", start.elapsed().as_secs_f64());
    }

    Ok(())
}

/// Recompute the forecast only
fn run_forecast(ledger: &SalesLedger) -> Result<()> {
    let mut store = MemoryStore::new();
    match recompute_forecast(ledger, &mut store)? {
        Some(record) => {
            println!("✓ Forecast appended");
            println!("  Month: {}", record.month);
            println!("  Forecasted revenue: {:.2}", record.value);
        }
        None => println!("✗ Not enough monthly history for a forecast (need at least 2 months)"),
    }
    Ok(())
}

/// Recompute customer segments only
fn run_segment(ledger: &SalesLedger, clusters: usize, today: chrono::NaiveDate) -> Result<()> {
    let mut store = MemoryStore::new();
    let written = recompute_segments(ledger, &mut store, today, clusters)?;
    if written == 0 {
        println!("✗ No customers with realized orders; nothing segmented");
        return Ok(());
    }

    println!("✓ Segments written: {written}");
    println!("\n=== Cluster Sizes ===");
    let payload = assemble(ledger, &store)?;
    for (label, size) in payload
        .segments
        .labels
        .iter()
        .zip(payload.segments.values.iter())
    {
        let percentage = (*size as f64 / written as f64) * 100.0;
        println!("{label}: {size} customers ({percentage:.1}%)");
    }
    Ok(())
}
