//! Parse one export and print the summary and the top products by conversion.
//!
//! ```text
//! RUST_LOG=clickstream=info cargo run --release --example analyze -- 2019-Nov.csv [config.json]
//! ```

use anyhow::{Context, Result};
use clickstream::*;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const TOP_N: usize = 10;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().context("usage: analyze <export.csv> [config.json]")?;
    let config = match args.next() {
        Some(cfg) => IngestConfig::from_json_file(cfg)?,
        None => IngestConfig::default(),
    };

    // Reservation failures are fatal here: the error propagates out of main.
    let mut session = ParseSession::new(config)?;
    let file = MappedFile::open(&path)?;

    println!("Processing file: {path}");
    let started = Instant::now();
    let stats = session.ingest_file(&file);
    let secs = started.elapsed().as_secs_f64();

    println!("\nPerformance Results:");
    println!("  Parsed {} valid records in {secs:.3} seconds.", stats.accepted);
    println!("  Dropped {} of {} lines.", stats.rejected.total(), stats.lines);
    if secs > 0.0 {
        println!("  Processing speed: {:.2} million records/sec.", stats.accepted as f64 / 1e6 / secs);
    }

    let events = session.events();
    let started = Instant::now();
    let summary = summarize(events);
    let products = product_stats(events);
    println!("\nAnalysis phase took {:.3} seconds.", started.elapsed().as_secs_f64());

    print_summary(&summary);
    print_top_products(&top_by_conversion(&products, TOP_N, ConversionFilter::default()));
    Ok(())
}

fn print_summary(summary: &Summary) {
    println!("--- Analysis Summary ---");
    println!("  Total Revenue:            ${:.2}", summary.total_revenue);
    println!("  Total View Events:        {}", summary.views);
    println!("  Total Cart Events:        {}", summary.carts);
    println!("  Total Remove Cart Events: {}", summary.removals);
    println!("  Total Purchase Events:    {}", summary.purchases);
    println!("--------------------------");
}

fn print_top_products(ranked: &[ProductRank]) {
    println!("\n--- Top {TOP_N} Products by Purchase-to-View Rate ---");
    println!("{:<15}{:<15}{:<15}{:<15}", "Product ID", "Views", "Purchases", "Conv. Rate (%)");
    println!("{}", "-".repeat(60));
    for r in ranked {
        println!(
            "{:<15}{:<15}{:<15}{:.4}%",
            r.product_id, r.stats.views, r.stats.purchases, r.conversion_rate
        );
    }
    println!("{}", "-".repeat(60));
}
