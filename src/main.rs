use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, warn};

use order_export::config::ConvertConfig;
use order_export::logging;
use order_export::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "order_export")]
#[command(about = "Convert the order workbook into dashboard JSON")]
#[command(version)]
struct Cli {
    /// TOML file overriding sheet names, header variants and cleaning rules
    #[arg(long)]
    config: Option<PathBuf>,

    /// Workbook to read (overrides the config file)
    #[arg(long)]
    workbook: Option<PathBuf>,

    /// Directory receiving orders.json and metadata.json (overrides the config file)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Also write JSON logs, rotated daily, into this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init_logging(cli.log_dir.as_deref());

    let mut config = match &cli.config {
        Some(path) => ConvertConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ConvertConfig::default(),
    };
    if let Some(workbook) = cli.workbook {
        config.workbook = workbook;
    }
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }

    println!("{}", "=".repeat(50));
    println!("Order workbook to JSON converter");
    println!("{}", "=".repeat(50));

    let result = match Pipeline::run_workbook(&config) {
        Ok(result) => result,
        Err(e) => {
            error!("Conversion failed: {}", e);
            return Err(e).with_context(|| format!("converting {}", config.workbook.display()));
        }
    };

    for sheet in &result.sheets_skipped {
        warn!("Sheet '{}' was not in the workbook", sheet);
    }
    println!("\n📊 Conversion results:");
    println!("   Sheets loaded: {}", result.sheets.len());
    println!("   Rows merged: {}", result.rows_merged);
    println!("   Rows dropped (no order number): {}", result.rows_dropped);
    println!("   Records written: {}", result.records_written);
    println!("   Unique orders: {}", result.total_orders);
    println!("   Total revenue: RM {:.2}", result.total_revenue);
    for export in &result.exports {
        println!("   {} ({} bytes, sha256 {})", export.path.display(), export.bytes, export.sha256);
    }
    println!("✅ Conversion complete!");

    Ok(())
}
