use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use env_logger::Env;

use ordersplit::split_sales;

/// Split a sales transaction export into one Excel workbook per order.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the sales data CSV file
    sales_csv: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let written = split_sales(&args.sales_csv, Local::now().date_naive())?;
    println!("{} order workbooks written", written.len());
    Ok(())
}
