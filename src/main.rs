use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use avl_matching::config::Config;
use avl_matching::inbounds::{LoadSummary, OrderEntry, load_orders_from_path, load_sample};
use avl_matching::outbounds::render::{render_book, render_load_summary, render_trades};
use avl_matching::outbounds::{LoadReport, to_json};
use avl_matching::session::run_session;
use avl_matching::MatchingEngine;

/// Command line arguments for the order book tool
#[derive(Parser, Debug)]
#[command(author, version, about = "Limit order book with price-time priority matching")]
struct Args {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Load orders from a CSV file and print the resulting book
    Load {
        /// CSV file with `id,userId,side,price,size` rows
        file: PathBuf,

        /// Levels to show per side
        #[arg(short, long)]
        levels: Option<usize>,

        /// Recent trades to show
        #[arg(short, long)]
        trades: Option<usize>,

        /// Print a JSON report instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Load the bundled sample book and print it
    Example {
        #[arg(short, long)]
        levels: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Interactive order entry on stdin
    Repl {
        /// Seed the book from a CSV file first
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn print_summary(summary: &LoadSummary, levels: usize, trades: usize, json: bool) -> Result<()> {
    if json {
        let report = LoadReport::new(summary, levels, trades);
        println!("{}", to_json(&report).context("failed to serialize report")?);
        return Ok(());
    }

    let recent: Vec<_> = summary
        .engine
        .get_recent_trades(trades)
        .into_iter()
        .cloned()
        .collect();
    println!("{}", render_load_summary(summary));
    println!();
    println!("{}", render_book(&summary.engine.depth(levels)));
    println!();
    println!("{}", render_trades(&recent));
    Ok(())
}

fn main() -> Result<()> {
    let config = Config::try_from_env().map_err(anyhow::Error::msg)?;

    // Initialize logging; RUST_LOG wins over LOG_LEVEL
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match args.mode {
        Mode::Load {
            file,
            levels,
            trades,
            json,
        } => {
            let summary = load_orders_from_path(&file)
                .with_context(|| format!("failed to load orders from {}", file.display()))?;
            print_summary(
                &summary,
                levels.unwrap_or(config.book_levels),
                trades.unwrap_or(config.recent_trades),
                json,
            )?;
        }
        Mode::Example { levels, json } => {
            let summary = load_sample().context("failed to load the sample book")?;
            print_summary(
                &summary,
                levels.unwrap_or(config.book_levels),
                config.recent_trades,
                json,
            )?;
        }
        Mode::Repl { file } => {
            let mut engine = match file {
                Some(file) => {
                    load_orders_from_path(&file)
                        .with_context(|| format!("failed to load orders from {}", file.display()))?
                        .engine
                }
                None => MatchingEngine::new(),
            };
            info!(resting = engine.order_count(), "starting order entry session");

            let entry = OrderEntry::new(&config);
            let stdin = io::stdin();
            run_session(&mut engine, &entry, stdin.lock(), io::stdout().lock())
                .context("order entry session failed")?;
        }
    }

    Ok(())
}
