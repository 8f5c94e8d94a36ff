//! CLI entry point for the PDF scraper.

use std::io::{self, IsTerminal, Write};

use anyhow::Result;
use clap::Parser;
use pdfscrape::scrape::{RunProgress, Scraper};
use pdfscrape::server;
use tracing::debug;

mod cli;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    if let Some(Command::Serve(serve)) = args.command {
        server::run(serve.address).await?;
        return Ok(());
    }

    let target = match args.url {
        Some(url) => url,
        None => prompt_for_url()?,
    };
    if target.trim().is_empty() {
        anyhow::bail!("No URL provided");
    }

    let scraper = Scraper::new();
    let report = scraper
        .run_with_observer(&target, args.output.as_deref(), print_progress)
        .await;

    for error in &report.errors {
        println!("{error}");
    }
    println!("{} downloaded, {} failed", report.downloaded(), report.failed());

    Ok(())
}

/// Prints the progress line for one run event.
fn print_progress(progress: RunProgress<'_>) {
    match progress {
        RunProgress::Downloading { name } => println!("Downloading: {name}"),
        RunProgress::Finished { outcome } => {
            if outcome.is_success() {
                let kb = outcome.size_bytes as f64 / 1024.0;
                println!("Saved: {} ({kb:.1} KB)", outcome.name);
            } else {
                println!(
                    "Failed to download {}: {}",
                    outcome.name,
                    outcome.error_message.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }
}

/// Reads the target URL interactively, or from piped stdin.
fn prompt_for_url() -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        print!("Enter the website URL: ");
        io::stdout().flush()?;
    }

    let mut buffer = String::new();
    stdin.read_line(&mut buffer)?;
    Ok(buffer.trim().to_string())
}
