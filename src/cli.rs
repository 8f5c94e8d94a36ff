//! CLI argument definitions using clap derive macros.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};

/// Find and download every PDF linked on a web page.
///
/// Pass a page URL to download its PDFs in one shot, or run `serve` to get
/// the polling dashboard and the scan API.
#[derive(Parser, Debug)]
#[command(name = "pdfscrape")]
#[command(author, version, about)]
pub struct Args {
    /// Page to scrape; prompts interactively when omitted
    pub url: Option<String>,

    /// Output folder for downloads (supports ~; default: Downloaded_PDFs beside the program)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the dashboard and scan API server
    Serve(ServeArgs),
}

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "127.0.0.1:5000")]
    pub address: SocketAddr,
}
