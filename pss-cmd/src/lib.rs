//! Command implementations for the PSS CLI.
//!
//! Provides subcommands for browsing the watershed catalog, printing
//! return series and assembling the dashboard from the live proxy.

use clap::{Args, Subcommand};
use pss_core::api::ProxyConfig;
use std::time::Duration;

pub mod catalog;
pub mod dashboard;
pub mod returns;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Base URL of the data proxy
    #[arg(long, global = true, default_value = "http://localhost:3000")]
    pub api_base: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 15)]
    pub timeout_secs: u64,

    /// Seed for the estimated return series (random when omitted)
    #[arg(long, global = true)]
    pub seed: Option<u64>,
}

impl GlobalOpts {
    pub fn proxy_config(&self) -> ProxyConfig {
        ProxyConfig {
            base_url: self.api_base.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// List watersheds with their recovery health
    Watersheds {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one watershed by slug
    Basin {
        slug: String,
    },

    /// Regional roll-up of population against recovery targets
    Summary {
        #[arg(long)]
        json: bool,
    },

    /// Print return estimates as CSV
    Returns {
        /// Watershed id or slug, or "all"
        #[arg(short = 'w', long, default_value = "all")]
        watershed: String,

        /// Species id or slug, or "all"
        #[arg(short = 's', long, default_value = "all")]
        species: String,

        #[arg(long)]
        start_year: Option<i32>,

        #[arg(long)]
        end_year: Option<i32>,

        /// Sum estimates per year instead of listing records
        #[arg(long)]
        by_year: bool,

        /// Output path for the CSV (stdout when omitted)
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Fetch stream temperatures and report the watershed median
    Stations {
        #[arg(short = 'w', long, default_value = "all")]
        watershed: String,
    },

    /// Fetch live data and print the dashboard for a selection
    Dashboard {
        #[arg(short = 'w', long, default_value = "all")]
        watershed: String,

        #[arg(short = 's', long, default_value = "all")]
        species: String,

        /// Skip the proxy and show estimates only
        #[arg(long)]
        offline: bool,

        #[arg(long)]
        json: bool,
    },
}

pub async fn run(opts: GlobalOpts, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Watersheds { json } => catalog::run_watersheds(json),
        Command::Basin { slug } => catalog::run_basin(&slug),
        Command::Summary { json } => catalog::run_summary(json),
        Command::Returns {
            watershed,
            species,
            start_year,
            end_year,
            by_year,
            output,
        } => returns::run_returns(
            &opts,
            &watershed,
            &species,
            start_year,
            end_year,
            by_year,
            output.as_deref(),
        ),
        Command::Stations { watershed } => dashboard::run_stations(&opts, &watershed).await,
        Command::Dashboard {
            watershed,
            species,
            offline,
            json,
        } => dashboard::run_dashboard(&opts, &watershed, &species, offline, json).await,
    }
}
