//! PSS CLI - Command line tool for Puget Sound salmon return and watershed data.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "pss-cli",
    version,
    about = "Puget Sound salmon health toolkit"
)]
struct Cli {
    #[command(flatten)]
    opts: pss_cmd::GlobalOpts,

    #[command(subcommand)]
    command: pss_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("proxy at {} (timeout {}s)", cli.opts.api_base, cli.opts.timeout_secs);
    pss_cmd::run(cli.opts, cli.command).await
}
