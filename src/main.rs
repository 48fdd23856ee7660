use clap::Parser;
use tracing::{debug, error, info};

use sosreport_cli::cli::Cli;
use sosreport_cli::client::SosreportClient;
use sosreport_cli::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    debug!("Flags:\n{}", cli.print_flags());

    if let Err(e) = run(&cli).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let client = SosreportClient::new(cli).await?;
    info!(
        namespace = %client.namespace(),
        dry_run = client.is_dry_run(),
        "client_ready"
    );

    let name = client.run(cli).await?;
    info!(name = %name, "sosreport_requested");
    Ok(())
}
