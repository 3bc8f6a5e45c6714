//! oktactl CLI entry point.

use clap::Parser;
use oktactl_client::cli::Cli;
use oktactl_client::commands::{execute, Services};
use oktactl_client::output::report::{print_error, ConsoleReporter};
use oktactl_client::{OktaClient, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            print_error(&e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "oktactl_client=debug,oktactl_core=debug"
    } else {
        "oktactl_client=warn,oktactl_core=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<String> {
    // Validated before any network call.
    let config = cli.okta_config()?;
    let client = OktaClient::new(config)?;
    tracing::debug!(?client, "Client ready");

    let reporter = ConsoleReporter::new(cli.quiet);
    execute(
        cli.command,
        Services::uniform(&client),
        &reporter,
        cli.output_format,
    )
    .await
}
