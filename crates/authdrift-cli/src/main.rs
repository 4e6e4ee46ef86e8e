//! authdrift operator CLI.
//!
//! - `authdrift scenarios` - print or export the scenario matrix
//! - `authdrift run` - provision fixtures and execute a differential run

mod config;
mod run;
mod scenarios;

use clap::{Parser, Subcommand};

/// Differential authorization probe for drive-style sharing services.
#[derive(Parser)]
#[command(name = "authdrift")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print or export the scenario matrix with expected decisions.
    Scenarios(scenarios::ScenariosArgs),

    /// Execute the full differential run against the live service.
    ///
    /// Requires a config naming one bearer-token file per identity; token
    /// acquisition itself is out of scope.
    Run(run::RunArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for tables and JSON.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scenarios(args) => scenarios::run(&args),
        Commands::Run(args) => run::run(args).await,
    }
}
