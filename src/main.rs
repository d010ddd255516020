//! tabeval - entry point

use clap::Parser;
use tabular_eval::cli::{cmd_config, cmd_info, cmd_preset, cmd_run, Cli, Commands};
use tabular_eval::evaluation::Preset;

fn main() -> anyhow::Result<()> {
    // stdout carries the report, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tabeval=info,tabular_eval=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Iris(args) => cmd_preset(Preset::Iris, &args)?,
        Commands::Sales(args) => cmd_preset(Preset::Sales, &args)?,
        Commands::Titanic(args) => cmd_preset(Preset::Titanic, &args)?,
        Commands::Run { config } => cmd_run(&config)?,
        Commands::Config { preset } => cmd_config(&preset)?,
        Commands::Info { data } => cmd_info(&data)?,
    }

    Ok(())
}
