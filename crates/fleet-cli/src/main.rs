mod cli;
mod context;
mod handlers;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use context::CliContext;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("FLEET_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "fleet", &mut std::io::stdout());
        return Ok(());
    }

    let ctx = match CliContext::load(cli.config, cli.page_size) {
        Ok(ctx) => ctx,
        Err(e) => output::output_error(&e.to_string()),
    };

    let result = match cli.command {
        Commands::Vehicles(args) => handlers::vehicles::handle(&ctx, args).await,
        Commands::Avatar(args) => handlers::avatar::handle(&ctx, args).await,
        Commands::Config => handlers::config::handle(&ctx),
        Commands::Completions { .. } => Ok(()),
    };

    if let Err(e) = result {
        output::output_error(&format!("{:#}", e));
    }
    Ok(())
}
