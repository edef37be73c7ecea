use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fleet")]
#[command(about = "Page through a fleet list served from a JSON fixture", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file to use instead of the platform default (or set FLEET_CONFIG env var)
    #[arg(long, global = true, value_name = "FILE", env = "FLEET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the configured page size
    #[arg(long, global = true)]
    pub page_size: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the vehicle list the way the list screen does
    Vehicles(VehiclesArgs),
    /// Load one user's avatar
    Avatar(AvatarArgs),
    /// Print the effective configuration
    Config,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct VehiclesArgs {
    /// Fixture file with `vehicles`, `users` and `images`
    #[arg(long, value_name = "FILE")]
    pub fixture: PathBuf,
    /// Search text applied after the first page loads
    #[arg(long)]
    pub search: Option<String>,
    /// Number of pages to load in total
    #[arg(long, default_value_t = 1)]
    pub pages: usize,
    /// Refresh the loaded window once before printing
    #[arg(long)]
    pub refresh: bool,
    /// Answer the first request without a total count
    #[arg(long)]
    pub unknown_count: bool,
    /// Fail every request with this HTTP status
    #[arg(long)]
    pub fail_status: Option<u16>,
}

#[derive(Args)]
pub struct AvatarArgs {
    #[arg(long, value_name = "FILE")]
    pub fixture: PathBuf,
    #[arg(long)]
    pub user_id: String,
    /// Fail the image request with this HTTP status
    #[arg(long)]
    pub fail_status: Option<u16>,
}
