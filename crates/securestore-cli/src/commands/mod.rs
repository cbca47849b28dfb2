//! CLI command definitions and dispatch.

pub mod keygen;
pub mod migrate;
pub mod serve;
pub mod sweep;

use clap::{Parser, Subcommand};

use securestore_core::config::AppConfig;
use securestore_core::error::AppError;

/// SecureStore: encrypted file storage with expiring share links
#[derive(Debug, Parser)]
#[command(name = "securestore", version, about, long_about = None)]
pub struct Cli {
    /// Configuration profile, layered over `config/default.toml`
    #[arg(short, long, env = "SECURESTORE_ENV", default_value = "development")]
    pub env: String,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the SecureStore server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Generate a new file encryption key
    Keygen,
    /// Run one background sweep now
    Sweep(sweep::SweepArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        tracing::debug!(env = %self.env, command = ?self.command, "Running command");
        let result = match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.env).await,
            Commands::Migrate(args) => migrate::execute(args, &self.env).await,
            Commands::Keygen => {
                keygen::execute();
                Ok(())
            }
            Commands::Sweep(args) => sweep::execute(args, &self.env).await,
        };
        if let Err(e) = &result {
            tracing::error!(error = %e, "Command failed");
        }
        result
    }
}

/// Helper: load configuration for a profile
pub fn load_config(env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(env)
}
