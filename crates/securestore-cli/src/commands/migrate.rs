//! Database migration management commands.

use clap::{Args, Subcommand};

use securestore_core::error::AppError;
use securestore_database::{DatabasePool, migration};

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, env: &str) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    if config.uses_memory_records() {
        return Err(AppError::configuration(
            "database.url must be set to run migrations",
        ));
    }
    let pool = DatabasePool::connect(&config.database).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            let applied = migration::run_migrations(pool.pool()).await;
            pool.close().await;
            applied?;
            output::print_success("All migrations applied successfully.");
        }
    }

    Ok(())
}
