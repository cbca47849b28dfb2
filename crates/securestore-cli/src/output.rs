//! Console output helpers for CLI commands.

use serde::Serialize;

use securestore_core::error::AppError;

/// Print a value as pretty JSON
pub fn print_json<T: Serialize>(item: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(item)?);
    Ok(())
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}
