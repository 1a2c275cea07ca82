//! Terminal rendering for each command

pub mod advise;
pub mod loans;
pub mod outlook;
pub mod pay;
pub mod portfolio;
pub mod project;
pub mod setup;
pub mod strategy;
pub mod ui;

use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Prints `value` as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
