//! Category CLI commands
//!
//! The catalog is fixed, so categories can only be listed.

use clap::Subcommand;

use crate::display::category::format_catalog;
use crate::error::{FinTrackError, FinTrackResult};
use crate::models::TransactionKindTag;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List the category catalog
    List {
        /// Only categories usable for this type (income, expense)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },
}

/// Handle a category command
pub fn handle_category_command(cmd: CategoryCommands) -> FinTrackResult<()> {
    match cmd {
        CategoryCommands::List { kind } => {
            let kind = kind
                .map(|k| {
                    TransactionKindTag::parse(&k).ok_or_else(|| {
                        FinTrackError::Validation(format!(
                            "Invalid transaction type: '{}'. Valid types: income, expense, transfer",
                            k
                        ))
                    })
                })
                .transpose()?;
            print!("{}", format_catalog(kind));
        }
    }

    Ok(())
}
