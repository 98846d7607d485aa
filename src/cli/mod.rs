//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod budget;
pub mod category;
pub mod check;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use check::handle_check_command;
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveDate;

use crate::config::Settings;
use crate::error::{FinTrackError, FinTrackResult};
use crate::ledger::Ledger;
use crate::models::Money;
use crate::storage::{RecordStore, Storage};

/// Ledger over every stored account, as recorded
pub(crate) fn load_ledger(storage: &Storage) -> FinTrackResult<Ledger> {
    Ok(Ledger::from_accounts(&storage.accounts()?))
}

pub(crate) fn parse_money(input: &str) -> FinTrackResult<Money> {
    Money::parse(input).map_err(|e| {
        FinTrackError::Validation(format!(
            "Invalid amount: '{}'. Use format like '12.50' or '12'. Error: {}",
            input, e
        ))
    })
}

/// Parse a date in the configured format, falling back to ISO
pub fn parse_date(input: &str, settings: &Settings) -> FinTrackResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), &settings.date_format)
        .or_else(|_| NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d"))
        .map_err(|_| {
            FinTrackError::Validation(format!(
                "Invalid date: '{}'. Expected {} or YYYY-MM-DD",
                input, settings.date_format
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_money_reports_input() {
        assert_eq!(parse_money("12.5").unwrap(), Money::from_cents(1250));
        let err = parse_money("twelve").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("twelve"));
    }

    #[test]
    fn test_parse_date_uses_configured_format() {
        let mut settings = Settings::default();
        settings.date_format = "%d/%m/%Y".into();
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();

        assert_eq!(parse_date("14/03/2025", &settings).unwrap(), expected);
        assert_eq!(parse_date("2025-03-14", &settings).unwrap(), expected);
        assert!(parse_date("March", &settings).unwrap_err().is_validation());
    }
}
