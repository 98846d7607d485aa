//! Ledger consistency check command

use crate::config::Settings;
use crate::error::FinTrackResult;
use crate::ledger::{check_consistency, ConsistencyReport};
use crate::storage::{RecordStore, Storage};

/// Replay every transaction and compare against the recorded balances
///
/// Returns the report so the caller can choose an exit status.
pub fn handle_check_command(storage: &Storage, settings: &Settings) -> FinTrackResult<ConsistencyReport> {
    let report = check_consistency(&storage.accounts()?, &storage.transactions()?);
    let currency = settings.currency_symbol.as_str();

    println!(
        "Checked {} account(s), replayed {} transaction(s)",
        report.accounts_checked, report.transactions_replayed
    );

    for d in &report.discrepancies {
        println!(
            "  {} ({}): recorded {}, expected {} (drift {})",
            d.account_name,
            d.account_id.short(),
            d.recorded.format_with_symbol(currency),
            d.expected.format_with_symbol(currency),
            d.drift().format_with_symbol(currency)
        );
    }
    for id in &report.dangling {
        println!("  transaction {} references a missing account", id.short());
    }

    if report.is_consistent() {
        println!("Ledger is consistent.");
    }

    Ok(report)
}
