//! Transaction display formatting
//!
//! Register rows and detail views. Account names are resolved through a
//! caller-supplied map so that transfers can name both sides.

use std::collections::HashMap;

use crate::models::category;
use crate::models::{AccountId, Transaction, TransactionKind};

/// Account id to display name
pub type AccountNames = HashMap<AccountId, String>;

fn account_name(names: &AccountNames, id: AccountId) -> String {
    names
        .get(&id)
        .cloned()
        .unwrap_or_else(|| format!("(missing {})", id.short()))
}

/// Category name for income and expense, "A -> B" for transfers
fn label(txn: &Transaction, names: &AccountNames) -> String {
    match &txn.kind {
        TransactionKind::Income { category_id } | TransactionKind::Expense { category_id } => {
            category::lookup(category_id).name.to_string()
        }
        TransactionKind::Transfer { to_account_id, .. } => format!(
            "{} -> {}",
            account_name(names, txn.account_id),
            account_name(names, *to_account_id)
        ),
    }
}

/// Amount as it affects the source account
fn signed_amount(txn: &Transaction, currency: &str) -> String {
    let amount = txn.amount.format_with_symbol(currency);
    match txn.kind {
        TransactionKind::Income { .. } => format!("+{}", amount),
        TransactionKind::Expense { .. } => format!("-{}", amount),
        TransactionKind::Transfer { .. } => amount,
    }
}

/// Format a single transaction for display (register row)
pub fn format_transaction_row(txn: &Transaction, names: &AccountNames, currency: &str) -> String {
    format!(
        "{:8} {} {:<8} {} {:>14}  {}",
        txn.id.short(),
        txn.date.format("%Y-%m-%d"),
        txn.tag(),
        truncate(&label(txn, names), 24),
        signed_amount(txn, currency),
        txn.description
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_register(
    transactions: &[Transaction],
    names: &AccountNames,
    currency: &str,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:8} {:10} {:<8} {:24} {:>14}  {}\n",
        "ID", "Date", "Type", "Category", "Amount", "Description"
    ));
    output.push_str(&"-".repeat(84));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn, names, currency));
        output.push('\n');
    }

    output
}

/// Format transaction details for display
pub fn format_transaction_details(
    txn: &Transaction,
    names: &AccountNames,
    currency: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Type:        {}\n", txn.tag()));
    output.push_str(&format!(
        "Amount:      {}\n",
        txn.amount.format_with_symbol(currency)
    ));

    match &txn.kind {
        TransactionKind::Transfer { to_account_id, .. } => {
            output.push_str(&format!(
                "From:        {}\n",
                account_name(names, txn.account_id)
            ));
            output.push_str(&format!(
                "To:          {}\n",
                account_name(names, *to_account_id)
            ));
        }
        TransactionKind::Income { category_id } | TransactionKind::Expense { category_id } => {
            output.push_str(&format!(
                "Account:     {}\n",
                account_name(names, txn.account_id)
            ));
            output.push_str(&format!(
                "Category:    {}\n",
                category::lookup(category_id).name
            ));
        }
    }

    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }

    output
}

/// Pad to `max_len` characters, or cut with an ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        format!("{:width$}", s, width = max_len)
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, UserId};
    use chrono::NaiveDate;

    fn txn(kind: TransactionKind, account_id: AccountId) -> Transaction {
        Transaction::new(
            UserId::from("alice"),
            account_id,
            kind,
            Money::from_cents(5000),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            "Test Store",
        )
    }

    #[test]
    fn test_format_transaction_row() {
        let t = txn(TransactionKind::expense("cat-groceries"), AccountId::new());

        let formatted = format_transaction_row(&t, &AccountNames::new(), "$");
        assert!(formatted.contains("2025-01-15"));
        assert!(formatted.contains("Groceries"));
        assert!(formatted.contains("-$50.00"));
        assert!(formatted.contains("Test Store"));
    }

    #[test]
    fn test_transfer_names_both_sides() {
        let (from, to) = (AccountId::new(), AccountId::new());
        let names: AccountNames = [(from, "Checking".to_string()), (to, "Savings".to_string())]
            .into_iter()
            .collect();
        let t = txn(TransactionKind::transfer(to), from);

        assert!(format_transaction_row(&t, &names, "$").contains("Checking -> Savings"));
        let details = format_transaction_details(&t, &names, "$");
        assert!(details.contains("From:        Checking"));
        assert!(details.contains("To:          Savings"));
    }

    #[test]
    fn test_format_empty_register() {
        let formatted = format_transaction_register(&[], &AccountNames::new(), "$");
        assert!(formatted.contains("No transactions found"));
    }

    #[test]
    fn test_details_show_unknown_category() {
        let t = txn(TransactionKind::income("cat-removed"), AccountId::new());
        let formatted = format_transaction_details(&t, &AccountNames::new(), "$");
        assert!(formatted.contains("Category:    Unknown"));
        assert!(formatted.contains("(missing "));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Short", 10).trim(), "Short");
        let result = truncate("A very long string", 10);
        assert_eq!(result.chars().count(), 10);
        assert!(result.ends_with("..."));
    }
}
