//! Account display formatting
//!
//! Formats accounts for terminal output in table and detail views.

use crate::models::{Account, Money, UserId};

/// Format a list of accounts with balances as a table
///
/// Accounts owned by someone other than `viewer` are marked as shared.
pub fn format_account_list(accounts: &[Account], viewer: &UserId, currency: &str) -> String {
    if accounts.is_empty() {
        return "No accounts found.\n".to_string();
    }

    let name_width = accounts
        .iter()
        .map(|a| a.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8}  {:<name_width$}  {:<11}  {:>14}  {}\n",
        "ID",
        "Name",
        "Type",
        "Balance",
        "Access",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<8}  {:-<name_width$}  {:-<11}  {:->14}  {:-<10}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for account in accounts {
        let access = if account.is_owned_by(viewer) {
            if account.shared_with.is_empty() {
                String::new()
            } else {
                format!("shared with {}", account.shared_with.len())
            }
        } else {
            format!("from {}", account.owner_id)
        };

        output.push_str(&format!(
            "{:<8}  {:<name_width$}  {:<11}  {:>14}  {}\n",
            account.id.short(),
            account.name,
            account.account_type,
            account.balance().format_with_symbol(currency),
            access,
            name_width = name_width,
        ));
    }

    let total: Money = accounts.iter().map(|a| a.balance()).sum();
    output.push_str(&format!(
        "{:-<8}  {:-<name_width$}  {:-<11}  {:->14}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:<8}  {:<name_width$}  {:<11}  {:>14}\n",
        "",
        "TOTAL",
        "",
        total.format_with_symbol(currency),
        name_width = name_width,
    ));

    output
}

/// Format a single account's details
pub fn format_account_details(account: &Account, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Account: {}\n", account.name));
    output.push_str(&format!("  Type:             {}\n", account.account_type));
    output.push_str(&format!("  ID:               {}\n", account.id));
    output.push_str(&format!("  Owner:            {}\n", account.owner_id));
    if let Some(bank) = &account.bank_name {
        output.push_str(&format!("  Bank:             {}\n", bank));
    }
    if let Some(last4) = &account.last4_digits {
        output.push_str(&format!("  Card:             **** {}\n", last4));
    }
    output.push('\n');
    output.push_str(&format!(
        "  Opening Balance:  {}\n",
        account.opening_balance.format_with_symbol(currency)
    ));
    output.push_str(&format!(
        "  Current Balance:  {}\n",
        account.balance().format_with_symbol(currency)
    ));

    if !account.shared_with.is_empty() {
        let users: Vec<_> = account.shared_with.iter().map(|u| u.as_str()).collect();
        output.push('\n');
        output.push_str(&format!("  Shared with: {}\n", users.join(", ")));
    }

    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        account.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        account.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountType;

    fn account(owner: &str, name: &str, cents: i64) -> Account {
        Account::with_opening_balance(
            UserId::from(owner),
            name,
            AccountType::Bank,
            Money::from_cents(cents),
        )
    }

    #[test]
    fn test_format_account_list() {
        let alice = UserId::from("alice");
        let accounts = vec![account("alice", "Checking", 100000), account("bob", "Joint", 5050)];

        let output = format_account_list(&accounts, &alice, "$");
        assert!(output.contains("Checking"));
        assert!(output.contains("$1000.00"));
        assert!(output.contains("from bob"));
        assert!(output.contains("TOTAL"));
        assert!(output.contains("$1050.50"));
    }

    #[test]
    fn test_format_empty_list() {
        let output = format_account_list(&[], &UserId::from("alice"), "$");
        assert!(output.contains("No accounts found"));
    }

    #[test]
    fn test_format_account_details() {
        let mut a = account("alice", "Visa", -2500);
        a.account_type = AccountType::CreditCard;
        a.last4_digits = Some("4242".into());
        a.share_with(UserId::from("bob"));

        let output = format_account_details(&a, "€");
        assert!(output.contains("Account: Visa"));
        assert!(output.contains("**** 4242"));
        assert!(output.contains("-€25.00"));
        assert!(output.contains("Shared with: bob"));
    }
}
