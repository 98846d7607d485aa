//! Ledger consistency check
//!
//! Recomputes every balance from opening balances and the stored
//! transactions, then compares against the recorded balances.

use crate::models::{Account, AccountId, Money, Transaction, TransactionId};

use super::Ledger;

/// A recorded balance that disagrees with the replayed one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discrepancy {
    pub account_id: AccountId,
    pub account_name: String,
    pub recorded: Money,
    pub expected: Money,
}

impl Discrepancy {
    /// `recorded - expected`
    pub fn drift(&self) -> Money {
        self.recorded - self.expected
    }
}

/// Result of a consistency check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    pub accounts_checked: usize,
    pub transactions_replayed: usize,
    pub discrepancies: Vec<Discrepancy>,
    /// Transactions referencing an account that no longer exists
    pub dangling: Vec<TransactionId>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.discrepancies.is_empty() && self.dangling.is_empty()
    }
}

impl Ledger {
    /// Rebuild balances from opening balances by applying every transaction
    ///
    /// Transactions that do not resolve are skipped and returned.
    pub fn replay<'a>(
        accounts: impl IntoIterator<Item = &'a Account>,
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> (Ledger, Vec<TransactionId>) {
        let mut ledger = Ledger::new();
        for account in accounts {
            ledger.open_account(account.id, account.opening_balance);
        }

        let mut skipped = Vec::new();
        for txn in transactions {
            if ledger.apply_effect(txn).is_err() {
                skipped.push(txn.id);
            }
        }
        (ledger, skipped)
    }
}

/// Compare recorded balances against a full replay
pub fn check_consistency(accounts: &[Account], transactions: &[Transaction]) -> ConsistencyReport {
    let (expected, dangling) = Ledger::replay(accounts, transactions);

    let mut discrepancies: Vec<Discrepancy> = accounts
        .iter()
        .filter_map(|account| {
            let replayed = expected.balance(account.id)?;
            (replayed != account.balance()).then(|| Discrepancy {
                account_id: account.id,
                account_name: account.name.clone(),
                recorded: account.balance(),
                expected: replayed,
            })
        })
        .collect();
    discrepancies.sort_by(|a, b| a.account_name.cmp(&b.account_name));

    ConsistencyReport {
        accounts_checked: accounts.len(),
        transactions_replayed: transactions.len() - dangling.len(),
        discrepancies,
        dangling,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountType, TransactionKind, UserId};
    use chrono::NaiveDate;

    fn account(name: &str, units: i64) -> Account {
        Account::with_opening_balance(
            UserId::from("alice"),
            name,
            AccountType::Bank,
            Money::from_units(units),
        )
    }

    fn txn(kind: TransactionKind, account_id: AccountId, units: i64) -> Transaction {
        Transaction::new(
            UserId::from("alice"),
            account_id,
            kind,
            Money::from_units(units),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            "",
        )
    }

    #[test]
    fn test_consistent_store_passes() {
        let mut a = account("Checking", 100);
        let mut b = account("Savings", 0);
        let txns = vec![
            txn(TransactionKind::expense("cat-groceries"), a.id, 40),
            txn(TransactionKind::transfer(b.id), a.id, 10),
        ];
        a.record_balance(Money::from_units(50));
        b.record_balance(Money::from_units(10));

        let report = check_consistency(&[a, b], &txns);
        assert!(report.is_consistent());
        assert_eq!(report.transactions_replayed, 2);
    }

    #[test]
    fn test_drift_is_reported() {
        let mut a = account("Checking", 100);
        let txns = vec![txn(TransactionKind::income("cat-salary"), a.id, 20)];
        a.record_balance(Money::from_units(100));

        let report = check_consistency(&[a.clone()], &txns);
        assert_eq!(report.discrepancies.len(), 1);
        let d = &report.discrepancies[0];
        assert_eq!(d.account_id, a.id);
        assert_eq!(d.expected, Money::from_units(120));
        assert_eq!(d.drift(), Money::from_units(-20));
    }

    #[test]
    fn test_dangling_transfer_is_skipped() {
        let a = account("Checking", 100);
        let orphan = txn(TransactionKind::transfer(AccountId::new()), a.id, 30);

        let report = check_consistency(&[a], &[orphan.clone()]);
        assert_eq!(report.dangling, vec![orphan.id]);
        assert!(report.discrepancies.is_empty());
        assert!(!report.is_consistent());
    }
}
