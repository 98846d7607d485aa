//! Account ledger
//!
//! The ledger owns the mapping from account id to balance and is the only
//! place balances change. Every change is a transaction effect applied
//! forward or in reverse, so `apply_effect` followed by `reverse_effect` is
//! always a no-op.
//!
//! Services build a ledger from one consistent account snapshot, stage
//! changes on a copy, and persist the balances that moved via
//! [`Ledger::changed_since`].

pub mod check;
pub mod effect;

pub use check::{check_consistency, ConsistencyReport, Discrepancy};
pub use effect::{Effect, Leg};

use std::collections::HashMap;

use tracing::debug;

use crate::error::{FinTrackError, FinTrackResult};
use crate::models::{Account, AccountId, Money, Transaction};

/// Balances keyed by account
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    balances: HashMap<AccountId, Money>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from the current balances of `accounts`
    pub fn from_accounts<'a>(accounts: impl IntoIterator<Item = &'a Account>) -> Self {
        Self {
            balances: accounts
                .into_iter()
                .map(|account| (account.id, account.balance()))
                .collect(),
        }
    }

    /// Register an account. Returns false if it was already present.
    pub fn open_account(&mut self, account_id: AccountId, opening_balance: Money) -> bool {
        if self.balances.contains_key(&account_id) {
            return false;
        }
        self.balances.insert(account_id, opening_balance);
        true
    }

    /// Drop an account, returning its final balance
    pub fn close_account(&mut self, account_id: AccountId) -> Option<Money> {
        self.balances.remove(&account_id)
    }

    pub fn balance(&self, account_id: AccountId) -> Option<Money> {
        self.balances.get(&account_id).copied()
    }

    pub fn contains(&self, account_id: AccountId) -> bool {
        self.balances.contains_key(&account_id)
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Sum of every balance in the ledger
    pub fn total(&self) -> Money {
        self.balances.values().sum()
    }

    /// Apply the forward effect of `txn`
    ///
    /// All referenced accounts are resolved before any leg is applied, so a
    /// transfer with a missing side changes nothing.
    pub fn apply_effect(&mut self, txn: &Transaction) -> FinTrackResult<()> {
        debug!(transaction = %txn.id, kind = %txn.tag(), amount = %txn.amount, "applying effect");
        self.apply(&Effect::of(txn))
    }

    /// Undo the effect of `txn` by applying its negation
    pub fn reverse_effect(&mut self, txn: &Transaction) -> FinTrackResult<()> {
        debug!(transaction = %txn.id, kind = %txn.tag(), amount = %txn.amount, "reversing effect");
        self.apply(&Effect::of(txn).reversed())
    }

    fn apply(&mut self, effect: &Effect) -> FinTrackResult<()> {
        if let Some(missing) = effect
            .legs()
            .iter()
            .find(|leg| !self.balances.contains_key(&leg.account_id))
        {
            return Err(FinTrackError::missing_account(missing.account_id));
        }

        let mut updated: HashMap<AccountId, Money> = HashMap::new();
        for leg in effect.legs() {
            let current = match updated.get(&leg.account_id) {
                Some(balance) => *balance,
                None => self.balances[&leg.account_id],
            };
            let next = current.checked_add(leg.delta).ok_or_else(|| {
                FinTrackError::Validation(format!(
                    "Balance of account {} would overflow",
                    leg.account_id
                ))
            })?;
            updated.insert(leg.account_id, next);
        }

        self.balances.extend(updated);
        Ok(())
    }

    /// Accounts whose balance differs from `before`, with their new balance
    ///
    /// Accounts absent from `self` are not reported.
    pub fn changed_since(&self, before: &Ledger) -> Vec<(AccountId, Money)> {
        let mut changed: Vec<_> = self
            .balances
            .iter()
            .filter(|(id, balance)| before.balances.get(id) != Some(balance))
            .map(|(id, balance)| (*id, *balance))
            .collect();
        changed.sort_by_key(|(id, _)| *id);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountType, TransactionKind, UserId};
    use chrono::NaiveDate;

    fn account(units: i64) -> Account {
        Account::with_opening_balance(
            UserId::from("alice"),
            "Test",
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
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            "",
        )
    }

    #[test]
    fn test_income_and_expense() {
        let a = account(100);
        let mut ledger = Ledger::from_accounts([&a]);

        ledger
            .apply_effect(&txn(TransactionKind::income("cat-salary"), a.id, 25))
            .unwrap();
        assert_eq!(ledger.balance(a.id), Some(Money::from_units(125)));

        ledger
            .apply_effect(&txn(TransactionKind::expense("cat-housing"), a.id, 40))
            .unwrap();
        assert_eq!(ledger.balance(a.id), Some(Money::from_units(85)));
    }

    #[test]
    fn test_round_trip_is_noop_for_every_kind() {
        let a = account(100);
        let b = account(0);
        let original = Ledger::from_accounts([&a, &b]);

        for kind in [
            TransactionKind::income("cat-salary"),
            TransactionKind::expense("cat-groceries"),
            TransactionKind::transfer(b.id),
        ] {
            let t = txn(kind, a.id, 37);
            let mut ledger = original.clone();
            ledger.apply_effect(&t).unwrap();
            assert_ne!(ledger, original);
            ledger.reverse_effect(&t).unwrap();
            assert_eq!(ledger, original);
        }
    }

    #[test]
    fn test_transfer_conserves_total() {
        let a = account(100);
        let b = account(0);
        let mut ledger = Ledger::from_accounts([&a, &b]);
        let before = ledger.total();

        ledger
            .apply_effect(&txn(TransactionKind::transfer(b.id), a.id, 30))
            .unwrap();

        assert_eq!(ledger.balance(a.id), Some(Money::from_units(70)));
        assert_eq!(ledger.balance(b.id), Some(Money::from_units(30)));
        assert_eq!(ledger.total(), before);
    }

    #[test]
    fn test_transfer_with_missing_side_applies_nothing() {
        let a = account(100);
        let mut ledger = Ledger::from_accounts([&a]);
        let snapshot = ledger.clone();

        let err = ledger
            .apply_effect(&txn(TransactionKind::transfer(AccountId::new()), a.id, 30))
            .unwrap_err();
        assert!(err.is_referential_integrity());
        assert_eq!(ledger, snapshot);

        let err = ledger
            .reverse_effect(&txn(TransactionKind::transfer(a.id), AccountId::new(), 30))
            .unwrap_err();
        assert!(err.is_referential_integrity());
        assert_eq!(ledger, snapshot);
    }

    #[test]
    fn test_overflowing_leg_applies_nothing() {
        let rich = Account::with_opening_balance(
            UserId::from("alice"),
            "Rich",
            AccountType::Bank,
            Money::from_cents(i64::MAX - 10),
        );
        let other = account(100);
        let mut ledger = Ledger::from_accounts([&rich, &other]);
        let snapshot = ledger.clone();

        let err = ledger
            .apply_effect(&txn(TransactionKind::income("cat-salary"), rich.id, 1))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(ledger, snapshot);

        // The debit leg is fine; the credit leg overflows
        let err = ledger
            .apply_effect(&txn(TransactionKind::transfer(rich.id), other.id, 1))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(ledger, snapshot);
    }

    #[test]
    fn test_changed_since_reports_only_moved_balances() {
        let a = account(100);
        let b = account(50);
        let c = account(10);
        let before = Ledger::from_accounts([&a, &b, &c]);
        let mut after = before.clone();
        after
            .apply_effect(&txn(TransactionKind::transfer(b.id), a.id, 5))
            .unwrap();

        let mut changed = after.changed_since(&before);
        changed.sort_by_key(|(_, m)| *m);
        assert_eq!(
            changed,
            {
                let mut expected = vec![
                    (a.id, Money::from_units(95)),
                    (b.id, Money::from_units(55)),
                ];
                expected.sort_by_key(|(_, m)| *m);
                expected
            }
        );
    }

    #[test]
    fn test_open_and_close_account() {
        let mut ledger = Ledger::new();
        let id = AccountId::new();
        assert!(ledger.open_account(id, Money::from_units(5)));
        assert!(!ledger.open_account(id, Money::zero()));
        assert_eq!(ledger.close_account(id), Some(Money::from_units(5)));
        assert!(ledger.is_empty());
    }
}
