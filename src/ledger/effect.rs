//! Balance effects
//!
//! An effect is the set of signed balance deltas a transaction causes. It is
//! derived from the kind, amount and account ids only; descriptions, dates
//! and categories never reach the ledger.

use crate::models::{AccountId, Money, Transaction, TransactionKind};

/// One signed delta against one account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg {
    pub account_id: AccountId,
    pub delta: Money,
}

/// The legs of a transaction: one for income/expense, two for transfers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Effect {
    legs: Vec<Leg>,
}

impl Effect {
    /// Forward effect of `txn`
    pub fn of(txn: &Transaction) -> Self {
        let legs = match &txn.kind {
            TransactionKind::Income { .. } => vec![Leg {
                account_id: txn.account_id,
                delta: txn.amount,
            }],
            TransactionKind::Expense { .. } => vec![Leg {
                account_id: txn.account_id,
                delta: -txn.amount,
            }],
            TransactionKind::Transfer { to_account_id, .. } => vec![
                Leg {
                    account_id: txn.account_id,
                    delta: -txn.amount,
                },
                Leg {
                    account_id: *to_account_id,
                    delta: txn.amount,
                },
            ],
        };
        Self { legs }
    }

    /// The effect that exactly undoes this one
    pub fn reversed(&self) -> Self {
        Self {
            legs: self
                .legs
                .iter()
                .map(|leg| Leg {
                    account_id: leg.account_id,
                    delta: -leg.delta,
                })
                .collect(),
        }
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Sum of all deltas; zero for transfers
    pub fn net(&self) -> Money {
        self.legs.iter().map(|leg| leg.delta).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;
    use chrono::NaiveDate;

    fn txn(kind: TransactionKind, account: AccountId, cents: i64) -> Transaction {
        Transaction::new(
            UserId::from("alice"),
            account,
            kind,
            Money::from_cents(cents),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            "",
        )
    }

    #[test]
    fn test_income_and_expense_have_one_leg() {
        let a = AccountId::new();
        let income = Effect::of(&txn(TransactionKind::income("cat-salary"), a, 500));
        assert_eq!(income.legs(), &[Leg { account_id: a, delta: Money::from_cents(500) }]);

        let expense = Effect::of(&txn(TransactionKind::expense("cat-health"), a, 500));
        assert_eq!(expense.net(), Money::from_cents(-500));
    }

    #[test]
    fn test_transfer_conserves_money() {
        let a = AccountId::new();
        let b = AccountId::new();
        let effect = Effect::of(&txn(TransactionKind::transfer(b), a, 3000));
        assert_eq!(effect.legs().len(), 2);
        assert!(effect.net().is_zero());
    }

    #[test]
    fn test_reversed_negates_every_leg() {
        let a = AccountId::new();
        let b = AccountId::new();
        let effect = Effect::of(&txn(TransactionKind::transfer(b), a, 3000));
        let reversed = effect.reversed();
        for (fwd, back) in effect.legs().iter().zip(reversed.legs()) {
            assert_eq!(fwd.account_id, back.account_id);
            assert_eq!(fwd.delta, -back.delta);
        }
        assert_eq!(reversed.reversed(), effect);
    }
}
