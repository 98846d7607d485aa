//! Transaction service
//!
//! Add, update and delete transactions while keeping account balances in
//! step. Every mutation is staged on a copy of the ledger first; the record
//! is written, then the balances that moved. If the balance write fails the
//! record write is undone and the caller's ledger is left as it was.

use chrono::{NaiveDate, Utc};
use tracing::{error, info, warn};

use crate::error::{FinTrackError, FinTrackResult};
use crate::ledger::Ledger;
use crate::models::category;
use crate::models::{
    Account, AccountId, CategoryId, Money, Transaction, TransactionId, TransactionKind,
    TransactionKindTag, UserId,
};
use crate::storage::{RecordStore, Storage};

/// Everything a caller supplies for a new or edited transaction
#[derive(Debug, Clone)]
pub struct TransactionInput {
    pub account_id: AccountId,
    pub kind: TransactionKind,
    pub amount: Money,
    pub date: NaiveDate,
    pub description: String,
}

impl TransactionInput {
    /// Input that reproduces `txn` exactly
    pub fn from_transaction(txn: &Transaction) -> Self {
        Self {
            account_id: txn.account_id,
            kind: txn.kind.clone(),
            amount: txn.amount,
            date: txn.date,
            description: txn.description.clone(),
        }
    }
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub account_id: Option<AccountId>,
    pub kind: Option<TransactionKindTag>,
    pub category_id: Option<CategoryId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transactions with either leg on `account_id`
    pub fn account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn kind(mut self, kind: TransactionKindTag) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn accepts(&self, txn: &Transaction) -> bool {
        self.account_id.map_or(true, |id| txn.touches(id))
            && self.kind.map_or(true, |kind| txn.tag() == kind)
            && self
                .category_id
                .as_ref()
                .map_or(true, |cat| txn.category_id() == Some(cat))
            && self.start_date.map_or(true, |start| txn.date >= start)
            && self.end_date.map_or(true, |end| txn.date <= end)
    }
}

/// The record-level half of a mutation, kept so it can be undone
enum RecordChange {
    Insert(Transaction),
    Replace { old: Transaction, new: Transaction },
    Remove(Transaction),
}

/// Service for transaction management
pub struct TransactionService<'a, S: RecordStore + ?Sized = Storage> {
    store: &'a S,
    ledger: &'a mut Ledger,
    user: UserId,
}

impl<'a, S: RecordStore + ?Sized> TransactionService<'a, S> {
    /// `ledger` must have been built from the accounts in `store`
    pub fn new(store: &'a S, ledger: &'a mut Ledger, user: UserId) -> Self {
        Self {
            store,
            ledger,
            user,
        }
    }

    /// Record a new transaction and apply its effect
    pub fn add(&mut self, input: TransactionInput) -> FinTrackResult<Transaction> {
        let txn = Transaction::new(
            self.user.clone(),
            input.account_id,
            input.kind,
            input.amount,
            input.date,
            input.description.trim(),
        );
        self.check(&txn)?;

        let mut staged = self.ledger.clone();
        staged.apply_effect(&txn)?;

        self.commit(staged, RecordChange::Insert(txn.clone()))?;

        info!(
            transaction = %txn.id,
            kind = %txn.tag(),
            amount = %txn.amount,
            account = %txn.account_id,
            "added transaction"
        );
        Ok(txn)
    }

    /// Replace a transaction's fields, keeping its id
    ///
    /// The old effect is always reversed and the new one applied, even when
    /// nothing that affects balances changed.
    pub fn update(
        &mut self,
        id: TransactionId,
        input: TransactionInput,
    ) -> FinTrackResult<Transaction> {
        let old = self.get_visible(id)?;
        self.check_accounts(&old)?;

        let mut new = old.clone();
        new.account_id = input.account_id;
        new.kind = input.kind;
        new.amount = input.amount;
        new.date = input.date;
        new.description = input.description.trim().to_string();
        new.updated_at = Utc::now();
        self.check(&new)?;

        let mut staged = self.ledger.clone();
        staged.reverse_effect(&old)?;
        staged.apply_effect(&new)?;

        self.commit(
            staged,
            RecordChange::Replace {
                old,
                new: new.clone(),
            },
        )?;

        info!(transaction = %new.id, kind = %new.tag(), amount = %new.amount, "updated transaction");
        Ok(new)
    }

    /// Remove a transaction and reverse its effect
    pub fn delete(&mut self, id: TransactionId) -> FinTrackResult<Transaction> {
        let old = self.get_visible(id)?;
        self.check_accounts(&old)?;

        let mut staged = self.ledger.clone();
        staged.reverse_effect(&old)?;

        self.commit(staged, RecordChange::Remove(old.clone()))?;

        info!(transaction = %old.id, kind = %old.tag(), amount = %old.amount, "deleted transaction");
        Ok(old)
    }

    /// A transaction the acting user can see
    pub fn get(&self, id: TransactionId) -> FinTrackResult<Option<Transaction>> {
        match self.store.transaction(id)? {
            Some(txn) if self.is_visible(&txn)? => Ok(Some(txn)),
            _ => Ok(None),
        }
    }

    /// Resolve a short or full transaction id among visible transactions
    pub fn find(&self, reference: &str) -> FinTrackResult<Transaction> {
        let mut matches = self
            .list(&TransactionFilter::new())?
            .into_iter()
            .filter(|t| t.id.matches(reference));

        match (matches.next(), matches.next()) {
            (Some(txn), None) => Ok(txn),
            (Some(_), Some(_)) => Err(FinTrackError::Validation(format!(
                "Transaction id '{}' is ambiguous; use more characters",
                reference
            ))),
            (None, _) => Err(FinTrackError::transaction_not_found(reference)),
        }
    }

    /// Visible transactions matching `filter`, newest first
    pub fn list(&self, filter: &TransactionFilter) -> FinTrackResult<Vec<Transaction>> {
        let visible: Vec<AccountId> = self
            .store
            .accounts()?
            .iter()
            .filter(|a| a.is_visible_to(&self.user))
            .map(|a| a.id)
            .collect();

        let mut transactions: Vec<_> = self
            .store
            .transactions()?
            .into_iter()
            .filter(|t| visible.contains(&t.account_id))
            .filter(|t| filter.accepts(t))
            .collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }
        Ok(transactions)
    }

    fn get_visible(&self, id: TransactionId) -> FinTrackResult<Transaction> {
        self.get(id)?
            .ok_or_else(|| FinTrackError::transaction_not_found(id.to_string()))
    }

    fn is_visible(&self, txn: &Transaction) -> FinTrackResult<bool> {
        Ok(self
            .store
            .account(txn.account_id)?
            .is_some_and(|a| a.is_visible_to(&self.user)))
    }

    /// Field validation, account resolution and category eligibility
    fn check(&self, txn: &Transaction) -> FinTrackResult<()> {
        txn.validate()
            .map_err(|e| FinTrackError::Validation(e.to_string()))?;

        self.check_accounts(txn)?;

        if let Some(category_id) = txn.category_id() {
            let category = category::get(category_id).ok_or_else(|| {
                FinTrackError::ReferentialIntegrity(format!(
                    "category {} does not exist",
                    category_id
                ))
            })?;
            if !category.is_eligible_for(txn.tag()) {
                return Err(FinTrackError::Validation(format!(
                    "Category '{}' cannot be used for {} transactions",
                    category.name,
                    txn.tag().to_string().to_lowercase()
                )));
            }
        }

        Ok(())
    }

    /// Every account the transaction touches must exist and be writable
    fn check_accounts(&self, txn: &Transaction) -> FinTrackResult<()> {
        for account_id in std::iter::once(txn.account_id).chain(txn.to_account_id()) {
            self.writable_account(account_id)?;
        }
        Ok(())
    }

    fn writable_account(&self, id: AccountId) -> FinTrackResult<Account> {
        let account = self
            .store
            .account(id)?
            .filter(|a| a.is_visible_to(&self.user))
            .ok_or_else(|| FinTrackError::missing_account(id))?;

        if !account.is_owned_by(&self.user) {
            return Err(FinTrackError::Validation(format!(
                "Account '{}' is shared with you read-only",
                account.name
            )));
        }
        Ok(account)
    }

    /// Persist the record change, then the moved balances
    fn commit(&mut self, staged: Ledger, change: RecordChange) -> FinTrackResult<()> {
        let moved = staged.changed_since(&*self.ledger);

        match &change {
            RecordChange::Insert(txn) | RecordChange::Replace { new: txn, .. } => {
                self.store.put_transaction(txn.clone())?
            }
            RecordChange::Remove(txn) => {
                self.store.remove_transaction(txn.id)?;
            }
        }

        if let Err(e) = self.store.put_balances(&moved) {
            warn!(error = %e, "balance write failed, undoing record change");
            let undo = match change {
                RecordChange::Insert(txn) => self.store.remove_transaction(txn.id).map(|_| ()),
                RecordChange::Replace { old, .. } | RecordChange::Remove(old) => {
                    self.store.put_transaction(old)
                }
            };
            if let Err(undo_err) = undo {
                error!(error = %undo_err, "could not undo record change");
                return Err(FinTrackError::Storage(format!(
                    "{}; undoing the record change also failed: {}",
                    e, undo_err
                )));
            }
            return Err(e);
        }

        *self.ledger = staged;
        Ok(())
    }
}
