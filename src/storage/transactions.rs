//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json. An index
//! maps every account to the transactions touching it, so a transfer is
//! listed under both its source and its destination.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FinTrackResult;
use crate::models::{AccountId, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock_error, write_lock_error};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence with an account index
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    by_account: RwLock<HashMap<AccountId, Vec<TransactionId>>>,
}

fn legs(txn: &Transaction) -> impl Iterator<Item = AccountId> {
    std::iter::once(txn.account_id).chain(txn.to_account_id())
}

/// Newest first; ties broken by creation time so the order is stable
fn newest_first(a: &Transaction, b: &Transaction) -> std::cmp::Ordering {
    b.date
        .cmp(&a.date)
        .then(b.created_at.cmp(&a.created_at))
        .then(a.id.cmp(&b.id))
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_account: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and rebuild the index
    pub fn load(&self) -> FinTrackResult<()> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(write_lock_error)?;
        let mut by_account = self.by_account.write().map_err(write_lock_error)?;

        data.clear();
        by_account.clear();

        for txn in file_data.transactions {
            for account_id in legs(&txn) {
                by_account.entry(account_id).or_default().push(txn.id);
            }
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    pub fn save(&self) -> FinTrackResult<()> {
        let data = self.data.read().map_err(read_lock_error)?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(newest_first);

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    pub fn get(&self, id: TransactionId) -> FinTrackResult<Option<Transaction>> {
        let data = self.data.read().map_err(read_lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// All transactions, newest first
    pub fn get_all(&self) -> FinTrackResult<Vec<Transaction>> {
        let data = self.data.read().map_err(read_lock_error)?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(newest_first);
        Ok(transactions)
    }

    /// Transactions with either leg on `account_id`, newest first
    pub fn get_by_account(&self, account_id: AccountId) -> FinTrackResult<Vec<Transaction>> {
        let data = self.data.read().map_err(read_lock_error)?;
        let by_account = self.by_account.read().map_err(read_lock_error)?;

        let ids = by_account.get(&account_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        transactions.sort_by(newest_first);
        Ok(transactions)
    }

    /// Insert or replace a transaction, returning the previous version
    pub fn upsert(&self, txn: Transaction) -> FinTrackResult<Option<Transaction>> {
        let mut data = self.data.write().map_err(write_lock_error)?;
        let mut by_account = self.by_account.write().map_err(write_lock_error)?;

        if let Some(old) = data.get(&txn.id) {
            for account_id in legs(old) {
                if let Some(ids) = by_account.get_mut(&account_id) {
                    ids.retain(|&id| id != txn.id);
                }
            }
        }

        for account_id in legs(&txn) {
            by_account.entry(account_id).or_default().push(txn.id);
        }

        Ok(data.insert(txn.id, txn))
    }

    /// Remove a transaction, returning it if it was present
    pub fn delete(&self, id: TransactionId) -> FinTrackResult<Option<Transaction>> {
        let mut data = self.data.write().map_err(write_lock_error)?;
        let mut by_account = self.by_account.write().map_err(write_lock_error)?;

        let removed = data.remove(&id);
        if let Some(txn) = &removed {
            for account_id in legs(txn) {
                if let Some(ids) = by_account.get_mut(&account_id) {
                    ids.retain(|&tid| tid != id);
                }
            }
        }
        Ok(removed)
    }

    pub fn count(&self) -> FinTrackResult<usize> {
        let data = self.data.read().map_err(read_lock_error)?;
        Ok(data.len())
    }
}
