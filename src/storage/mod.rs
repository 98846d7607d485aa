//! Storage layer for FinTrack
//!
//! JSON file storage with atomic writes. Each repository keeps its records in
//! memory behind an `RwLock` and writes its whole file on save.
//!
//! The ledger core does not talk to the repositories directly; it goes
//! through the [`RecordStore`] trait, where every `put_*`/`remove_*` call is
//! durable on return.

pub mod accounts;
pub mod budgets;
pub mod file_io;
pub mod init;
pub mod transactions;

pub use accounts::AccountRepository;
pub use budgets::BudgetRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use transactions::TransactionRepository;

use std::fmt::Display;

use tracing::debug;

use crate::config::paths::FinTrackPaths;
use crate::error::{FinTrackError, FinTrackResult};
use crate::models::{Account, AccountId, Budget, BudgetId, Money, Transaction, TransactionId};

pub(crate) fn read_lock_error(e: impl Display) -> FinTrackError {
    FinTrackError::Storage(format!("Failed to acquire read lock: {}", e))
}

pub(crate) fn write_lock_error(e: impl Display) -> FinTrackError {
    FinTrackError::Storage(format!("Failed to acquire write lock: {}", e))
}

/// Persistence consumed by the services
///
/// Reads return owned snapshots. Writes are durable when they return `Ok`;
/// a write that fails leaves the store as it was before the call.
pub trait RecordStore {
    fn account(&self, id: AccountId) -> FinTrackResult<Option<Account>>;
    fn accounts(&self) -> FinTrackResult<Vec<Account>>;
    fn put_account(&self, account: Account) -> FinTrackResult<()>;
    fn remove_account(&self, id: AccountId) -> FinTrackResult<Option<Account>>;

    /// Store ledger-computed balances for existing accounts, all or nothing
    fn put_balances(&self, balances: &[(AccountId, Money)]) -> FinTrackResult<()>;

    fn transaction(&self, id: TransactionId) -> FinTrackResult<Option<Transaction>>;
    fn transactions(&self) -> FinTrackResult<Vec<Transaction>>;
    /// Transactions with either leg on `account_id`, newest first
    fn transactions_for_account(&self, account_id: AccountId) -> FinTrackResult<Vec<Transaction>>;
    fn put_transaction(&self, txn: Transaction) -> FinTrackResult<()>;
    fn remove_transaction(&self, id: TransactionId) -> FinTrackResult<Option<Transaction>>;
    /// Remove several transactions in one write, returning those that existed
    fn remove_transactions(&self, ids: &[TransactionId]) -> FinTrackResult<Vec<Transaction>>;

    fn budget(&self, id: BudgetId) -> FinTrackResult<Option<Budget>>;
    fn budgets(&self) -> FinTrackResult<Vec<Budget>>;
    fn put_budget(&self, budget: Budget) -> FinTrackResult<()>;
    fn remove_budget(&self, id: BudgetId) -> FinTrackResult<Option<Budget>>;
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    pub accounts: AccountRepository,
    pub transactions: TransactionRepository,
    pub budgets: BudgetRepository,
}

impl Storage {
    /// Create a storage over `paths`, creating directories as needed
    pub fn new(paths: FinTrackPaths) -> FinTrackResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            accounts: AccountRepository::new(paths.accounts_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
        })
    }

    /// Create a storage and load everything from disk
    pub fn open(paths: FinTrackPaths) -> FinTrackResult<Self> {
        let mut storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn load_all(&mut self) -> FinTrackResult<()> {
        self.accounts.load()?;
        self.transactions.load()?;
        self.budgets.load()?;
        debug!(
            accounts = self.accounts.count()?,
            transactions = self.transactions.count()?,
            budgets = self.budgets.count()?,
            "loaded records"
        );
        Ok(())
    }
}

impl RecordStore for Storage {
    fn account(&self, id: AccountId) -> FinTrackResult<Option<Account>> {
        self.accounts.get(id)
    }

    fn accounts(&self) -> FinTrackResult<Vec<Account>> {
        self.accounts.get_all()
    }

    fn put_account(&self, account: Account) -> FinTrackResult<()> {
        let id = account.id;
        let previous = self.accounts.get(id)?;
        self.accounts.upsert(account)?;
        if let Err(e) = self.accounts.save() {
            match previous {
                Some(old) => self.accounts.upsert(old)?,
                None => {
                    self.accounts.delete(id)?;
                }
            }
            return Err(e);
        }
        Ok(())
    }

    fn remove_account(&self, id: AccountId) -> FinTrackResult<Option<Account>> {
        let removed = self.accounts.delete(id)?;
        if let Some(account) = &removed {
            if let Err(e) = self.accounts.save() {
                self.accounts.upsert(account.clone())?;
                return Err(e);
            }
        }
        Ok(removed)
    }

    fn put_balances(&self, balances: &[(AccountId, Money)]) -> FinTrackResult<()> {
        if balances.is_empty() {
            return Ok(());
        }

        let mut previous = Vec::with_capacity(balances.len());
        for (id, _) in balances {
            let account = self
                .accounts
                .get(*id)?
                .ok_or_else(|| FinTrackError::missing_account(id))?;
            previous.push(account);
        }

        for (account, (_, balance)) in previous.iter().zip(balances) {
            let mut updated = account.clone();
            updated.record_balance(*balance);
            self.accounts.upsert(updated)?;
        }

        if let Err(e) = self.accounts.save() {
            for account in previous {
                self.accounts.upsert(account)?;
            }
            return Err(e);
        }
        Ok(())
    }

    fn transaction(&self, id: TransactionId) -> FinTrackResult<Option<Transaction>> {
        self.transactions.get(id)
    }

    fn transactions(&self) -> FinTrackResult<Vec<Transaction>> {
        self.transactions.get_all()
    }

    fn transactions_for_account(&self, account_id: AccountId) -> FinTrackResult<Vec<Transaction>> {
        self.transactions.get_by_account(account_id)
    }

    fn put_transaction(&self, txn: Transaction) -> FinTrackResult<()> {
        let id = txn.id;
        let previous = self.transactions.upsert(txn)?;
        if let Err(e) = self.transactions.save() {
            match previous {
                Some(old) => {
                    self.transactions.upsert(old)?;
                }
                None => {
                    self.transactions.delete(id)?;
                }
            }
            return Err(e);
        }
        Ok(())
    }

    fn remove_transaction(&self, id: TransactionId) -> FinTrackResult<Option<Transaction>> {
        let removed = self.transactions.delete(id)?;
        if let Some(txn) = &removed {
            if let Err(e) = self.transactions.save() {
                self.transactions.upsert(txn.clone())?;
                return Err(e);
            }
        }
        Ok(removed)
    }

    fn remove_transactions(&self, ids: &[TransactionId]) -> FinTrackResult<Vec<Transaction>> {
        let mut removed = Vec::new();
        for id in ids {
            if let Some(txn) = self.transactions.delete(*id)? {
                removed.push(txn);
            }
        }
        if removed.is_empty() {
            return Ok(removed);
        }
        if let Err(e) = self.transactions.save() {
            for txn in removed {
                self.transactions.upsert(txn)?;
            }
            return Err(e);
        }
        Ok(removed)
    }

    fn budget(&self, id: BudgetId) -> FinTrackResult<Option<Budget>> {
        self.budgets.get(id)
    }

    fn budgets(&self) -> FinTrackResult<Vec<Budget>> {
        self.budgets.get_all()
    }

    fn put_budget(&self, budget: Budget) -> FinTrackResult<()> {
        let id = budget.id;
        let previous = self.budgets.get(id)?;
        self.budgets.upsert(budget)?;
        if let Err(e) = self.budgets.save() {
            match previous {
                Some(old) => self.budgets.upsert(old)?,
                None => {
                    self.budgets.delete(id)?;
                }
            }
            return Err(e);
        }
        Ok(())
    }

    fn remove_budget(&self, id: BudgetId) -> FinTrackResult<Option<Budget>> {
        let removed = self.budgets.delete(id)?;
        if let Some(budget) = &removed {
            if let Err(e) = self.budgets.save() {
                self.budgets.upsert(budget.clone())?;
                return Err(e);
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountType, UserId};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinTrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = create_test_storage();
        assert!(temp_dir.path().join("data").exists());
        assert!(storage.accounts().unwrap().is_empty());
    }

    #[test]
    fn test_puts_are_durable() {
        let (temp_dir, storage) = create_test_storage();
        let account = Account::new(UserId::from("alice"), "Checking", AccountType::Bank);
        let id = account.id;
        storage.put_account(account).unwrap();
        storage.put_balances(&[(id, Money::from_units(42))]).unwrap();

        let reopened =
            Storage::open(FinTrackPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let loaded = reopened.account(id).unwrap().unwrap();
        assert_eq!(loaded.balance(), Money::from_units(42));
    }

    #[test]
    fn test_put_balances_rejects_unknown_account() {
        let (_temp_dir, storage) = create_test_storage();
        let account = Account::new(UserId::from("alice"), "Checking", AccountType::Bank);
        let id = account.id;
        storage.put_account(account).unwrap();

        let err = storage
            .put_balances(&[(id, Money::from_units(5)), (AccountId::new(), Money::zero())])
            .unwrap_err();
        assert!(err.is_referential_integrity());
        assert_eq!(storage.account(id).unwrap().unwrap().balance(), Money::zero());
    }

    #[test]
    fn test_failed_save_restores_previous_record() {
        let (temp_dir, storage) = create_test_storage();
        let account = Account::new(UserId::from("alice"), "Checking", AccountType::Bank);
        let id = account.id;
        storage.put_account(account).unwrap();

        // A directory where the file should be makes the rename fail
        let data_dir = temp_dir.path().join("data");
        std::fs::remove_file(data_dir.join("accounts.json")).unwrap();
        std::fs::create_dir(data_dir.join("accounts.json")).unwrap();

        assert!(storage.put_balances(&[(id, Money::from_units(9))]).is_err());
        assert_eq!(storage.account(id).unwrap().unwrap().balance(), Money::zero());
    }
}
