//! Account repository for JSON storage
//!
//! Manages loading and saving accounts to accounts.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FinTrackResult;
use crate::models::{Account, AccountId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock_error, write_lock_error};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct AccountData {
    accounts: Vec<Account>,
}

/// Repository for account persistence
pub struct AccountRepository {
    path: PathBuf,
    data: RwLock<HashMap<AccountId, Account>>,
}

impl AccountRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load accounts from disk, replacing whatever is in memory
    pub fn load(&self) -> FinTrackResult<()> {
        let file_data: AccountData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(write_lock_error)?;
        data.clear();
        for account in file_data.accounts {
            data.insert(account.id, account);
        }

        Ok(())
    }

    pub fn save(&self) -> FinTrackResult<()> {
        let data = self.data.read().map_err(read_lock_error)?;

        let mut accounts: Vec<_> = data.values().cloned().collect();
        accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        write_json_atomic(&self.path, &AccountData { accounts })
    }

    pub fn get(&self, id: AccountId) -> FinTrackResult<Option<Account>> {
        let data = self.data.read().map_err(read_lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// All accounts, sorted by name
    pub fn get_all(&self) -> FinTrackResult<Vec<Account>> {
        let data = self.data.read().map_err(read_lock_error)?;

        let mut accounts: Vec<_> = data.values().cloned().collect();
        accounts.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        Ok(accounts)
    }

    pub fn upsert(&self, account: Account) -> FinTrackResult<()> {
        let mut data = self.data.write().map_err(write_lock_error)?;
        data.insert(account.id, account);
        Ok(())
    }

    /// Remove an account, returning it if it was present
    pub fn delete(&self, id: AccountId) -> FinTrackResult<Option<Account>> {
        let mut data = self.data.write().map_err(write_lock_error)?;
        Ok(data.remove(&id))
    }

    pub fn count(&self) -> FinTrackResult<usize> {
        let data = self.data.read().map_err(read_lock_error)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountType, Money, UserId};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, AccountRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = AccountRepository::new(temp_dir.path().join("accounts.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let account = Account::with_opening_balance(
            UserId::from("alice"),
            "Savings",
            AccountType::Bank,
            Money::from_units(250),
        );
        let id = account.id;

        repo.upsert(account).unwrap();
        repo.save().unwrap();

        let repo2 = AccountRepository::new(temp_dir.path().join("accounts.json"));
        repo2.load().unwrap();
        let loaded = repo2.get(id).unwrap().unwrap();
        assert_eq!(loaded.name, "Savings");
        assert_eq!(loaded.balance(), Money::from_units(250));
    }

    #[test]
    fn test_get_all_sorted_by_name_and_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let alice = UserId::from("alice");
        let savings = Account::new(alice.clone(), "savings", AccountType::Bank);
        let id = savings.id;
        repo.upsert(savings).unwrap();
        repo.upsert(Account::new(alice, "Checking", AccountType::Bank))
            .unwrap();

        let names: Vec<_> = repo.get_all().unwrap().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Checking", "savings"]);

        assert!(repo.delete(id).unwrap().is_some());
        assert!(repo.delete(id).unwrap().is_none());
        assert_eq!(repo.count().unwrap(), 1);
    }
}
