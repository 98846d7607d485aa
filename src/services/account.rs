//! Account service
//!
//! Account lifecycle: create, metadata edits, sharing and delete. Balances
//! are never edited here; a new account enters the ledger at its opening
//! balance and leaves it on delete.

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{FinTrackError, FinTrackResult};
use crate::ledger::Ledger;
use crate::models::{Account, AccountId, AccountType, Money, Transaction, TransactionId, UserId};
use crate::storage::{RecordStore, Storage};

/// Input for creating a new account
#[derive(Debug, Clone, Default)]
pub struct CreateAccountInput {
    pub name: String,
    pub account_type: AccountType,
    pub opening_balance: Money,
    pub bank_name: Option<String>,
    pub last4_digits: Option<String>,
}

/// Metadata edits; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub account_type: Option<AccountType>,
    /// `Some("")` clears the bank name
    pub bank_name: Option<String>,
    /// `Some("")` clears the card digits
    pub last4_digits: Option<String>,
}

/// A transfer leg left behind on a surviving account by an account delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityWarning {
    pub transaction_id: TransactionId,
    pub surviving_account_id: AccountId,
    pub surviving_account_name: String,
    /// Signed effect the removed transfer still has on the surviving account
    pub unexplained: Money,
}

impl std::fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "balance of '{}' includes {} from deleted transfer {} with no remaining record",
            self.surviving_account_name, self.unexplained, self.transaction_id
        )
    }
}

/// What an account delete removed
#[derive(Debug, Clone)]
pub struct AccountDeletion {
    pub account: Account,
    pub removed_transactions: Vec<Transaction>,
    pub warnings: Vec<IntegrityWarning>,
}

/// Service for account management
pub struct AccountService<'a, S: RecordStore + ?Sized = Storage> {
    store: &'a S,
    ledger: &'a mut Ledger,
    user: UserId,
}

impl<'a, S: RecordStore + ?Sized> AccountService<'a, S> {
    pub fn new(store: &'a S, ledger: &'a mut Ledger, user: UserId) -> Self {
        Self {
            store,
            ledger,
            user,
        }
    }

    /// Create a new account owned by the acting user
    pub fn create(&mut self, input: CreateAccountInput) -> FinTrackResult<Account> {
        let name = input.name.trim();
        if self.name_taken(name, None)? {
            return Err(FinTrackError::Validation(format!(
                "You already have an account named '{}'",
                name
            )));
        }

        let mut account = Account::with_opening_balance(
            self.user.clone(),
            name,
            input.account_type,
            input.opening_balance,
        );
        account.bank_name = non_empty(input.bank_name);
        account.last4_digits = non_empty(input.last4_digits);
        account
            .validate()
            .map_err(|e| FinTrackError::Validation(e.to_string()))?;

        self.store.put_account(account.clone())?;
        self.ledger.open_account(account.id, account.balance());

        info!(account = %account.id, name = %account.name, balance = %account.balance(), "created account");
        Ok(account)
    }

    /// An account the acting user can see
    pub fn get(&self, id: AccountId) -> FinTrackResult<Option<Account>> {
        Ok(self
            .store
            .account(id)?
            .filter(|a| a.is_visible_to(&self.user)))
    }

    /// Resolve a visible account by name (case-insensitive) or id
    pub fn find(&self, reference: &str) -> FinTrackResult<Account> {
        let visible = self.list()?;
        let wanted = reference.trim().to_lowercase();

        if let Some(account) = visible.iter().find(|a| a.name.to_lowercase() == wanted) {
            return Ok(account.clone());
        }

        let mut by_id = visible.into_iter().filter(|a| a.id.matches(reference));
        match (by_id.next(), by_id.next()) {
            (Some(account), None) => Ok(account),
            (Some(_), Some(_)) => Err(FinTrackError::Validation(format!(
                "Account id '{}' is ambiguous; use more characters",
                reference
            ))),
            (None, _) => Err(FinTrackError::account_not_found(reference)),
        }
    }

    /// Accounts the acting user owns or can see, sorted by name
    pub fn list(&self) -> FinTrackResult<Vec<Account>> {
        Ok(self
            .store
            .accounts()?
            .into_iter()
            .filter(|a| a.is_visible_to(&self.user))
            .collect())
    }

    /// Edit name, type or card metadata. The balance is untouched.
    pub fn update(&mut self, id: AccountId, update: AccountUpdate) -> FinTrackResult<Account> {
        let mut account = self.owned(id)?;

        if let Some(name) = update.name {
            let name = name.trim();
            if self.name_taken(name, Some(id))? {
                return Err(FinTrackError::Validation(format!(
                    "You already have an account named '{}'",
                    name
                )));
            }
            account.name = name.to_string();
        }
        if let Some(account_type) = update.account_type {
            account.account_type = account_type;
        }
        if let Some(bank_name) = update.bank_name {
            account.bank_name = non_empty(Some(bank_name));
        }
        if let Some(digits) = update.last4_digits {
            account.last4_digits = non_empty(Some(digits));
        }
        account.updated_at = Utc::now();

        account
            .validate()
            .map_err(|e| FinTrackError::Validation(e.to_string()))?;

        self.store.put_account(account.clone())?;
        info!(account = %account.id, "updated account");
        Ok(account)
    }

    /// Grant another user read access
    pub fn share(&mut self, id: AccountId, with: UserId) -> FinTrackResult<Account> {
        let mut account = self.owned(id)?;
        if with == account.owner_id {
            return Err(FinTrackError::Validation(
                "Cannot share an account with its owner".into(),
            ));
        }
        if account.share_with(with.clone()) {
            self.store.put_account(account.clone())?;
            info!(account = %account.id, user = %with, "shared account");
        }
        Ok(account)
    }

    /// Revoke another user's read access
    pub fn unshare(&mut self, id: AccountId, user: &UserId) -> FinTrackResult<Account> {
        let mut account = self.owned(id)?;
        if account.unshare(user) {
            self.store.put_account(account.clone())?;
            info!(account = %account.id, user = %user, "unshared account");
        }
        Ok(account)
    }

    /// Delete an account and every transaction that references it
    ///
    /// Removed transactions are not reversed. A transfer whose other leg is
    /// on a surviving account leaves that account's balance holding an
    /// amount no record explains; each such leg is returned as a warning.
    pub fn delete(&mut self, id: AccountId) -> FinTrackResult<AccountDeletion> {
        let account = self.owned(id)?;

        let doomed: Vec<TransactionId> = self
            .store
            .transactions_for_account(id)?
            .iter()
            .map(|t| t.id)
            .collect();

        let removed_transactions = self.store.remove_transactions(&doomed)?;

        if let Err(e) = self.store.remove_account(id) {
            for txn in &removed_transactions {
                self.store.put_transaction(txn.clone())?;
            }
            return Err(e);
        }
        self.ledger.close_account(id);

        let mut warnings = Vec::new();
        for txn in removed_transactions.iter().filter(|t| t.is_transfer()) {
            let survivor = if txn.account_id == id {
                txn.to_account_id()
            } else {
                Some(txn.account_id)
            };
            let Some(survivor) = survivor.filter(|s| *s != id) else {
                continue;
            };
            let Some(surviving) = self.store.account(survivor)? else {
                continue;
            };

            let warning = IntegrityWarning {
                transaction_id: txn.id,
                surviving_account_id: survivor,
                surviving_account_name: surviving.name,
                unexplained: txn.signed_amount_for(survivor),
            };
            warn!(
                transaction = %warning.transaction_id,
                account = %warning.surviving_account_id,
                amount = %warning.unexplained,
                "referential integrity: {}", warning
            );
            warnings.push(warning);
        }

        info!(
            account = %account.id,
            removed = removed_transactions.len(),
            warnings = warnings.len(),
            "deleted account"
        );

        Ok(AccountDeletion {
            account,
            removed_transactions,
            warnings,
        })
    }

    fn owned(&self, id: AccountId) -> FinTrackResult<Account> {
        let account = self
            .get(id)?
            .ok_or_else(|| FinTrackError::account_not_found(id.to_string()))?;
        if !account.is_owned_by(&self.user) {
            return Err(FinTrackError::Validation(format!(
                "Account '{}' is shared with you read-only",
                account.name
            )));
        }
        Ok(account)
    }

    fn name_taken(&self, name: &str, exclude: Option<AccountId>) -> FinTrackResult<bool> {
        let lower = name.to_lowercase();
        Ok(self.store.accounts()?.iter().any(|a| {
            a.is_owned_by(&self.user) && Some(a.id) != exclude && a.name.to_lowercase() == lower
        }))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
