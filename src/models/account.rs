//! Account model
//!
//! Represents bank accounts, cards and cash wallets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::ids::{AccountId, UserId};
use super::money::Money;

/// Type of financial account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[default]
    Bank,
    CreditCard,
    DebitCard,
    Cash,
}

impl AccountType {
    /// Parse account type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "bank" | "bank_account" | "checking" | "savings" => Some(Self::Bank),
            "credit" | "credit_card" | "creditcard" => Some(Self::CreditCard),
            "debit" | "debit_card" | "debitcard" => Some(Self::DebitCard),
            "cash" => Some(Self::Cash),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Bank => "Bank Account",
            Self::CreditCard => "Credit Card",
            Self::DebitCard => "Debit Card",
            Self::Cash => "Cash",
        };
        f.pad(label)
    }
}

/// A financial account
///
/// `balance` is private: it only moves through the ledger so that it always
/// equals `opening_balance` plus every applied transaction effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,

    /// User who created the account
    pub owner_id: UserId,

    /// Account name (e.g., "Chase Checking")
    pub name: String,

    #[serde(rename = "type")]
    pub account_type: AccountType,

    balance: Money,

    /// Balance the account was opened with
    pub opening_balance: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last4_digits: Option<String>,

    /// Users granted read access
    #[serde(default)]
    pub shared_with: BTreeSet<UserId>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a zero balance
    pub fn new(owner_id: UserId, name: impl Into<String>, account_type: AccountType) -> Self {
        Self::with_opening_balance(owner_id, name, account_type, Money::zero())
    }

    /// Create a new account that starts at `opening_balance`
    pub fn with_opening_balance(
        owner_id: UserId,
        name: impl Into<String>,
        account_type: AccountType,
        opening_balance: Money,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            owner_id,
            name: name.into(),
            account_type,
            balance: opening_balance,
            opening_balance,
            bank_name: None,
            last4_digits: None,
            shared_with: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Current balance
    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Store a balance computed by the ledger. Crate-private so that only
    /// the ledger commit path can move money.
    pub(crate) fn record_balance(&mut self, balance: Money) {
        if self.balance != balance {
            self.balance = balance;
            self.updated_at = Utc::now();
        }
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner_id == user
    }

    pub fn is_shared_with(&self, user: &UserId) -> bool {
        self.shared_with.contains(user)
    }

    /// Owned or shared
    pub fn is_visible_to(&self, user: &UserId) -> bool {
        self.is_owned_by(user) || self.is_shared_with(user)
    }

    /// Grant read access. Returns false if the user already had access.
    pub fn share_with(&mut self, user: UserId) -> bool {
        if user == self.owner_id {
            return false;
        }
        let added = self.shared_with.insert(user);
        if added {
            self.updated_at = Utc::now();
        }
        added
    }

    /// Revoke read access. Returns false if the user did not have access.
    pub fn unshare(&mut self, user: &UserId) -> bool {
        let removed = self.shared_with.remove(user);
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(AccountValidationError::NameTooLong(self.name.len()));
        }

        if let Some(digits) = &self.last4_digits {
            if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(AccountValidationError::InvalidLast4(digits.clone()));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.account_type)?;
        if let Some(digits) = &self.last4_digits {
            write!(f, " **** {}", digits)?;
        }
        Ok(())
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidLast4(String),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Account name too long ({} chars, max 100)", len)
            }
            Self::InvalidLast4(digits) => {
                write!(f, "Last 4 digits must be exactly four digits, got '{}'", digits)
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}
