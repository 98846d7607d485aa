//! Transaction model
//!
//! A transaction moves money into, out of, or between accounts. The amount is
//! always positive; its direction comes from the kind. The kind is a tagged
//! variant so that a transfer always has a destination and an income or
//! expense always has a category.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, CategoryId, TransactionId, UserId};
use super::money::Money;

/// Kind-specific fields of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionKind {
    Income {
        category_id: CategoryId,
    },
    Expense {
        category_id: CategoryId,
    },
    Transfer {
        to_account_id: AccountId,
        /// Optional grouping for display; has no balance meaning
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category_id: Option<CategoryId>,
    },
}

impl TransactionKind {
    pub fn income(category_id: impl Into<CategoryId>) -> Self {
        Self::Income {
            category_id: category_id.into(),
        }
    }

    pub fn expense(category_id: impl Into<CategoryId>) -> Self {
        Self::Expense {
            category_id: category_id.into(),
        }
    }

    pub fn transfer(to_account_id: AccountId) -> Self {
        Self::Transfer {
            to_account_id,
            category_id: None,
        }
    }

    pub fn tag(&self) -> TransactionKindTag {
        match self {
            Self::Income { .. } => TransactionKindTag::Income,
            Self::Expense { .. } => TransactionKindTag::Expense,
            Self::Transfer { .. } => TransactionKindTag::Transfer,
        }
    }

    pub fn category_id(&self) -> Option<&CategoryId> {
        match self {
            Self::Income { category_id } | Self::Expense { category_id } => Some(category_id),
            Self::Transfer { category_id, .. } => category_id.as_ref(),
        }
    }

    pub fn to_account_id(&self) -> Option<AccountId> {
        match self {
            Self::Transfer { to_account_id, .. } => Some(*to_account_id),
            _ => None,
        }
    }
}

/// Field-less discriminant of [`TransactionKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKindTag {
    Income,
    Expense,
    Transfer,
}

impl TransactionKindTag {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Some(Self::Income),
            "expense" | "out" => Some(Self::Expense),
            "transfer" | "xfer" => Some(Self::Transfer),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
            Self::Transfer => "Transfer",
        };
        f.pad(label)
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    /// User who recorded the transaction
    pub owner_id: UserId,

    /// Source account (the only account for income and expense)
    pub account_id: AccountId,

    #[serde(flatten)]
    pub kind: TransactionKind,

    /// Always positive
    pub amount: Money,

    pub date: NaiveDate,

    #[serde(default)]
    pub description: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        owner_id: UserId,
        account_id: AccountId,
        kind: TransactionKind,
        amount: Money,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            owner_id,
            account_id,
            kind,
            amount,
            date,
            description: description.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn tag(&self) -> TransactionKindTag {
        self.kind.tag()
    }

    pub fn is_expense(&self) -> bool {
        matches!(self.kind, TransactionKind::Expense { .. })
    }

    pub fn is_transfer(&self) -> bool {
        matches!(self.kind, TransactionKind::Transfer { .. })
    }

    pub fn category_id(&self) -> Option<&CategoryId> {
        self.kind.category_id()
    }

    pub fn to_account_id(&self) -> Option<AccountId> {
        self.kind.to_account_id()
    }

    /// Whether either leg touches `account_id`
    pub fn touches(&self, account_id: AccountId) -> bool {
        self.account_id == account_id || self.to_account_id() == Some(account_id)
    }

    /// Amount signed from the point of view of `account_id`
    pub fn signed_amount_for(&self, account_id: AccountId) -> Money {
        match &self.kind {
            TransactionKind::Income { .. } if self.account_id == account_id => self.amount,
            TransactionKind::Expense { .. } if self.account_id == account_id => -self.amount,
            TransactionKind::Transfer { to_account_id, .. } => {
                if self.account_id == account_id {
                    -self.amount
                } else if *to_account_id == account_id {
                    self.amount
                } else {
                    Money::zero()
                }
            }
            _ => Money::zero(),
        }
    }

    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }

        if !self.amount.is_within_limit() {
            return Err(TransactionValidationError::AmountTooLarge(self.amount));
        }

        if self.to_account_id() == Some(self.account_id) {
            return Err(TransactionValidationError::SameAccountTransfer);
        }

        if self.description.len() > 200 {
            return Err(TransactionValidationError::DescriptionTooLong(
                self.description.len(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date,
            self.tag(),
            self.amount,
            self.description
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    AmountTooLarge(Money),
    SameAccountTransfer,
    DescriptionTooLong(usize),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be positive, got {}", amount)
            }
            Self::AmountTooLarge(amount) => {
                write!(f, "Amount {} exceeds the maximum of {}", amount, Money::MAX)
            }
            Self::SameAccountTransfer => {
                write!(f, "Cannot transfer to the same account")
            }
            Self::DescriptionTooLong(len) => {
                write!(f, "Description too long ({} chars, max 200)", len)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn expense(account: AccountId, cents: i64) -> Transaction {
        Transaction::new(
            UserId::from("alice"),
            account,
            TransactionKind::expense("cat-groceries"),
            Money::from_cents(cents),
            date(),
            "Weekly shop",
        )
    }

    #[test]
    fn test_kind_accessors() {
        let to = AccountId::new();
        let kind = TransactionKind::transfer(to);
        assert_eq!(kind.tag(), TransactionKindTag::Transfer);
        assert_eq!(kind.to_account_id(), Some(to));
        assert_eq!(kind.category_id(), None);

        let kind = TransactionKind::income("cat-salary");
        assert_eq!(kind.category_id().map(|c| c.as_str()), Some("cat-salary"));
        assert_eq!(kind.to_account_id(), None);
    }

    #[test]
    fn test_validate_amount() {
        let account = AccountId::new();
        assert!(expense(account, 100).validate().is_ok());
        assert!(matches!(
            expense(account, 0).validate(),
            Err(TransactionValidationError::NonPositiveAmount(_))
        ));
        assert!(expense(account, -100).validate().is_err());
        assert!(matches!(
            expense(account, i64::MAX).validate(),
            Err(TransactionValidationError::AmountTooLarge(_))
        ));
        assert!(expense(account, Money::MAX.cents()).validate().is_ok());
    }

    #[test]
    fn test_validate_same_account_transfer() {
        let account = AccountId::new();
        let mut txn = expense(account, 100);
        txn.kind = TransactionKind::transfer(account);
        assert_eq!(
            txn.validate(),
            Err(TransactionValidationError::SameAccountTransfer)
        );
    }

    #[test]
    fn test_signed_amount_for() {
        let a = AccountId::new();
        let b = AccountId::new();
        let mut txn = expense(a, 3000);
        assert_eq!(txn.signed_amount_for(a).cents(), -3000);
        assert_eq!(txn.signed_amount_for(b).cents(), 0);

        txn.kind = TransactionKind::transfer(b);
        assert_eq!(txn.signed_amount_for(a).cents(), -3000);
        assert_eq!(txn.signed_amount_for(b).cents(), 3000);
        assert!(txn.touches(b));
    }

    #[test]
    fn test_serialized_layout_is_flat() {
        let a = AccountId::new();
        let b = AccountId::new();
        let mut txn = expense(a, 1250);
        txn.kind = TransactionKind::transfer(b);

        let value = serde_json::to_value(&txn).unwrap();
        assert_eq!(value["type"], "transfer");
        assert_eq!(value["to_account_id"], serde_json::to_value(b).unwrap());
        assert!(value.get("category_id").is_none());

        let back: Transaction = serde_json::from_value(value).unwrap();
        assert_eq!(back, txn);
    }

    #[test]
    fn test_transfer_without_destination_does_not_deserialize() {
        let a = AccountId::new();
        let mut value = serde_json::to_value(expense(a, 100)).unwrap();
        value["type"] = "transfer".into();
        value.as_object_mut().unwrap().remove("category_id");
        assert!(serde_json::from_value::<Transaction>(value).is_err());
    }
}
