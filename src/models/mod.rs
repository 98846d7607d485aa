//! Core data models for FinTrack
//!
//! Accounts, transactions, budgets and the static category catalog.

pub mod account;
pub mod budget;
pub mod category;
pub mod ids;
pub mod money;
pub mod transaction;

pub use account::{Account, AccountType};
pub use budget::{Budget, BudgetPeriod, PeriodKind};
pub use category::Category;
pub use ids::{AccountId, BudgetId, CategoryId, TransactionId, UserId};
pub use money::Money;
pub use transaction::{Transaction, TransactionKind, TransactionKindTag};
