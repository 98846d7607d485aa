//! Service layer for FinTrack
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, access checks and cross-entity operations. Services
//! that move money borrow the [`Ledger`](crate::ledger::Ledger) mutably.

pub mod account;
pub mod budget;
pub mod transaction;

pub use account::{AccountDeletion, AccountService, AccountUpdate, CreateAccountInput, IntegrityWarning};
pub use budget::{BudgetEvaluation, BudgetInput, BudgetOverview, BudgetService, BudgetStatus, Severity};
pub use transaction::{TransactionFilter, TransactionInput, TransactionService};
