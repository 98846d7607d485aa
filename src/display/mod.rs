//! Display formatting for terminal output
//!
//! Plain-text tables and detail views for accounts, transactions, budgets
//! and the category catalog.

pub mod account;
pub mod budget;
pub mod category;
pub mod transaction;

pub use account::{format_account_details, format_account_list};
pub use budget::{format_budget_details, format_budget_list};
pub use category::{format_catalog, format_category_list};
pub use transaction::{
    format_transaction_details, format_transaction_register, format_transaction_row, AccountNames,
};
