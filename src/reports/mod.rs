//! Reports
//!
//! Read-only projections over a storage snapshot: the dashboard summary and
//! the budget overview.

pub mod budget_overview;
pub mod summary;

pub use budget_overview::BudgetOverviewReport;
pub use summary::{expense_breakdown, summarize, CategorySpend, MonthDelta, Summary, SummaryReport, VisibleSet};
