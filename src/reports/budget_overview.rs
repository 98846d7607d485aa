//! Budget Overview Report
//!
//! Evaluates every budget the user owns against the transactions they can
//! see, split into active and upcoming budgets.

use chrono::NaiveDate;

use crate::error::FinTrackResult;
use crate::models::{Money, UserId};
use crate::services::budget::{overview, BudgetEvaluation, BudgetOverview, Severity};
use crate::storage::{RecordStore, Storage};

use super::summary::VisibleSet;

/// Budget overview as of one day
#[derive(Debug, Clone)]
pub struct BudgetOverviewReport {
    pub as_of: NaiveDate,
    pub overview: BudgetOverview,
    /// Sum of every active budget's cap
    pub total_budgeted: Money,
    /// Sum of spend across active budgets
    pub total_spent: Money,
}

impl BudgetOverviewReport {
    pub fn generate(storage: &Storage, user: &UserId, today: NaiveDate) -> FinTrackResult<Self> {
        let budgets: Vec<_> = storage
            .budgets()?
            .into_iter()
            .filter(|b| &b.owner_id == user)
            .collect();
        let visible = VisibleSet::for_user(user, storage.accounts()?, storage.transactions()?);

        Ok(Self::from_overview(overview(&budgets, &visible.transactions, today), today))
    }

    pub fn from_overview(overview: BudgetOverview, as_of: NaiveDate) -> Self {
        let total_budgeted: Money = overview.active.iter().map(|e| e.budget.amount).sum();
        let total_spent: Money = overview.active.iter().map(|e| e.spent).sum();
        Self {
            as_of,
            overview,
            total_budgeted,
            total_spent,
        }
    }

    /// Active budgets at warning or critical severity
    pub fn alerts(&self) -> impl Iterator<Item = &BudgetEvaluation> {
        self.overview
            .active
            .iter()
            .filter(|e| e.severity != Severity::Normal)
    }

    pub fn is_empty(&self) -> bool {
        self.overview.active.is_empty() && self.overview.upcoming.is_empty()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let money = |m: Money| m.format_with_symbol(currency);
        let mut output = String::new();

        output.push_str(&format!("Budget Overview - {}\n", self.as_of));
        output.push_str(&"=".repeat(78));
        output.push('\n');

        if self.is_empty() {
            output.push_str("No budgets found.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<16} {:<10} {:>12} {:>12} {:>12} {:>6}  {}\n",
            "Category", "Period", "Budget", "Spent", "Remaining", "Used", "Status"
        ));
        output.push_str(&"-".repeat(78));
        output.push('\n');

        for e in &self.overview.active {
            output.push_str(&format!(
                "{:<16} {:<10} {:>12} {:>12} {:>12} {:>5.0}%  {}{}\n",
                e.category.name,
                e.budget.period,
                money(e.budget.amount),
                money(e.spent),
                money(e.remaining),
                e.progress,
                e.severity,
                if e.is_overspent() { " (overspent)" } else { "" }
            ));
        }

        if !self.overview.active.is_empty() {
            output.push_str(&"-".repeat(78));
            output.push('\n');
            output.push_str(&format!(
                "{:<27} {:>12} {:>12} {:>12}\n",
                "TOTAL",
                money(self.total_budgeted),
                money(self.total_spent),
                money(self.total_budgeted - self.total_spent)
            ));
        }

        if !self.overview.upcoming.is_empty() {
            output.push_str("\nUpcoming\n");
            for e in &self.overview.upcoming {
                output.push_str(&format!(
                    "{:<16} {:<10} {:>12}  starts {}\n",
                    e.category.name,
                    e.budget.period,
                    money(e.budget.amount),
                    e.window_start
                ));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, Budget, BudgetPeriod, Transaction, TransactionKind};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn budget(category: &str, units: i64, start: NaiveDate) -> Budget {
        Budget::new(
            UserId::from("alice"),
            category.into(),
            Money::from_units(units),
            BudgetPeriod::Monthly,
            start,
        )
        .unwrap()
    }

    fn expense(category: &str, units: i64, date: NaiveDate) -> Transaction {
        Transaction::new(
            UserId::from("alice"),
            AccountId::new(),
            TransactionKind::expense(category),
            Money::from_units(units),
            date,
            "",
        )
    }

    #[test]
    fn test_totals_and_alerts() {
        let budgets = vec![
            budget("cat-groceries", 100, d(2025, 3, 1)),
            budget("cat-housing", 1000, d(2025, 3, 1)),
            budget("cat-health", 50, d(2025, 4, 1)),
        ];
        let txns = vec![
            expense("cat-groceries", 80, d(2025, 3, 5)),
            expense("cat-housing", 100, d(2025, 3, 5)),
        ];

        let report =
            BudgetOverviewReport::from_overview(overview(&budgets, &txns, d(2025, 3, 20)), d(2025, 3, 20));
        assert_eq!(report.total_budgeted, Money::from_units(1100));
        assert_eq!(report.total_spent, Money::from_units(180));
        assert_eq!(report.overview.upcoming.len(), 1);

        let alerts: Vec<_> = report.alerts().map(|e| e.category.name).collect();
        assert_eq!(alerts, vec!["Groceries"]);

        let text = report.format_terminal("$");
        assert!(text.contains("Groceries"));
        assert!(text.contains("Upcoming"));
        assert!(text.contains("starts 2025-04-01"));
    }

    #[test]
    fn test_empty_report() {
        let report = BudgetOverviewReport::from_overview(BudgetOverview::default(), d(2025, 1, 1));
        assert!(report.is_empty());
        assert!(report.format_terminal("$").contains("No budgets found."));
    }
}
