//! Budget service
//!
//! Budget CRUD plus the period evaluator. Evaluation is a pure projection
//! over a transaction snapshot and is recomputed on every read; nothing about
//! it is stored.

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::error::{FinTrackError, FinTrackResult};
use crate::models::category::{self, Category};
use crate::models::{
    Budget, BudgetId, BudgetPeriod, CategoryId, Money, PeriodKind, Transaction, UserId,
};
use crate::storage::{RecordStore, Storage};

/// Progress at or below this is `Normal`
pub const WARNING_THRESHOLD: f64 = 75.0;
/// Progress above this is `Critical`
pub const CRITICAL_THRESHOLD: f64 = 95.0;

/// Whether a budget's window has opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BudgetStatus {
    Active,
    Upcoming,
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Active => "Active",
            Self::Upcoming => "Upcoming",
        })
    }
}

/// How close spending is to the cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

impl Severity {
    pub fn from_progress(progress: f64) -> Self {
        if progress > CRITICAL_THRESHOLD {
            Self::Critical
        } else if progress > WARNING_THRESHOLD {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Normal => "Normal",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
        })
    }
}

/// A budget together with its computed window and spend
#[derive(Debug, Clone)]
pub struct BudgetEvaluation {
    pub budget: Budget,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub status: BudgetStatus,
    pub spent: Money,
    /// Percentage of the cap spent, clamped to `0..=100`
    pub progress: f64,
    pub severity: Severity,
    /// Cap minus spent; negative when overspent
    pub remaining: Money,
    /// Display category; the `Unknown` sentinel for dangling ids
    pub category: &'static Category,
}

impl BudgetEvaluation {
    pub fn is_overspent(&self) -> bool {
        self.remaining.is_negative()
    }
}

/// Sum of expenses in the budget's category dated on or after its start
///
/// The window end is not applied: a budget is a running total from its
/// start date.
pub fn spent_against(budget: &Budget, transactions: &[Transaction]) -> Money {
    transactions
        .iter()
        .filter(|t| {
            t.is_expense()
                && t.category_id() == Some(&budget.category_id)
                && t.date >= budget.start_date
        })
        .map(|t| t.amount)
        .sum()
}

/// Evaluate one budget against a transaction snapshot as of `today`
pub fn evaluate(budget: &Budget, transactions: &[Transaction], today: NaiveDate) -> BudgetEvaluation {
    let (window_start, window_end) = budget.window();
    let spent = spent_against(budget, transactions);

    let progress = match spent.percent_of(budget.amount) {
        Some(pct) => pct.clamp(0.0, 100.0),
        None if spent.is_positive() => 100.0,
        None => 0.0,
    };

    BudgetEvaluation {
        budget: budget.clone(),
        window_start,
        window_end,
        status: if window_start <= today {
            BudgetStatus::Active
        } else {
            BudgetStatus::Upcoming
        },
        spent,
        progress,
        severity: Severity::from_progress(progress),
        remaining: budget.amount - spent,
        category: category::lookup(&budget.category_id),
    }
}

/// Evaluated budgets split by status
#[derive(Debug, Clone, Default)]
pub struct BudgetOverview {
    /// Highest progress first
    pub active: Vec<BudgetEvaluation>,
    /// Soonest start first
    pub upcoming: Vec<BudgetEvaluation>,
}

/// Evaluate every budget and order them for display
pub fn overview(budgets: &[Budget], transactions: &[Transaction], today: NaiveDate) -> BudgetOverview {
    let (mut active, mut upcoming): (Vec<_>, Vec<_>) = budgets
        .iter()
        .map(|b| evaluate(b, transactions, today))
        .partition(|e| e.status == BudgetStatus::Active);

    active.sort_by(|a, b| b.progress.total_cmp(&a.progress));
    upcoming.sort_by_key(|e| e.window_start);

    BudgetOverview { active, upcoming }
}

/// Input for creating or replacing a budget
#[derive(Debug, Clone)]
pub struct BudgetInput {
    pub category_id: CategoryId,
    pub amount: Money,
    pub period: PeriodKind,
    pub start_date: NaiveDate,
    /// Required for custom periods, rejected otherwise
    pub end_date: Option<NaiveDate>,
}

impl BudgetInput {
    pub fn from_budget(budget: &Budget) -> Self {
        Self {
            category_id: budget.category_id.clone(),
            amount: budget.amount,
            period: budget.period.kind(),
            start_date: budget.start_date,
            end_date: budget.period.end_date(),
        }
    }
}

/// Service for budget management
pub struct BudgetService<'a, S: RecordStore + ?Sized = Storage> {
    store: &'a S,
    user: UserId,
}

impl<'a, S: RecordStore + ?Sized> BudgetService<'a, S> {
    pub fn new(store: &'a S, user: UserId) -> Self {
        Self { store, user }
    }

    pub fn create(&self, input: BudgetInput) -> FinTrackResult<Budget> {
        let period = self.check(&input)?;
        let budget = Budget::new(
            self.user.clone(),
            input.category_id,
            input.amount,
            period,
            input.start_date,
        )
        .map_err(|e| FinTrackError::Validation(e.to_string()))?;

        self.store.put_budget(budget.clone())?;
        info!(budget = %budget.id, category = %budget.category_id, amount = %budget.amount, "created budget");
        Ok(budget)
    }

    /// Replace a budget's fields, keeping its id
    pub fn update(&self, id: BudgetId, input: BudgetInput) -> FinTrackResult<Budget> {
        let mut budget = self.owned(id)?;
        let period = self.check(&input)?;

        budget.category_id = input.category_id;
        budget.amount = input.amount;
        budget.period = period;
        budget.start_date = input.start_date;
        budget.updated_at = Utc::now();
        budget
            .validate()
            .map_err(|e| FinTrackError::Validation(e.to_string()))?;

        self.store.put_budget(budget.clone())?;
        info!(budget = %budget.id, "updated budget");
        Ok(budget)
    }

    pub fn delete(&self, id: BudgetId) -> FinTrackResult<Budget> {
        let budget = self.owned(id)?;
        self.store.remove_budget(id)?;
        info!(budget = %budget.id, "deleted budget");
        Ok(budget)
    }

    /// Budgets owned by the acting user, by start date
    pub fn list(&self) -> FinTrackResult<Vec<Budget>> {
        Ok(self
            .store
            .budgets()?
            .into_iter()
            .filter(|b| b.owner_id == self.user)
            .collect())
    }

    /// Resolve a short or full budget id
    pub fn find(&self, reference: &str) -> FinTrackResult<Budget> {
        let mut matches = self
            .list()?
            .into_iter()
            .filter(|b| b.id.matches(reference));
        match (matches.next(), matches.next()) {
            (Some(budget), None) => Ok(budget),
            (Some(_), Some(_)) => Err(FinTrackError::Validation(format!(
                "Budget id '{}' is ambiguous; use more characters",
                reference
            ))),
            (None, _) => Err(FinTrackError::budget_not_found(reference)),
        }
    }

    /// Evaluate the acting user's budgets against `transactions`
    pub fn overview(
        &self,
        transactions: &[Transaction],
        today: NaiveDate,
    ) -> FinTrackResult<BudgetOverview> {
        Ok(overview(&self.list()?, transactions, today))
    }

    fn owned(&self, id: BudgetId) -> FinTrackResult<Budget> {
        self.store
            .budget(id)?
            .filter(|b| b.owner_id == self.user)
            .ok_or_else(|| FinTrackError::budget_not_found(id.to_string()))
    }

    /// Category must resolve and be spendable; period must be well formed
    fn check(&self, input: &BudgetInput) -> FinTrackResult<BudgetPeriod> {
        let category = category::get(&input.category_id).ok_or_else(|| {
            FinTrackError::ReferentialIntegrity(format!(
                "category {} does not exist",
                input.category_id
            ))
        })?;
        if !category.is_expense_eligible() {
            return Err(FinTrackError::Validation(format!(
                "Category '{}' cannot be budgeted against",
                category.name
            )));
        }

        BudgetPeriod::from_kind(input.period, input.end_date)
            .map_err(|e| FinTrackError::Validation(e.to_string()))
    }
}
