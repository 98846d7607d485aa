//! Budget model
//!
//! A budget caps spending in one category from a start date onward. Its
//! period decides the display window; only custom periods store an end date.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, CategoryId, UserId};
use super::money::Money;

/// Budget period with its period-specific data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "period", rename_all = "snake_case")]
pub enum BudgetPeriod {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom { end_date: NaiveDate },
}

impl BudgetPeriod {
    /// Build a period from its kind and an optional end date
    ///
    /// An end date is required for custom periods and rejected for the
    /// others, whose end is always derived.
    pub fn from_kind(
        kind: PeriodKind,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, BudgetValidationError> {
        match (kind, end_date) {
            (PeriodKind::Custom, Some(end_date)) => Ok(Self::Custom { end_date }),
            (PeriodKind::Custom, None) => Err(BudgetValidationError::MissingEndDate),
            (_, Some(_)) => Err(BudgetValidationError::UnexpectedEndDate(kind)),
            (PeriodKind::Daily, None) => Ok(Self::Daily),
            (PeriodKind::Weekly, None) => Ok(Self::Weekly),
            (PeriodKind::Monthly, None) => Ok(Self::Monthly),
            (PeriodKind::Yearly, None) => Ok(Self::Yearly),
        }
    }

    pub fn kind(&self) -> PeriodKind {
        match self {
            Self::Daily => PeriodKind::Daily,
            Self::Weekly => PeriodKind::Weekly,
            Self::Monthly => PeriodKind::Monthly,
            Self::Yearly => PeriodKind::Yearly,
            Self::Custom { .. } => PeriodKind::Custom,
        }
    }

    /// Stored end date (custom periods only)
    pub fn end_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Custom { end_date } => Some(*end_date),
            _ => None,
        }
    }

    /// Last day (inclusive) of the window that opens on `start`
    pub fn window_end(&self, start: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily => start,
            Self::Weekly => start + Duration::days(6),
            Self::Monthly => last_day_of_month(start),
            Self::Yearly => NaiveDate::from_ymd_opt(start.year(), 12, 31).unwrap_or(start),
            Self::Custom { end_date } => *end_date,
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind(), f)
    }
}

/// Last calendar day of the month containing `date`
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// Field-less period discriminant, as entered by a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom,
}

impl PeriodKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Some(Self::Daily),
            "weekly" | "week" => Some(Self::Weekly),
            "monthly" | "month" => Some(Self::Monthly),
            "yearly" | "year" | "annual" => Some(Self::Yearly),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
            Self::Custom => "Custom",
        };
        f.pad(label)
    }
}

/// A spending cap for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,

    pub owner_id: UserId,

    pub category_id: CategoryId,

    /// The cap; always positive
    pub amount: Money,

    pub start_date: NaiveDate,

    #[serde(flatten)]
    pub period: BudgetPeriod,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Create a validated budget
    pub fn new(
        owner_id: UserId,
        category_id: CategoryId,
        amount: Money,
        period: BudgetPeriod,
        start_date: NaiveDate,
    ) -> Result<Self, BudgetValidationError> {
        let now = Utc::now();
        let budget = Self {
            id: BudgetId::new(),
            owner_id,
            category_id,
            amount,
            start_date,
            period,
            created_at: now,
            updated_at: now,
        };
        budget.validate()?;
        Ok(budget)
    }

    /// Inclusive display window `(start, end)`
    pub fn window(&self) -> (NaiveDate, NaiveDate) {
        (self.start_date, self.period.window_end(self.start_date))
    }

    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if !self.amount.is_positive() {
            return Err(BudgetValidationError::NonPositiveAmount(self.amount));
        }

        if let BudgetPeriod::Custom { end_date } = self.period {
            if end_date < self.start_date {
                return Err(BudgetValidationError::EndBeforeStart {
                    start: self.start_date,
                    end: end_date,
                });
            }
        }

        Ok(())
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NonPositiveAmount(Money),
    MissingEndDate,
    UnexpectedEndDate(PeriodKind),
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Budget amount must be positive, got {}", amount)
            }
            Self::MissingEndDate => write!(f, "Custom budgets require an end date"),
            Self::UnexpectedEndDate(kind) => {
                write!(f, "{} budgets derive their end date; do not pass one", kind)
            }
            Self::EndBeforeStart { start, end } => {
                write!(f, "End date {} is before start date {}", end, start)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}
