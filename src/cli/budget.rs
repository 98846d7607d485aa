//! Budget CLI commands
//!
//! Implements CLI commands for budget management and the budget overview.

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use crate::config::Settings;
use crate::display::budget::{format_budget_details, format_budget_list};
use crate::error::{FinTrackError, FinTrackResult};
use crate::models::category;
use crate::models::{CategoryId, PeriodKind};
use crate::reports::{BudgetOverviewReport, VisibleSet};
use crate::services::budget::evaluate;
use crate::services::{BudgetInput, BudgetService};
use crate::storage::{RecordStore, Storage};

use super::{parse_date, parse_money};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create a spending cap for a category
    Create {
        /// Category name or ID
        category: String,
        /// Cap amount (e.g., "400")
        amount: String,
        /// Period (daily, weekly, monthly, yearly, custom)
        #[arg(short, long, default_value = "monthly")]
        period: String,
        /// First day of the window (defaults to today)
        #[arg(short, long)]
        start: Option<String>,
        /// Last day of the window (custom periods only)
        #[arg(short, long)]
        end: Option<String>,
    },
    /// List your budgets
    List,
    /// Show a budget with its current spend
    Show {
        /// Budget ID (or prefix)
        id: String,
    },
    /// Edit a budget; unspecified fields keep their values
    Edit {
        /// Budget ID (or prefix)
        id: String,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        period: Option<String>,
        #[arg(short, long)]
        start: Option<String>,
        #[arg(short, long)]
        end: Option<String>,
    },
    /// Delete a budget
    Delete {
        /// Budget ID (or prefix)
        id: String,
    },
    /// Show active and upcoming budgets with progress
    Overview {
        /// Evaluate as of this date (defaults to today)
        #[arg(long)]
        as_of: Option<String>,
    },
}

fn parse_period(input: &str) -> FinTrackResult<PeriodKind> {
    PeriodKind::parse(input).ok_or_else(|| {
        FinTrackError::Validation(format!(
            "Invalid period: '{}'. Valid periods: daily, weekly, monthly, yearly, custom",
            input
        ))
    })
}

fn resolve_category(reference: &str) -> CategoryId {
    category::find(reference)
        .map(|c| c.category_id())
        .unwrap_or_else(|| CategoryId::from(reference))
}

fn today_or(input: Option<String>, settings: &Settings) -> FinTrackResult<NaiveDate> {
    match input {
        Some(d) => parse_date(&d, settings),
        None => Ok(Local::now().date_naive()),
    }
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> FinTrackResult<()> {
    let service = BudgetService::new(storage, settings.current_user.clone());
    let currency = settings.currency_symbol.as_str();

    match cmd {
        BudgetCommands::Create {
            category,
            amount,
            period,
            start,
            end,
        } => {
            let budget = service.create(BudgetInput {
                category_id: resolve_category(&category),
                amount: parse_money(&amount)?,
                period: parse_period(&period)?,
                start_date: today_or(start, settings)?,
                end_date: end.map(|e| parse_date(&e, settings)).transpose()?,
            })?;

            let (start, end) = budget.window();
            println!(
                "Created {} budget of {} for {}",
                budget.period,
                budget.amount.format_with_symbol(currency),
                category::lookup(&budget.category_id).name
            );
            println!("  Window: {} to {}", start, end);
            println!("  ID: {}", budget.id);
        }

        BudgetCommands::List => {
            print!("{}", format_budget_list(&service.list()?, currency));
        }

        BudgetCommands::Show { id } => {
            let budget = service.find(&id)?;
            let visible = VisibleSet::for_user(
                &settings.current_user,
                storage.accounts()?,
                storage.transactions()?,
            );
            let eval = evaluate(&budget, &visible.transactions, Local::now().date_naive());
            print!("{}", format_budget_details(&eval, currency));
        }

        BudgetCommands::Edit {
            id,
            category,
            amount,
            period,
            start,
            end,
        } => {
            let existing = service.find(&id)?;
            let mut input = BudgetInput::from_budget(&existing);

            if let Some(category) = category {
                input.category_id = resolve_category(&category);
            }
            if let Some(amount) = amount {
                input.amount = parse_money(&amount)?;
            }
            if let Some(period) = period {
                input.period = parse_period(&period)?;
                if input.period != PeriodKind::Custom {
                    input.end_date = None;
                }
            }
            if let Some(start) = start {
                input.start_date = parse_date(&start, settings)?;
            }
            if let Some(end) = end {
                input.end_date = Some(parse_date(&end, settings)?);
            }

            let updated = service.update(existing.id, input)?;
            println!(
                "Updated budget {}: {} {} for {}",
                updated.id.short(),
                updated.period,
                updated.amount.format_with_symbol(currency),
                category::lookup(&updated.category_id).name
            );
        }

        BudgetCommands::Delete { id } => {
            let budget = service.find(&id)?;
            let deleted = service.delete(budget.id)?;
            println!("Deleted budget {}", deleted.id.short());
        }

        BudgetCommands::Overview { as_of } => {
            let today = today_or(as_of, settings)?;
            let report = BudgetOverviewReport::generate(storage, &settings.current_user, today)?;
            print!("{}", report.format_terminal(currency));
        }
    }

    Ok(())
}
