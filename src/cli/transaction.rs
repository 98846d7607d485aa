//! Transaction CLI commands
//!
//! Implements CLI commands for recording, editing and listing transactions.

use chrono::Local;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::transaction::{format_transaction_details, format_transaction_register, AccountNames};
use crate::error::{FinTrackError, FinTrackResult};
use crate::models::category;
use crate::models::{AccountId, CategoryId, TransactionKind, TransactionKindTag};
use crate::services::{AccountService, TransactionFilter, TransactionInput, TransactionService};
use crate::storage::{RecordStore, Storage};

use super::{load_ledger, parse_date, parse_money};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a new transaction
    Add {
        /// Account name or ID (the source account for transfers)
        account: String,
        /// Amount, always positive (e.g., "12.50")
        amount: String,
        /// Transaction type (income, expense, transfer)
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,
        /// Category name or ID (income and expense)
        #[arg(short, long)]
        category: Option<String>,
        /// Destination account name or ID (transfer)
        #[arg(long)]
        to: Option<String>,
        /// Date (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Description
        #[arg(short = 'm', long, default_value = "")]
        description: String,
    },
    /// List transactions
    List {
        /// Only transactions touching this account
        #[arg(short, long)]
        account: Option<String>,
        /// Only this type
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// Earliest date
        #[arg(long)]
        from: Option<String>,
        /// Latest date
        #[arg(long)]
        until: Option<String>,
        /// Maximum number to show
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Show transaction details
    Show {
        /// Transaction ID (or prefix)
        id: String,
    },
    /// Edit a transaction; unspecified fields keep their values
    Edit {
        /// Transaction ID (or prefix)
        id: String,
        /// New account name or ID
        #[arg(long)]
        account: Option<String>,
        /// New amount
        #[arg(long)]
        amount: Option<String>,
        /// New type
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New destination account (transfer)
        #[arg(long)]
        to: Option<String>,
        /// New date
        #[arg(short, long)]
        date: Option<String>,
        /// New description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// Delete a transaction and reverse its effect
    Delete {
        /// Transaction ID (or prefix)
        id: String,
    },
}

fn parse_kind_tag(input: &str) -> FinTrackResult<TransactionKindTag> {
    TransactionKindTag::parse(input).ok_or_else(|| {
        FinTrackError::Validation(format!(
            "Invalid transaction type: '{}'. Valid types: income, expense, transfer",
            input
        ))
    })
}

/// Catalog id for a name or id; anything unmatched is passed through so the
/// service reports it as an unresolved reference
fn resolve_category(reference: &str) -> CategoryId {
    category::find(reference)
        .map(|c| c.category_id())
        .unwrap_or_else(|| CategoryId::from(reference))
}

/// Build the kind-specific fields, keeping whatever `previous` had where no
/// new value was given
fn build_kind(
    tag: TransactionKindTag,
    category: Option<CategoryId>,
    to: Option<AccountId>,
    previous: Option<&TransactionKind>,
) -> FinTrackResult<TransactionKind> {
    let previous_category = previous.and_then(|k| k.category_id()).cloned();
    let previous_to = previous.and_then(|k| k.to_account_id());

    match tag {
        TransactionKindTag::Income | TransactionKindTag::Expense => {
            let category_id = category.or(previous_category).ok_or_else(|| {
                FinTrackError::Validation(format!(
                    "{} transactions need a category (--category)",
                    tag
                ))
            })?;
            Ok(if tag == TransactionKindTag::Income {
                TransactionKind::Income { category_id }
            } else {
                TransactionKind::Expense { category_id }
            })
        }
        TransactionKindTag::Transfer => {
            let to_account_id = to.or(previous_to).ok_or_else(|| {
                FinTrackError::Validation(
                    "Transfers need a destination account (--to)".to_string(),
                )
            })?;
            Ok(TransactionKind::Transfer {
                to_account_id,
                category_id: category.or(previous_category),
            })
        }
    }
}

fn account_names(storage: &Storage) -> FinTrackResult<AccountNames> {
    Ok(storage
        .accounts()?
        .into_iter()
        .map(|a| (a.id, a.name))
        .collect())
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> FinTrackResult<()> {
    let user = settings.current_user.clone();
    let currency = settings.currency_symbol.as_str();
    let mut ledger = load_ledger(storage)?;

    // Account references resolve among the accounts the user can see
    let mut account_ledger = ledger.clone();
    let accounts = AccountService::new(storage, &mut account_ledger, user.clone());
    let resolve_account = |reference: &str| accounts.find(reference).map(|a| a.id);

    match cmd {
        TransactionCommands::Add {
            account,
            amount,
            kind,
            category,
            to,
            date,
            description,
        } => {
            let account_id = resolve_account(&account)?;
            let to = to.as_deref().map(&resolve_account).transpose()?;
            let kind = build_kind(
                parse_kind_tag(&kind)?,
                category.as_deref().map(resolve_category),
                to,
                None,
            )?;
            let date = match date {
                Some(d) => parse_date(&d, settings)?,
                None => Local::now().date_naive(),
            };

            let mut service = TransactionService::new(storage, &mut ledger, user);
            let txn = service.add(TransactionInput {
                account_id,
                kind,
                amount: parse_money(&amount)?,
                date,
                description,
            })?;

            println!("Recorded {} of {}", txn.tag(), txn.amount.format_with_symbol(currency));
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::List {
            account,
            kind,
            category,
            from,
            until,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if let Some(account) = account {
                filter = filter.account(resolve_account(&account)?);
            }
            if let Some(kind) = kind {
                filter = filter.kind(parse_kind_tag(&kind)?);
            }
            if let Some(category) = category {
                filter = filter.category(resolve_category(&category));
            }
            if from.is_some() || until.is_some() {
                let start = match from {
                    Some(d) => parse_date(&d, settings)?,
                    None => chrono::NaiveDate::MIN,
                };
                let end = match until {
                    Some(d) => parse_date(&d, settings)?,
                    None => chrono::NaiveDate::MAX,
                };
                filter = filter.date_range(start, end);
            }

            let service = TransactionService::new(storage, &mut ledger, user);
            let transactions = service.list(&filter)?;
            print!(
                "{}",
                format_transaction_register(&transactions, &account_names(storage)?, currency)
            );
        }

        TransactionCommands::Show { id } => {
            let service = TransactionService::new(storage, &mut ledger, user);
            let txn = service.find(&id)?;
            print!(
                "{}",
                format_transaction_details(&txn, &account_names(storage)?, currency)
            );
        }

        TransactionCommands::Edit {
            id,
            account,
            amount,
            kind,
            category,
            to,
            date,
            description,
        } => {
            let account = account.as_deref().map(&resolve_account).transpose()?;
            let to = to.as_deref().map(&resolve_account).transpose()?;

            let mut service = TransactionService::new(storage, &mut ledger, user);
            let existing = service.find(&id)?;
            let mut input = TransactionInput::from_transaction(&existing);

            if let Some(account_id) = account {
                input.account_id = account_id;
            }
            if let Some(amount) = amount {
                input.amount = parse_money(&amount)?;
            }
            if let Some(date) = date {
                input.date = parse_date(&date, settings)?;
            }
            if let Some(description) = description {
                input.description = description;
            }
            if kind.is_some() || category.is_some() || to.is_some() {
                let tag = match kind {
                    Some(kind) => parse_kind_tag(&kind)?,
                    None => existing.tag(),
                };
                input.kind = build_kind(
                    tag,
                    category.as_deref().map(resolve_category),
                    to,
                    Some(&existing.kind),
                )?;
            }

            let updated = service.update(existing.id, input)?;
            println!(
                "Updated transaction {}: {} of {}",
                updated.id.short(),
                updated.tag(),
                updated.amount.format_with_symbol(currency)
            );
        }

        TransactionCommands::Delete { id } => {
            let mut service = TransactionService::new(storage, &mut ledger, user);
            let txn = service.find(&id)?;
            let deleted = service.delete(txn.id)?;
            println!(
                "Deleted transaction {} ({} of {})",
                deleted.id.short(),
                deleted.tag(),
                deleted.amount.format_with_symbol(currency)
            );
        }
    }

    Ok(())
}
