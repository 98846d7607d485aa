//! Account CLI commands
//!
//! Implements CLI commands for account management.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::account::{format_account_details, format_account_list};
use crate::error::{FinTrackError, FinTrackResult};
use crate::models::{AccountType, UserId};
use crate::services::{AccountService, AccountUpdate, CreateAccountInput};
use crate::storage::Storage;

use super::{load_ledger, parse_money};

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Account name
        name: String,
        /// Account type (bank, credit_card, debit_card, cash)
        #[arg(short = 't', long, default_value = "bank")]
        account_type: String,
        /// Opening balance (e.g., "1000.00" or "1000")
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        balance: String,
        /// Bank or issuer name
        #[arg(long)]
        bank: Option<String>,
        /// Last four digits of the card
        #[arg(long)]
        last4: Option<String>,
    },
    /// List accounts you own or that are shared with you
    List,
    /// Show account details
    Show {
        /// Account name or ID
        account: String,
    },
    /// Edit account metadata
    Edit {
        /// Account name or ID
        account: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New account type
        #[arg(short = 't', long)]
        account_type: Option<String>,
        /// New bank name ("" clears it)
        #[arg(long)]
        bank: Option<String>,
        /// New card digits ("" clears them)
        #[arg(long)]
        last4: Option<String>,
    },
    /// Give another user read access
    Share {
        /// Account name or ID
        account: String,
        /// User id to share with
        user: String,
    },
    /// Revoke another user's read access
    Unshare {
        /// Account name or ID
        account: String,
        /// User id to revoke
        user: String,
    },
    /// Delete an account and all of its transactions
    Delete {
        /// Account name or ID
        account: String,
    },
}

fn parse_account_type(input: &str) -> FinTrackResult<AccountType> {
    AccountType::parse(input).ok_or_else(|| {
        FinTrackError::Validation(format!(
            "Invalid account type: '{}'. Valid types: bank, credit_card, debit_card, cash",
            input
        ))
    })
}

/// Handle an account command
pub fn handle_account_command(
    storage: &Storage,
    settings: &Settings,
    cmd: AccountCommands,
) -> FinTrackResult<()> {
    let mut ledger = load_ledger(storage)?;
    let mut service = AccountService::new(storage, &mut ledger, settings.current_user.clone());
    let currency = settings.currency_symbol.as_str();

    match cmd {
        AccountCommands::Create {
            name,
            account_type,
            balance,
            bank,
            last4,
        } => {
            let account = service.create(CreateAccountInput {
                name,
                account_type: parse_account_type(&account_type)?,
                opening_balance: parse_money(&balance)?,
                bank_name: bank,
                last4_digits: last4,
            })?;

            println!("Created account: {}", account.name);
            println!("  Type: {}", account.account_type);
            println!(
                "  Opening Balance: {}",
                account.opening_balance.format_with_symbol(currency)
            );
            println!("  ID: {}", account.id);
        }

        AccountCommands::List => {
            let accounts = service.list()?;
            print!(
                "{}",
                format_account_list(&accounts, &settings.current_user, currency)
            );
        }

        AccountCommands::Show { account } => {
            let found = service.find(&account)?;
            print!("{}", format_account_details(&found, currency));
        }

        AccountCommands::Edit {
            account,
            name,
            account_type,
            bank,
            last4,
        } => {
            let found = service.find(&account)?;

            if name.is_none() && account_type.is_none() && bank.is_none() && last4.is_none() {
                println!("No changes specified. Use --name, --account-type, --bank or --last4.");
                return Ok(());
            }

            let updated = service.update(
                found.id,
                AccountUpdate {
                    name,
                    account_type: account_type.as_deref().map(parse_account_type).transpose()?,
                    bank_name: bank,
                    last4_digits: last4,
                },
            )?;
            println!("Updated account: {}", updated.name);
        }

        AccountCommands::Share { account, user } => {
            let found = service.find(&account)?;
            let shared = service.share(found.id, UserId::from(user.as_str()))?;
            println!("Shared account '{}' with {}", shared.name, user);
        }

        AccountCommands::Unshare { account, user } => {
            let found = service.find(&account)?;
            let updated = service.unshare(found.id, &UserId::from(user.as_str()))?;
            println!("Stopped sharing account '{}' with {}", updated.name, user);
        }

        AccountCommands::Delete { account } => {
            let found = service.find(&account)?;
            let deletion = service.delete(found.id)?;

            println!("Deleted account: {}", deletion.account.name);
            println!(
                "  Removed {} transaction(s)",
                deletion.removed_transactions.len()
            );
            for warning in &deletion.warnings {
                eprintln!("Warning: {}", warning);
            }
        }
    }

    Ok(())
}
