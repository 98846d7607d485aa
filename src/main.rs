use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};

use fintrack::cli::{
    handle_account_command, handle_budget_command, handle_category_command, handle_check_command,
    handle_transaction_command,
};
use fintrack::config::{FinTrackPaths, Settings};
use fintrack::reports::SummaryReport;
use fintrack::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "fintrack",
    version,
    about = "Personal and shared finance tracker",
    long_about = "FinTrack records income, expenses and transfers across accounts you \
                  own or that are shared with you, keeps every balance consistent with \
                  its transactions, and tracks spending against budgets."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },

    /// Account management commands
    #[command(subcommand)]
    Account(fintrack::cli::AccountCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(fintrack::cli::TransactionCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(fintrack::cli::BudgetCommands),

    /// Category catalog
    #[command(subcommand)]
    Category(fintrack::cli::CategoryCommands),

    /// Show the dashboard summary
    Summary {
        /// Summarize as of this date (defaults to today)
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Verify recorded balances against a full replay of transactions
    Check,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration and paths
    Show,
    /// Change a setting (current_user, currency_symbol, date_format)
    Set { key: String, value: String },
}

fn show_config(paths: &FinTrackPaths, settings: &Settings) {
    println!("FinTrack Configuration");
    println!("======================");
    println!("Base directory: {}", paths.base_dir().display());
    println!("Data directory: {}", paths.data_dir().display());
    println!();
    println!("Settings:");
    println!("  Current user:    {}", settings.current_user);
    println!("  Currency symbol: {}", settings.currency_symbol);
    println!("  Date format:     {}", settings.date_format);
}

fn main() -> Result<()> {
    fintrack::logging::init_tracing();
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = FinTrackPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::open(paths.clone())?;

    match cli.command {
        Some(Commands::Init) => {
            let already = paths.is_initialized();
            initialize_storage(&paths)?;
            if already {
                println!("FinTrack is already initialized at: {}", paths.base_dir().display());
            } else {
                println!("Initialized FinTrack at: {}", paths.base_dir().display());
                println!();
                println!("Run 'fintrack account create <name>' to add your first account.");
            }
        }
        Some(Commands::Config { action }) => match action {
            None | Some(ConfigCommands::Show) => show_config(&paths, &settings),
            Some(ConfigCommands::Set { key, value }) => {
                settings.set(&key, &value)?;
                settings.save(&paths)?;
                println!("Set {} = {}", key, value);
            }
        },
        Some(Commands::Account(cmd)) => {
            handle_account_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(cmd)?;
        }
        Some(Commands::Summary { as_of }) => {
            let today = match as_of {
                Some(d) => fintrack::cli::parse_date(&d, &settings)?,
                None => Local::now().date_naive(),
            };
            let report = SummaryReport::generate(&storage, &settings.current_user, today)?;
            print!("{}", report.format_terminal(&settings.currency_symbol));
        }
        Some(Commands::Check) => {
            let report = handle_check_command(&storage, &settings)?;
            if !report.is_consistent() {
                std::process::exit(1);
            }
        }
        None => {
            println!("FinTrack - personal and shared finance tracking");
            println!();
            println!("Run 'fintrack --help' for usage information.");
            println!("Run 'fintrack init' to get started.");
        }
    }

    Ok(())
}
