//! Dashboard summary
//!
//! Totals over the accounts and transactions a user can see: balance,
//! this month's income and expense against last month, account counts,
//! recent activity and the expense breakdown by category.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::error::FinTrackResult;
use crate::models::category::{self, Category};
use crate::models::{Account, AccountId, Money, Transaction, TransactionKindTag, UserId};
use crate::storage::{RecordStore, Storage};

/// Number of transactions listed under recent activity
pub const RECENT_LIMIT: usize = 5;

/// Changes smaller than this many percent read as "similar"
const SIMILAR_BELOW_PCT: f64 = 1.0;

/// Accounts and transactions visible to one user
#[derive(Debug, Clone, Default)]
pub struct VisibleSet {
    pub owned: Vec<Account>,
    pub shared: Vec<Account>,
    /// Transactions whose source account is owned or shared
    pub transactions: Vec<Transaction>,
}

impl VisibleSet {
    pub fn for_user(user: &UserId, accounts: Vec<Account>, transactions: Vec<Transaction>) -> Self {
        let (owned, rest): (Vec<_>, Vec<_>) =
            accounts.into_iter().partition(|a| a.is_owned_by(user));
        let shared: Vec<_> = rest.into_iter().filter(|a| a.is_shared_with(user)).collect();

        let visible: Vec<AccountId> = owned.iter().chain(&shared).map(|a| a.id).collect();
        let transactions = transactions
            .into_iter()
            .filter(|t| visible.contains(&t.account_id))
            .collect();

        Self {
            owned,
            shared,
            transactions,
        }
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.owned.iter().chain(&self.shared).cloned().collect()
    }
}

/// Month-over-month movement of a total
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonthDelta {
    /// Nothing last month and nothing this month
    NoPriorData,
    /// Nothing last month, something this month
    UpFromZero,
    /// Moved by less than one percent
    Similar,
    /// Signed percentage change
    Change(f64),
}

impl MonthDelta {
    pub fn between(current: Money, previous: Money) -> Self {
        match (current - previous).percent_of(previous) {
            None if current.is_positive() => Self::UpFromZero,
            None => Self::NoPriorData,
            Some(pct) if pct.abs() < SIMILAR_BELOW_PCT => Self::Similar,
            Some(pct) => Self::Change(pct),
        }
    }

    /// Human-readable label, with amounts in `currency`
    pub fn label(&self, currency: &str) -> String {
        match self {
            Self::NoPriorData => "No data".to_string(),
            Self::UpFromZero => format!("Up from {}", Money::zero().format_with_symbol(currency)),
            Self::Similar => "Similar".to_string(),
            Self::Change(pct) if *pct > 0.0 => format!("+{:.0}% vs last month", pct),
            Self::Change(pct) => format!("{:.0}% vs last month", pct),
        }
    }
}

/// Total expense for one display category
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpend {
    pub category: &'static Category,
    pub amount: Money,
}

/// Dashboard totals
#[derive(Debug, Clone)]
pub struct Summary {
    pub total_balance: Money,
    pub month_income: Money,
    pub month_expense: Money,
    pub previous_month_income: Money,
    pub previous_month_expense: Money,
    pub income_delta: MonthDelta,
    pub expense_delta: MonthDelta,
    /// Name and balance of the richest account
    pub highest_balance: Option<(String, Money)>,
    /// Newest first
    pub recent: Vec<Transaction>,
    /// Largest first
    pub expense_breakdown: Vec<CategorySpend>,
}

/// Year and month before the one containing `date`
fn previous_month(date: NaiveDate) -> (i32, u32) {
    if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    }
}

fn total_in_month(
    transactions: &[Transaction],
    kind: TransactionKindTag,
    (year, month): (i32, u32),
) -> Money {
    transactions
        .iter()
        .filter(|t| t.tag() == kind && t.date.year() == year && t.date.month() == month)
        .map(|t| t.amount)
        .sum()
}

/// Compute the dashboard totals for `accounts` and `transactions` as of `today`
pub fn summarize(accounts: &[Account], transactions: &[Transaction], today: NaiveDate) -> Summary {
    let this_month = (today.year(), today.month());
    let last_month = previous_month(today);

    let month_income = total_in_month(transactions, TransactionKindTag::Income, this_month);
    let month_expense = total_in_month(transactions, TransactionKindTag::Expense, this_month);
    let previous_month_income = total_in_month(transactions, TransactionKindTag::Income, last_month);
    let previous_month_expense =
        total_in_month(transactions, TransactionKindTag::Expense, last_month);

    let highest_balance = accounts
        .iter()
        .max_by_key(|a| a.balance())
        .map(|a| (a.name.clone(), a.balance()));

    let mut recent = transactions.to_vec();
    recent.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
    recent.truncate(RECENT_LIMIT);

    Summary {
        total_balance: accounts.iter().map(|a| a.balance()).sum(),
        month_income,
        month_expense,
        previous_month_income,
        previous_month_expense,
        income_delta: MonthDelta::between(month_income, previous_month_income),
        expense_delta: MonthDelta::between(month_expense, previous_month_expense),
        highest_balance,
        recent,
        expense_breakdown: expense_breakdown(transactions),
    }
}

/// Expenses grouped by display category, largest first
///
/// Dangling category ids all fold into the `Unknown` row.
pub fn expense_breakdown(transactions: &[Transaction]) -> Vec<CategorySpend> {
    let mut totals: HashMap<&'static str, (&'static Category, Money)> = HashMap::new();
    for txn in transactions.iter().filter(|t| t.is_expense()) {
        let category = txn
            .category_id()
            .map(category::lookup)
            .unwrap_or(&category::UNKNOWN);
        totals.entry(category.id).or_insert((category, Money::zero())).1 += txn.amount;
    }

    let mut rows: Vec<_> = totals
        .into_values()
        .map(|(category, amount)| CategorySpend { category, amount })
        .collect();
    rows.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.category.name.cmp(b.category.name)));
    rows
}

/// Summary plus the ownership split, ready for display
#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub summary: Summary,
    pub personal_accounts: usize,
    pub shared_accounts: usize,
}

impl SummaryReport {
    pub fn from_visible(visible: &VisibleSet, today: NaiveDate) -> Self {
        Self {
            summary: summarize(&visible.accounts(), &visible.transactions, today),
            personal_accounts: visible.owned.len(),
            shared_accounts: visible.shared.len(),
        }
    }

    pub fn generate(storage: &Storage, user: &UserId, today: NaiveDate) -> FinTrackResult<Self> {
        let visible = VisibleSet::for_user(user, storage.accounts()?, storage.transactions()?);
        Ok(Self::from_visible(&visible, today))
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let s = &self.summary;
        let money = |m: Money| m.format_with_symbol(currency);
        let mut output = String::new();

        output.push_str("Summary\n");
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("{:<22} {:>14}\n", "Total balance", money(s.total_balance)));
        output.push_str(&format!(
            "{:<22} {:>14}   {}\n",
            "Income this month",
            money(s.month_income),
            s.income_delta.label(currency)
        ));
        output.push_str(&format!(
            "{:<22} {:>14}   {}\n",
            "Expenses this month",
            money(s.month_expense),
            s.expense_delta.label(currency)
        ));
        output.push_str(&format!(
            "{:<22} {} personal, {} shared\n",
            "Accounts", self.personal_accounts, self.shared_accounts
        ));
        if let Some((name, balance)) = &s.highest_balance {
            output.push_str(&format!(
                "{:<22} {} ({})\n",
                "Highest balance",
                name,
                money(*balance)
            ));
        }

        output.push_str("\nExpense breakdown\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        if s.expense_breakdown.is_empty() {
            output.push_str("No expense data available.\n");
        }
        for row in &s.expense_breakdown {
            output.push_str(&format!(
                "{:<22} {:>14}\n",
                row.category.name,
                money(row.amount)
            ));
        }

        output.push_str("\nRecent transactions\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        if s.recent.is_empty() {
            output.push_str("No transactions yet.\n");
        }
        for txn in &s.recent {
            let label = match txn.category_id() {
                Some(id) => category::lookup(id).name.to_string(),
                None => txn.tag().to_string(),
            };
            let sign = match txn.tag() {
                TransactionKindTag::Income => "+",
                TransactionKindTag::Expense => "-",
                TransactionKindTag::Transfer => " ",
            };
            output.push_str(&format!(
                "{}  {:<20} {}{:>13}\n",
                txn.date,
                label,
                sign,
                money(txn.amount)
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountType, TransactionKind};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn account(owner: &str, name: &str, units: i64) -> Account {
        Account::with_opening_balance(
            UserId::from(owner),
            name,
            AccountType::Bank,
            Money::from_units(units),
        )
    }

    fn txn(account: &Account, kind: TransactionKind, units: i64, date: NaiveDate) -> Transaction {
        Transaction::new(
            account.owner_id.clone(),
            account.id,
            kind,
            Money::from_units(units),
            date,
            "",
        )
    }

    #[test]
    fn test_month_totals_match_year_and_month() {
        let a = account("alice", "Checking", 0);
        let txns = vec![
            txn(&a, TransactionKind::income("cat-salary"), 1000, d(2025, 6, 1)),
            txn(&a, TransactionKind::income("cat-salary"), 900, d(2024, 6, 1)),
            txn(&a, TransactionKind::expense("cat-housing"), 400, d(2025, 6, 3)),
            txn(&a, TransactionKind::expense("cat-housing"), 500, d(2025, 5, 3)),
            txn(&a, TransactionKind::transfer(AccountId::new()), 50, d(2025, 6, 4)),
        ];

        let s = summarize(&[a], &txns, d(2025, 6, 15));
        assert_eq!(s.month_income, Money::from_units(1000));
        assert_eq!(s.month_expense, Money::from_units(400));
        assert_eq!(s.previous_month_expense, Money::from_units(500));
        assert_eq!(s.income_delta, MonthDelta::UpFromZero);
        assert!(matches!(s.expense_delta, MonthDelta::Change(p) if (p + 20.0).abs() < 1e-9));
    }

    #[test]
    fn test_january_compares_with_previous_december() {
        let a = account("alice", "Checking", 0);
        let txns = vec![
            txn(&a, TransactionKind::expense("cat-other"), 100, d(2024, 12, 20)),
            txn(&a, TransactionKind::expense("cat-other"), 100, d(2025, 1, 2)),
        ];
        let s = summarize(&[a], &txns, d(2025, 1, 10));
        assert_eq!(s.previous_month_expense, Money::from_units(100));
        assert_eq!(s.expense_delta, MonthDelta::Similar);
    }

    #[test]
    fn test_delta_labels() {
        let m = Money::from_units;
        let label = |current, previous| MonthDelta::between(m(current), m(previous)).label("$");
        assert_eq!(label(0, 0), "No data");
        assert_eq!(label(5, 0), "Up from $0.00");
        assert_eq!(label(1005, 1000), "Similar");
        assert_eq!(label(150, 100), "+50% vs last month");
        assert_eq!(label(25, 100), "-75% vs last month");
        assert_eq!(MonthDelta::UpFromZero.label("€"), "Up from €0.00");
    }

    #[test]
    fn test_visibility_and_totals() {
        let alice = UserId::from("alice");
        let mine = account("alice", "Checking", 100);
        let mut joint = account("bob", "Joint", 300);
        joint.share_with(alice.clone());
        let hidden = account("carol", "Carol's", 1_000);

        let txns = vec![
            txn(&mine, TransactionKind::expense("cat-groceries"), 5, d(2025, 6, 1)),
            txn(&joint, TransactionKind::expense("cat-groceries"), 7, d(2025, 6, 2)),
            txn(&hidden, TransactionKind::expense("cat-groceries"), 9, d(2025, 6, 3)),
        ];

        let visible = VisibleSet::for_user(&alice, vec![mine, joint, hidden], txns);
        assert_eq!(visible.transactions.len(), 2);

        let report = SummaryReport::from_visible(&visible, d(2025, 6, 30));
        assert_eq!(report.personal_accounts, 1);
        assert_eq!(report.shared_accounts, 1);
        assert_eq!(report.summary.total_balance, Money::from_units(400));
        assert_eq!(
            report.summary.highest_balance,
            Some(("Joint".to_string(), Money::from_units(300)))
        );
        assert_eq!(report.summary.recent.len(), 2);
        assert_eq!(report.summary.recent[0].amount, Money::from_units(7));
    }

    #[test]
    fn test_recent_is_capped() {
        let a = account("alice", "Checking", 0);
        let txns: Vec<_> = (1..=8)
            .map(|day| txn(&a, TransactionKind::expense("cat-other"), 1, d(2025, 3, day)))
            .collect();
        let s = summarize(&[a], &txns, d(2025, 3, 31));
        assert_eq!(s.recent.len(), RECENT_LIMIT);
        assert_eq!(s.recent[0].date, d(2025, 3, 8));
    }

    #[test]
    fn test_expense_breakdown_sorted_with_unknown_bucket() {
        let a = account("alice", "Checking", 0);
        let date = d(2025, 2, 1);
        let txns = vec![
            txn(&a, TransactionKind::expense("cat-groceries"), 20, date),
            txn(&a, TransactionKind::expense("cat-housing"), 80, date),
            txn(&a, TransactionKind::expense("cat-groceries"), 30, date),
            txn(&a, TransactionKind::expense("cat-gone"), 3, date),
            txn(&a, TransactionKind::expense("cat-vanished"), 4, date),
            txn(&a, TransactionKind::income("cat-salary"), 999, date),
        ];

        let rows = expense_breakdown(&txns);
        let names: Vec<_> = rows.iter().map(|r| r.category.name).collect();
        assert_eq!(names, vec!["Housing", "Groceries", "Unknown"]);
        assert_eq!(rows[1].amount, Money::from_units(50));
        assert_eq!(rows[2].amount, Money::from_units(7));
    }

    #[test]
    fn test_empty_inputs() {
        let s = summarize(&[], &[], d(2025, 1, 1));
        assert!(s.total_balance.is_zero());
        assert!(s.highest_balance.is_none());
        assert!(s.expense_breakdown.is_empty());
        assert_eq!(s.income_delta, MonthDelta::NoPriorData);
    }

    #[test]
    fn test_format_terminal_mentions_totals() {
        let a = account("alice", "Checking", 120);
        let visible = VisibleSet::for_user(&UserId::from("alice"), vec![a], vec![]);
        let text = SummaryReport::from_visible(&visible, d(2025, 1, 1)).format_terminal("€");
        assert!(text.contains("€120.00"));
        assert!(text.contains("1 personal, 0 shared"));
        assert!(text.contains("No expense data available."));
    }

    #[test]
    fn test_format_terminal_labels_deltas_in_currency() {
        let a = account("alice", "Checking", 0);
        let txns = vec![txn(&a, TransactionKind::income("cat-salary"), 800, d(2025, 2, 3))];
        let visible = VisibleSet::for_user(&UserId::from("alice"), vec![a], txns);

        let text = SummaryReport::from_visible(&visible, d(2025, 2, 10)).format_terminal("£");
        assert!(text.contains("Up from £0.00"));
        assert!(!text.contains('$'));
    }
}
