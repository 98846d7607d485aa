//! Budget display formatting

use crate::models::category;
use crate::models::Budget;
use crate::services::budget::BudgetEvaluation;

/// Format a plain list of budgets
pub fn format_budget_list(budgets: &[Budget], currency: &str) -> String {
    if budgets.is_empty() {
        return "No budgets found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:8}  {:<16} {:<8} {:>12}  {:10}  {:10}\n",
        "ID", "Category", "Period", "Amount", "Start", "End"
    ));
    output.push_str(&"-".repeat(72));
    output.push('\n');

    for budget in budgets {
        let (start, end) = budget.window();
        output.push_str(&format!(
            "{:8}  {:<16} {:<8} {:>12}  {:10}  {:10}\n",
            budget.id.short(),
            category::lookup(&budget.category_id).name,
            budget.period,
            budget.amount.format_with_symbol(currency),
            start.to_string(),
            end.to_string()
        ));
    }

    output
}

/// Format one evaluated budget
pub fn format_budget_details(eval: &BudgetEvaluation, currency: &str) -> String {
    let money = |m: crate::models::Money| m.format_with_symbol(currency);
    let mut output = String::new();

    output.push_str(&format!("Budget: {}\n", eval.budget.id));
    output.push_str(&format!("  Category:  {}\n", eval.category.name));
    output.push_str(&format!("  Period:    {}\n", eval.budget.period));
    output.push_str(&format!(
        "  Window:    {} to {}\n",
        eval.window_start, eval.window_end
    ));
    output.push_str(&format!("  Status:    {}\n", eval.status));
    output.push('\n');
    output.push_str(&format!("  Budget:    {}\n", money(eval.budget.amount)));
    output.push_str(&format!("  Spent:     {}\n", money(eval.spent)));
    output.push_str(&format!("  Remaining: {}\n", money(eval.remaining)));
    output.push_str(&format!(
        "  Progress:  {:.0}% ({})\n",
        eval.progress, eval.severity
    ));

    output
}
