//! Category display formatting

use crate::models::category::{self, Category};
use crate::models::TransactionKindTag;

/// Format the catalog as a table with the kinds each category accepts
pub fn format_category_list(categories: &[&Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<18} {:<16} {:<12} {}\n",
        "ID", "Name", "Icon", "Use for"
    ));
    output.push_str(&"-".repeat(60));
    output.push('\n');

    for c in categories {
        let mut kinds = Vec::new();
        if c.is_income_eligible() {
            kinds.push("income");
        }
        if c.is_expense_eligible() {
            kinds.push("expense");
        }
        output.push_str(&format!(
            "{:<18} {:<16} {:<12} {}\n",
            c.id,
            c.name,
            c.icon,
            kinds.join(", ")
        ));
    }

    output
}

/// Catalog entries offered for `kind`, or all of them
pub fn format_catalog(kind: Option<TransactionKindTag>) -> String {
    let categories: Vec<&Category> = match kind {
        Some(kind) => category::categories_for(kind),
        None => category::all().iter().collect(),
    };
    format_category_list(&categories)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_catalog() {
        let output = format_catalog(None);
        assert!(output.contains("Salary"));
        assert!(output.contains("cat-groceries"));
        assert!(output.contains("income, expense"));
    }

    #[test]
    fn test_income_catalog_is_filtered() {
        let output = format_catalog(Some(TransactionKindTag::Income));
        assert!(output.contains("Salary"));
        assert!(output.contains("Other"));
        assert!(!output.contains("Groceries"));
    }
}
