//! Category catalog
//!
//! Categories are a fixed, process-wide seed list. They are never created or
//! edited at runtime, so the catalog is a static table rather than a
//! repository. Lookups never fail: an id that is not in the table resolves to
//! the `Unknown` sentinel so that dangling references still render.

use serde::Serialize;
use std::fmt;

use super::ids::CategoryId;
use super::transaction::TransactionKindTag;

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    /// Symbolic icon name understood by the presentation layer
    pub icon: &'static str,
}

impl Category {
    pub fn category_id(&self) -> CategoryId {
        CategoryId::from(self.id)
    }

    /// Whether this is the sentinel returned for unknown ids
    pub fn is_unknown(&self) -> bool {
        std::ptr::eq(self, &UNKNOWN) || self.id == UNKNOWN.id
    }

    /// Income-eligible categories are the salary and catch-all entries
    pub fn is_income_eligible(&self) -> bool {
        self.id == SALARY_ID || self.id == OTHER_ID
    }

    /// Everything except salary can be spent against
    pub fn is_expense_eligible(&self) -> bool {
        self.id != SALARY_ID
    }

    /// Whether this category may be used for a transaction of `kind`
    pub fn is_eligible_for(&self, kind: TransactionKindTag) -> bool {
        match kind {
            TransactionKindTag::Income => self.is_income_eligible(),
            TransactionKindTag::Expense => self.is_expense_eligible(),
            TransactionKindTag::Transfer => true,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

const SALARY_ID: &str = "cat-salary";
const OTHER_ID: &str = "cat-other";

/// The seed catalog
pub static CATALOG: [Category; 8] = [
    Category { id: SALARY_ID, name: "Salary", icon: "Briefcase" },
    Category { id: "cat-groceries", name: "Groceries", icon: "ShoppingCart" },
    Category { id: "cat-housing", name: "Housing", icon: "Home" },
    Category { id: "cat-transport", name: "Transport", icon: "Car" },
    Category { id: "cat-utilities", name: "Utilities", icon: "Lightbulb" },
    Category { id: "cat-health", name: "Health", icon: "HeartPulse" },
    Category { id: "cat-entertainment", name: "Entertainment", icon: "Ticket" },
    Category { id: OTHER_ID, name: "Other", icon: "HelpCircle" },
];

/// Returned for ids that are not in the catalog
pub static UNKNOWN: Category = Category {
    id: "cat-unknown",
    name: "Unknown",
    icon: "HelpCircle",
};

/// Strict lookup
pub fn get(id: &CategoryId) -> Option<&'static Category> {
    CATALOG.iter().find(|c| c.id == id.as_str())
}

/// Total lookup: unknown ids resolve to [`UNKNOWN`]
pub fn lookup(id: &CategoryId) -> &'static Category {
    get(id).unwrap_or(&UNKNOWN)
}

/// Find a category by id or case-insensitive name
pub fn find(reference: &str) -> Option<&'static Category> {
    let reference = reference.trim();
    CATALOG
        .iter()
        .find(|c| c.id == reference || c.name.eq_ignore_ascii_case(reference))
}

pub fn all() -> &'static [Category] {
    &CATALOG
}

/// Categories offered for a transaction of the given kind
pub fn categories_for(kind: TransactionKindTag) -> Vec<&'static Category> {
    CATALOG.iter().filter(|c| c.is_eligible_for(kind)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known() {
        let cat = lookup(&CategoryId::from("cat-groceries"));
        assert_eq!(cat.name, "Groceries");
        assert_eq!(cat.icon, "ShoppingCart");
        assert!(!cat.is_unknown());
    }

    #[test]
    fn test_lookup_unknown_falls_back() {
        let cat = lookup(&CategoryId::from("cat-does-not-exist"));
        assert!(cat.is_unknown());
        assert_eq!(cat.name, "Unknown");
        assert_eq!(cat.icon, "HelpCircle");
        assert!(get(&CategoryId::from("cat-does-not-exist")).is_none());
    }

    #[test]
    fn test_income_partition() {
        let names: Vec<_> = categories_for(TransactionKindTag::Income)
            .iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Salary", "Other"]);
    }

    #[test]
    fn test_expense_partition_excludes_salary() {
        let expense = categories_for(TransactionKindTag::Expense);
        assert_eq!(expense.len(), CATALOG.len() - 1);
        assert!(expense.iter().all(|c| c.name != "Salary"));
        assert!(expense.iter().any(|c| c.name == "Other"));
    }

    #[test]
    fn test_transfers_accept_any_category() {
        assert_eq!(
            categories_for(TransactionKindTag::Transfer).len(),
            CATALOG.len()
        );
    }

    #[test]
    fn test_find_by_name_or_id() {
        assert_eq!(find("housing").map(|c| c.id), Some("cat-housing"));
        assert_eq!(find("cat-health").map(|c| c.name), Some("Health"));
        assert!(find("Pets").is_none());
    }
}
