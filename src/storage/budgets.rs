//! Budget repository for JSON storage
//!
//! Manages loading and saving budgets to budgets.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FinTrackResult;
use crate::models::{Budget, BudgetId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock_error, write_lock_error};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    #[serde(default)]
    budgets: Vec<Budget>,
}

/// Repository for budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    data: RwLock<HashMap<BudgetId, Budget>>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> FinTrackResult<()> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(write_lock_error)?;
        data.clear();
        for budget in file_data.budgets {
            data.insert(budget.id, budget);
        }

        Ok(())
    }

    pub fn save(&self) -> FinTrackResult<()> {
        let budgets = self.get_all()?;
        write_json_atomic(&self.path, &BudgetData { budgets })
    }

    pub fn get(&self, id: BudgetId) -> FinTrackResult<Option<Budget>> {
        let data = self.data.read().map_err(read_lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// All budgets, ordered by start date
    pub fn get_all(&self) -> FinTrackResult<Vec<Budget>> {
        let data = self.data.read().map_err(read_lock_error)?;

        let mut budgets: Vec<_> = data.values().cloned().collect();
        budgets.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));
        Ok(budgets)
    }

    pub fn upsert(&self, budget: Budget) -> FinTrackResult<()> {
        let mut data = self.data.write().map_err(write_lock_error)?;
        data.insert(budget.id, budget);
        Ok(())
    }

    pub fn delete(&self, id: BudgetId) -> FinTrackResult<Option<Budget>> {
        let mut data = self.data.write().map_err(write_lock_error)?;
        Ok(data.remove(&id))
    }

    pub fn count(&self) -> FinTrackResult<usize> {
        let data = self.data.read().map_err(read_lock_error)?;
        Ok(data.len())
    }
}
