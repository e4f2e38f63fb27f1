use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A user's spending plan for one period.
///
/// At most one budget is treated as active per user: the most recently
/// inserted one. An empty `id` marks a budget that has not been persisted
/// yet; the repository assigns the id on first save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    #[serde(default)]
    pub id: String,
    pub period: BudgetPeriod,
    pub total_amount: Decimal,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryAllocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings_goal: Option<SavingsGoal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    Monthly,
    Yearly,
}

/// Planned versus actual spend for one category.
///
/// `spent_amount` is maintained exclusively by the budget repository as
/// expenses are posted and deleted; callers never write it directly.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAllocation {
    pub allocated_amount: Decimal,
    pub spent_amount: Decimal,
}

/// A single posted expense. Edits are modelled as delete-then-save-new,
/// so a saved expense is otherwise immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(default)]
    pub id: String,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
}

/// Savings target attached to a budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub target_amount: Decimal,
    pub current_amount: Decimal,
}

/// Read projection of one category for display. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProgress {
    pub name: String,
    pub allocated_amount: Decimal,
    pub spent_amount: Decimal,
}

impl Budget {
    /// Category snapshots in allocation-map order.
    pub fn category_progress(&self) -> Vec<CategoryProgress> {
        self.categories
            .iter()
            .map(|(name, allocation)| CategoryProgress {
                name: name.clone(),
                allocated_amount: allocation.allocated_amount,
                spent_amount: allocation.spent_amount,
            })
            .collect()
    }
}
