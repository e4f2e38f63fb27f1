use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::budgets::budgets_model::{Budget, Expense};
use crate::budgets::budgets_traits::BudgetRepositoryTrait;
use crate::errors::{Error, Result};
use crate::store::{LiveQuery, RemoteStore, TreeSnapshot};

/// Budget and expense persistence against the remote tree store.
///
/// Owns the path layout under `users/{userId}` and is the sole writer of
/// `spent_amount` on category allocations. Expense postings are attributed
/// to the most recently inserted budget, not matched against the expense
/// date; see DESIGN.md for the rationale and the known read-then-write
/// race on `spent_amount`.
pub struct BudgetRepository<S: RemoteStore> {
    store: Arc<S>,
}

fn budgets_path(user_id: &str) -> String {
    format!("users/{}/budgets", user_id)
}

fn budget_path(user_id: &str, budget_id: &str) -> String {
    format!("users/{}/budgets/{}", user_id, budget_id)
}

fn expenses_path(user_id: &str) -> String {
    format!("users/{}/expenses", user_id)
}

fn expense_path(user_id: &str, expense_id: &str) -> String {
    format!("users/{}/expenses/{}", user_id, expense_id)
}

fn require_user(user_id: &str) -> Result<()> {
    if user_id.is_empty() {
        return Err(Error::NotAuthenticated);
    }
    Ok(())
}

fn decode_latest_budget(snapshot: TreeSnapshot) -> Result<Option<Budget>> {
    match snapshot.into_iter().last() {
        Some((_, value)) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

fn decode_expenses(snapshot: TreeSnapshot) -> Result<Vec<Expense>> {
    snapshot
        .into_iter()
        .map(|(_, value)| serde_json::from_value::<Expense>(value).map_err(Error::from))
        .collect()
}

impl<S: RemoteStore> BudgetRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        BudgetRepository { store }
    }

    /// Read-modify-write of `spent_amount` on the latest budget's category.
    ///
    /// Not transactional: two concurrent postings against the same category
    /// can lose an update. Deltas are floored so the stored spend never goes
    /// negative. A missing budget makes the adjustment a no-op; a missing
    /// category is created on increment and skipped on decrement.
    async fn adjust_spent(&self, user_id: &str, category: &str, delta: Decimal) -> Result<()> {
        let latest = self
            .store
            .last_inserted(&budgets_path(user_id), 1)
            .await?
            .pop();
        let Some((budget_id, value)) = latest else {
            warn!(
                "no budget for user {}; skipping spend adjustment for '{}'",
                user_id, category
            );
            return Ok(());
        };

        let mut budget: Budget = serde_json::from_value(value)?;
        if delta >= Decimal::ZERO {
            let entry = budget.categories.entry(category.to_string()).or_default();
            entry.spent_amount += delta;
        } else if let Some(entry) = budget.categories.get_mut(category) {
            entry.spent_amount = (entry.spent_amount + delta).max(Decimal::ZERO);
        } else {
            return Ok(());
        }

        self.store
            .set(
                &budget_path(user_id, &budget_id),
                serde_json::to_value(&budget)?,
            )
            .await
    }

    async fn write_budget(&self, user_id: &str, budget: &Budget) -> Result<()> {
        let value: Value = serde_json::to_value(budget)?;
        self.store
            .set(&budget_path(user_id, &budget.id), value)
            .await
    }
}

#[async_trait]
impl<S: RemoteStore> BudgetRepositoryTrait for BudgetRepository<S> {
    async fn save_budget(&self, user_id: &str, mut budget: Budget) -> Result<String> {
        require_user(user_id)?;
        if budget.id.is_empty() {
            budget.id = self.store.push_id(&budgets_path(user_id)).await?;
        }
        debug!("saving budget {} for user {}", budget.id, user_id);
        self.write_budget(user_id, &budget).await?;
        Ok(budget.id)
    }

    async fn save_expense(&self, user_id: &str, mut expense: Expense) -> Result<String> {
        require_user(user_id)?;
        // A saved expense always gets a fresh id; edits arrive as
        // delete-old-then-save-new.
        expense.id = self.store.push_id(&expenses_path(user_id)).await?;
        debug!(
            "saving expense {} ({} {}) for user {}",
            expense.id, expense.category, expense.amount, user_id
        );
        self.store
            .set(
                &expense_path(user_id, &expense.id),
                serde_json::to_value(&expense)?,
            )
            .await?;
        self.adjust_spent(user_id, &expense.category, expense.amount)
            .await?;
        Ok(expense.id)
    }

    async fn delete_expense(
        &self,
        user_id: &str,
        expense_id: &str,
        category: &str,
        amount: Decimal,
    ) -> Result<()> {
        require_user(user_id)?;
        debug!("deleting expense {} for user {}", expense_id, user_id);
        self.store.remove(&expense_path(user_id, expense_id)).await?;
        self.adjust_spent(user_id, category, -amount).await
    }

    async fn get_budget_by_id(&self, user_id: &str, budget_id: &str) -> Result<Budget> {
        require_user(user_id)?;
        let value = self
            .store
            .get(&budget_path(user_id, budget_id))
            .await?
            .ok_or_else(|| Error::NotFound(format!("budget '{}'", budget_id)))?;
        Ok(serde_json::from_value(value)?)
    }

    async fn get_latest_budget(&self, user_id: &str) -> Result<Option<Budget>> {
        require_user(user_id)?;
        let snapshot = self.store.last_inserted(&budgets_path(user_id), 1).await?;
        decode_latest_budget(snapshot)
    }

    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<()> {
        require_user(user_id)?;
        debug!("deleting budget {} for user {}", budget_id, user_id);
        self.store.remove(&budget_path(user_id, budget_id)).await
    }

    async fn delete_category_from_budget(
        &self,
        user_id: &str,
        budget_id: &str,
        category: &str,
    ) -> Result<()> {
        require_user(user_id)?;
        let mut budget = self.get_budget_by_id(user_id, budget_id).await?;
        // Whole-record rewrite: last writer wins on the full category map,
        // never a partial-field patch.
        budget.categories.remove(category);
        self.write_budget(user_id, &budget).await
    }

    fn watch_latest_budget(&self, user_id: &str) -> Result<LiveQuery<Option<Budget>>> {
        require_user(user_id)?;
        let subscription = self.store.subscribe(&budgets_path(user_id));
        Ok(LiveQuery::from_subscription(
            subscription,
            decode_latest_budget,
        ))
    }

    fn watch_expenses(&self, user_id: &str) -> Result<LiveQuery<Vec<Expense>>> {
        require_user(user_id)?;
        let subscription = self.store.subscribe(&expenses_path(user_id));
        Ok(LiveQuery::from_subscription(subscription, decode_expenses))
    }
}
