use std::collections::BTreeMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::budgets::budgets_model::{Budget, CategoryProgress, Expense};
use crate::errors::Result;
use crate::store::LiveQuery;

/// Persistence operations for budgets and expenses.
///
/// Every operation takes the id of the signed-in user, resolved once by the
/// caller's session context; an empty user id fails with
/// [`Error::NotAuthenticated`](crate::errors::Error::NotAuthenticated)
/// before any remote call is made.
#[async_trait]
pub trait BudgetRepositoryTrait: Send + Sync {
    /// Upsert a budget, assigning an id when `budget.id` is empty.
    /// Returns the id the budget was stored under.
    async fn save_budget(&self, user_id: &str, budget: Budget) -> Result<String>;

    /// Persist a new expense (a fresh id is always minted) and post its
    /// amount against the latest budget's matching category.
    async fn save_expense(&self, user_id: &str, expense: Expense) -> Result<String>;

    /// Remove an expense and reverse its effect on the latest budget's
    /// category spend, floored at zero.
    async fn delete_expense(
        &self,
        user_id: &str,
        expense_id: &str,
        category: &str,
        amount: Decimal,
    ) -> Result<()>;

    async fn get_budget_by_id(&self, user_id: &str, budget_id: &str) -> Result<Budget>;

    /// One-shot read of the most recently inserted budget, if any.
    async fn get_latest_budget(&self, user_id: &str) -> Result<Option<Budget>>;

    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<()>;

    /// Drop one category from a budget and rewrite the record wholesale.
    async fn delete_category_from_budget(
        &self,
        user_id: &str,
        budget_id: &str,
        category: &str,
    ) -> Result<()>;

    /// Live view of the latest budget: current value first, then an
    /// emission on every remote change, until the handle is dropped.
    fn watch_latest_budget(&self, user_id: &str) -> Result<LiveQuery<Option<Budget>>>;

    /// Live view of all expenses for the user, unordered at the source.
    fn watch_expenses(&self, user_id: &str) -> Result<LiveQuery<Vec<Expense>>>;
}

/// Application-facing budget operations consumed by the presentation layer.
#[async_trait]
pub trait BudgetServiceTrait: Send + Sync {
    async fn save_budget(&self, user_id: &str, budget: Budget) -> Result<String>;
    async fn save_expense(&self, user_id: &str, expense: Expense) -> Result<String>;
    async fn delete_expense(
        &self,
        user_id: &str,
        expense_id: &str,
        category: &str,
        amount: Decimal,
    ) -> Result<()>;
    async fn get_budget_by_id(&self, user_id: &str, budget_id: &str) -> Result<Budget>;
    async fn get_latest_budget(&self, user_id: &str) -> Result<Option<Budget>>;
    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<()>;
    async fn delete_category_from_budget(
        &self,
        user_id: &str,
        budget_id: &str,
        category: &str,
    ) -> Result<()>;
    fn watch_latest_budget(&self, user_id: &str) -> Result<LiveQuery<Option<Budget>>>;
    fn watch_expenses(&self, user_id: &str) -> Result<LiveQuery<Vec<Expense>>>;

    /// Live projection of the latest budget's categories for display.
    fn watch_category_progress(&self, user_id: &str) -> Result<LiveQuery<Vec<CategoryProgress>>>;

    /// Live map of `category -> suggested allocation` for categories whose
    /// actual spend exceeds their allocation.
    fn watch_budget_suggestions(
        &self,
        user_id: &str,
    ) -> Result<LiveQuery<BTreeMap<String, Decimal>>>;
}
