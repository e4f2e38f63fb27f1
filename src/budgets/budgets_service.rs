use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::budgets::budgets_model::{Budget, CategoryProgress, Expense};
use crate::budgets::budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
use crate::errors::Result;
use crate::insights;
use crate::store::LiveQuery;

/// Application-facing budget operations.
///
/// Thin coordination over the repository plus the derived live queries the
/// screens consume (category progress, overspend suggestions). All insight
/// math lives in [`crate::insights`]; this layer only wires live data into it.
pub struct BudgetService<T: BudgetRepositoryTrait> {
    budget_repo: Arc<T>,
}

impl<T: BudgetRepositoryTrait> BudgetService<T> {
    pub fn new(budget_repo: Arc<T>) -> Self {
        BudgetService { budget_repo }
    }
}

#[async_trait]
impl<T: BudgetRepositoryTrait> BudgetServiceTrait for BudgetService<T> {
    async fn save_budget(&self, user_id: &str, budget: Budget) -> Result<String> {
        self.budget_repo.save_budget(user_id, budget).await
    }

    async fn save_expense(&self, user_id: &str, expense: Expense) -> Result<String> {
        self.budget_repo.save_expense(user_id, expense).await
    }

    async fn delete_expense(
        &self,
        user_id: &str,
        expense_id: &str,
        category: &str,
        amount: Decimal,
    ) -> Result<()> {
        self.budget_repo
            .delete_expense(user_id, expense_id, category, amount)
            .await
    }

    async fn get_budget_by_id(&self, user_id: &str, budget_id: &str) -> Result<Budget> {
        self.budget_repo.get_budget_by_id(user_id, budget_id).await
    }

    async fn get_latest_budget(&self, user_id: &str) -> Result<Option<Budget>> {
        self.budget_repo.get_latest_budget(user_id).await
    }

    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<()> {
        self.budget_repo.delete_budget(user_id, budget_id).await
    }

    async fn delete_category_from_budget(
        &self,
        user_id: &str,
        budget_id: &str,
        category: &str,
    ) -> Result<()> {
        self.budget_repo
            .delete_category_from_budget(user_id, budget_id, category)
            .await
    }

    fn watch_latest_budget(&self, user_id: &str) -> Result<LiveQuery<Option<Budget>>> {
        self.budget_repo.watch_latest_budget(user_id)
    }

    fn watch_expenses(&self, user_id: &str) -> Result<LiveQuery<Vec<Expense>>> {
        self.budget_repo.watch_expenses(user_id)
    }

    fn watch_category_progress(&self, user_id: &str) -> Result<LiveQuery<Vec<CategoryProgress>>> {
        let budgets = self.budget_repo.watch_latest_budget(user_id)?;
        Ok(budgets.map(|budget| {
            budget
                .map(|b| b.category_progress())
                .unwrap_or_default()
        }))
    }

    fn watch_budget_suggestions(
        &self,
        user_id: &str,
    ) -> Result<LiveQuery<BTreeMap<String, Decimal>>> {
        let mut budgets = self.budget_repo.watch_latest_budget(user_id)?;
        let mut expenses = self.budget_repo.watch_expenses(user_id)?;

        Ok(LiveQuery::spawn(move |tx| async move {
            let mut latest_budget: Option<Option<Budget>> = None;
            let mut latest_expenses: Option<Vec<Expense>> = None;

            loop {
                tokio::select! {
                    item = budgets.next() => match item {
                        Some(Ok(budget)) => latest_budget = Some(budget),
                        Some(Err(err)) => {
                            let _ = tx.send(Err(err));
                            break;
                        }
                        None => break,
                    },
                    item = expenses.next() => match item {
                        Some(Ok(list)) => latest_expenses = Some(list),
                        Some(Err(err)) => {
                            let _ = tx.send(Err(err));
                            break;
                        }
                        None => break,
                    },
                }

                // Emit only once both sides have delivered their first
                // snapshot; afterwards every change on either side
                // recomputes the join.
                if let (Some(budget), Some(list)) = (&latest_budget, &latest_expenses) {
                    let suggestions = match budget {
                        Some(budget) => insights::reallocation_suggestions(
                            budget,
                            &insights::spending_by_category(list),
                        ),
                        None => BTreeMap::new(),
                    };
                    if tx.send(Ok(suggestions)).is_err() {
                        break;
                    }
                }
            }
        }))
    }
}
