//! Pure derived-value computation over a `(Budget, expenses)` pair.
//!
//! No I/O and no state: every function is synchronous and deterministic for
//! identical inputs, so the screens can call them on every live-query
//! emission without side effects.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::budgets::budgets_model::{Budget, BudgetPeriod, Expense};

/// Score returned when there is not enough data to judge either way.
pub const NEUTRAL_SCORE: u8 = 50;

/// Factor applied to actual spend when suggesting a new allocation for an
/// overspent category.
const SUGGESTION_HEADROOM: Decimal = dec!(1.1);

/// Spend fraction at which a category counts as "nearing its limit".
const NEARING_LIMIT: Decimal = dec!(0.9);

/// Total expense amounts grouped by category name.
pub fn spending_by_category(expenses: &[Expense]) -> BTreeMap<String, Decimal> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for expense in expenses {
        *totals.entry(expense.category.clone()).or_insert(Decimal::ZERO) += expense.amount;
    }
    totals
}

/// Composite budget health score in `[0, 100]`.
///
/// Weighted blend of three sub-scores: overall utilization of the budget
/// total (0.4), the share of categories within their allocation (0.3), and
/// month-to-month spending consistency (0.3). Each sub-score moves
/// monotonically with its input, so the blend does too. No budget at all is
/// neutral, not an error.
pub fn budget_health_score(budget: Option<&Budget>, expenses: &[Expense]) -> u8 {
    let Some(budget) = budget else {
        return NEUTRAL_SCORE;
    };

    let total_spent: Decimal = expenses.iter().map(|e| e.amount).sum();
    let spend = spending_by_category(expenses);

    let utilization = utilization_subscore(budget.total_amount, total_spent);
    let overrun = overrun_subscore(budget, &spend);
    let consistency = consistency_subscore(expenses);

    let combined = 0.4 * utilization + 0.3 * overrun + 0.3 * consistency;
    combined.round().clamp(0.0, 100.0) as u8
}

/// Rises linearly toward 100 as spend approaches the allocation, then falls
/// linearly past it; the ratio is clamped at 2.0 so the floor is 0.
fn utilization_subscore(total_allocated: Decimal, total_spent: Decimal) -> f64 {
    if total_allocated <= Decimal::ZERO {
        return f64::from(NEUTRAL_SCORE);
    }
    let ratio = (total_spent / total_allocated)
        .to_f64()
        .unwrap_or(0.0)
        .clamp(0.0, 2.0);
    if ratio <= 1.0 {
        ratio * 100.0
    } else {
        (2.0 - ratio) * 100.0
    }
}

fn overrun_subscore(budget: &Budget, spend: &BTreeMap<String, Decimal>) -> f64 {
    if budget.categories.is_empty() {
        return 100.0;
    }
    let over = budget
        .categories
        .iter()
        .filter(|(name, allocation)| {
            spend.get(*name).copied().unwrap_or(Decimal::ZERO) > allocation.allocated_amount
        })
        .count();
    100.0 * (1.0 - over as f64 / budget.categories.len() as f64)
}

/// Coefficient of variation of month-bucketed expense totals, discretized
/// into four bands. Fewer than two distinct months is insufficient data and
/// scores neutral.
fn consistency_subscore(expenses: &[Expense]) -> f64 {
    let mut months: BTreeMap<String, Decimal> = BTreeMap::new();
    for expense in expenses {
        *months
            .entry(expense.date.format("%Y-%m").to_string())
            .or_insert(Decimal::ZERO) += expense.amount;
    }
    if months.len() < 2 {
        return f64::from(NEUTRAL_SCORE);
    }

    let sums: Vec<f64> = months.values().map(|d| d.to_f64().unwrap_or(0.0)).collect();
    let mean = sums.iter().sum::<f64>() / sums.len() as f64;
    if mean <= 0.0 {
        return f64::from(NEUTRAL_SCORE);
    }
    let variance = sums.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / sums.len() as f64;
    let cv = variance.sqrt() / mean;

    if cv < 0.2 {
        100.0
    } else if cv < 0.4 {
        75.0
    } else if cv < 0.6 {
        50.0
    } else {
        25.0
    }
}

/// Deterministic, human-readable observations for the health screen.
/// Categories are reported in allocation-map order.
pub fn financial_insights(budget: Option<&Budget>, expenses: &[Expense]) -> Vec<String> {
    let mut insights = Vec::new();

    let Some(budget) = budget else {
        insights.push("Create a budget to start tracking your spending.".to_string());
        return insights;
    };

    let total_spent: Decimal = expenses.iter().map(|e| e.amount).sum();
    if budget.total_amount > Decimal::ZERO {
        let used = (total_spent / budget.total_amount * dec!(100)).round();
        insights.push(format!(
            "You have used {}% of your {} budget.",
            used,
            period_label(budget.period)
        ));
    }

    let spend = spending_by_category(expenses);
    for (name, allocation) in &budget.categories {
        if allocation.allocated_amount <= Decimal::ZERO {
            continue;
        }
        let spent = spend.get(name).copied().unwrap_or(Decimal::ZERO);
        if spent > allocation.allocated_amount {
            insights.push(format!(
                "'{}' is over budget by {}.",
                name,
                (spent - allocation.allocated_amount).round_dp(2)
            ));
        } else if spent >= allocation.allocated_amount * NEARING_LIMIT {
            let used = (spent / allocation.allocated_amount * dec!(100)).round();
            insights.push(format!("'{}' is close to its limit ({}% used).", name, used));
        }
    }

    if let Some(goal) = &budget.savings_goal {
        if goal.target_amount > Decimal::ZERO {
            let funded = (goal.current_amount / goal.target_amount * dec!(100)).round();
            if funded >= dec!(100) {
                insights.push("You reached your savings goal.".to_string());
            } else {
                insights.push(format!("Your savings goal is {}% funded.", funded));
            }
        }
    }

    if expenses.is_empty() {
        insights.push("No expenses recorded yet for this period.".to_string());
    }

    insights
}

/// Suggested allocations for categories whose actual spend exceeds their
/// allocation: the actual spend plus 10% headroom.
pub fn reallocation_suggestions(
    budget: &Budget,
    spend_by_category: &BTreeMap<String, Decimal>,
) -> BTreeMap<String, Decimal> {
    let mut suggestions = BTreeMap::new();
    for (name, allocation) in &budget.categories {
        if let Some(actual) = spend_by_category.get(name) {
            if *actual > allocation.allocated_amount {
                suggestions.insert(name.clone(), (*actual * SUGGESTION_HEADROOM).round_dp(2));
            }
        }
    }
    suggestions
}

fn period_label(period: BudgetPeriod) -> &'static str {
    match period {
        BudgetPeriod::Weekly => "weekly",
        BudgetPeriod::Monthly => "monthly",
        BudgetPeriod::Yearly => "yearly",
    }
}
