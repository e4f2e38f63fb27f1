/// Tests for the pure insight engine: health score behavior, score bands,
/// insight text, and reallocation suggestions.
use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use glowgirls_core::budgets::{Budget, BudgetPeriod, CategoryAllocation, Expense, SavingsGoal};
use glowgirls_core::insights::{
    budget_health_score, financial_insights, reallocation_suggestions, spending_by_category,
    ScoreBand, NEUTRAL_SCORE,
};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn budget(total: Decimal, categories: Vec<(&str, Decimal)>) -> Budget {
    Budget {
        id: "b-1".to_string(),
        period: BudgetPeriod::Monthly,
        total_amount: total,
        start_date: date("2026-01-01"),
        categories: categories
            .into_iter()
            .map(|(name, amount)| {
                (
                    name.to_string(),
                    CategoryAllocation {
                        allocated_amount: amount,
                        spent_amount: Decimal::ZERO,
                    },
                )
            })
            .collect(),
        savings_goal: None,
    }
}

fn expense_on(category: &str, amount: Decimal, day: &str) -> Expense {
    Expense {
        id: String::new(),
        category: category.to_string(),
        amount,
        date: date(day),
        description: String::new(),
    }
}

mod health_score {
    use super::*;

    #[test]
    fn test_no_data_scores_neutral() {
        assert_eq!(
            budget_health_score(None, &[]),
            NEUTRAL_SCORE,
            "Missing budget must yield the neutral default, not an error"
        );
    }

    #[test]
    fn test_score_stays_in_range() {
        let b = budget(dec!(1000), vec![("Food", dec!(300))]);
        let heavy = vec![
            expense_on("Food", dec!(5000), "2026-01-10"),
            expense_on("Food", dec!(10), "2026-02-10"),
        ];
        let score = budget_health_score(Some(&b), &heavy);
        assert!(score <= 100, "Score must stay within [0, 100], got {score}");
        assert_eq!(budget_health_score(Some(&b), &[]), 45);
    }

    #[test]
    fn test_overspending_further_lowers_the_score() {
        let b = budget(dec!(1000), vec![("Food", dec!(300))]);
        // Same month, same single over-budget category; only the
        // utilization overshoot grows.
        let a_bit_over = vec![expense_on("Food", dec!(1100), "2026-01-10")];
        let far_over = vec![expense_on("Food", dec!(1500), "2026-01-10")];

        let score_a = budget_health_score(Some(&b), &a_bit_over);
        let score_b = budget_health_score(Some(&b), &far_over);
        assert!(
            score_b < score_a,
            "Moving further past full utilization must not raise the score ({score_b} vs {score_a})"
        );
    }

    #[test]
    fn test_more_over_budget_categories_lower_the_score() {
        let b = budget(dec!(1000), vec![("Food", dec!(300)), ("Fun", dec!(300))]);
        // Identical total spend and months; only the overrun count differs.
        let none_over = vec![
            expense_on("Food", dec!(250), "2026-01-10"),
            expense_on("Fun", dec!(250), "2026-01-12"),
        ];
        let one_over = vec![
            expense_on("Food", dec!(350), "2026-01-10"),
            expense_on("Fun", dec!(150), "2026-01-12"),
        ];

        let score_none = budget_health_score(Some(&b), &none_over);
        let score_one = budget_health_score(Some(&b), &one_over);
        assert!(
            score_one < score_none,
            "An extra over-budget category must not raise the score ({score_one} vs {score_none})"
        );
    }

    #[test]
    fn test_consistent_months_score_higher_than_erratic_ones() {
        let b = budget(dec!(4000), vec![("Food", dec!(4000))]);
        // Same total spend over the same two months.
        let even = vec![
            expense_on("Food", dec!(1000), "2026-01-10"),
            expense_on("Food", dec!(1000), "2026-02-10"),
        ];
        let erratic = vec![
            expense_on("Food", dec!(100), "2026-01-10"),
            expense_on("Food", dec!(1900), "2026-02-10"),
        ];

        let score_even = budget_health_score(Some(&b), &even);
        let score_erratic = budget_health_score(Some(&b), &erratic);
        assert!(
            score_even > score_erratic,
            "Steadier month-to-month spending must score higher ({score_even} vs {score_erratic})"
        );
    }

    #[test]
    fn test_single_month_is_insufficient_for_consistency() {
        let b = budget(dec!(2000), vec![("Food", dec!(2000))]);
        let one_month = vec![expense_on("Food", dec!(1000), "2026-01-10")];
        let two_even_months = vec![
            expense_on("Food", dec!(500), "2026-01-10"),
            expense_on("Food", dec!(500), "2026-02-10"),
        ];

        // Both spend half the budget with nothing over; the two-month case
        // earns the top consistency band instead of the neutral one.
        let single = budget_health_score(Some(&b), &one_month);
        let double = budget_health_score(Some(&b), &two_even_months);
        assert!(
            double > single,
            "Two even months should beat one month's neutral consistency ({double} vs {single})"
        );
    }
}

mod score_bands {
    use super::*;

    #[test]
    fn test_band_thresholds() {
        assert_eq!(ScoreBand::from_score(100), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(80), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(79), ScoreBand::VeryGood);
        assert_eq!(ScoreBand::from_score(70), ScoreBand::VeryGood);
        assert_eq!(ScoreBand::from_score(69), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(60), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(59), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(50), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(49), ScoreBand::NeedsAttention);
        assert_eq!(ScoreBand::from_score(40), ScoreBand::NeedsAttention);
        assert_eq!(ScoreBand::from_score(39), ScoreBand::Critical);
        assert_eq!(ScoreBand::from_score(0), ScoreBand::Critical);
    }

    #[test]
    fn test_band_labels() {
        assert_eq!(ScoreBand::VeryGood.to_string(), "Very Good");
        assert_eq!(ScoreBand::NeedsAttention.to_string(), "Needs Attention");
    }
}

mod insights_text {
    use super::*;

    #[test]
    fn test_insights_are_deterministic() {
        let b = budget(dec!(1000), vec![("Food", dec!(100)), ("Fun", dec!(200))]);
        let expenses = vec![
            expense_on("Food", dec!(150), "2026-01-10"),
            expense_on("Fun", dec!(190), "2026-01-12"),
        ];
        assert_eq!(
            financial_insights(Some(&b), &expenses),
            financial_insights(Some(&b), &expenses),
            "Identical inputs must produce identical insights"
        );
    }

    #[test]
    fn test_over_and_nearing_categories_are_reported() {
        let b = budget(dec!(1000), vec![("Food", dec!(100)), ("Fun", dec!(200))]);
        let expenses = vec![
            expense_on("Food", dec!(150), "2026-01-10"),
            expense_on("Fun", dec!(190), "2026-01-12"),
        ];

        let insights = financial_insights(Some(&b), &expenses);
        assert!(
            insights.iter().any(|i| i.contains("'Food' is over budget by 50")),
            "Overspent category should be called out, got {insights:?}"
        );
        assert!(
            insights.iter().any(|i| i.contains("'Fun' is close to its limit (95% used)")),
            "Nearing category should be called out, got {insights:?}"
        );
    }

    #[test]
    fn test_savings_goal_progress_is_reported() {
        let mut b = budget(dec!(1000), vec![("Food", dec!(100))]);
        b.savings_goal = Some(SavingsGoal {
            target_amount: dec!(400),
            current_amount: dec!(100),
        });

        let insights = financial_insights(Some(&b), &[]);
        assert!(
            insights.iter().any(|i| i.contains("savings goal is 25% funded")),
            "Savings progress should be reported, got {insights:?}"
        );
    }

    #[test]
    fn test_missing_budget_yields_a_setup_hint() {
        let insights = financial_insights(None, &[]);
        assert_eq!(insights.len(), 1);
        assert!(insights[0].contains("Create a budget"));
    }
}

mod suggestions {
    use super::*;

    #[test]
    fn test_overspent_category_gets_ten_percent_headroom() {
        let b = budget(dec!(1000), vec![("Food", dec!(100)), ("Fun", dec!(200))]);
        let spend = spending_by_category(&[
            expense_on("Food", dec!(150), "2026-01-10"),
            expense_on("Fun", dec!(50), "2026-01-11"),
        ]);

        let suggestions = reallocation_suggestions(&b, &spend);
        let mut expected = BTreeMap::new();
        expected.insert("Food".to_string(), dec!(165.0));
        assert_eq!(suggestions, expected);
    }

    #[test]
    fn test_spending_aggregates_by_category() {
        let spend = spending_by_category(&[
            expense_on("Food", dec!(120), "2026-01-10"),
            expense_on("Food", dec!(50), "2026-01-20"),
            expense_on("Fun", dec!(30), "2026-01-21"),
        ]);
        assert_eq!(spend["Food"], dec!(170));
        assert_eq!(spend["Fun"], dec!(30));
    }
}
