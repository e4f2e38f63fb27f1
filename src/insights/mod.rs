pub mod insights_model;
pub mod insights_service;

pub use insights_model::ScoreBand;
pub use insights_service::{
    budget_health_score, financial_insights, reallocation_suggestions, spending_by_category,
    NEUTRAL_SCORE,
};
