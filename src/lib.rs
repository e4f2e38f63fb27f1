//! Budget planning and insights core for the GlowGirls app.
//!
//! The crate owns two things: the budget store (budget and expense
//! persistence against the remote tree store, including maintenance of the
//! derived per-category spend) and the insight engine (pure computation of
//! health scores, observations, and allocation suggestions). The UI shell
//! resolves the signed-in user once and threads the user id into every
//! operation here.

pub mod budgets;
pub mod errors;
pub mod insights;
pub mod store;

pub use budgets::{
    Budget, BudgetPeriod, BudgetRepository, BudgetRepositoryTrait, BudgetService,
    BudgetServiceTrait, CategoryAllocation, CategoryProgress, Expense, SavingsGoal,
};
pub use errors::{Error, Result};
pub use insights::ScoreBand;
pub use store::{LiveQuery, MemoryStore, RemoteStore};
