//! Shopping-list core: aggregation of ingredient lines across the recipes
//! in a user's cart, and rendering of the result as a downloadable document.
//!
//! Both halves are pure reads: nothing here mutates cart, recipe, or
//! ingredient state.

pub mod aggregate;
pub mod export;
mod pdf;
mod text;

pub use aggregate::{aggregate_for_user, AggregateError};
pub use export::{render, ExportFormat};
