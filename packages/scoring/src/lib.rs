//! Movie score aggregation.
//!
//! A movie keeps a running `(count, score)` pair where `score` is the mean of
//! every user's single contribution. [`apply_score`] folds one new or replaced
//! contribution into that pair without re-reading the history;
//! [`MovieAggregate::recompute`] rebuilds it exactly from the stored values.

pub mod aggregate;
pub mod error;
pub mod value;

pub use aggregate::{MovieAggregate, ScoreContribution, apply_score};
pub use error::ScoreError;
pub use value::{MAX_SCORE, MIN_SCORE, ScoreValue};
