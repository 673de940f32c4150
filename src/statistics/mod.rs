//! # Column Statistics
//!
//! Mergeable aggregates kept by every column writer in three tiers:
//!
//! - **index** scope: the current row group, reset at every row-index entry
//! - **stripe** scope: the current stripe, reset when folded into file scope
//! - **file** scope: never reset
//!
//! All tiers use the same [`ColumnStatistics`] type and the same associative
//! [`ColumnStatistics::merge`], so folding three row groups one at a time yields
//! exactly the aggregate of writing them as one batch.
//!
//! `count` includes nulls; `null_count` is the subset of `count` that was null.

mod column;


pub use column::{ColumnStatistics, ColumnStatisticsSummary, MergeMismatch, TypedStatistics};
