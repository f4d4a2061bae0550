//! Score aggregation.
//!
//! Turns the nested test tree into weighted pass/partial/fail totals,
//! per test and per tool.

pub mod aggregator;

pub use aggregator::*;
