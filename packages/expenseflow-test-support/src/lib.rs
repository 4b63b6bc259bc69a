//! ExpenseFlow test support utilities
//!
//! This crate provides utilities shared by the ExpenseFlow test binaries:
//! unified logging initialization and unique test data generation.

pub mod logging;
pub mod unique_helpers;
