//! Exam Session Utility Functions
//!
//! ## Current API
//!
//! - Track answers and flags for an attempt
//! - Derive exam status from timestamps
//! - Calculate attempt grade
//! - Shuffle question order
//! - Paginate lists
//!
pub mod answers;
pub mod error;
pub mod order;
pub mod pagination;
pub mod score;
pub mod status;
