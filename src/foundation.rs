//! Shared value types, the error type, and small numeric helpers.

pub mod core;
pub mod error;
pub mod math;
