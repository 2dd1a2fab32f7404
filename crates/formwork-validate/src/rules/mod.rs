//! Validation rules.
//!
//! Synchronous, asynchronous and cross-field rules.

mod async_rules;
mod cross_rules;
mod sync_rules;

pub use async_rules::*;
pub use cross_rules::*;
pub use sync_rules::*;
