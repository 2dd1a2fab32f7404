//! # formwork core
//!
//! The form model and validation runner.
//!
//! A [`FormModel`] owns named [`Field`]s and [`FieldCollection`]s, a list of
//! cross-field rules and an internal validation runner. Every mutation runs the
//! affected field's sync rules and all cross-field rules before returning;
//! async rules are scheduled and applied later, when the owner awaits
//! [`FormModel::next_resolution`] or [`FormModel::settle`]. Results that were
//! superseded by a newer value are discarded.
//!
//! Validation failures are state, never `Err`. Operations only fail with a
//! [`UsageError`] when the caller names a field or index that does not exist.

mod collection;
mod config;
mod error;
mod field;
mod model;
mod runner;
mod snapshot;


pub use collection::FieldCollection;
pub use config::EngineConfig;
pub use error::{ConfigError, Result, UsageError};
pub use field::{Field, FieldId, FieldStatus};
pub use model::{Control, FormBuilder, FormModel};
pub use runner::Resolution;
pub use snapshot::{ErrorSnapshot, FormValue, FormValues, SubmitOutcome};
