//! # formwork
//!
//! A form-input validation engine for UI layers.
//!
//! Declare fields and dynamic collections, attach synchronous, asynchronous
//! and cross-field rules, and let the engine track touched, pending and error
//! state. The UI calls into the form on input, blur and submit, and reads its
//! state back to render.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use formwork::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> formwork::Result<()> {
//!     let ctx = ValidationContext::builder()
//!         .directory(forms::email_directory())
//!         .build();
//!     let mut form = forms::register_form(ctx)?;
//!
//!     form.set_value("email", "axelmtz@gmail.com")?;
//!     form.set_value("username", "Strider")?;
//!     form.settle().await;
//!
//!     let outcome = form.submit();
//!     assert!(!outcome.ok);
//!     assert_eq!(
//!         form.get_field_error_message("username")?.as_deref(),
//!         Some("'Strider' is not allowed")
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Driving async rules
//!
//! Async rules never resolve on their own. Await
//! [`FormModel::next_resolution`] from the UI event loop (for example in a
//! `tokio::select!` branch) or [`FormModel::settle`] to apply results. A
//! result for a value that has since changed is discarded.
//!
//! ## Configuration
//!
//! [`EngineConfig::from_env`] reads `FORMWORK_ASYNC_TIMEOUT_MS` and
//! `FORMWORK_DEBOUNCE_MS`.

pub mod forms;

// Re-export the rule primitives
pub use formwork_validate::*;

// Re-export the form model
pub use formwork_core::*;

/// Prelude module - import everything you need with `use formwork::prelude::*`
pub mod prelude {
    pub use crate::forms;

    pub use formwork_validate::prelude::*;

    pub use formwork_core::{
        Control, EngineConfig, ErrorSnapshot, Field, FieldCollection, FieldId, FieldStatus,
        FormBuilder, FormModel, FormValue, FormValues, Resolution, SubmitOutcome, UsageError,
    };
}
