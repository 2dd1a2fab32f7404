//! # formwork validation rules
//!
//! Rule primitives used by the formwork engine. A rule never throws: it either
//! passes or yields an [`ErrorDescriptor`] describing the failure.
//!
//! ## Rule families
//!
//! - [`Rule`] - pure synchronous predicates (`required`, `pattern`, `minLength`,
//!   `requiredTrue`, `reservedValue`)
//! - [`AsyncRule`] - remote checks resolved later (`UniqueRule`)
//! - [`CrossRule`] - predicates over several fields of a form (`EqualsFieldRule`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use formwork_validate::prelude::*;
//!
//! let rules = RuleSet::new()
//!     .rule(RequiredRule::new())
//!     .rule(MinLengthRule::new(3));
//!
//! let err = rules.evaluate(&Value::from("AB")).unwrap();
//! assert_eq!(err.code(), "minLength");
//! assert_eq!(MessageCatalog::default().message_for(&err), "minimum 3 characters");
//! ```

mod context;
mod definition;
mod error;
mod messages;
mod rule_set;
mod rules;
mod traits;
mod value;


pub use context::{
    InMemoryDirectory, RemoteDirectory, ValidationContext, ValidationContextBuilder,
};
pub use definition::RuleDef;
pub use error::{ErrorDescriptor, RemoteError};
pub use messages::MessageCatalog;
pub use rule_set::RuleSet;
pub use rules::*;
pub use traits::{AsyncRule, CrossRule, FieldLookup, Rule};
pub use value::Value;

/// Prelude module for rule declarations
pub mod prelude {
    pub use crate::context::{
        InMemoryDirectory, RemoteDirectory, ValidationContext, ValidationContextBuilder,
    };
    pub use crate::definition::RuleDef;
    pub use crate::error::{ErrorDescriptor, RemoteError};
    pub use crate::messages::MessageCatalog;
    pub use crate::rule_set::RuleSet;
    pub use crate::rules::*;
    pub use crate::traits::{AsyncRule, CrossRule, FieldLookup, Rule};
    pub use crate::value::Value;
}
