//! Declarative rule definitions.
//!
//! Lets a form's rules be described as data (JSON, YAML, ...) and turned
//! into a [`RuleSet`] at runtime.

use crate::rule_set::RuleSet;
use crate::rules::{
    MinLengthRule, PatternRule, RequiredRule, RequiredTrueRule, ReservedValueRule, UniqueRule,
};
use serde::{Deserialize, Serialize};

/// A serializable rule definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleDef {
    /// Non-empty value
    Required,
    /// Value must be `true`
    RequiredTrue,
    /// Minimum length in characters
    MinLength { min: usize },
    /// First and last name
    FullName,
    /// Email shape
    Email,
    /// Custom anchored regex
    Pattern { name: String, regex: String },
    /// Reserved values, case-insensitive
    Reserved { values: Vec<String> },
    /// Remote uniqueness check (async)
    Unique { resource: String },
}

impl RuleDef {
    /// Whether this definition produces an async rule.
    pub fn is_async(&self) -> bool {
        matches!(self, RuleDef::Unique { .. })
    }

    /// Build a rule set from definitions, keeping their order.
    pub fn build_set(defs: &[RuleDef]) -> Result<RuleSet, regex::Error> {
        defs.iter().try_fold(RuleSet::new(), |set, def| def.add_to(set))
    }

    fn add_to(&self, set: RuleSet) -> Result<RuleSet, regex::Error> {
        Ok(match self {
            RuleDef::Required => set.rule(RequiredRule::new()),
            RuleDef::RequiredTrue => set.rule(RequiredTrueRule::new()),
            RuleDef::MinLength { min } => set.rule(MinLengthRule::new(*min)),
            RuleDef::FullName => set.rule(PatternRule::full_name()),
            RuleDef::Email => set.rule(PatternRule::email()),
            RuleDef::Pattern { name, regex } => set.rule(PatternRule::new(name.clone(), regex)?),
            RuleDef::Reserved { values } => set.rule(ReservedValueRule::new(values)),
            RuleDef::Unique { resource } => set.async_rule(UniqueRule::new(resource.clone())),
        })
    }
}
