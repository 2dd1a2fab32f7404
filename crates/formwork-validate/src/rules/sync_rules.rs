//! Synchronous validation rules.
//!
//! These rules evaluate a single value without suspending.

use crate::error::ErrorDescriptor;
use crate::traits::Rule;
use crate::value::Value;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

// Pre-compiled regex patterns
static FULL_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn full_name_regex() -> &'static Regex {
    // First and last name, separated by exactly one space
    FULL_NAME_REGEX.get_or_init(|| Regex::new(r"^\p{L}+ \p{L}+$").unwrap())
}

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"(?i)^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$").unwrap()
    })
}

/// Required (non-empty) validation rule.
///
/// Fails on `Null` and on blank text. Booleans always pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequiredRule;

impl RequiredRule {
    /// Create a new required rule.
    pub fn new() -> Self {
        Self
    }
}

impl Rule for RequiredRule {
    fn validate(&self, value: &Value) -> Result<(), ErrorDescriptor> {
        if value.is_empty() {
            Err(ErrorDescriptor::Required)
        } else {
            Ok(())
        }
    }

    fn rule_name(&self) -> &'static str {
        "required"
    }
}

/// Consent validation rule: the value must be exactly `true`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequiredTrueRule;

impl RequiredTrueRule {
    /// Create a new required-true rule.
    pub fn new() -> Self {
        Self
    }
}

impl Rule for RequiredTrueRule {
    fn validate(&self, value: &Value) -> Result<(), ErrorDescriptor> {
        if value.as_bool() == Some(true) {
            Ok(())
        } else {
            Err(ErrorDescriptor::RequiredTrue)
        }
    }

    fn rule_name(&self) -> &'static str {
        "requiredTrue"
    }
}

/// Regex pattern validation rule.
///
/// The whole string-coerced value must match; the pattern is anchored on
/// construction.
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: String,
    regex: Regex,
}

impl PartialEq for PatternRule {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.regex.as_str() == other.regex.as_str()
    }
}

impl PatternRule {
    /// Create a pattern rule from a custom regex.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            regex: Regex::new(&format!("^(?:{})$", pattern))?,
        })
    }

    /// First and last name: letters only, one interior space.
    pub fn full_name() -> Self {
        Self {
            name: "full_name".to_string(),
            regex: full_name_regex().clone(),
        }
    }

    /// Standard `local@domain.tld` email shape.
    pub fn email() -> Self {
        Self {
            name: "email".to_string(),
            regex: email_regex().clone(),
        }
    }

    /// Name reported in the error payload.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Rule for PatternRule {
    fn validate(&self, value: &Value) -> Result<(), ErrorDescriptor> {
        if self.regex.is_match(&value.coerce_str()) {
            Ok(())
        } else {
            Err(ErrorDescriptor::Pattern {
                pattern: self.name.clone(),
            })
        }
    }

    fn rule_name(&self) -> &'static str {
        "pattern"
    }
}

/// Minimum length validation rule, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinLengthRule {
    /// Minimum length (inclusive)
    pub min: usize,
}

impl MinLengthRule {
    /// Create a minimum length rule.
    pub fn new(min: usize) -> Self {
        Self { min }
    }
}

impl Rule for MinLengthRule {
    fn validate(&self, value: &Value) -> Result<(), ErrorDescriptor> {
        let len = value.coerce_str().chars().count();
        if len < self.min {
            Err(ErrorDescriptor::MinLength {
                required: self.min,
                actual: len,
            })
        } else {
            Ok(())
        }
    }

    fn rule_name(&self) -> &'static str {
        "minLength"
    }
}

/// Rejects reserved values, ignoring case and surrounding whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservedValueRule {
    forbidden: BTreeSet<String>,
}

impl ReservedValueRule {
    /// Create a rule from a list of forbidden values.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            forbidden: values
                .into_iter()
                .map(|v| v.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    /// Check whether a value is reserved.
    pub fn is_reserved(&self, value: &str) -> bool {
        self.forbidden.contains(&value.trim().to_lowercase())
    }
}

impl Rule for ReservedValueRule {
    fn validate(&self, value: &Value) -> Result<(), ErrorDescriptor> {
        let text = value.coerce_str();
        if self.is_reserved(&text) {
            Err(ErrorDescriptor::ReservedValue {
                value: text.trim().to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn rule_name(&self) -> &'static str {
        "reservedValue"
    }
}

/// A rule built from a closure.
///
/// ```rust,ignore
/// let no_spaces = FnRule::new("no_spaces", |v: &Value| {
///     if v.coerce_str().contains(' ') {
///         Err(ErrorDescriptor::Pattern { pattern: "no_spaces".into() })
///     } else {
///         Ok(())
///     }
/// });
/// ```
pub struct FnRule<F> {
    name: &'static str,
    f: F,
}

impl<F> FnRule<F>
where
    F: Fn(&Value) -> Result<(), ErrorDescriptor> + Send + Sync,
{
    /// Wrap a closure as a named rule.
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

impl<F> fmt::Debug for FnRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule").field("name", &self.name).finish()
    }
}

impl<F> Rule for FnRule<F>
where
    F: Fn(&Value) -> Result<(), ErrorDescriptor> + Send + Sync,
{
    fn validate(&self, value: &Value) -> Result<(), ErrorDescriptor> {
        (self.f)(value)
    }

    fn rule_name(&self) -> &'static str {
        self.name
    }
}
