//! A single validated input.

use formwork_validate::{ErrorDescriptor, RuleSet, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_FIELD_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a field, unaffected by collection index shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(u64);

impl FieldId {
    fn next() -> Self {
        Self(NEXT_FIELD_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// What the UI should show for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    /// Untouched; errors may exist but are not surfaced
    Neutral,
    /// Touched and passing
    Valid,
    /// Touched and failing
    Invalid,
    /// Touched, async check in flight
    Pending,
}

/// One named input: value, rules, and validation state.
///
/// Invariant: `error` is `Some` iff a rule currently fails. While `pending`
/// the field is neither valid nor invalid.
#[derive(Debug)]
pub struct Field {
    id: FieldId,
    value: Value,
    initial: Value,
    rules: Arc<RuleSet>,
    touched: bool,
    dirty: bool,
    error: Option<ErrorDescriptor>,
    pending: bool,
    generation: u64,
}

impl Field {
    /// Create a field and run its sync rules against the initial value.
    pub fn new(initial: impl Into<Value>, rules: impl Into<Arc<RuleSet>>) -> Self {
        let initial = initial.into();
        let mut field = Self {
            id: FieldId::next(),
            value: initial.clone(),
            initial,
            rules: rules.into(),
            touched: false,
            dirty: false,
            error: None,
            pending: false,
            generation: 0,
        };
        field.validate_sync();
        field
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn initial(&self) -> &Value {
        &self.initial
    }

    pub fn rules(&self) -> &Arc<RuleSet> {
        &self.rules
    }

    pub fn error(&self) -> Option<&ErrorDescriptor> {
        self.error.as_ref()
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Bumped on every value change; tags async evaluations.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// No error and nothing in flight.
    pub fn is_valid(&self) -> bool {
        self.error.is_none() && !self.pending
    }

    /// Error present and touched: the UI should show the message.
    pub fn is_invalid(&self) -> bool {
        self.error.is_some() && self.touched && !self.pending
    }

    pub fn status(&self) -> FieldStatus {
        if !self.touched {
            FieldStatus::Neutral
        } else if self.pending {
            FieldStatus::Pending
        } else if self.error.is_some() {
            FieldStatus::Invalid
        } else {
            FieldStatus::Valid
        }
    }

    /// Replace the value and re-run the sync rules.
    ///
    /// Any async result still in flight for the old value becomes stale.
    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
        self.dirty = true;
        self.pending = false;
        self.generation += 1;
        self.validate_sync();
    }

    /// Run the sync rules in declared order and store the first failure.
    pub fn validate_sync(&mut self) -> Option<&ErrorDescriptor> {
        self.error = self.rules.evaluate(&self.value);
        self.error.as_ref()
    }

    pub fn mark_touched(&mut self) {
        self.touched = true;
    }

    /// Back to the initial value, untouched and clean.
    pub fn reset(&mut self) {
        self.value = self.initial.clone();
        self.touched = false;
        self.dirty = false;
        self.pending = false;
        self.generation += 1;
        self.validate_sync();
    }

    /// Sync rules pass and async rules exist: an async check is due.
    pub(crate) fn needs_async(&self) -> bool {
        self.error.is_none() && self.rules.has_async()
    }

    pub(crate) fn begin_async(&mut self) {
        self.pending = true;
    }

    /// Apply an async result. Returns `false` if it is stale.
    pub(crate) fn resolve_async(&mut self, generation: u64, error: Option<ErrorDescriptor>) -> bool {
        if !self.pending || generation != self.generation {
            return false;
        }
        self.pending = false;
        self.error = error;
        true
    }
}
