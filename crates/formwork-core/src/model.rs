//! The form aggregate: named controls, cross-field rules and the runner.

use crate::collection::FieldCollection;
use crate::config::EngineConfig;
use crate::error::{Result, UsageError};
use crate::field::{Field, FieldId, FieldStatus};
use crate::runner::{Resolution, ValidationRunner};
use crate::snapshot::{ErrorSnapshot, FormValue, FormValues, SubmitOutcome};
use formwork_validate::{
    CrossRule, ErrorDescriptor, FieldLookup, MessageCatalog, RuleSet, ValidationContext, Value,
};
use std::collections::HashSet;
use std::sync::Arc;

/// A named entry of a form.
#[derive(Debug)]
pub enum Control {
    Field(Field),
    Collection(FieldCollection),
}

impl Control {
    fn mark_touched(&mut self) {
        match self {
            Control::Field(field) => field.mark_touched(),
            Control::Collection(collection) => collection.mark_touched(),
        }
    }

    fn is_valid(&self) -> bool {
        match self {
            Control::Field(field) => field.is_valid(),
            Control::Collection(collection) => collection.is_valid(),
        }
    }
}

/// A form: ordered controls, cross-field rules and async evaluation state.
///
/// Every mutation runs sync rules and cross-field rules before returning.
/// Async results are only applied while the owner awaits
/// [`next_resolution`](Self::next_resolution) or [`settle`](Self::settle).
///
/// # Example
///
/// ```rust,ignore
/// let mut form = FormModel::builder()
///     .field("name", "", RuleSet::new().rule(RequiredRule::new()).rule(MinLengthRule::new(3)))
///     .build()?;
///
/// form.set_value("name", "AB")?;
/// form.mark_touched("name")?;
/// assert_eq!(form.get_field_error_message("name")?.as_deref(), Some("minimum 3 characters"));
/// ```
#[derive(Debug)]
pub struct FormModel {
    controls: Vec<(String, Control)>,
    cross_rules: Vec<Arc<dyn CrossRule>>,
    cross_error: Option<ErrorDescriptor>,
    runner: ValidationRunner,
    messages: MessageCatalog,
}

impl FieldLookup for FormModel {
    fn lookup(&self, name: &str) -> Option<&Value> {
        match self.find(name)? {
            Control::Field(field) => Some(field.value()),
            Control::Collection(_) => None,
        }
    }
}

impl FormModel {
    pub fn builder() -> FormBuilder {
        FormBuilder::new()
    }

    // --- lookup ---

    fn find(&self, name: &str) -> Option<&Control> {
        self.controls
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, control)| control)
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.controls
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| UsageError::UnknownField(name.to_string()))
    }

    pub fn control(&self, name: &str) -> Result<&Control> {
        self.find(name)
            .ok_or_else(|| UsageError::UnknownField(name.to_string()))
    }

    pub fn field(&self, name: &str) -> Result<&Field> {
        match self.control(name)? {
            Control::Field(field) => Ok(field),
            Control::Collection(_) => Err(UsageError::NotAField(name.to_string())),
        }
    }

    pub fn collection(&self, name: &str) -> Result<&FieldCollection> {
        match self.control(name)? {
            Control::Collection(collection) => Ok(collection),
            Control::Field(_) => Err(UsageError::NotACollection(name.to_string())),
        }
    }

    fn item(&self, collection: &str, index: usize) -> Result<&Field> {
        let items = self.collection(collection)?;
        items.get(index).ok_or_else(|| UsageError::IndexOutOfRange {
            collection: collection.to_string(),
            index,
            len: items.len(),
        })
    }

    fn field_by_id_mut(&mut self, id: FieldId) -> Option<&mut Field> {
        self.controls
            .iter_mut()
            .find_map(|(_, control)| match control {
                Control::Field(field) => (field.id() == id).then_some(field),
                Control::Collection(collection) => {
                    collection.items_mut().find(|item| item.id() == id)
                }
            })
    }

    /// Control names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.controls.iter().map(|(name, _)| name.as_str())
    }

    pub fn value(&self, name: &str) -> Result<&Value> {
        self.field(name).map(Field::value)
    }

    pub fn items(&self, name: &str) -> Result<&[Field]> {
        self.collection(name).map(FieldCollection::items)
    }

    /// First failing cross-field rule, regardless of touched state.
    pub fn cross_error(&self) -> Option<&ErrorDescriptor> {
        self.cross_error.as_ref()
    }

    pub fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    pub fn config(&self) -> &EngineConfig {
        self.runner.config()
    }

    pub fn context(&self) -> &Arc<ValidationContext> {
        self.runner.context()
    }

    /// Async evaluations started and not yet observed.
    pub fn in_flight(&self) -> usize {
        self.runner.in_flight()
    }

    // --- mutation ---

    /// Replace a field's value: sync rules now, async rules scheduled,
    /// cross-field rules re-run.
    pub fn set_value(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let index = self.position(name)?;
        match &mut self.controls[index].1 {
            Control::Field(field) => {
                field.set_value(value);
                self.runner.after_change(field);
                tracing::trace!(field = name, error = ?field.error(), "value changed");
            }
            Control::Collection(_) => return Err(UsageError::NotAField(name.to_string())),
        }
        self.revalidate_cross();
        Ok(())
    }

    /// Same pipeline as [`set_value`](Self::set_value), for one collection item.
    pub fn set_item_value(
        &mut self,
        collection: &str,
        index: usize,
        value: impl Into<Value>,
    ) -> Result<()> {
        let items = collection_mut(&mut self.controls, collection)?;
        let len = items.len();
        let item = items
            .get_mut(index)
            .ok_or_else(|| UsageError::IndexOutOfRange {
                collection: collection.to_string(),
                index,
                len,
            })?;
        item.set_value(value);
        self.runner.after_change(item);
        self.revalidate_cross();
        Ok(())
    }

    /// Append an item built from the collection's template. Returns its index.
    ///
    /// The new item is validated eagerly and left untouched.
    pub fn add_item(&mut self, collection: &str, value: impl Into<Value>) -> Result<usize> {
        let items = collection_mut(&mut self.controls, collection)?;
        let index = items.push(value);
        if let Some(item) = items.get_mut(index) {
            self.runner.after_change(item);
        }
        tracing::debug!(collection, index, "item added");
        self.revalidate_cross();
        Ok(index)
    }

    /// Move a staging field's value into a collection.
    ///
    /// Returns `Ok(false)` and changes nothing if the staging field is empty
    /// or failing. Otherwise appends its value, resets it, and returns `Ok(true)`.
    pub fn add_item_from(&mut self, collection: &str, staging: &mut Field) -> Result<bool> {
        self.collection(collection)?;
        if staging.value().is_empty() || !staging.is_valid() {
            return Ok(false);
        }
        self.add_item(collection, staging.value().clone())?;
        staging.reset();
        Ok(true)
    }

    /// Remove the item at `index`; later items shift down by one.
    ///
    /// Any async result still in flight for the removed item is discarded.
    pub fn remove_at(&mut self, collection: &str, index: usize) -> Result<Value> {
        let items = collection_mut(&mut self.controls, collection)?;
        let len = items.len();
        let removed = items
            .remove_at(index)
            .ok_or_else(|| UsageError::IndexOutOfRange {
                collection: collection.to_string(),
                index,
                len,
            })?;
        self.runner.forget(removed.id());
        tracing::debug!(collection, index, "item removed");
        self.revalidate_cross();
        Ok(removed.value().clone())
    }

    /// Blur: touch one field, or a collection and all its items.
    pub fn mark_touched(&mut self, name: &str) -> Result<()> {
        let index = self.position(name)?;
        self.controls[index].1.mark_touched();
        Ok(())
    }

    /// Touch every field and collection item. Rules are not re-run.
    pub fn touch_all(&mut self) {
        for (_, control) in &mut self.controls {
            control.mark_touched();
        }
    }

    /// Try to submit.
    ///
    /// Rejected if any error exists or any check is pending; everything is
    /// then touched so the errors show. On success the values are captured
    /// and the form is [`reset`](Self::reset).
    pub fn submit(&mut self) -> SubmitOutcome {
        let errors = self.errors();
        if !errors.is_empty() {
            tracing::info!(
                errors = errors.len(),
                pending = errors.pending.len(),
                "submission rejected"
            );
            self.touch_all();
            return SubmitOutcome {
                ok: false,
                errors,
                values: None,
            };
        }

        let values = self.values();
        self.reset();
        tracing::info!(controls = values.len(), "submission accepted");
        SubmitOutcome {
            ok: true,
            errors,
            values: Some(values),
        }
    }

    /// Back to the initial state: initial values, untouched, collections
    /// pruned to their initial items, in-flight results invalidated.
    ///
    /// Async rules are rescheduled for every reset value that passes its
    /// sync rules.
    pub fn reset(&mut self) {
        for (_, control) in &mut self.controls {
            match control {
                Control::Field(field) => field.reset(),
                Control::Collection(collection) => {
                    for item in collection.items() {
                        self.runner.forget(item.id());
                    }
                    collection.reset();
                }
            }
        }
        self.schedule_all();
        self.revalidate_cross();
    }

    // Start async rules for every field and item whose sync rules pass.
    fn schedule_all(&mut self) {
        for (_, control) in &mut self.controls {
            match control {
                Control::Field(field) => self.runner.after_change(field),
                Control::Collection(collection) => {
                    for item in collection.items_mut() {
                        self.runner.after_change(item);
                    }
                }
            }
        }
    }

    fn revalidate_cross(&mut self) {
        let form: &Self = self;
        let error = form
            .cross_rules
            .iter()
            .find_map(|rule| rule.validate(form).err());
        if error != self.cross_error {
            tracing::trace!(error = ?error, "cross-field state changed");
        }
        self.cross_error = error;
    }

    // --- async driving ---

    /// Wait for the next async evaluation to finish and apply it unless stale.
    ///
    /// Returns `None` immediately when nothing is in flight.
    pub async fn next_resolution(&mut self) -> Option<Resolution> {
        let outcome = self.runner.next_outcome().await?;
        let applied = match &outcome.error {
            Some(error) => self
                .field_by_id_mut(outcome.field)
                .is_some_and(|field| field.resolve_async(outcome.generation, error.clone())),
            None => false,
        };

        if applied {
            tracing::debug!(field = ?outcome.field, generation = outcome.generation, "async result applied");
            self.revalidate_cross();
        } else {
            tracing::debug!(field = ?outcome.field, generation = outcome.generation, "stale async result discarded");
        }

        Some(Resolution {
            field: outcome.field,
            generation: outcome.generation,
            applied,
            error: outcome.error.flatten(),
        })
    }

    /// Drive every in-flight evaluation to completion.
    pub async fn settle(&mut self) {
        while self.next_resolution().await.is_some() {}
    }

    // --- queries ---

    fn surfaced_cross_error(&self, name: &str) -> Option<&ErrorDescriptor> {
        self.cross_error
            .as_ref()
            .filter(|err| err.surface_field() == Some(name))
    }

    /// UI status of a single field, counting a cross error surfaced on it.
    pub fn field_status(&self, name: &str) -> Result<FieldStatus> {
        let field = self.field(name)?;
        Ok(match field.status() {
            FieldStatus::Valid if self.surfaced_cross_error(name).is_some() => {
                FieldStatus::Invalid
            }
            status => status,
        })
    }

    /// Error present and touched. For a collection: any item invalid, or a
    /// touched collection-level error.
    pub fn is_field_invalid(&self, name: &str) -> Result<bool> {
        match self.control(name)? {
            Control::Field(_) => Ok(self.field_status(name)? == FieldStatus::Invalid),
            Control::Collection(collection) => Ok(collection.is_invalid()),
        }
    }

    pub fn is_item_invalid(&self, collection: &str, index: usize) -> Result<bool> {
        self.item(collection, index).map(Field::is_invalid)
    }

    /// Message for the field's own error, else for a cross error surfaced on
    /// it. `None` while an async check is pending.
    ///
    /// Not gated on touched state; pair with [`is_field_invalid`](Self::is_field_invalid).
    pub fn get_field_error_message(&self, name: &str) -> Result<Option<String>> {
        match self.control(name)? {
            Control::Field(field) => {
                if field.is_pending() {
                    return Ok(None);
                }
                Ok(field
                    .error()
                    .or_else(|| self.surfaced_cross_error(name))
                    .map(|err| self.messages.message_for(err)))
            }
            Control::Collection(collection) => {
                Ok(collection.error().map(|err| self.messages.message_for(err)))
            }
        }
    }

    pub fn get_item_error_message(&self, collection: &str, index: usize) -> Result<Option<String>> {
        let item = self.item(collection, index)?;
        if item.is_pending() {
            return Ok(None);
        }
        Ok(item.error().map(|err| self.messages.message_for(err)))
    }

    /// An async check is in flight for the field, or for any item of the collection.
    pub fn is_pending(&self, name: &str) -> Result<bool> {
        match self.control(name)? {
            Control::Field(field) => Ok(field.is_pending()),
            Control::Collection(collection) => {
                Ok(collection.items().iter().any(Field::is_pending))
            }
        }
    }

    /// Submittable: no errors anywhere and nothing pending.
    pub fn is_valid(&self) -> bool {
        self.cross_error.is_none() && self.controls.iter().all(|(_, c)| c.is_valid())
    }

    /// Current values of every control.
    pub fn values(&self) -> FormValues {
        FormValues(
            self.controls
                .iter()
                .map(|(name, control)| {
                    let value = match control {
                        Control::Field(field) => FormValue::Single(field.value().clone()),
                        Control::Collection(collection) => FormValue::List(collection.values()),
                    };
                    (name.clone(), value)
                })
                .collect(),
        )
    }

    /// Every current error, touched or not, plus pending paths.
    pub fn errors(&self) -> ErrorSnapshot {
        let mut snapshot = ErrorSnapshot {
            form: self.cross_error.clone(),
            ..Default::default()
        };

        let mut record = |path: String, field: &Field| {
            if field.is_pending() {
                snapshot.pending.push(path);
            } else if let Some(err) = field.error() {
                snapshot.fields.insert(path, err.clone());
            }
        };

        for (name, control) in &self.controls {
            match control {
                Control::Field(field) => record(name.clone(), field),
                Control::Collection(collection) => {
                    for (index, item) in collection.items().iter().enumerate() {
                        record(format!("{name}.{index}"), item);
                    }
                }
            }
        }

        for (name, control) in &self.controls {
            if let Control::Collection(collection) = control {
                if let Some(err) = collection.error() {
                    snapshot.fields.insert(name.clone(), err.clone());
                }
            }
        }

        snapshot
    }
}

// Free function so the runner stays borrowable alongside the collection.
fn collection_mut<'a>(
    controls: &'a mut [(String, Control)],
    name: &str,
) -> Result<&'a mut FieldCollection> {
    match controls.iter_mut().find(|(n, _)| n == name) {
        Some((_, Control::Collection(collection))) => Ok(collection),
        Some((_, Control::Field(_))) => Err(UsageError::NotACollection(name.to_string())),
        None => Err(UsageError::UnknownField(name.to_string())),
    }
}

/// Builder for [`FormModel`].
#[derive(Default)]
pub struct FormBuilder {
    controls: Vec<(String, Control)>,
    cross_rules: Vec<Arc<dyn CrossRule>>,
    context: Option<Arc<ValidationContext>>,
    config: EngineConfig,
    messages: MessageCatalog,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single field with its initial value.
    pub fn field(
        mut self,
        name: impl Into<String>,
        initial: impl Into<Value>,
        rules: impl Into<Arc<RuleSet>>,
    ) -> Self {
        self.controls
            .push((name.into(), Control::Field(Field::new(initial, rules))));
        self
    }

    /// Add a collection.
    pub fn collection(mut self, name: impl Into<String>, collection: FieldCollection) -> Self {
        self.controls
            .push((name.into(), Control::Collection(collection)));
        self
    }

    /// Add a cross-field rule. Rules are checked in the order added.
    pub fn cross_rule(mut self, rule: impl CrossRule + 'static) -> Self {
        self.cross_rules.push(Arc::new(rule));
        self
    }

    /// Context handed to async rules.
    pub fn context(self, context: ValidationContext) -> Self {
        self.context_arc(Arc::new(context))
    }

    pub fn context_arc(mut self, context: Arc<ValidationContext>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn messages(mut self, messages: MessageCatalog) -> Self {
        self.messages = messages;
        self
    }

    /// Build the form, rejecting duplicate names and cross rules over
    /// unknown fields or collections.
    pub fn build(self) -> Result<FormModel> {
        let mut seen = HashSet::new();
        for (name, _) in &self.controls {
            if !seen.insert(name.as_str()) {
                return Err(UsageError::DuplicateField(name.clone()));
            }
        }

        for rule in &self.cross_rules {
            for name in rule.fields() {
                match self.controls.iter().find(|(n, _)| n == name) {
                    None => return Err(UsageError::UnknownField(name.to_string())),
                    Some((_, Control::Collection(_))) => {
                        return Err(UsageError::NotAField(name.to_string()))
                    }
                    Some((_, Control::Field(_))) => {}
                }
            }
        }

        let context = self
            .context
            .unwrap_or_else(|| Arc::new(ValidationContext::new()));

        let mut form = FormModel {
            controls: self.controls,
            cross_rules: self.cross_rules,
            cross_error: None,
            runner: ValidationRunner::new(context, self.config),
            messages: self.messages,
        };
        form.schedule_all();
        form.revalidate_cross();

        tracing::debug!(
            controls = form.controls.len(),
            cross_rules = form.cross_rules.len(),
            "form built"
        );
        Ok(form)
    }
}
