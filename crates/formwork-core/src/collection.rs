//! Dynamically sized groups of fields sharing one rule template.

use crate::field::Field;
use formwork_validate::{ErrorDescriptor, RuleSet, Value};
use std::sync::Arc;

/// An ordered, resizable sequence of fields built from one rule template.
///
/// Indices are only stable between mutations: removing an item shifts every
/// later item down by one.
#[derive(Debug)]
pub struct FieldCollection {
    template: Arc<RuleSet>,
    items: Vec<Field>,
    initial: Vec<Value>,
    min_items: Option<usize>,
    touched: bool,
    error: Option<ErrorDescriptor>,
}

impl FieldCollection {
    /// Create a collection with its initial items, each validated eagerly.
    pub fn new<I, V>(template: impl Into<Arc<RuleSet>>, initial: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let template = template.into();
        let initial: Vec<Value> = initial.into_iter().map(Into::into).collect();
        let items = initial
            .iter()
            .map(|value| Field::new(value.clone(), Arc::clone(&template)))
            .collect();

        let mut collection = Self {
            template,
            items,
            initial,
            min_items: None,
            touched: false,
            error: None,
        };
        collection.validate_size();
        collection
    }

    /// Require at least `min` items.
    pub fn with_min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self.validate_size();
        self
    }

    pub fn template(&self) -> &Arc<RuleSet> {
        &self.template
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Field] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Field> {
        self.items.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Field> {
        self.items.get_mut(index)
    }

    pub(crate) fn items_mut(&mut self) -> impl Iterator<Item = &mut Field> {
        self.items.iter_mut()
    }

    pub fn values(&self) -> Vec<Value> {
        self.items.iter().map(|item| item.value().clone()).collect()
    }

    /// Collection-level error (`minItems`), independent of item errors.
    pub fn error(&self) -> Option<&ErrorDescriptor> {
        self.error.as_ref()
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Every item valid and the size constraint met. Empty is valid by default.
    pub fn is_valid(&self) -> bool {
        self.error.is_none() && self.items.iter().all(Field::is_valid)
    }

    /// Some item, or the size constraint, should be shown as invalid.
    pub fn is_invalid(&self) -> bool {
        (self.error.is_some() && self.touched) || self.items.iter().any(Field::is_invalid)
    }

    /// Append a new item built from the template. Returns its index.
    pub fn push(&mut self, value: impl Into<Value>) -> usize {
        self.items.push(Field::new(value, Arc::clone(&self.template)));
        self.validate_size();
        self.items.len() - 1
    }

    /// Remove the item at `index`, shifting later items down.
    ///
    /// Returns `None` and leaves the collection unchanged when out of range.
    pub fn remove_at(&mut self, index: usize) -> Option<Field> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        self.validate_size();
        Some(removed)
    }

    /// Touch the collection and every item.
    pub fn mark_touched(&mut self) {
        self.touched = true;
        for item in &mut self.items {
            item.mark_touched();
        }
    }

    /// Prune back to the initial item set, untouched.
    pub fn reset(&mut self) {
        self.items = self
            .initial
            .iter()
            .map(|value| Field::new(value.clone(), Arc::clone(&self.template)))
            .collect();
        self.touched = false;
        self.validate_size();
    }

    fn validate_size(&mut self) {
        self.error = match self.min_items {
            Some(min) if self.items.len() < min => Some(ErrorDescriptor::MinItems {
                required: min,
                actual: self.items.len(),
            }),
            _ => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_validate::RequiredRule;

    fn games() -> FieldCollection {
        FieldCollection::new(
            RuleSet::new().rule(RequiredRule::new()),
            ["Halo Reach", "Resident Evil 5", "Fornite"],
        )
    }

    #[test]
    fn remove_shifts_later_items() {
        let mut collection = games();
        let removed = collection.remove_at(1).unwrap();
        assert_eq!(removed.value(), &Value::from("Resident Evil 5"));
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get(1).unwrap().value(), &Value::from("Fornite"));
    }

    #[test]
    fn remove_out_of_range_leaves_items() {
        let mut collection = games();
        assert!(collection.remove_at(3).is_none());
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn push_validates_eagerly() {
        let mut collection = games();
        let index = collection.push("");
        assert_eq!(index, 3);

        let item = collection.get(3).unwrap();
        assert_eq!(item.error(), Some(&ErrorDescriptor::Required));
        assert!(!item.is_touched());
        assert!(!collection.is_valid());
        assert!(!collection.is_invalid());

        collection.mark_touched();
        assert!(collection.is_invalid());
    }

    #[test]
    fn items_share_template() {
        let collection = games();
        assert!(Arc::ptr_eq(
            collection.get(0).unwrap().rules(),
            collection.get(2).unwrap().rules()
        ));
    }

    #[test]
    fn empty_collection_is_valid_by_default() {
        let collection = FieldCollection::new(RuleSet::new(), Vec::<Value>::new());
        assert!(collection.is_empty());
        assert!(collection.is_valid());
    }

    #[test]
    fn min_items_constraint() {
        let mut collection = FieldCollection::new(RuleSet::new(), ["only one"]).with_min_items(2);
        assert_eq!(
            collection.error(),
            Some(&ErrorDescriptor::MinItems {
                required: 2,
                actual: 1
            })
        );
        assert!(!collection.is_valid());

        collection.push("two");
        assert!(collection.error().is_none());
        assert!(collection.is_valid());
    }

    #[test]
    fn reset_prunes_to_initial_items() {
        let mut collection = games();
        collection.push("Zelda");
        collection.remove_at(0);
        collection.mark_touched();
        collection.reset();

        assert_eq!(
            collection.values(),
            vec![
                Value::from("Halo Reach"),
                Value::from("Resident Evil 5"),
                Value::from("Fornite")
            ]
        );
        assert!(!collection.is_touched());
    }
}
