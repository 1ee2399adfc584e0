//! Array operations on `Value` controllers.
//!
//! Every operation here treats `Null` as an empty array and rejects any other
//! non-array value with [`ControllerError::TypeMismatch`]. Elements are handed
//! to callbacks as memoized child controllers, so a callback can both read
//! and write the element it is given.

use super::{Controller, ControllerError, ControllerResult};
use crate::optics::Target;
use crate::value::Value;

/// Decides whether an element should be removed by
/// [`Controller::remove_matching`].
pub type ElementPredicate<'a> = &'a dyn Fn(&Value, usize) -> bool;

impl Controller<Value> {
    /// The number of elements, or a type mismatch naming `operation`.
    fn array_length(&self, operation: &'static str) -> ControllerResult<usize> {
        let value = self.value();
        match value.as_array() {
            Some(items) => Ok(items.len()),
            None if value.is_null() => Ok(0),
            None => Err(self.mismatch(operation, value.clone())),
        }
    }

    fn mismatch(&self, operation: &'static str, found: Value) -> ControllerError {
        ControllerError::TypeMismatch {
            operation,
            path: self.path().clone(),
            found,
        }
    }

    /// Calls `function` with a controller for every element.
    ///
    /// # Errors
    ///
    /// [`ControllerError::TypeMismatch`] when the value is not an array.
    ///
    /// ```
    /// use controllens::creators::controller_from_initial_value;
    /// use controllens::value;
    ///
    /// let names = controller_from_initial_value(value!(["Julian", "Dick"]));
    /// let values = names.map(|name, _| name.value()).unwrap();
    ///
    /// assert_eq!(values, vec![value!("Julian"), value!("Dick")]);
    /// ```
    pub fn map<R>(&self, function: impl FnMut(Self, usize) -> R) -> ControllerResult<Vec<R>> {
        self.map_at(Target::This, function)
    }

    /// [`Controller::map`] over the array at `target`.
    ///
    /// # Errors
    ///
    /// [`ControllerError::TypeMismatch`] when the value at `target` is not an
    /// array.
    pub fn map_at<R>(
        &self,
        target: impl Into<Target>,
        mut function: impl FnMut(Self, usize) -> R,
    ) -> ControllerResult<Vec<R>> {
        let array = self.get(target);
        let length = array.array_length("map")?;
        Ok((0..length)
            .map(|index| function(array.get(index), index))
            .collect())
    }

    /// The controller of the first element accepted by `predicate`.
    ///
    /// # Errors
    ///
    /// [`ControllerError::TypeMismatch`] when the value is not an array.
    pub fn find(
        &self,
        predicate: impl FnMut(&Self, usize) -> bool,
    ) -> ControllerResult<Option<Self>> {
        self.find_at(Target::This, predicate)
    }

    /// [`Controller::find`] over the array at `target`.
    ///
    /// # Errors
    ///
    /// [`ControllerError::TypeMismatch`] when the value at `target` is not an
    /// array.
    pub fn find_at(
        &self,
        target: impl Into<Target>,
        mut predicate: impl FnMut(&Self, usize) -> bool,
    ) -> ControllerResult<Option<Self>> {
        let array = self.get(target);
        let length = array.array_length("find")?;
        Ok((0..length)
            .map(|index| array.get(index))
            .enumerate()
            .find(|(index, element)| predicate(element, *index))
            .map(|(_, element)| element))
    }

    /// The index of the first element accepted by `predicate`.
    ///
    /// # Errors
    ///
    /// [`ControllerError::TypeMismatch`] when the value is not an array.
    pub fn find_index(
        &self,
        predicate: impl FnMut(&Self, usize) -> bool,
    ) -> ControllerResult<Option<usize>> {
        self.find_index_at(Target::This, predicate)
    }

    /// [`Controller::find_index`] over the array at `target`.
    ///
    /// # Errors
    ///
    /// [`ControllerError::TypeMismatch`] when the value at `target` is not an
    /// array.
    pub fn find_index_at(
        &self,
        target: impl Into<Target>,
        mut predicate: impl FnMut(&Self, usize) -> bool,
    ) -> ControllerResult<Option<usize>> {
        let array = self.get(target);
        let length = array.array_length("find_index")?;
        Ok((0..length).find(|&index| predicate(&array.get(index), index)))
    }

    /// Appends `value`.
    ///
    /// # Errors
    ///
    /// [`ControllerError::TypeMismatch`] when the value is not an array.
    pub fn push(&self, value: impl Into<Value>) -> ControllerResult<()> {
        self.push_at(Target::This, value)
    }

    /// Appends `value` to the array at `target`, creating it when missing.
    ///
    /// # Errors
    ///
    /// [`ControllerError::TypeMismatch`] when the value at `target` is not an
    /// array.
    pub fn push_at(
        &self,
        target: impl Into<Target>,
        value: impl Into<Value>,
    ) -> ControllerResult<()> {
        let array = self.get(target);
        array.array_length("push")?;
        let appended = array.value().with_pushed(value.into());
        array.set_value(appended);
        Ok(())
    }

    /// A controller for an element that does not exist yet.
    ///
    /// The returned controller reads `Null` until its first write, which
    /// appends the written value; later writes replace that element. Removals
    /// and splices made through this array's controller keep it pointing at
    /// the same element; if that element itself is removed, the placeholder
    /// reads `Null` again and its next write appends anew.
    ///
    /// Controllers derived from the placeholder keep it alive, so
    /// `rows.push_new()?.get("name")` stays writable after the placeholder
    /// handle is dropped.
    ///
    /// # Errors
    ///
    /// [`ControllerError::TypeMismatch`] when the value is not an array.
    ///
    /// ```
    /// use controllens::creators::controller_from_initial_value;
    /// use controllens::value;
    ///
    /// let rows = controller_from_initial_value(value!(["first"]));
    /// let row = rows.push_new().unwrap();
    /// assert_eq!(rows.value(), value!(["first"]));
    ///
    /// row.set_value(value!("draft"));
    /// row.set_value(value!("second"));
    /// assert_eq!(rows.value(), value!(["first", "second"]));
    /// ```
    pub fn push_new(&self) -> ControllerResult<Self> {
        self.push_new_at(Target::This)
    }

    /// [`Controller::push_new`] for the array at `target`.
    ///
    /// # Errors
    ///
    /// [`ControllerError::TypeMismatch`] when the value at `target` is not an
    /// array.
    pub fn push_new_at(&self, target: impl Into<Target>) -> ControllerResult<Self> {
        let array = self.get(target);
        array.array_length("push_new")?;
        let placeholder = array.node.placeholder();
        Ok(self.adopt_owned(placeholder))
    }

    /// Removes `delete_count` elements starting at `start` and inserts
    /// `items` in their place. Returns the removed elements.
    ///
    /// `start` and `delete_count` are clamped to the array.
    ///
    /// # Errors
    ///
    /// [`ControllerError::TypeMismatch`] when the value is not an array.
    ///
    /// ```
    /// use controllens::creators::controller_from_initial_value;
    /// use controllens::value;
    ///
    /// let people = controller_from_initial_value(value!(["Peter", "Janet", "Pam"]));
    /// let removed = people.splice(1, 1, Vec::new()).unwrap();
    ///
    /// assert_eq!(removed, vec![value!("Janet")]);
    /// assert_eq!(people.value(), value!(["Peter", "Pam"]));
    /// ```
    pub fn splice(
        &self,
        start: usize,
        delete_count: usize,
        items: Vec<Value>,
    ) -> ControllerResult<Vec<Value>> {
        self.splice_at(Target::This, start, delete_count, items)
    }

    /// [`Controller::splice`] on the array at `target`.
    ///
    /// # Errors
    ///
    /// [`ControllerError::TypeMismatch`] when the value at `target` is not an
    /// array.
    pub fn splice_at(
        &self,
        target: impl Into<Target>,
        start: usize,
        delete_count: usize,
        items: Vec<Value>,
    ) -> ControllerResult<Vec<Value>> {
        let array = self.get(target);
        let length = array.array_length("splice")?;
        let start = start.min(length);
        let deleted = delete_count.min(length - start);
        let inserted = items.len();
        let (spliced, removed) = array.value().spliced(start, deleted, items);
        array.node.placeholders_after_splice(start, deleted, inserted);
        array.set_value(spliced);
        Ok(removed)
    }

    /// Removes the value at `target`: a key from this object or an element
    /// from this array. [`Target::This`] removes this controller from its
    /// parent, like [`Controller::remove`].
    ///
    /// # Errors
    ///
    /// [`ControllerError::TypeMismatch`] when `target` is an index and the
    /// value is not an array, [`ControllerError::UnsupportedOperation`] when
    /// `target` is [`Target::This`] and this controller cannot be removed.
    pub fn remove_at(&self, target: impl Into<Target>) -> ControllerResult<()> {
        let target = target.into();
        if matches!(target, Target::Index(_)) {
            self.array_length("remove")?;
        }
        self.get(target).remove()
    }

    /// Removes every element of the array at `target` accepted by
    /// `predicate` and returns them in order.
    ///
    /// # Errors
    ///
    /// [`ControllerError::MissingArgument`] without a predicate,
    /// [`ControllerError::TypeMismatch`] when the value at `target` is not an
    /// array.
    ///
    /// ```
    /// use controllens::optics::Target;
    /// use controllens::creators::controller_from_initial_value;
    /// use controllens::value;
    ///
    /// let todo = controller_from_initial_value(value!({ "items": [1, 2, 3, 4] }));
    /// let even = |item: &controllens::value::Value, _: usize| item.as_i64().is_some_and(|n| n % 2 == 0);
    /// let removed = todo.remove_matching("items", Some(&even)).unwrap();
    ///
    /// assert_eq!(removed, vec![value!(2), value!(4)]);
    /// assert_eq!(todo.value(), value!({ "items": [1, 3] }));
    /// assert!(todo.remove_matching(Target::This, None).is_err());
    /// ```
    pub fn remove_matching(
        &self,
        target: impl Into<Target>,
        predicate: Option<ElementPredicate<'_>>,
    ) -> ControllerResult<Vec<Value>> {
        let predicate = predicate.ok_or(ControllerError::MissingArgument {
            operation: "remove_matching",
            argument: "predicate",
        })?;
        let array = self.get(target);
        array.array_length("remove_matching")?;

        let current = array.value();
        let (removed, kept): (Vec<_>, Vec<_>) = current
            .as_array()
            .unwrap_or_default()
            .iter()
            .enumerate()
            .partition(|&(index, element)| predicate(element, index));
        if !removed.is_empty() {
            let gone: Vec<usize> = removed.iter().map(|&(index, _)| index).collect();
            array.node.placeholders_after_removal(&gone);
            array.set_value(kept.into_iter().map(|(_, element)| element.clone()).collect());
        }
        Ok(removed.into_iter().map(|(_, element)| element.clone()).collect())
    }
}
