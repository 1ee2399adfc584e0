//! Key and index navigation on `Value` controllers.

use std::rc::Rc;

use super::source::{ChangeFn, Snapshot, ToggleFn};
use super::Controller;
use crate::optics::Target;
use crate::value::Value;

impl Controller<Value> {
    /// The memoized child controller for `target`.
    ///
    /// [`Target::This`] returns this controller. Anything that is not there
    /// reads as [`Value::Null`]; writing to it creates the missing containers.
    ///
    /// ```
    /// use controllens::creators::controller_from_initial_value;
    /// use controllens::optics::Target;
    /// use controllens::value;
    ///
    /// let root = controller_from_initial_value(value!({}));
    /// root.get("child").get("name").set_value(value!("Patrick"));
    ///
    /// assert_eq!(root.value(), value!({ "child": { "name": "Patrick" } }));
    /// assert!(root.get(Target::This).ptr_eq(&root));
    /// ```
    #[must_use]
    pub fn get(&self, target: impl Into<Target>) -> Self {
        let node = self.node.resolve(target.into());
        self.adopt(node)
    }

    /// Shorthand for `get(name).get(index)`.
    #[must_use]
    pub fn get_in(&self, name: impl Into<String>, index: usize) -> Self {
        self.get(Target::Key(name.into())).get(index)
    }

    /// The memoized snapshot of the value at `target`.
    #[must_use]
    pub fn snapshot_at(&self, target: impl Into<Target>) -> Rc<Snapshot<Value>> {
        self.get(target).snapshot()
    }

    /// The memoized function replacing the value at `target`.
    ///
    /// The function is stable across calls until a setter is installed for
    /// the same key with [`Controller::setter`].
    #[must_use]
    pub fn on_change_at(&self, target: impl Into<Target>) -> ChangeFn<Value> {
        match target.into().step() {
            None => self.on_change(),
            Some(step) => self.node.step_change_fn(step),
        }
    }

    /// The memoized function flipping this controller's value between `true`
    /// and `false`, judged by [`Value::is_truthy`].
    #[must_use]
    pub fn on_toggle(&self) -> ToggleFn {
        self.on_toggle_at(Target::This)
    }

    /// Like [`Controller::on_toggle`] for the value at `target`.
    ///
    /// ```
    /// use controllens::creators::controller_from_initial_value;
    /// use controllens::value;
    ///
    /// let settings = controller_from_initial_value(value!({ "dark": false }));
    /// let toggle = settings.on_toggle_at("dark");
    ///
    /// toggle();
    /// assert_eq!(settings.value(), value!({ "dark": true }));
    /// toggle();
    /// assert_eq!(settings.value(), value!({ "dark": false }));
    /// ```
    #[must_use]
    pub fn on_toggle_at(&self, target: impl Into<Target>) -> ToggleFn {
        self.node.toggle_fn(target.into())
    }

    /// Maps the property `name` through `getter` whenever it is read.
    ///
    /// Replaces any getter installed earlier for `name`.
    pub fn getter(&self, name: impl Into<String>, getter: impl Fn(Value) -> Value + 'static) {
        self.node.install_getter(name.into(), Rc::new(getter));
    }

    /// Maps values written to the property `name` through `setter` before
    /// they are stored.
    ///
    /// Replaces any setter installed earlier for `name`, and drops the
    /// memoized [`Controller::on_change_at`] function for it.
    ///
    /// ```
    /// use controllens::creators::controller_from_initial_value;
    /// use controllens::value;
    ///
    /// let form = controller_from_initial_value(value!({}));
    /// form.setter("email", |email| value!(email.as_str().unwrap_or_default().to_lowercase()));
    ///
    /// (form.on_change_at("email"))(value!("Anne@Example.org"));
    /// assert_eq!(form.value(), value!({ "email": "anne@example.org" }));
    /// ```
    pub fn setter(&self, name: impl Into<String>, setter: impl Fn(Value) -> Value + 'static) {
        self.node.install_setter(name.into(), Rc::new(setter));
    }
}
