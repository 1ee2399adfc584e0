//! Controller nodes and the change propagation protocol.
//!
//! A [`Node`] is the shared state behind every [`Controller`](super::Controller)
//! handle. Nodes form a tree: parents own their memoized children and derived
//! nodes strongly, children refer back to their parent weakly, so a tree never
//! keeps itself alive.
//!
//! # Propagation
//!
//! Every write ends in [`Node::propagate`]:
//!
//! 1. A node that is already notifying only records the write; its own
//!    listeners are not re-run.
//! 2. Otherwise the node reconciles its dependents (children, derived views,
//!    live placeholders): each one that is not itself in the middle of a write
//!    compares its source against the value its listeners last saw and, if it
//!    differs, propagates in turn.
//! 3. Listeners are called newest first with `(current, previous)`.
//! 4. If a listener wrote to this node meanwhile, dependents are reconciled
//!    once more so they end up consistent with the final value.
//!
//! A write that starts at a leaf marks the leaf as `writing` while it travels
//! up through the ancestors' sources. Ancestors skip writing dependents during
//! reconciliation; the leaf reports its own change once its write returns.
//! This is what makes every listener fire exactly once per logical write,
//! wherever the write started.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::State;
use super::listener::{Listener, ListenerTag, Listeners};
use super::source::{
    ChangeFn, LensSource, PlaceholderSource, Snapshot, Source, StepSource, ToggleFn,
};
use crate::optics::{Lens, Path, Step, Target};
use crate::value::Value;

/// A read or write interceptor for one property.
pub(crate) type Interceptor = Rc<dyn Fn(Value) -> Value>;

/// Something a node must bring up to date after its own value changed.
pub(crate) trait Reconcile {
    /// Notifies listeners if the source no longer matches what they last saw.
    fn notify_if_changed(&self);

    /// Removes listeners here and in every dependent.
    fn remove_all_change_listeners(&self, tag: Option<&ListenerTag>);
}

/// Distinguishes derived views built from the same `Rc` allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DerivedKind {
    Transform,
    Focus,
}

/// The index a `push_new` placeholder committed to, shared between the
/// placeholder's source and the array node that shifts it.
pub(crate) type PlaceholderSlot = Rc<Cell<Option<usize>>>;

struct Placeholder {
    node: Weak<Node<Value>>,
    index: PlaceholderSlot,
}

struct Derived {
    kind: DerivedKind,
    address: usize,
    node: Rc<dyn Any>,
    reconcile: Rc<dyn Reconcile>,
}

/// State that only `Value` nodes use: key/index children and the caches
/// around them.
#[derive(Default)]
struct Navigation {
    children: RefCell<BTreeMap<Step, Rc<Node<Value>>>>,
    placeholders: RefCell<Vec<Placeholder>>,
    step_changes: RefCell<FxHashMap<Step, ChangeFn<Value>>>,
    toggles: RefCell<FxHashMap<Target, ToggleFn>>,
    getters: RefCell<FxHashMap<String, Interceptor>>,
    setters: RefCell<FxHashMap<String, Interceptor>>,
}

/// Sets a flag for the lifetime of the guard and restores the previous state
/// afterwards, also on unwind.
struct FlagGuard<'a> {
    flag: &'a Cell<bool>,
    previous: bool,
}

impl<'a> FlagGuard<'a> {
    fn raise(flag: &'a Cell<bool>) -> Self {
        let previous = flag.replace(true);
        Self { flag, previous }
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}

pub(crate) struct Node<T: State> {
    path: Path,
    source: Box<dyn Source<T>>,
    last_known: RefCell<T>,
    baseline: RefCell<T>,
    snapshot: RefCell<Option<Rc<Snapshot<T>>>>,
    change: RefCell<Option<ChangeFn<T>>>,
    listeners: RefCell<Listeners<T>>,
    notifying: Cell<bool>,
    writing: Cell<bool>,
    pending: Cell<bool>,
    derived: RefCell<Vec<Derived>>,
    navigation: Navigation,
}

impl<T: State> Node<T> {
    /// Creates a node whose listeners have seen `initial`.
    pub(crate) fn new(path: Path, source: Box<dyn Source<T>>, initial: T) -> Rc<Self> {
        Rc::new(Self {
            path,
            source,
            last_known: RefCell::new(initial.clone()),
            baseline: RefCell::new(initial),
            snapshot: RefCell::new(None),
            change: RefCell::new(None),
            listeners: RefCell::new(Listeners::new()),
            notifying: Cell::new(false),
            writing: Cell::new(false),
            pending: Cell::new(false),
            derived: RefCell::new(Vec::new()),
            navigation: Navigation::default(),
        })
    }

    pub(crate) const fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the source. An unchanged value is returned as the previously
    /// observed instance so identity stays stable across reads.
    pub(crate) fn value(&self) -> T {
        match self.source.read() {
            Some(current) => self.observe(current),
            None => self.last_known.borrow().clone(),
        }
    }

    fn observe(&self, current: T) -> T {
        {
            let mut last_known = self.last_known.borrow_mut();
            if *last_known == current {
                return last_known.clone();
            }
            *last_known = current.clone();
        }
        self.snapshot.borrow_mut().take();
        current
    }

    /// Writes through the source, then propagates.
    pub(crate) fn write(&self, value: T) {
        #[cfg(feature = "tracing")]
        tracing::trace!(path = %self.path, "controller write");

        let previous = self.value();
        {
            let _writing = FlagGuard::raise(&self.writing);
            self.source.write(value);
        }
        self.settle(previous);
    }

    /// Removes this node's value from its parent container.
    pub(crate) fn remove(&self) -> bool {
        let previous = self.value();
        let removed = {
            let _writing = FlagGuard::raise(&self.writing);
            self.source.remove()
        };
        if removed {
            self.settle(previous);
        }
        removed
    }

    fn settle(&self, previous: T) {
        let current = self.value();
        *self.baseline.borrow_mut() = current;
        self.propagate(previous);
    }

    fn propagate(&self, previous: T) {
        if self.notifying.get() {
            #[cfg(feature = "tracing")]
            tracing::debug!(path = %self.path, "write during notification; listeners not re-run");
            self.pending.set(true);
            return;
        }

        let _notifying = FlagGuard::raise(&self.notifying);
        self.reconcile_dependents();

        let current = self.value();
        let listeners = self.listeners.borrow().delivery_order();
        #[cfg(feature = "tracing")]
        tracing::trace!(path = %self.path, listeners = listeners.len(), "delivering change");
        for listener in listeners {
            listener(&current, &previous);
        }

        if self.pending.replace(false) {
            self.reconcile_dependents();
        }
    }

    fn reconcile_dependents(&self) {
        for dependent in self.dependents() {
            dependent.notify_if_changed();
        }
    }

    /// A stable copy of everything that derives from this node.
    fn dependents(&self) -> SmallVec<[Rc<dyn Reconcile>; 8]> {
        let mut dependents: SmallVec<[Rc<dyn Reconcile>; 8]> = self
            .navigation
            .children
            .borrow()
            .values()
            .map(|child| Rc::clone(child) as Rc<dyn Reconcile>)
            .collect();
        dependents.extend(
            self.derived
                .borrow()
                .iter()
                .map(|derived| Rc::clone(&derived.reconcile)),
        );
        let mut placeholders = self.navigation.placeholders.borrow_mut();
        placeholders.retain(|placeholder| placeholder.node.strong_count() > 0);
        dependents.extend(
            placeholders
                .iter()
                .filter_map(|placeholder| placeholder.node.upgrade())
                .map(|placeholder| placeholder as Rc<dyn Reconcile>),
        );
        dependents
    }

    pub(crate) fn add_listener(&self, listener: Listener<T>, tag: ListenerTag) {
        self.listeners.borrow_mut().add(listener, tag);
    }

    pub(crate) fn remove_listener(&self, listener: &Listener<T>) -> bool {
        self.listeners.borrow_mut().remove(listener)
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// The memoized whole-value change function.
    pub(crate) fn change_fn(self: &Rc<Self>) -> ChangeFn<T> {
        if let Some(change) = self.change.borrow().as_ref() {
            return Rc::clone(change);
        }
        let node = Rc::downgrade(self);
        let change: ChangeFn<T> = Rc::new(move |value: T| {
            if let Some(node) = node.upgrade() {
                node.write(value);
            }
        });
        *self.change.borrow_mut() = Some(Rc::clone(&change));
        change
    }

    /// The memoized snapshot, rebuilt only when the value changed.
    pub(crate) fn snapshot(self: &Rc<Self>) -> Rc<Snapshot<T>> {
        let value = self.value();
        if let Some(snapshot) = self.snapshot.borrow().as_ref()
            && snapshot.value == value
        {
            return Rc::clone(snapshot);
        }
        let snapshot = Rc::new(Snapshot::new(value, self.change_fn()));
        *self.snapshot.borrow_mut() = Some(Rc::clone(&snapshot));
        snapshot
    }

    /// The memoized view of this node through `lens`, created on first use.
    pub(crate) fn derive<X: State>(
        self: &Rc<Self>,
        kind: DerivedKind,
        address: usize,
        lens: impl FnOnce() -> Rc<dyn Lens<T, X>>,
    ) -> Rc<Node<X>> {
        let existing = self.derived.borrow().iter().find_map(|derived| {
            (derived.kind == kind && derived.address == address)
                .then(|| Rc::clone(&derived.node).downcast::<Node<X>>().ok())
                .flatten()
        });
        if let Some(node) = existing {
            return node;
        }

        let lens = lens();
        let initial = lens.view(&self.value());
        let source = LensSource::new(Rc::downgrade(self), lens);
        let node = Node::new(self.path.clone(), Box::new(source), initial);
        self.derived.borrow_mut().push(Derived {
            kind,
            address,
            node: Rc::clone(&node) as Rc<dyn Any>,
            reconcile: Rc::clone(&node) as Rc<dyn Reconcile>,
        });
        node
    }
}

impl<T: State> Reconcile for Node<T> {
    fn notify_if_changed(&self) {
        if self.writing.get() {
            return;
        }
        let current = self.value();
        let previous = self.baseline.replace(current.clone());
        if previous == current {
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(path = %self.path, "reconciled stale controller");
        self.propagate(previous);
    }

    fn remove_all_change_listeners(&self, tag: Option<&ListenerTag>) {
        self.listeners.borrow_mut().remove_tagged(tag);
        for dependent in self.dependents() {
            dependent.remove_all_change_listeners(tag);
        }
    }
}

impl Node<Value> {
    /// The memoized child at `step`.
    pub(crate) fn child(self: &Rc<Self>, step: Step) -> Rc<Self> {
        let existing = self.navigation.children.borrow().get(&step).cloned();
        if let Some(child) = existing {
            return child;
        }
        let path = self.path.child(step.clone());
        let source = StepSource::new(Rc::downgrade(self), step.clone());
        let initial = source.read().unwrap_or_default();
        let child = Self::new(path, Box::new(source), initial);
        self.navigation
            .children
            .borrow_mut()
            .insert(step, Rc::clone(&child));
        child
    }

    /// This node for [`Target::This`], the memoized child otherwise.
    pub(crate) fn resolve(self: &Rc<Self>, target: Target) -> Rc<Self> {
        match target {
            Target::This => Rc::clone(self),
            Target::Key(key) => self.child(Step::Key(key)),
            Target::Index(index) => self.child(Step::Index(index)),
        }
    }

    /// A fresh `push_new` placeholder below this node.
    pub(crate) fn placeholder(self: &Rc<Self>) -> Rc<Self> {
        let index = PlaceholderSlot::default();
        let source = PlaceholderSource::new(Rc::downgrade(self), Rc::clone(&index));
        let placeholder = Self::new(self.path.clone(), Box::new(source), Value::Null);
        self.navigation.placeholders.borrow_mut().push(Placeholder {
            node: Rc::downgrade(&placeholder),
            index,
        });
        placeholder
    }

    /// Moves committed placeholders past the elements at `removed` (in
    /// ascending order). A placeholder whose own element was removed goes
    /// back to uncommitted.
    pub(crate) fn placeholders_after_removal(&self, removed: &[usize]) {
        self.reindex_placeholders(|index| {
            if removed.binary_search(&index).is_ok() {
                None
            } else {
                Some(index - removed.partition_point(|&gone| gone < index))
            }
        });
    }

    /// Moves committed placeholders after `deleted` elements at `start` were
    /// replaced by `inserted` new ones. `start` and `deleted` must already be
    /// clamped to the array.
    pub(crate) fn placeholders_after_splice(&self, start: usize, deleted: usize, inserted: usize) {
        self.reindex_placeholders(|index| {
            if index < start {
                Some(index)
            } else if index < start + deleted {
                None
            } else {
                Some(index - deleted + inserted)
            }
        });
    }

    fn reindex_placeholders(&self, remap: impl Fn(usize) -> Option<usize>) {
        for placeholder in self.navigation.placeholders.borrow().iter() {
            if let Some(index) = placeholder.index.get() {
                placeholder.index.set(remap(index));
            }
        }
    }

    /// The memoized change function for the child at `step`.
    pub(crate) fn step_change_fn(self: &Rc<Self>, step: Step) -> ChangeFn<Value> {
        if let Some(change) = self.navigation.step_changes.borrow().get(&step) {
            return Rc::clone(change);
        }
        let node = Rc::downgrade(self);
        let target = step.clone();
        let change: ChangeFn<Value> = Rc::new(move |value: Value| {
            if let Some(node) = node.upgrade() {
                node.child(target.clone()).write(value);
            }
        });
        self.navigation
            .step_changes
            .borrow_mut()
            .insert(step, Rc::clone(&change));
        change
    }

    /// The memoized toggle function for `target`.
    pub(crate) fn toggle_fn(self: &Rc<Self>, target: Target) -> ToggleFn {
        if let Some(toggle) = self.navigation.toggles.borrow().get(&target) {
            return Rc::clone(toggle);
        }
        let node = Rc::downgrade(self);
        let destination = target.clone();
        let toggle: ToggleFn = Rc::new(move || {
            if let Some(node) = node.upgrade() {
                let flipped = node.resolve(destination.clone());
                let current = flipped.value();
                flipped.write(Value::Bool(!current.is_truthy()));
            }
        });
        self.navigation
            .toggles
            .borrow_mut()
            .insert(target, Rc::clone(&toggle));
        toggle
    }

    pub(crate) fn install_getter(&self, name: String, getter: Interceptor) {
        self.navigation.getters.borrow_mut().insert(name, getter);
    }

    /// Installs a setter and forgets the cached change function for `name`,
    /// so bindings that re-fetch it see a new identity.
    pub(crate) fn install_setter(&self, name: String, setter: Interceptor) {
        self.navigation
            .step_changes
            .borrow_mut()
            .remove(&Step::Key(name.clone()));
        self.navigation.setters.borrow_mut().insert(name, setter);
    }

    pub(crate) fn intercept_read(&self, step: &Step, value: Value) -> Value {
        Self::intercept(&self.navigation.getters, step, value)
    }

    pub(crate) fn intercept_write(&self, step: &Step, value: Value) -> Value {
        Self::intercept(&self.navigation.setters, step, value)
    }

    fn intercept(
        interceptors: &RefCell<FxHashMap<String, Interceptor>>,
        step: &Step,
        value: Value,
    ) -> Value {
        let interceptor = step
            .as_key()
            .and_then(|key| interceptors.borrow().get(key).cloned());
        match interceptor {
            Some(interceptor) => interceptor(value),
            None => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::source::AccessorSource;
    use crate::value;

    fn root(initial: Value) -> (Rc<Node<Value>>, Rc<RefCell<Value>>) {
        let cell = Rc::new(RefCell::new(initial.clone()));
        let read = Rc::clone(&cell);
        let write = Rc::clone(&cell);
        let source = AccessorSource::new(
            move || read.borrow().clone(),
            move |value| *write.borrow_mut() = value,
        );
        (Node::new(Path::root(), Box::new(source), initial), cell)
    }

    #[test]
    fn test_child_is_memoized() {
        let (node, _) = root(value!({ "a": 1 }));
        assert!(Rc::ptr_eq(&node.child(Step::key("a")), &node.child(Step::key("a"))));
        assert_eq!(node.child(Step::key("a")).path(), &Path::root().key("a"));
    }

    #[test]
    fn test_child_write_rebuilds_parent() {
        let (node, cell) = root(value!({ "a": 1, "b": 2 }));
        node.child(Step::key("a")).write(value!(10));
        assert_eq!(*cell.borrow(), value!({ "a": 10, "b": 2 }));
    }

    #[test]
    fn test_remove_without_parent_reports_nothing_removed() {
        let (node, cell) = root(value!({ "a": 1 }));
        let child = node.child(Step::key("a"));
        drop(node);

        assert!(!child.remove());
        assert_eq!(*cell.borrow(), value!({ "a": 1 }));
    }

    #[test]
    fn test_flag_guard_restores_previous_state() {
        let flag = Cell::new(false);
        {
            let _outer = FlagGuard::raise(&flag);
            {
                let _inner = FlagGuard::raise(&flag);
                assert!(flag.get());
            }
            assert!(flag.get());
        }
        assert!(!flag.get());
    }

    #[test]
    fn test_notify_if_changed_is_silent_when_unchanged() {
        let (node, _) = root(value!(1));
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        node.add_listener(
            Rc::new(move |_: &Value, _: &Value| counter.set(counter.get() + 1)),
            ListenerTag::default(),
        );

        node.notify_if_changed();
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_notify_if_changed_fires_after_external_change() {
        let (node, cell) = root(value!(1));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        node.add_listener(
            Rc::new(move |current: &Value, previous: &Value| {
                sink.borrow_mut().push((current.clone(), previous.clone()));
            }),
            ListenerTag::default(),
        );

        *cell.borrow_mut() = value!(2);
        node.notify_if_changed();
        assert_eq!(*seen.borrow(), vec![(value!(2), value!(1))]);
    }

    #[test]
    fn test_dead_placeholders_are_pruned() {
        let (node, _) = root(value!([]));
        drop(node.placeholder());
        let _alive = node.placeholder();
        assert_eq!(node.dependents().len(), 1);
        assert_eq!(node.navigation.placeholders.borrow().len(), 1);
    }

    fn committed(node: &Rc<Node<Value>>, count: usize) -> Vec<Rc<Node<Value>>> {
        (0..count)
            .map(|index| {
                let placeholder = node.placeholder();
                placeholder.write(Value::from(index));
                placeholder
            })
            .collect()
    }

    fn indices(node: &Node<Value>) -> Vec<Option<usize>> {
        node.navigation
            .placeholders
            .borrow()
            .iter()
            .map(|placeholder| placeholder.index.get())
            .collect()
    }

    #[test]
    fn test_placeholders_after_removal_shift_down() {
        let (node, _) = root(value!([]));
        let _placeholders = committed(&node, 5);

        node.placeholders_after_removal(&[1, 3]);

        assert_eq!(indices(&node), vec![Some(0), None, Some(1), None, Some(2)]);
    }

    #[test]
    fn test_placeholders_after_splice_shift_by_difference() {
        let (node, _) = root(value!([]));
        let _placeholders = committed(&node, 4);

        node.placeholders_after_splice(1, 1, 3);

        assert_eq!(indices(&node), vec![Some(0), None, Some(4), Some(5)]);
    }
}
