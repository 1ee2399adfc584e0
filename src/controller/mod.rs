//! Live, composable accessors over a piece of state.
//!
//! A [`Controller`] reads and writes one value. Controllers over a
//! [`Value`] navigate into it: [`Controller::get`] derives a child controller
//! for a key or index, and writes through the child rebuild every ancestor
//! copy-on-write, ending in the root's writer. The original data is never
//! modified in place.
//!
//! Derived controllers are memoized, so the same navigation always yields the
//! same controller, and change functions and snapshots stay referentially
//! stable for as long as the value they describe is unchanged.
//!
//! # Examples
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use controllens::controller::{listener, ListenerTag};
//! use controllens::creators::controller_from_initial_value;
//! use controllens::value;
//!
//! let original = value!({ "a": "Hello world" });
//! let root = controller_from_initial_value(original.clone());
//!
//! let notified = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&notified);
//! root.add_change_listener(
//!     listener(move |_, _| counter.set(counter.get() + 1)),
//!     ListenerTag::default(),
//! );
//!
//! root.get("a").set_value(value!("Bye"));
//!
//! assert_eq!(root.value(), value!({ "a": "Bye" }));
//! assert_eq!(original, value!({ "a": "Hello world" }));
//! assert_eq!(notified.get(), 1);
//! assert!(root.get("a").ptr_eq(&root.get("a")));
//! ```

mod array;
mod error;
mod listener;
mod navigation;
mod node;
mod source;

use std::any::Any;
use std::fmt;
use std::rc::Rc;

pub use array::ElementPredicate;
pub use error::{ControllerError, ControllerResult};
pub use listener::{Listener, ListenerTag, listener};
pub use source::{ChangeFn, Snapshot, ToggleFn};

pub(crate) use source::{AccessorSource, SnapshotSource, Source};

use node::{DerivedKind, Node};

use crate::optics::{Lens, Path, Transform, TransformAsLens};
#[cfg(doc)]
use crate::value::Value;

/// Anything a controller can hold.
///
/// Values are compared with `PartialEq` to decide whether a change happened,
/// and cloned whenever they are handed out.
pub trait State: Clone + PartialEq + 'static {}

impl<T: Clone + PartialEq + 'static> State for T {}

/// A live accessor over a value of type `T`.
///
/// Cloning a controller clones the handle; both handles refer to the same
/// node. Every handle keeps the whole controller tree it belongs to alive.
pub struct Controller<T: State> {
    node: Rc<Node<T>>,
    anchor: Rc<dyn Any>,
}

static_assertions::assert_not_impl_any!(Controller<crate::value::Value>: Send, Sync);

impl<T: State> Controller<T> {
    /// Wraps a root node; the node anchors its own tree.
    pub(crate) fn root(source: impl Source<T> + 'static, initial: T) -> Self {
        let node = Node::new(Path::root(), Box::new(source), initial);
        let anchor = Rc::clone(&node) as Rc<dyn Any>;
        Self { node, anchor }
    }

    /// A handle on another node of the same tree.
    fn adopt<X: State>(&self, node: Rc<Node<X>>) -> Controller<X> {
        Controller {
            node,
            anchor: Rc::clone(&self.anchor),
        }
    }

    /// A handle on `node` that also keeps `node` alive, for nodes the tree
    /// refers to only weakly. Handles derived from it inherit the anchor.
    fn adopt_owned<X: State>(&self, node: Rc<Node<X>>) -> Controller<X> {
        let owned = Rc::clone(&node) as Rc<dyn Any>;
        Controller {
            node,
            anchor: Rc::new((Rc::clone(&self.anchor), owned)),
        }
    }

    /// Where this controller sits below its root.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.node.path()
    }

    /// Returns `true` when both handles refer to the same controller.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// The current value.
    ///
    /// As long as the underlying value is unchanged, repeated calls return the
    /// same instance (for [`Value`] containers, the same allocation).
    #[must_use]
    pub fn value(&self) -> T {
        self.node.value()
    }

    /// Replaces the value and notifies listeners.
    pub fn set_value(&self, value: T) {
        self.node.write(value);
    }

    /// Replaces the value with `update(current)`.
    ///
    /// `update` receives what the source reports right now, not a cached copy,
    /// so read-modify-write sequences never work on stale data.
    ///
    /// ```
    /// use controllens::creators::controller_from_initial_value;
    ///
    /// let counter = controller_from_initial_value(41_i64);
    /// counter.update(|count| count + 1);
    /// assert_eq!(counter.value(), 42);
    /// ```
    pub fn update(&self, update: impl FnOnce(T) -> T) {
        let current = self.node.value();
        self.node.write(update(current));
    }

    /// The memoized whole-value snapshot.
    ///
    /// The same `Rc` is returned until the value changes.
    #[must_use]
    pub fn snapshot(&self) -> Rc<Snapshot<T>> {
        self.node.snapshot()
    }

    /// The memoized function replacing this controller's value.
    #[must_use]
    pub fn on_change(&self) -> ChangeFn<T> {
        self.node.change_fn()
    }

    /// Registers `listener` under `tag`.
    ///
    /// Listeners receive `(current, previous)` after every write that changes
    /// this controller's value, newest registration first. Pass
    /// [`ListenerTag::default()`] when the listener belongs to no group.
    pub fn add_change_listener(&self, listener: Listener<T>, tag: ListenerTag) {
        self.node.add_listener(listener, tag);
    }

    /// Removes the most recent registration of `listener`. Returns `false`
    /// when it was not registered here.
    pub fn remove_change_listener(&self, listener: &Listener<T>) -> bool {
        self.node.remove_listener(listener)
    }

    /// Removes listeners registered under `tag` (all listeners for `None`),
    /// here and in every memoized child and derived controller.
    pub fn remove_all_change_listeners(&self, tag: Option<&ListenerTag>) {
        node::Reconcile::remove_all_change_listeners(&*self.node, tag);
    }

    /// How many listeners are registered directly on this controller.
    #[must_use]
    pub fn change_listener_count(&self) -> usize {
        self.node.listener_count()
    }

    /// A controller over `transformer.to(value)`; writes go back through
    /// `transformer.from`.
    ///
    /// Memoized per transformer allocation: passing the same `Rc` again
    /// returns the same controller. The memo entry lives as long as this
    /// controller, so build the transformer once and reuse its `Rc`; a fresh
    /// `Rc::new(..)` per call (say, inside a render loop) adds a new derived
    /// controller every time.
    ///
    /// ```
    /// use std::rc::Rc;
    ///
    /// use controllens::creators::controller_from_initial_value;
    /// use controllens::optics::standard::number_string;
    /// use controllens::value;
    ///
    /// let age = controller_from_initial_value(value!("007"));
    /// let parsed = Rc::new(number_string());
    /// let number = age.transform(&parsed);
    ///
    /// assert_eq!(number.value(), value!(7));
    /// number.set_value(value!(8));
    /// assert_eq!(age.value(), value!("8"));
    /// assert!(number.ptr_eq(&age.transform(&parsed)));
    /// ```
    #[must_use]
    pub fn transform<X, Tr>(&self, transformer: &Rc<Tr>) -> Controller<X>
    where
        X: State,
        Tr: Transform<T, X> + ?Sized + 'static,
    {
        let address = Rc::as_ptr(transformer).cast::<()>().addr();
        let node = self.node.derive(DerivedKind::Transform, address, || {
            let lens = TransformAsLens::<Rc<Tr>, T, X>::new(Rc::clone(transformer));
            Rc::new(lens) as Rc<dyn Lens<T, X>>
        });
        self.adopt(node)
    }

    /// A controller over the part of the value `lens` focuses on.
    ///
    /// Memoized per lens allocation, like [`Controller::transform`].
    ///
    /// ```
    /// use std::rc::Rc;
    ///
    /// use controllens::creators::controller_from_initial_value;
    /// use controllens::lens;
    ///
    /// #[derive(Clone, PartialEq, Debug)]
    /// struct Account {
    ///     owner: String,
    ///     balance: i64,
    /// }
    ///
    /// let account = controller_from_initial_value(Account { owner: "Anne".into(), balance: 10 });
    /// let balance = account.focus(&Rc::new(lens!(Account, balance)));
    ///
    /// balance.update(|balance| balance + 5);
    /// assert_eq!(account.value().balance, 15);
    /// ```
    #[must_use]
    pub fn focus<X, L>(&self, lens: &Rc<L>) -> Controller<X>
    where
        X: State,
        L: Lens<T, X> + 'static,
    {
        let address = Rc::as_ptr(lens).addr();
        let node = self.node.derive(DerivedKind::Focus, address, || {
            Rc::clone(lens) as Rc<dyn Lens<T, X>>
        });
        self.adopt(node)
    }

    /// Deletes this controller's value from its parent: the key is dropped
    /// from an object, the element is spliced out of an array.
    ///
    /// # Errors
    ///
    /// [`ControllerError::UnsupportedOperation`] when this controller was not
    /// derived by key or index navigation (roots and transformed
    /// controllers), or is a `push_new` placeholder that was never written.
    pub fn remove(&self) -> ControllerResult<()> {
        if self.node.remove() {
            Ok(())
        } else {
            Err(ControllerError::UnsupportedOperation {
                operation: "remove",
                path: self.path().clone(),
            })
        }
    }
}

impl<T: State> Clone for Controller<T> {
    fn clone(&self) -> Self {
        Self {
            node: Rc::clone(&self.node),
            anchor: Rc::clone(&self.anchor),
        }
    }
}

impl<T: State> PartialEq for Controller<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T: State> Eq for Controller<T> {}

impl<T: State + fmt::Debug> fmt::Debug for Controller<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Controller")
            .field("path", &format_args!("{}", self.path()))
            .field("value", &self.value())
            .finish_non_exhaustive()
    }
}
