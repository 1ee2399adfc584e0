//! Functions creating root controllers.
//!
//! A root controller needs somewhere to read its value from and somewhere to
//! write it to. The creators here cover the usual arrangements: a
//! getter/setter pair, a function producing [`Snapshot`]s, a shared mutable
//! cell, and a private copy owned by the controller.

use std::cell::RefCell;
use std::rc::Rc;

use crate::controller::{AccessorSource, Controller, Snapshot, SnapshotSource, State};

/// A controller reading through `read` and writing through `write`.
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use controllens::creators::controller_from_accessors;
/// use controllens::value;
///
/// let store = Rc::new(RefCell::new(value!({ "count": 1 })));
/// let (reader, writer) = (Rc::clone(&store), Rc::clone(&store));
/// let root = controller_from_accessors(
///     move || reader.borrow().clone(),
///     move |value| *writer.borrow_mut() = value,
/// );
///
/// root.get("count").set_value(value!(2));
/// assert_eq!(*store.borrow(), value!({ "count": 2 }));
/// ```
pub fn controller_from_accessors<T: State>(
    read: impl Fn() -> T + 'static,
    write: impl Fn(T) + 'static,
) -> Controller<T> {
    let initial = read();
    Controller::root(AccessorSource::new(read, write), initial)
}

/// A controller over a function returning a fresh [`Snapshot`] on every call.
///
/// Reads use the snapshot's value; writes go to the change function of a
/// snapshot taken at write time.
pub fn controller_from_source<T: State>(
    source: impl Fn() -> Snapshot<T> + 'static,
) -> Controller<T> {
    let initial = source().value;
    Controller::root(SnapshotSource::new(source), initial)
}

/// A controller over a shared cell.
///
/// Writes replace the cell's contents in place, so every other holder of the
/// `Rc` sees them. Values inside stay immutable: the cell holds a new value
/// after each write, the previous one is left as it was.
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use controllens::creators::controller_from_mutable_value;
/// use controllens::value;
///
/// let shared = Rc::new(RefCell::new(value!({ "a": "Hello world" })));
/// let root = controller_from_mutable_value(Rc::clone(&shared));
///
/// root.get("a").set_value(value!("Bye"));
/// assert_eq!(*shared.borrow(), value!({ "a": "Bye" }));
/// ```
pub fn controller_from_mutable_value<T: State>(cell: Rc<RefCell<T>>) -> Controller<T> {
    let reader = Rc::clone(&cell);
    controller_from_accessors(
        move || reader.borrow().clone(),
        move |value| *cell.borrow_mut() = value,
    )
}

/// A controller owning its value.
///
/// Nothing outside the controller aliases the stored value; read it back
/// with [`Controller::value`].
///
/// ```
/// use controllens::creators::controller_from_initial_value;
/// use controllens::value;
///
/// let original = value!({ "a": "Hello world" });
/// let root = controller_from_initial_value(original.clone());
///
/// root.get("a").set_value(value!("Bye"));
/// assert_eq!(root.value(), value!({ "a": "Bye" }));
/// assert_eq!(original, value!({ "a": "Hello world" }));
/// ```
pub fn controller_from_initial_value<T: State>(initial: T) -> Controller<T> {
    controller_from_mutable_value(Rc::new(RefCell::new(initial)))
}
