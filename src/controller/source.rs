//! Sources: where a controller's value comes from and where writes go.
//!
//! Every node owns exactly one [`Source`]. Roots read and write caller-owned
//! state; every other source reads its parent node and writes back into it
//! by rebuilding the parent's value with a lens.

use std::fmt;
use std::rc::{Rc, Weak};

use super::State;
use super::node::{Node, PlaceholderSlot};
use crate::optics::{Lens, Step};
use crate::value::Value;

/// A function proposing a replacement value.
pub type ChangeFn<T> = Rc<dyn Fn(T)>;

/// A function flipping a value's truthiness.
pub type ToggleFn = Rc<dyn Fn()>;

/// A value as of now, plus the operation "propose a replacement".
///
/// Snapshots are not live. A controller hands out the same `Rc<Snapshot>`
/// for as long as its value is unchanged, so pointer equality on snapshots is
/// a cheap "did it change" check.
pub struct Snapshot<T> {
    /// The value when the snapshot was taken.
    pub value: T,
    /// Writes a replacement value.
    pub change: ChangeFn<T>,
}

impl<T> Snapshot<T> {
    /// Creates a snapshot.
    pub fn new(value: T, change: ChangeFn<T>) -> Self {
        Self { value, change }
    }

    /// Proposes `value` as the replacement.
    pub fn propose(&self, value: T) {
        (self.change)(value);
    }
}

impl<T: fmt::Debug> fmt::Debug for Snapshot<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Snapshot")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// The single point of contact between a node and its backing data.
pub(crate) trait Source<T> {
    /// Reads the current value, or `None` when the source has lost the
    /// parent it reads from.
    fn read(&self) -> Option<T>;

    /// Replaces the value.
    fn write(&self, value: T);

    /// Deletes the value from its container. Returns `false` when this source
    /// has no container to delete from.
    fn remove(&self) -> bool {
        false
    }
}

/// A root source over a getter/setter pair.
pub(crate) struct AccessorSource<T> {
    read: Box<dyn Fn() -> T>,
    write: Box<dyn Fn(T)>,
}

impl<T> AccessorSource<T> {
    pub(crate) fn new(read: impl Fn() -> T + 'static, write: impl Fn(T) + 'static) -> Self {
        Self {
            read: Box::new(read),
            write: Box::new(write),
        }
    }
}

impl<T> Source<T> for AccessorSource<T> {
    fn read(&self) -> Option<T> {
        Some((self.read)())
    }

    fn write(&self, value: T) {
        (self.write)(value);
    }
}

/// A root source over a function producing a fresh [`Snapshot`] per call.
pub(crate) struct SnapshotSource<T> {
    snapshot: Box<dyn Fn() -> Snapshot<T>>,
}

impl<T> SnapshotSource<T> {
    pub(crate) fn new(snapshot: impl Fn() -> Snapshot<T> + 'static) -> Self {
        Self {
            snapshot: Box::new(snapshot),
        }
    }
}

impl<T> Source<T> for SnapshotSource<T> {
    fn read(&self) -> Option<T> {
        Some((self.snapshot)().value)
    }

    fn write(&self, value: T) {
        (self.snapshot)().propose(value);
    }
}

/// A key or index below a `Value` node.
///
/// Reads pass through the parent's getter for the key, writes through its
/// setter, then rebuild the parent's current value with the step replaced.
pub(crate) struct StepSource {
    parent: Weak<Node<Value>>,
    step: Step,
}

impl StepSource {
    pub(crate) const fn new(parent: Weak<Node<Value>>, step: Step) -> Self {
        Self { parent, step }
    }
}

impl Source<Value> for StepSource {
    fn read(&self) -> Option<Value> {
        let parent = self.parent.upgrade()?;
        let raw = self.step.view(&parent.value());
        Some(parent.intercept_read(&self.step, raw))
    }

    fn write(&self, value: Value) {
        let Some(parent) = self.parent.upgrade() else {
            #[cfg(feature = "tracing")]
            tracing::warn!(step = %self.step, "write dropped: parent controller is gone");
            return;
        };
        let value = parent.intercept_write(&self.step, value);
        let rebuilt = self.step.set(&parent.value(), value);
        parent.write(rebuilt);
    }

    fn remove(&self) -> bool {
        let Some(parent) = self.parent.upgrade() else {
            #[cfg(feature = "tracing")]
            tracing::warn!(step = %self.step, "remove dropped: parent controller is gone");
            return false;
        };
        if let Step::Index(index) = self.step {
            parent.placeholders_after_removal(&[index]);
        }
        let rebuilt = self.step.remove(&parent.value());
        parent.write(rebuilt);
        true
    }
}

/// A derived view of a parent node through a lens (used for transforms and
/// typed focus).
pub(crate) struct LensSource<S: State, X> {
    parent: Weak<Node<S>>,
    lens: Rc<dyn Lens<S, X>>,
}

impl<S: State, X> LensSource<S, X> {
    pub(crate) fn new(parent: Weak<Node<S>>, lens: Rc<dyn Lens<S, X>>) -> Self {
        Self { parent, lens }
    }
}

impl<S: State, X> Source<X> for LensSource<S, X> {
    fn read(&self) -> Option<X> {
        let parent = self.parent.upgrade()?;
        Some(self.lens.view(&parent.value()))
    }

    fn write(&self, value: X) {
        let Some(parent) = self.parent.upgrade() else {
            #[cfg(feature = "tracing")]
            tracing::warn!("write dropped: parent controller is gone");
            return;
        };
        let rebuilt = self.lens.set(&parent.value(), value);
        parent.write(rebuilt);
    }
}

/// The not-yet-pushed element returned by `push_new`.
///
/// Reads `Null` until the first write, which appends to the parent array and
/// remembers the index; later writes replace that element. The parent shifts
/// the remembered index when its own array operations remove or insert
/// elements before it.
pub(crate) struct PlaceholderSource {
    parent: Weak<Node<Value>>,
    index: PlaceholderSlot,
}

impl PlaceholderSource {
    pub(crate) const fn new(parent: Weak<Node<Value>>, index: PlaceholderSlot) -> Self {
        Self { parent, index }
    }
}

impl Source<Value> for PlaceholderSource {
    fn read(&self) -> Option<Value> {
        let parent = self.parent.upgrade()?;
        Some(
            self.index
                .get()
                .map_or(Value::Null, |index| parent.value().index(index)),
        )
    }

    fn write(&self, value: Value) {
        let Some(parent) = self.parent.upgrade() else {
            #[cfg(feature = "tracing")]
            tracing::warn!("write dropped: array controller is gone");
            return;
        };
        let current = parent.value();
        let rebuilt = match self.index.get() {
            Some(index) => current.with_index(index, value),
            None => {
                let index = current.as_array().map_or(0, <[Value]>::len);
                self.index.set(Some(index));
                current.with_pushed(value)
            }
        };
        parent.write(rebuilt);
    }

    fn remove(&self) -> bool {
        let Some(parent) = self.parent.upgrade() else {
            #[cfg(feature = "tracing")]
            tracing::warn!("remove dropped: array controller is gone");
            return false;
        };
        let Some(index) = self.index.take() else {
            return false;
        };
        parent.placeholders_after_removal(&[index]);
        let rebuilt = parent.value().without_index(index);
        parent.write(rebuilt);
        true
    }
}
