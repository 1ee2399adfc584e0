//! Change listener registration.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

/// A change listener, called with `(current, previous)` after a write.
///
/// Listeners are compared by allocation, so keep the `Rc` you registered to
/// remove it later.
pub type Listener<T> = Rc<dyn Fn(&T, &T)>;

/// Wraps a closure into a [`Listener`].
///
/// ```
/// use controllens::controller::listener;
/// use controllens::value::Value;
///
/// let log = listener(|current: &Value, previous: &Value| println!("{previous} -> {current}"));
/// # let _ = log;
/// ```
pub fn listener<T, F>(function: F) -> Listener<T>
where
    F: Fn(&T, &T) + 'static,
{
    Rc::new(function)
}

/// Groups listeners so one subsystem can remove all of its registrations at
/// once.
///
/// `ListenerTag::default()` is the tag to pass when a listener belongs to no
/// particular group; it renders as `"default"`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ListenerTag(Cow<'static, str>);

impl ListenerTag {
    /// Creates a tag.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The tag's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for ListenerTag {
    fn default() -> Self {
        Self(Cow::Borrowed("default"))
    }
}

impl fmt::Debug for ListenerTag {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("ListenerTag").field(&self.0).finish()
    }
}

impl From<&'static str> for ListenerTag {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for ListenerTag {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

struct Entry<T> {
    listener: Listener<T>,
    tag: ListenerTag,
}

/// Listeners of one controller, in registration order.
pub(crate) struct Listeners<T> {
    entries: SmallVec<[Entry<T>; 2]>,
}

impl<T> Listeners<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }

    pub(crate) fn add(&mut self, listener: Listener<T>, tag: ListenerTag) {
        self.entries.push(Entry { listener, tag });
    }

    /// Removes the most recent registration of `listener`.
    pub(crate) fn remove(&mut self, listener: &Listener<T>) -> bool {
        let position = self
            .entries
            .iter()
            .rposition(|entry| std::ptr::addr_eq(Rc::as_ptr(&entry.listener), Rc::as_ptr(listener)));
        position.map(|position| self.entries.remove(position)).is_some()
    }

    /// Removes every listener with `tag`, or every listener when `tag` is
    /// `None`. Returns how many were removed.
    pub(crate) fn remove_tagged(&mut self, tag: Option<&ListenerTag>) -> usize {
        let before = self.entries.len();
        match tag {
            Some(tag) => self.entries.retain(|entry| entry.tag != *tag),
            None => self.entries.clear(),
        }
        before - self.entries.len()
    }

    /// Delivery order: most recently added first.
    pub(crate) fn delivery_order(&self) -> SmallVec<[Listener<T>; 4]> {
        self.entries
            .iter()
            .rev()
            .map(|entry| Rc::clone(&entry.listener))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
