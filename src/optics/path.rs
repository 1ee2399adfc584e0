//! Paths: sequences of steps from a root value.
//!
//! A [`Path`] records where a controller sits in its tree and is itself a
//! [`Lens`] over [`Value`], so `path.set(&root, v)` performs the same chain of
//! copy-on-write reconstructions a write through the controller at that path
//! performs.

use std::fmt;

use super::{Lens, Step};
use crate::value::Value;

/// A location inside a structured value, as a list of steps from the root.
///
/// # Examples
///
/// ```
/// use controllens::optics::{Lens, Path};
/// use controllens::value;
///
/// let path = Path::root().key("child").key("name");
/// let built = path.set(&value!({}), value!("Patrick"));
///
/// assert_eq!(built, value!({ "child": { "name": "Patrick" } }));
/// assert_eq!(path.to_string(), "$.child.name");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path(Vec<Step>);

impl Path {
    /// The empty path.
    #[inline]
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns this path extended by `step`.
    #[must_use]
    pub fn child(&self, step: Step) -> Self {
        let mut steps = self.0.clone();
        steps.push(step);
        Self(steps)
    }

    /// Returns this path extended by a key step.
    #[must_use]
    pub fn key(self, key: impl Into<String>) -> Self {
        self.child(Step::Key(key.into()))
    }

    /// Returns this path extended by an index step.
    #[must_use]
    pub fn index(self, index: usize) -> Self {
        self.child(Step::Index(index))
    }

    /// The steps in order from the root.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Lens<Value, Value> for Path {
    fn view(&self, source: &Value) -> Value {
        self.0
            .iter()
            .fold(source.clone(), |current, step| step.view(&current))
    }

    fn set(&self, source: &Value, value: Value) -> Value {
        match self.0.split_first() {
            None => value,
            Some((head, rest)) => {
                let child = head.view(source);
                let rebuilt = Self(rest.to_vec()).set(&child, value);
                head.set(source, rebuilt)
            }
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("$")?;
        for step in &self.0 {
            write!(formatter, "{step}")?;
        }
        Ok(())
    }
}

impl FromIterator<Step> for Path {
    fn from_iter<I: IntoIterator<Item = Step>>(iterator: I) -> Self {
        Self(iterator.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    #[test]
    fn test_root_display() {
        assert_eq!(Path::root().to_string(), "$");
        assert_eq!(Path::root().key("items").index(2).to_string(), "$.items[2]");
    }

    #[test]
    fn test_view_through_missing_levels_is_null() {
        let path = Path::root().key("a").index(3).key("b");
        assert_eq!(path.view(&value!({ "a": [] })), Value::Null);
    }

    #[test]
    fn test_set_shares_untouched_branches() {
        let root = value!({ "left": { "x": 1 }, "right": { "y": 2 } });
        let updated = Path::root().key("left").key("x").set(&root, value!(5));

        assert_eq!(updated.key("left"), value!({ "x": 5 }));
        assert!(updated.key("right").same(&root.key("right")));
        assert_eq!(root.key("left"), value!({ "x": 1 }));
    }

    #[test]
    fn test_empty_path_replaces_whole_value() {
        assert_eq!(Path::root().set(&value!(1), value!(2)), value!(2));
    }
}
