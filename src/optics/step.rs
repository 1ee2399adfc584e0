//! Single navigation steps into a [`Value`].
//!
//! A [`Step`] is either an object key or an array index. Each step is a
//! [`Lens`] over `Value`: viewing never fails (anything missing reads as
//! `Null`) and setting never fails (missing containers are synthesized). An
//! index write further than [`MAX_INDEX_PADDING`] past the end of the array
//! leaves the source unchanged.
//! [`Target`] adds the identity step used by controller entry points.

use std::fmt;

use super::Lens;
use crate::value::Value;
#[cfg(doc)]
use crate::value::MAX_INDEX_PADDING;

/// One step of navigation into a structured value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    /// Object property access.
    Key(String),
    /// Array element access.
    Index(usize),
}

impl Step {
    /// Creates a key step.
    #[inline]
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    /// Creates an index step.
    #[inline]
    #[must_use]
    pub const fn index(index: usize) -> Self {
        Self::Index(index)
    }

    /// Returns the key if this is a key step.
    #[inline]
    #[must_use]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(key) => Some(key),
            Self::Index(_) => None,
        }
    }

    /// Returns a copy of `source` with the focused part deleted: the key is
    /// dropped from an object, the element is spliced out of an array.
    #[must_use]
    pub fn remove(&self, source: &Value) -> Value {
        match self {
            Self::Key(key) => source.without_key(key),
            Self::Index(index) => source.without_index(*index),
        }
    }
}

impl Lens<Value, Value> for Step {
    fn view(&self, source: &Value) -> Value {
        match self {
            Self::Key(key) => source.key(key),
            Self::Index(index) => source.index(*index),
        }
    }

    fn set(&self, source: &Value, value: Value) -> Value {
        match self {
            Self::Key(key) => source.with_key(key, value),
            Self::Index(index) => source.with_index(*index, value),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(formatter, ".{key}"),
            Self::Index(index) => write!(formatter, "[{index}]"),
        }
    }
}

impl From<&str> for Step {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<String> for Step {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for Step {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Where a controller operation applies: the controller itself or one step
/// below it.
///
/// Strings convert to [`Target::Key`] and `usize` to [`Target::Index`];
/// [`Target::This`] has to be spelled out.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    /// The controller itself.
    #[default]
    This,
    /// A named property.
    Key(String),
    /// An array element.
    Index(usize),
}

impl Target {
    /// The step this target navigates, or `None` for [`Target::This`].
    #[must_use]
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::This => None,
            Self::Key(key) => Some(Step::Key(key.clone())),
            Self::Index(index) => Some(Step::Index(*index)),
        }
    }
}

impl From<Step> for Target {
    fn from(step: Step) -> Self {
        match step {
            Step::Key(key) => Self::Key(key),
            Step::Index(index) => Self::Index(index),
        }
    }
}

impl From<&str> for Target {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<String> for Target {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for Target {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}
