//! Immutable structured values.
//!
//! [`Value`] is the data model every navigable controller works on: a small
//! JSON-like tree whose containers are reference counted and never mutated
//! after construction. All "modification" helpers return a new value and leave
//! the receiver untouched, so any `Value` that was handed out stays valid and
//! unchanged for as long as somebody holds it.
//!
//! # Examples
//!
//! ```
//! use controllens::value;
//! use controllens::value::Value;
//!
//! let person = value!({ "name": "Alice", "tags": ["admin"] });
//! let renamed = person.with_key("name", Value::from("Bob"));
//!
//! assert_eq!(person.key("name"), Value::from("Alice"));
//! assert_eq!(renamed.key("name"), Value::from("Bob"));
//! // The untouched branch is shared, not copied.
//! assert!(person.key("tags").same(&renamed.key("tags")));
//! ```

#[cfg(feature = "serde")]
mod serialization;

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// The most `Null` holes [`Value::with_index`] inserts to reach an index past
/// the end of an array.
pub const MAX_INDEX_PADDING: usize = 1 << 16;

/// The map type backing [`Value::Object`].
pub type Map = BTreeMap<String, Value>;

/// A structured, immutable value.
///
/// `Null` stands for both "absent" and "null": missing keys, out-of-range
/// indices and array holes all read as `Null`.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// No value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    String(Rc<str>),
    /// An ordered sequence of values.
    Array(Rc<Vec<Value>>),
    /// A string-keyed record.
    Object(Rc<Map>),
}

impl Value {
    /// Creates an empty object.
    #[must_use]
    pub fn object() -> Self {
        Self::Object(Rc::new(Map::new()))
    }

    /// Creates an empty array.
    #[must_use]
    pub fn array() -> Self {
        Self::Array(Rc::new(Vec::new()))
    }

    /// Creates an object from key/value pairs.
    ///
    /// ```
    /// use controllens::value::Value;
    ///
    /// let point = Value::from_entries([("x", Value::from(1)), ("y", Value::from(2))]);
    /// assert_eq!(point.key("y"), Value::from(2));
    /// ```
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Self)>,
    {
        entries.into_iter().collect()
    }

    /// Returns the name of this value's variant, as used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for arrays.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns `true` for objects.
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// JavaScript-style truthiness: `null`, `false`, `0`, `NaN` and `""` are
    /// falsy, everything else (including empty containers) is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(flag) => *flag,
            Self::Number(number) => *number != 0.0 && !number.is_nan(),
            Self::String(text) => !text.is_empty(),
            Self::Array(_) | Self::Object(_) => true,
        }
    }

    /// Returns the boolean, if this is one.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Returns the number, if this is one.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// Returns the number as an integer when it has no fractional part.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(number) if number.fract() == 0.0 && number.is_finite() => {
                Some(*number as i64)
            }
            _ => None,
        }
    }

    /// Returns the string slice, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(elements) => Some(elements),
            _ => None,
        }
    }

    /// Returns the entries, if this is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Identity comparison.
    ///
    /// Containers are the same only when they share their allocation; scalars
    /// compare by value. Two structurally equal but separately built arrays
    /// are `==` but not `same`.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Number(left), Self::Number(right)) => left == right,
            (Self::String(left), Self::String(right)) => left == right,
            (Self::Array(left), Self::Array(right)) => Rc::ptr_eq(left, right),
            (Self::Object(left), Self::Object(right)) => Rc::ptr_eq(left, right),
            _ => false,
        }
    }

    /// Reads a property. Anything but an object containing `key` reads `Null`.
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        match self {
            Self::Object(entries) => entries.get(key).cloned().unwrap_or_default(),
            _ => Self::Null,
        }
    }

    /// Reads an element. Anything but an array long enough reads `Null`.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        match self {
            Self::Array(elements) => elements.get(index).cloned().unwrap_or_default(),
            _ => Self::Null,
        }
    }

    /// Returns a copy of this object with `key` set to `value`.
    ///
    /// A `Null` (or any non-object) receiver yields a fresh single-key object,
    /// which is what lets nested structures be built up from nothing.
    #[must_use]
    pub fn with_key(&self, key: &str, value: Self) -> Self {
        let mut entries = match self {
            Self::Object(entries) => Map::clone(entries),
            _ => Map::new(),
        };
        entries.insert(key.to_owned(), value);
        Self::Object(Rc::new(entries))
    }

    /// Returns a copy of this object without `key`.
    ///
    /// Non-objects and objects lacking `key` are returned unchanged (same
    /// identity).
    #[must_use]
    pub fn without_key(&self, key: &str) -> Self {
        match self {
            Self::Object(entries) if entries.contains_key(key) => {
                let mut entries = Map::clone(entries);
                entries.remove(key);
                Self::Object(Rc::new(entries))
            }
            _ => self.clone(),
        }
    }

    /// Returns a copy of this array with element `index` set to `value`.
    ///
    /// A `Null` (or any non-array) receiver is treated as empty; missing
    /// positions before `index` are filled with `Null` holes. A write that
    /// would need more than [`MAX_INDEX_PADDING`] holes is dropped and the
    /// receiver is returned unchanged.
    ///
    /// ```
    /// use controllens::value;
    /// use controllens::value::Value;
    ///
    /// assert_eq!(Value::Null.with_index(1, value!("b")), value!([null, "b"]));
    ///
    /// let short = value!(["a"]);
    /// assert!(short.with_index(usize::MAX, value!("z")).same(&short));
    /// ```
    #[must_use]
    pub fn with_index(&self, index: usize, value: Self) -> Self {
        let length = self.as_array().map_or(0, <[Self]>::len);
        if index.saturating_sub(length) > MAX_INDEX_PADDING {
            #[cfg(feature = "tracing")]
            tracing::warn!(index, length, "index write dropped: too far past the end of the array");
            return self.clone();
        }
        let mut elements = self.to_elements();
        if index >= elements.len() {
            elements.resize(index + 1, Self::Null);
        }
        elements[index] = value;
        Self::Array(Rc::new(elements))
    }

    /// Returns a copy of this array without element `index`.
    ///
    /// Non-arrays and out-of-range indices are returned unchanged.
    #[must_use]
    pub fn without_index(&self, index: usize) -> Self {
        match self {
            Self::Array(elements) if index < elements.len() => {
                let mut elements = Vec::clone(elements);
                elements.remove(index);
                Self::Array(Rc::new(elements))
            }
            _ => self.clone(),
        }
    }

    /// Returns a copy of this array with `value` appended.
    #[must_use]
    pub fn with_pushed(&self, value: Self) -> Self {
        let mut elements = self.to_elements();
        elements.push(value);
        Self::Array(Rc::new(elements))
    }

    /// Array splice: removes `delete_count` elements starting at `start`,
    /// inserts `items` in their place, and returns the new array together with
    /// the removed elements.
    ///
    /// `start` and `delete_count` are clamped to the array bounds.
    ///
    /// ```
    /// use controllens::value;
    ///
    /// let names = value!(["Peter", "Janet", "Pam"]);
    /// let (rest, removed) = names.spliced(1, 1, Vec::new());
    /// assert_eq!(rest, value!(["Peter", "Pam"]));
    /// assert_eq!(removed, vec![value!("Janet")]);
    /// ```
    #[must_use]
    pub fn spliced(&self, start: usize, delete_count: usize, items: Vec<Self>) -> (Self, Vec<Self>) {
        let mut elements = self.to_elements();
        let start = start.min(elements.len());
        let end = start.saturating_add(delete_count).min(elements.len());
        let removed: Vec<Self> = elements.splice(start..end, items).collect();
        (Self::Array(Rc::new(elements)), removed)
    }

    fn to_elements(&self) -> Vec<Self> {
        match self {
            Self::Array(elements) => Vec::clone(elements),
            _ => Vec::new(),
        }
    }
}

impl PartialEq for Value {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Number(left), Self::Number(right)) => left == right,
            (Self::String(left), Self::String(right)) => left == right,
            (Self::Array(left), Self::Array(right)) => Rc::ptr_eq(left, right) || left == right,
            (Self::Object(left), Self::Object(right)) => Rc::ptr_eq(left, right) || left == right,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => formatter.write_str("null"),
            Self::Bool(flag) => write!(formatter, "{flag}"),
            Self::Number(number) => write!(formatter, "{number}"),
            Self::String(text) => write!(formatter, "{text:?}"),
            Self::Array(elements) => {
                formatter.write_str("[")?;
                for (position, element) in elements.iter().enumerate() {
                    if position > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{element}")?;
                }
                formatter.write_str("]")
            }
            Self::Object(entries) => {
                formatter.write_str("{")?;
                for (position, (key, value)) in entries.iter().enumerate() {
                    if position > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{key:?}: {value}")?;
                }
                formatter.write_str("}")
            }
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

impl From<f32> for Value {
    fn from(number: f32) -> Self {
        Self::Number(f64::from(number))
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Self::Number(f64::from(number))
    }
}

impl From<u32> for Value {
    fn from(number: u32) -> Self {
        Self::Number(f64::from(number))
    }
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(number: i64) -> Self {
        Self::Number(number as f64)
    }
}

impl From<usize> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(number: usize) -> Self {
        Self::Number(number as f64)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::String(Rc::from(text))
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::String(Rc::from(text))
    }
}

impl From<Rc<str>> for Value {
    fn from(text: Rc<str>) -> Self {
        Self::String(text)
    }
}

impl From<Vec<Self>> for Value {
    fn from(elements: Vec<Self>) -> Self {
        Self::Array(Rc::new(elements))
    }
}

impl From<Map> for Value {
    fn from(entries: Map) -> Self {
        Self::Object(Rc::new(entries))
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Null
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(option: Option<T>) -> Self {
        option.map_or(Self::Null, Into::into)
    }
}

impl FromIterator<Self> for Value {
    fn from_iter<I: IntoIterator<Item = Self>>(iterator: I) -> Self {
        Self::Array(Rc::new(iterator.into_iter().collect()))
    }
}

impl<K: Into<String>> FromIterator<(K, Self)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Self)>>(iterator: I) -> Self {
        Self::Object(Rc::new(
            iterator
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        ))
    }
}

/// Builds a [`Value`] from JSON-like syntax.
///
/// Object keys must be literals; nested arrays and objects are written inline.
/// Any other single token tree is converted with `Value::from`, so negative
/// numbers and arbitrary expressions need parentheses.
///
/// ```
/// use controllens::value;
/// use controllens::value::Value;
///
/// let name = "Julian";
/// let data = value!({ "names": [name, "Dick"], "count": 2, "missing": null, "delta": (-1) });
///
/// assert_eq!(data.key("names").index(1), Value::from("Dick"));
/// assert_eq!(data.key("missing"), Value::Null);
/// assert_eq!(data.key("delta"), Value::from(-1));
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::value::Value::Null
    };
    ([]) => {
        $crate::value::Value::array()
    };
    ([ $($element:tt),+ $(,)? ]) => {
        $crate::value::Value::from(vec![ $( $crate::value!($element) ),+ ])
    };
    ({}) => {
        $crate::value::Value::object()
    };
    ({ $($key:literal : $field:tt),+ $(,)? }) => {
        $crate::value::Value::from_entries([ $( ($key, $crate::value!($field)) ),+ ])
    };
    ($other:expr) => {
        $crate::value::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Null, false)]
    #[case(Value::from(false), false)]
    #[case(Value::from(0), false)]
    #[case(Value::from(f64::NAN), false)]
    #[case(Value::from(""), false)]
    #[case(Value::from(true), true)]
    #[case(Value::from(-3), true)]
    #[case(Value::from("no"), true)]
    #[case(Value::array(), true)]
    #[case(Value::object(), true)]
    fn test_truthiness(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(value.is_truthy(), expected);
    }

    #[test]
    fn test_with_key_leaves_receiver_untouched() {
        let original = value!({ "a": "Hello world" });
        let updated = original.with_key("a", Value::from("Bye"));

        assert_eq!(original, value!({ "a": "Hello world" }));
        assert_eq!(updated, value!({ "a": "Bye" }));
        assert!(!original.same(&updated));
    }

    #[test]
    fn test_with_key_on_null_synthesizes_object() {
        let built = Value::Null.with_key("name", Value::from("Patrick"));
        assert_eq!(built, value!({ "name": "Patrick" }));
    }

    #[test]
    fn test_with_index_on_null_fills_holes() {
        let built = Value::Null.with_index(2, Value::from("c"));
        assert_eq!(built, value!([null, null, "c"]));
    }

    #[test]
    fn test_with_index_past_end_pads() {
        let built = value!(["a"]).with_index(2, Value::from("c"));
        assert_eq!(built, value!(["a", null, "c"]));
    }

    #[rstest]
    #[case::far_past_end(MAX_INDEX_PADDING + 2)]
    #[case::largest_index(usize::MAX)]
    fn test_with_index_beyond_padding_limit_is_dropped(#[case] index: usize) {
        let original = value!(["a"]);
        assert!(original.with_index(index, Value::from("z")).same(&original));
    }

    #[test]
    fn test_with_index_at_padding_limit_pads() {
        let built = Value::Null.with_index(MAX_INDEX_PADDING, Value::from(true));
        let elements = built.as_array().unwrap_or_default();
        assert_eq!(elements.len(), MAX_INDEX_PADDING + 1);
        assert_eq!(elements[MAX_INDEX_PADDING], Value::from(true));
    }

    #[test]
    fn test_without_key_missing_keeps_identity() {
        let original = value!({ "a": 1 });
        assert!(original.without_key("b").same(&original));
        assert_eq!(original.without_key("a"), Value::object());
    }

    #[test]
    fn test_without_index() {
        let original = value!(["Peter", "Janet", "Pam"]);
        assert_eq!(original.without_index(0), value!(["Janet", "Pam"]));
        assert!(original.without_index(7).same(&original));
    }

    #[rstest]
    #[case(0, 0, value!(["a", "b", "c"]), vec![])]
    #[case(1, 1, value!(["a", "c"]), vec![value!("b")])]
    #[case(1, 99, value!(["a"]), vec![value!("b"), value!("c")])]
    #[case(99, 1, value!(["a", "b", "c"]), vec![])]
    fn test_spliced_clamps(
        #[case] start: usize,
        #[case] delete_count: usize,
        #[case] expected: Value,
        #[case] expected_removed: Vec<Value>,
    ) {
        let (rest, removed) = value!(["a", "b", "c"]).spliced(start, delete_count, Vec::new());
        assert_eq!(rest, expected);
        assert_eq!(removed, expected_removed);
    }

    #[test]
    fn test_spliced_inserts_items() {
        let (rest, removed) = value!(["a", "d"]).spliced(1, 0, vec![value!("b"), value!("c")]);
        assert_eq!(rest, value!(["a", "b", "c", "d"]));
        assert!(removed.is_empty());
    }

    #[test]
    fn test_equality_is_structural_and_same_is_identity() {
        let left = value!([1, 2]);
        let right = value!([1, 2]);
        assert_eq!(left, right);
        assert!(!left.same(&right));
        assert!(left.same(&left.clone()));
    }

    #[test]
    fn test_display_renders_json_like_text() {
        let data = value!({ "b": [1, 2.5, null], "a": "x", "c": true });
        assert_eq!(format!("{data}"), r#"{"a": "x", "b": [1, 2.5, null], "c": true}"#);
    }

    #[test]
    fn test_as_i64_only_for_integral_numbers() {
        assert_eq!(Value::from(7).as_i64(), Some(7));
        assert_eq!(Value::from(7.5).as_i64(), None);
        assert_eq!(Value::from("7").as_i64(), None);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }
}
