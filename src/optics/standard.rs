//! Standard transforms that are commonly used.
//!
//! Each function returns a fresh transform. Controllers memoize transformed
//! views per transformer *instance*, so wrap the result in an `Rc` once and
//! reuse that `Rc` to get the same derived controller back:
//!
//! ```
//! use std::rc::Rc;
//! use controllens::creators::controller_from_initial_value;
//! use controllens::optics::standard::number_string;
//! use controllens::value;
//!
//! let form = controller_from_initial_value(value!({ "age": "007" }));
//! let as_number = Rc::new(number_string());
//!
//! let age = form.get("age").transform(&as_number);
//! assert!(age.ptr_eq(&form.get("age").transform(&as_number)));
//! assert_eq!(age.value(), value!(7));
//! ```

use super::{FunctionTransform, Transform};
use crate::value::Value;

/// A transform that changes nothing.
///
/// # Example
///
/// ```
/// use controllens::optics::Transform;
/// use controllens::optics::standard::identity;
///
/// let same = identity::<i32>();
/// assert_eq!(same.to(42), 42);
/// assert_eq!(same.from(42), 42);
/// ```
#[must_use]
pub fn identity<T>() -> impl Transform<T, T> + Clone {
    FunctionTransform::new(|value: T| value, |value: T| value)
}

/// Strings holding numbers, viewed as numbers.
///
/// `to` parses a string (surrounding whitespace ignored) into a number and
/// passes numbers through; anything unparseable becomes `Null`. `from` formats
/// numbers back into strings, so the round trip is lossy: `"007"` comes back
/// as `"7"`.
///
/// ```
/// use controllens::optics::Transform;
/// use controllens::optics::standard::number_string;
/// use controllens::value;
///
/// let transform = number_string();
/// assert_eq!(transform.to(value!("007")), value!(7));
/// assert_eq!(transform.from(value!(7)), value!("7"));
/// assert_eq!(transform.to(value!("seven")), value!(null));
/// ```
#[must_use]
pub fn number_string() -> impl Transform<Value, Value> + Clone {
    FunctionTransform::new(
        |source: Value| match source {
            Value::String(text) => text.trim().parse::<f64>().map_or(Value::Null, Value::Number),
            number @ Value::Number(_) => number,
            _ => Value::Null,
        },
        |value: Value| match value {
            Value::Number(number) => Value::from(number.to_string()),
            other => other,
        },
    )
}

/// A value viewed as an optional number. Non-numbers read as `None`; writing
/// `None` stores `Null`.
#[must_use]
pub fn value_number() -> impl Transform<Value, Option<f64>> + Clone {
    FunctionTransform::new(|source: Value| source.as_f64(), Value::from)
}

/// A value viewed as text, the way a text input shows it: strings as they
/// are, `Null` as the empty string and other scalars in their display form.
#[must_use]
pub fn value_string() -> impl Transform<Value, String> + Clone {
    FunctionTransform::new(
        |source: Value| match source {
            Value::Null => String::new(),
            Value::String(text) => text.to_string(),
            other => other.to_string(),
        },
        Value::from,
    )
}

/// A value viewed as a checkbox state, using truthiness.
#[must_use]
pub fn value_bool() -> impl Transform<Value, bool> + Clone {
    FunctionTransform::new(|source: Value| source.is_truthy(), Value::from)
}
