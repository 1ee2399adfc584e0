//! Error types for controller operations.
//!
//! Every error here reports a broken precondition at the call site: the
//! operation was asked of data with the wrong shape, or of a controller that
//! cannot perform it. Nothing is retried or swallowed.

use crate::optics::Path;
use crate::value::Value;

/// Result type alias for controller operations.
pub type ControllerResult<T> = Result<T, ControllerError>;

/// Errors returned by controller operations.
///
/// # Examples
///
/// ```rust
/// use controllens::ControllerError;
/// use controllens::creators::controller_from_initial_value;
/// use controllens::value;
///
/// let root = controller_from_initial_value(value!({ "name": "Julian" }));
/// let error = root.map(|child, _| child.value()).unwrap_err();
///
/// assert!(matches!(error, ControllerError::TypeMismatch { .. }));
/// assert_eq!(
///     error.to_string(),
///     r#"map at $: expected an array, found object {"name": "Julian"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerError {
    /// An array operation met a value that is neither an array nor `Null`.
    TypeMismatch {
        /// The operation that was attempted.
        operation: &'static str,
        /// Where the offending value lives.
        path: Path,
        /// The offending value.
        found: Value,
    },
    /// The controller cannot perform the operation, e.g. `remove` on a
    /// controller that was not derived by key or index navigation.
    UnsupportedOperation {
        /// The operation that was attempted.
        operation: &'static str,
        /// The controller's path.
        path: Path,
    },
    /// A required argument was not supplied.
    MissingArgument {
        /// The operation that was attempted.
        operation: &'static str,
        /// The name of the missing argument.
        argument: &'static str,
    },
}

impl std::fmt::Display for ControllerError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeMismatch {
                operation,
                path,
                found,
            } => write!(
                formatter,
                "{operation} at {path}: expected an array, found {} {found}",
                found.kind()
            ),
            Self::UnsupportedOperation { operation, path } => write!(
                formatter,
                "{operation} at {path}: not supported by this controller"
            ),
            Self::MissingArgument {
                operation,
                argument,
            } => write!(formatter, "{operation}: missing required argument `{argument}`"),
        }
    }
}

impl std::error::Error for ControllerError {}
