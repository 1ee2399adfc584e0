//! Bidirectional value transforms.
//!
//! A Transform converts a value of type `S` into a view of type `X` and maps
//! edits of that view back into `S`. Unlike an isomorphism, a transform is
//! allowed to lose information: parsing `"007"` into `7` and formatting it
//! back yields `"7"`. Controllers use transforms to expose a differently
//! typed view of the same backing state.
//!
//! # Examples
//!
//! ```
//! use controllens::optics::{Transform, FunctionTransform};
//!
//! let celsius = FunctionTransform::new(
//!     |fahrenheit: f64| (fahrenheit - 32.0) * 5.0 / 9.0,
//!     |celsius: f64| celsius * 9.0 / 5.0 + 32.0,
//! );
//!
//! assert_eq!(celsius.to(212.0), 100.0);
//! assert_eq!(celsius.from(0.0), 32.0);
//! ```

use std::marker::PhantomData;
use std::rc::Rc;

use super::Lens;

/// A pair of conversions between a source type and a view type.
///
/// # Type Parameters
///
/// - `S`: The source type (what the controller stores)
/// - `X`: The view type (what the transformed controller exposes)
///
/// # Round Trip
///
/// `from(to(s)) == s` is expected only for lossless transforms; callers must
/// not rely on it in general.
pub trait Transform<S, X> {
    /// Converts a source value into the view type.
    fn to(&self, source: S) -> X;

    /// Converts an edited view back into the source type.
    fn from(&self, value: X) -> S;

    /// Returns the transform running in the opposite direction.
    ///
    /// # Example
    ///
    /// ```
    /// use controllens::optics::{Transform, FunctionTransform};
    ///
    /// let length = FunctionTransform::new(|text: String| text.len(), |count: usize| "x".repeat(count));
    /// let padding = length.reverse();
    ///
    /// assert_eq!(padding.to(3), "xxx");
    /// ```
    fn reverse(self) -> ReversedTransform<Self>
    where
        Self: Sized,
    {
        ReversedTransform::new(self)
    }

    /// Chains this transform with another one.
    ///
    /// # Example
    ///
    /// ```
    /// use controllens::optics::{Transform, FunctionTransform};
    ///
    /// let widen = FunctionTransform::new(|x: i32| i64::from(x), |x: i64| x as i32);
    /// let render = FunctionTransform::new(|x: i64| x.to_string(), |s: String| s.parse::<i64>().unwrap_or_default());
    ///
    /// let composed = widen.compose(render);
    /// assert_eq!(composed.to(42), "42");
    /// assert_eq!(composed.from("7".to_string()), 7);
    /// ```
    fn compose<Y, T>(self, other: T) -> ComposedTransform<Self, T, X>
    where
        Self: Sized,
        T: Transform<X, Y>,
    {
        ComposedTransform::new(self, other)
    }

    /// Views this transform as a [`Lens`] whose `set` ignores the old source.
    fn to_lens(self) -> TransformAsLens<Self, S, X>
    where
        Self: Sized,
    {
        TransformAsLens::new(self)
    }
}

impl<S, X, T> Transform<S, X> for Rc<T>
where
    T: Transform<S, X> + ?Sized,
{
    fn to(&self, source: S) -> X {
        (**self).to(source)
    }

    fn from(&self, value: X) -> S {
        (**self).from(value)
    }
}

/// A transform implemented with two functions.
///
/// The `transform!` macro generates a `FunctionTransform`.
pub struct FunctionTransform<S, X, Tf, Fb>
where
    Tf: Fn(S) -> X,
    Fb: Fn(X) -> S,
{
    to_function: Tf,
    from_function: Fb,
    _marker: PhantomData<(S, X)>,
}

impl<S, X, Tf, Fb> FunctionTransform<S, X, Tf, Fb>
where
    Tf: Fn(S) -> X,
    Fb: Fn(X) -> S,
{
    /// Creates a new `FunctionTransform`.
    ///
    /// # Arguments
    ///
    /// * `to_function` - Converts a source value into the view
    /// * `from_function` - Converts a view value back into the source
    #[must_use]
    pub const fn new(to_function: Tf, from_function: Fb) -> Self {
        Self {
            to_function,
            from_function,
            _marker: PhantomData,
        }
    }
}

impl<S, X, Tf, Fb> Transform<S, X> for FunctionTransform<S, X, Tf, Fb>
where
    Tf: Fn(S) -> X,
    Fb: Fn(X) -> S,
{
    fn to(&self, source: S) -> X {
        (self.to_function)(source)
    }

    fn from(&self, value: X) -> S {
        (self.from_function)(value)
    }
}

impl<S, X, Tf, Fb> Clone for FunctionTransform<S, X, Tf, Fb>
where
    Tf: Fn(S) -> X + Clone,
    Fb: Fn(X) -> S + Clone,
{
    fn clone(&self) -> Self {
        Self {
            to_function: self.to_function.clone(),
            from_function: self.from_function.clone(),
            _marker: PhantomData,
        }
    }
}

impl<S, X, Tf, Fb> std::fmt::Debug for FunctionTransform<S, X, Tf, Fb>
where
    Tf: Fn(S) -> X,
    Fb: Fn(X) -> S,
{
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("FunctionTransform")
            .finish_non_exhaustive()
    }
}

/// A transform with its directions swapped.
#[derive(Clone, Debug)]
pub struct ReversedTransform<T> {
    inner: T,
}

impl<T> ReversedTransform<T> {
    /// Wraps `inner`, swapping `to` and `from`.
    #[must_use]
    pub const fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<S, X, T> Transform<X, S> for ReversedTransform<T>
where
    T: Transform<S, X>,
{
    fn to(&self, source: X) -> S {
        self.inner.from(source)
    }

    fn from(&self, value: S) -> X {
        self.inner.to(value)
    }
}

/// Two transforms chained through an intermediate type `X`.
pub struct ComposedTransform<T1, T2, X> {
    first: T1,
    second: T2,
    _marker: PhantomData<X>,
}

impl<T1, T2, X> ComposedTransform<T1, T2, X> {
    /// Chains `first` (S to X) with `second` (X to Y).
    #[must_use]
    pub const fn new(first: T1, second: T2) -> Self {
        Self {
            first,
            second,
            _marker: PhantomData,
        }
    }
}

impl<S, X, Y, T1, T2> Transform<S, Y> for ComposedTransform<T1, T2, X>
where
    T1: Transform<S, X>,
    T2: Transform<X, Y>,
{
    fn to(&self, source: S) -> Y {
        self.second.to(self.first.to(source))
    }

    fn from(&self, value: Y) -> S {
        self.first.from(self.second.from(value))
    }
}

impl<T1: Clone, T2: Clone, X> Clone for ComposedTransform<T1, T2, X> {
    fn clone(&self) -> Self {
        Self {
            first: self.first.clone(),
            second: self.second.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T1: std::fmt::Debug, T2: std::fmt::Debug, X> std::fmt::Debug for ComposedTransform<T1, T2, X> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ComposedTransform")
            .field("first", &self.first)
            .field("second", &self.second)
            .finish()
    }
}

/// A transform used as a lens: `view` applies `to`, `set` applies `from` and
/// discards the previous source.
pub struct TransformAsLens<T, S, X> {
    transform: T,
    _marker: PhantomData<(S, X)>,
}

impl<T, S, X> TransformAsLens<T, S, X> {
    /// Wraps a transform.
    #[must_use]
    pub const fn new(transform: T) -> Self {
        Self {
            transform,
            _marker: PhantomData,
        }
    }
}

impl<T, S, X> Lens<S, X> for TransformAsLens<T, S, X>
where
    T: Transform<S, X>,
    S: Clone,
{
    fn view(&self, source: &S) -> X {
        self.transform.to(source.clone())
    }

    fn set(&self, _source: &S, value: X) -> S {
        self.transform.from(value)
    }
}

impl<T: std::fmt::Debug, S, X> std::fmt::Debug for TransformAsLens<T, S, X> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("TransformAsLens")
            .field("transform", &self.transform)
            .finish()
    }
}

/// Creates a [`FunctionTransform`] from a `to` and a `from` closure.
///
/// # Example
///
/// ```
/// use controllens::optics::Transform;
/// use controllens::transform;
///
/// let upper = transform!(|text: String| text.to_uppercase(), |text: String| text.to_lowercase());
/// assert_eq!(upper.to("abc".to_string()), "ABC");
/// assert_eq!(upper.from("ABC".to_string()), "abc");
/// ```
#[macro_export]
macro_rules! transform {
    ($to:expr, $from:expr $(,)?) => {
        $crate::optics::FunctionTransform::new($to, $from)
    };
}
