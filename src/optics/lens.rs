//! Lens optics for copy-on-write access to a part of a larger value.
//!
//! A Lens reads a focused part out of a source and builds a *new* source with
//! that part replaced. The source passed to [`Lens::set`] is only borrowed and
//! is never modified, which is what makes lenses the building block of the
//! controller tree's copy-on-write writes.
//!
//! # Laws
//!
//! A well-behaved Lens satisfies:
//!
//! 1. **`ViewSet` Law**: Setting what was viewed changes nothing observable.
//!    ```text
//!    lens.set(&source, lens.view(&source)) == source
//!    ```
//!
//! 2. **`SetView` Law**: Viewing after a set yields the set value.
//!    ```text
//!    lens.view(&lens.set(&source, value)) == value
//!    ```
//!
//! 3. **`SetSet` Law**: The last of two consecutive sets wins.
//!    ```text
//!    lens.set(&lens.set(&source, v1), v2) == lens.set(&source, v2)
//!    ```
//!
//! [`Step`](super::Step) lenses over [`Value`](crate::value::Value) relax the
//! first law at the edges: viewing a missing key yields `Null`, and setting
//! `Null` back creates the key.
//!
//! # Examples
//!
//! ```
//! use controllens::optics::Lens;
//! use controllens::lens;
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Point { x: i32, y: i32 }
//!
//! let x_lens = lens!(Point, x);
//!
//! let point = Point { x: 10, y: 20 };
//! assert_eq!(x_lens.view(&point), 10);
//!
//! let updated = x_lens.set(&point, 100);
//! assert_eq!(updated.x, 100);
//! assert_eq!(point.x, 10);
//! ```

use std::marker::PhantomData;

/// A Lens focuses on a single part within a larger structure.
///
/// # Type Parameters
///
/// - `S`: The source type (the whole structure)
/// - `A`: The target type (the focused part)
pub trait Lens<S, A> {
    /// Reads the focused part.
    ///
    /// # Arguments
    ///
    /// * `source` - The source structure
    ///
    /// # Returns
    ///
    /// An owned copy of the focused part
    fn view(&self, source: &S) -> A;

    /// Builds a new source with the focused part replaced.
    ///
    /// # Arguments
    ///
    /// * `source` - The source structure (borrowed, left untouched)
    /// * `value` - The new value for the focused part
    ///
    /// # Returns
    ///
    /// A new source with the focused part updated
    fn set(&self, source: &S, value: A) -> S;

    /// Modifies the focused part by applying a function.
    ///
    /// # Example
    ///
    /// ```
    /// use controllens::optics::Lens;
    /// use controllens::lens;
    ///
    /// #[derive(Clone, PartialEq, Debug)]
    /// struct Point { x: i32, y: i32 }
    ///
    /// let x_lens = lens!(Point, x);
    /// let point = Point { x: 10, y: 20 };
    /// let doubled = x_lens.modify(&point, |x| x * 2);
    /// assert_eq!(doubled.x, 20);
    /// ```
    fn modify<F>(&self, source: &S, function: F) -> S
    where
        Self: Sized,
        F: FnOnce(A) -> A,
    {
        let current = self.view(source);
        self.set(source, function(current))
    }

    /// Composes this lens with another lens to focus on a nested part.
    ///
    /// # Type Parameters
    ///
    /// - `B`: The target type of the other lens
    /// - `L`: The type of the other lens
    ///
    /// # Arguments
    ///
    /// * `other` - The lens to compose with
    ///
    /// # Returns
    ///
    /// A composed lens that focuses on the nested part
    ///
    /// # Example
    ///
    /// ```
    /// use controllens::optics::Lens;
    /// use controllens::lens;
    ///
    /// #[derive(Clone, PartialEq, Debug)]
    /// struct Address { street: String, city: String }
    ///
    /// #[derive(Clone, PartialEq, Debug)]
    /// struct Person { name: String, address: Address }
    ///
    /// let person_street = lens!(Person, address).compose(lens!(Address, street));
    ///
    /// let person = Person {
    ///     name: "Alice".to_string(),
    ///     address: Address {
    ///         street: "Main St".to_string(),
    ///         city: "Tokyo".to_string(),
    ///     },
    /// };
    ///
    /// assert_eq!(person_street.view(&person), "Main St");
    /// ```
    fn compose<B, L>(self, other: L) -> ComposedLens<Self, L, A>
    where
        Self: Sized,
        L: Lens<A, B>,
    {
        ComposedLens::new(self, other)
    }
}

/// A lens implemented using getter and setter functions.
///
/// The `lens!` macro generates a `FunctionLens` for struct fields.
///
/// # Example
///
/// ```
/// use controllens::optics::{Lens, FunctionLens};
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let x_lens = FunctionLens::new(
///     |point: &Point| point.x,
///     |point: &Point, x: i32| Point { x, ..point.clone() },
/// );
///
/// let point = Point { x: 10, y: 20 };
/// assert_eq!(x_lens.view(&point), 10);
/// ```
pub struct FunctionLens<S, A, G, St>
where
    G: Fn(&S) -> A,
    St: Fn(&S, A) -> S,
{
    getter: G,
    setter: St,
    _marker: PhantomData<(S, A)>,
}

impl<S, A, G, St> FunctionLens<S, A, G, St>
where
    G: Fn(&S) -> A,
    St: Fn(&S, A) -> S,
{
    /// Creates a new `FunctionLens` from a getter and setter.
    ///
    /// # Arguments
    ///
    /// * `getter` - A function that extracts the focused part from the source
    /// * `setter` - A function that builds a new source with the part updated
    #[must_use]
    pub const fn new(getter: G, setter: St) -> Self {
        Self {
            getter,
            setter,
            _marker: PhantomData,
        }
    }
}

impl<S, A, G, St> Lens<S, A> for FunctionLens<S, A, G, St>
where
    G: Fn(&S) -> A,
    St: Fn(&S, A) -> S,
{
    fn view(&self, source: &S) -> A {
        (self.getter)(source)
    }

    fn set(&self, source: &S, value: A) -> S {
        (self.setter)(source, value)
    }
}

impl<S, A, G, St> Clone for FunctionLens<S, A, G, St>
where
    G: Fn(&S) -> A + Clone,
    St: Fn(&S, A) -> S + Clone,
{
    fn clone(&self) -> Self {
        Self {
            getter: self.getter.clone(),
            setter: self.setter.clone(),
            _marker: PhantomData,
        }
    }
}

impl<S, A, G, St> std::fmt::Debug for FunctionLens<S, A, G, St>
where
    G: Fn(&S) -> A,
    St: Fn(&S, A) -> S,
{
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("FunctionLens")
            .finish_non_exhaustive()
    }
}

/// A lens composed of two lenses.
///
/// Setting through a composed lens performs one copy-on-write per level: the
/// inner lens rebuilds the intermediate part, the outer lens rebuilds the
/// source around it.
pub struct ComposedLens<L1, L2, A> {
    first: L1,
    second: L2,
    _marker: PhantomData<A>,
}

impl<L1, L2, A> ComposedLens<L1, L2, A> {
    /// Creates a new composed lens.
    ///
    /// # Arguments
    ///
    /// * `first` - The outer lens (focuses on the intermediate part)
    /// * `second` - The inner lens (focuses on the final part)
    #[must_use]
    pub const fn new(first: L1, second: L2) -> Self {
        Self {
            first,
            second,
            _marker: PhantomData,
        }
    }
}

impl<S, A, B, L1, L2> Lens<S, B> for ComposedLens<L1, L2, A>
where
    L1: Lens<S, A>,
    L2: Lens<A, B>,
{
    fn view(&self, source: &S) -> B {
        self.second.view(&self.first.view(source))
    }

    fn set(&self, source: &S, value: B) -> S {
        let intermediate = self.first.view(source);
        let rebuilt = self.second.set(&intermediate, value);
        self.first.set(source, rebuilt)
    }
}

impl<L1: Clone, L2: Clone, A> Clone for ComposedLens<L1, L2, A> {
    fn clone(&self) -> Self {
        Self {
            first: self.first.clone(),
            second: self.second.clone(),
            _marker: PhantomData,
        }
    }
}

impl<L1: std::fmt::Debug, L2: std::fmt::Debug, A> std::fmt::Debug for ComposedLens<L1, L2, A> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ComposedLens")
            .field("first", &self.first)
            .field("second", &self.second)
            .finish()
    }
}

/// Creates a lens for a struct field.
///
/// The struct must be `Clone`; setting clones the source and replaces the
/// field on the copy.
///
/// # Syntax
///
/// ```text
/// lens!(StructType, field_name)
/// ```
///
/// # Example
///
/// ```
/// use controllens::optics::Lens;
/// use controllens::lens;
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let y_lens = lens!(Point, y);
/// let point = Point { x: 10, y: 20 };
///
/// assert_eq!(y_lens.view(&point), 20);
/// assert_eq!(y_lens.set(&point, 5), Point { x: 10, y: 5 });
/// ```
#[macro_export]
macro_rules! lens {
    ($struct_type:ident, $field:ident) => {
        $crate::optics::FunctionLens::new(
            |source: &$struct_type| ::std::clone::Clone::clone(&source.$field),
            |source: &$struct_type, value| {
                let mut updated = ::std::clone::Clone::clone(source);
                updated.$field = value;
                updated
            },
        )
    };
    ($struct_type:ident < $($generic:tt),+ >, $field:ident) => {
        $crate::optics::FunctionLens::new(
            |source: &$struct_type<$($generic),+>| ::std::clone::Clone::clone(&source.$field),
            |source: &$struct_type<$($generic),+>, value| {
                let mut updated = ::std::clone::Clone::clone(source);
                updated.$field = value;
                updated
            },
        )
    };
    ($struct_type:path, $field:ident) => {
        $crate::optics::FunctionLens::new(
            |source: &$struct_type| ::std::clone::Clone::clone(&source.$field),
            |source: &$struct_type, value| {
                let mut updated = ::std::clone::Clone::clone(source);
                updated.$field = value;
                updated
            },
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_function_lens_view_and_set() {
        let x_lens = FunctionLens::new(
            |point: &Point| point.x,
            |point: &Point, x: i32| Point { x, ..point.clone() },
        );

        let point = Point { x: 10, y: 20 };
        assert_eq!(x_lens.view(&point), 10);

        let updated = x_lens.set(&point, 100);
        assert_eq!(updated, Point { x: 100, y: 20 });
        assert_eq!(point, Point { x: 10, y: 20 });
    }

    #[test]
    fn test_lens_modify() {
        let x_lens = lens!(Point, x);
        let point = Point { x: 10, y: 20 };
        assert_eq!(x_lens.modify(&point, |x| x * 2).x, 20);
    }

    #[test]
    fn test_lens_compose() {
        #[derive(Clone, PartialEq, Debug)]
        struct Inner {
            value: i32,
        }

        #[derive(Clone, PartialEq, Debug)]
        struct Outer {
            inner: Inner,
        }

        let composed = lens!(Outer, inner).compose(lens!(Inner, value));
        let data = Outer {
            inner: Inner { value: 42 },
        };

        assert_eq!(composed.view(&data), 42);
        assert_eq!(composed.set(&data, 100).inner.value, 100);
        assert_eq!(data.inner.value, 42);
    }
}
