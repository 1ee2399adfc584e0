//! Optics for immutable data manipulation.
//!
//! Optics are composable accessors into immutable data. This module holds
//! the pure side of the crate: controllers use these types to compute child
//! values and to rebuild parents with one part replaced.
//!
//! # Available Optics
//!
//! - [`Lens`]: Copy-on-write focus on one part (`view` / `set`)
//! - [`Step`]: A key or index step into a [`Value`](crate::value::Value), itself a lens
//! - [`Path`]: A sequence of steps, composed into one lens
//! - [`Transform`]: Bidirectional, possibly lossy conversion between types
//!
//! # Example with Path
//!
//! ```
//! use controllens::optics::{Lens, Path, Step};
//! use controllens::value;
//!
//! let people = value!({ "people": ["Julian", "Dick"] });
//! let second = Path::root().key("people").index(1);
//!
//! assert_eq!(second.view(&people), value!("Dick"));
//!
//! let renamed = second.set(&people, value!("Anne"));
//! assert_eq!(renamed, value!({ "people": ["Julian", "Anne"] }));
//! assert_eq!(people, value!({ "people": ["Julian", "Dick"] }));
//!
//! assert_eq!(Step::key("people").view(&renamed).index(0), value!("Julian"));
//! ```
//!
//! # Example with Transform
//!
//! ```
//! use controllens::optics::Transform;
//! use controllens::transform;
//!
//! let cents = transform!(|euros: f64| (euros * 100.0).round() as i64, |cents: i64| cents as f64 / 100.0);
//!
//! assert_eq!(cents.to(1.25), 125);
//! assert_eq!(cents.from(250), 2.5);
//! ```

mod lens;
mod path;
pub mod standard;
mod step;
mod transform;

pub use lens::{ComposedLens, FunctionLens, Lens};
pub use path::Path;
pub use step::{Step, Target};
pub use transform::{
    ComposedTransform, FunctionTransform, ReversedTransform, Transform, TransformAsLens,
};
