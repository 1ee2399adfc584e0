//! # controllens
//!
//! Memoized, copy-on-write state controllers for immutable value trees.
//!
//! ## Overview
//!
//! A controller wraps one piece of state and a way to read and write it, and
//! derives controllers for the parts inside. Writes at any depth rebuild
//! their ancestors without touching the data anyone else holds, and change
//! listeners at every level on the way are told exactly once.
//!
//! - **Values**: [`Value`], a reference-counted immutable structured value
//! - **Optics**: [`Lens`](optics::Lens), navigation [`Step`](optics::Step)s
//!   and [`Path`](optics::Path)s, lossy [`Transform`](optics::Transform)s
//! - **Controllers**: [`Controller`], with memoized children, snapshots,
//!   change functions and listeners
//! - **Creators**: root controllers over accessors, snapshot sources, shared
//!   cells or owned values
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`Value`]
//! - `tracing`: structured log events for writes and notification passes
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use controllens::prelude::*;
//! use controllens::value;
//!
//! let root = controller_from_initial_value(value!({}));
//! root.get("child").get("name").set_value(value!("Patrick"));
//!
//! assert_eq!(root.value(), value!({ "child": { "name": "Patrick" } }));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// ```rust
/// use controllens::prelude::*;
/// ```
pub mod prelude {
    pub use crate::controller::{
        ChangeFn, Controller, ControllerError, ControllerResult, Listener, ListenerTag, Snapshot,
        State, ToggleFn, listener,
    };
    pub use crate::creators::*;
    pub use crate::optics::{Lens, Path, Step, Target, Transform};
    pub use crate::value::Value;
}

pub mod controller;
pub mod creators;
pub mod optics;
pub mod value;

pub use controller::{Controller, ControllerError, ControllerResult};
pub use value::Value;
