//! Internal crate for `bootimg`.
//!
//! This module is separated into its own crate so that a future GUI or
//! dynamic-linking front-end can depend on a thin facade without pulling in
//! `bootimg_types`'s internals directly.
//!
//! # Examples
//!
//! ```rust
//! use bootimg_internal::prelude::*;
//!
//! let mode = ColorMode::BgraLe;
//! assert_eq!(mode.bytes_per_pixel(), 4);
//! ```

/// `use bootimg_internal::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export bootimg_types for convenience.
pub use bootimg_types;
