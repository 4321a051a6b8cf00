//! Prelude module for `bootimg_internal`.
//!
//! This module provides a convenient way to import the commonly used types
//! and traits from `bootimg_types`.
//!
//! # Examples
//!
//! ```rust
//! use bootimg_internal::prelude::*;
//!
//! let mode = ColorMode::Rgb565Be;
//! assert_eq!(mode.short_name(), "rgb565be");
//! ```

// Re-export everything from bootimg_types::prelude.
#[doc(inline)]
pub use bootimg_types::prelude::*;

// Re-export the entire bootimg_types module for advanced usage.
#[doc(inline)]
pub use bootimg_types;
