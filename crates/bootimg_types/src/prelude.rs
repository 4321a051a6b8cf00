//! Prelude module for `bootimg_types`.
//!
//! This module provides a convenient way to import the commonly used types
//! for loading, converting, and reassembling a boot-logo container.
//!
//! # Examples
//!
//! ```no_run
//! use bootimg_types::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let project = Project::unpack("logo.bin", "logo-project")?;
//! let _ = project.image.format;
//! # Ok(())
//! # }
//! ```

#[doc(inline)]
pub use crate::error::{BootError, BootFormat, Result};

#[doc(inline)]
pub use crate::model::{BootImage, ImageSlot, NativeFormat, OppoHeaderState};

#[doc(inline)]
pub use crate::pixel::ColorMode;

#[doc(inline)]
pub use crate::project::Project;

// Re-export the format module for advanced usage (direct MTK/OPPO access).
#[doc(inline)]
pub use crate::format;
