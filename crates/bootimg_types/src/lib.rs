//! Core data types and container codecs for the `bootimg` boot-logo/splash
//! image editor.
//!
//! # Container formats
//!
//! - **MTK** (`logo.bin`): MediaTek's 512-byte-header + logo-table + blob
//!   array format. See [`format::mtk`].
//! - **OPPO** (`splash.img`): Qualcomm/OPPO's DDPH + splash-header +
//!   metadata-table + gzip-framed-BMP format. See [`format::oppo`].
//!
//! # Examples
//!
//! ```no_run
//! use bootimg_types::{format, io};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = io::load_file("logo.bin")?;
//! let image = format::load(&data)?;
//! println!("loaded {} slots", image.images.len());
//! # Ok(())
//! # }
//! ```

pub mod compress;
pub mod dimension;
pub mod error;
pub mod format;
pub mod model;
pub mod io;
pub mod pixel;
pub mod project;

pub use error::{BootError, BootFormat, Result};
pub use model::{BootImage, ImageSlot, NativeFormat, OppoHeaderState};
pub use pixel::ColorMode;
pub use project::Project;
