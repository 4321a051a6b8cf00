//! Pixel format conversion: the native container encodings, conversion to
//! and from canonical RGBA8888, and OPPO's BMP payload framing.

pub mod bmp;
pub mod color;
pub mod convert;

pub use bmp::{decode_to_rgba, encode_from_rgba};
pub use color::ColorMode;
pub use convert::{from_rgba, to_rgba};
