//! Conversions between a container's native [`ColorMode`] and the canonical
//! in-memory form: RGBA8888, row-major, top-down.
//!
//! For the two 4-byte families (RGBA/BGRA), each channel already occupies a
//! single whole byte, so there is no multi-byte value for an endianness flag
//! to reorder — applying a byte-swap there would relocate G and A out of
//! their fixed positions, which spec.md §4.C rules out ("alpha and G
//! untouched"). The LE/BE suffix on those four variants is therefore a
//! no-op here: RGBA_LE and RGBA_BE decode/encode identically, as do
//! BGRA_LE and BGRA_BE. RGB565 is different — it is a genuine packed
//! 16-bit word, so its LE/BE flag does reorder its two bytes.

use crate::error::{BootError, Result};
use crate::pixel::color::ColorMode;

/// Decodes `data` (encoded in `mode`) into canonical RGBA8888.
///
/// Fails with [`BootError::Malformed`] if `data`'s length is not a multiple
/// of `mode`'s pixel size.
pub fn to_rgba(data: &[u8], mode: ColorMode) -> Result<Vec<u8>> {
	let bpp = mode.bytes_per_pixel();
	if data.len() % bpp != 0 {
		return Err(BootError::malformed(format!(
			"pixel buffer of {} bytes is not a multiple of {bpp}-byte pixels for {mode}",
			data.len()
		)));
	}

	let pixel_count = data.len() / bpp;
	let mut out = Vec::with_capacity(pixel_count * 4);

	match mode {
		ColorMode::RgbaLe | ColorMode::RgbaBe => {
			for px in data.chunks_exact(4) {
				out.extend_from_slice(&[px[0], px[1], px[2], px[3]]);
			}
		}
		ColorMode::BgraLe | ColorMode::BgraBe => {
			// Swap byte 0 and byte 2; G (byte 1) and A (byte 3) untouched.
			for px in data.chunks_exact(4) {
				out.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
			}
		}
		ColorMode::Rgb565Le | ColorMode::Rgb565Be => {
			let big_endian = matches!(mode, ColorMode::Rgb565Be);
			for px in data.chunks_exact(2) {
				let word = if big_endian {
					u16::from_be_bytes([px[0], px[1]])
				} else {
					u16::from_le_bytes([px[0], px[1]])
				};
				let r5 = ((word >> 11) & 0x1F) as u8;
				let g6 = ((word >> 5) & 0x3F) as u8;
				let b5 = (word & 0x1F) as u8;
				// Alpha forced to 255 when inflating RGB565 to RGBA (spec.md §4.C).
				out.extend_from_slice(&[expand5(r5), expand6(g6), expand5(b5), 255]);
			}
		}
	}

	Ok(out)
}

/// Encodes canonical RGBA8888 `rgba` into `mode`'s native byte layout.
///
/// Fails with [`BootError::Malformed`] if `rgba`'s length is not a multiple
/// of 4.
pub fn from_rgba(rgba: &[u8], mode: ColorMode) -> Result<Vec<u8>> {
	if rgba.len() % 4 != 0 {
		return Err(BootError::malformed(format!(
			"RGBA buffer of {} bytes is not a multiple of 4",
			rgba.len()
		)));
	}

	let pixel_count = rgba.len() / 4;
	let mut out = Vec::with_capacity(pixel_count * mode.bytes_per_pixel());

	match mode {
		ColorMode::RgbaLe | ColorMode::RgbaBe => {
			for px in rgba.chunks_exact(4) {
				out.extend_from_slice(&[px[0], px[1], px[2], px[3]]);
			}
		}
		ColorMode::BgraLe | ColorMode::BgraBe => {
			// Swap byte 0 and byte 2; G and A untouched (spec.md §4.C).
			for px in rgba.chunks_exact(4) {
				out.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
			}
		}
		ColorMode::Rgb565Le | ColorMode::Rgb565Be => {
			let big_endian = matches!(mode, ColorMode::Rgb565Be);
			for px in rgba.chunks_exact(4) {
				let word = ((px[0] as u16 >> 3) << 11)
					| ((px[1] as u16 >> 2) << 5)
					| (px[2] as u16 >> 3);
				if big_endian {
					out.extend_from_slice(&word.to_be_bytes());
				} else {
					out.extend_from_slice(&word.to_le_bytes());
				}
			}
		}
	}

	Ok(out)
}

fn expand5(v: u8) -> u8 {
	(v << 3) | (v >> 2)
}

fn expand6(v: u8) -> u8 {
	(v << 2) | (v >> 4)
}
