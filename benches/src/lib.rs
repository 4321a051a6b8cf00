//! Benchmark helper utilities for `bootimg`.
//!
//! Synthetic in-memory fixtures only — this crate has no bundled device
//! dumps, unlike the KG benchmarks this workspace member was adapted from.

/// Generates a solid-color RGBA8888 buffer of `width` x `height` pixels.
pub fn solid_rgba(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
	(0..width as usize * height as usize).flat_map(|_| color).collect()
}

/// Generates a buffer with a horizontal gradient, which compresses far worse
/// than a solid fill and exercises the deflate codec's slower paths.
pub fn gradient_rgba(width: u32, height: u32) -> Vec<u8> {
	let mut out = Vec::with_capacity(width as usize * height as usize * 4);
	for y in 0..height {
		for x in 0..width {
			let r = (x % 256) as u8;
			let g = (y % 256) as u8;
			let b = ((x + y) % 256) as u8;
			out.extend_from_slice(&[r, g, b, 255]);
		}
	}
	out
}

/// Common benchmark sizes, matching real phone boot-logo resolutions.
pub mod sizes {
	/// Small icon: 64x64 (4,096 pixels).
	pub const TINY: (u32, u32) = (64, 64);
	/// Typical low-end phone boot splash.
	pub const HD: (u32, u32) = (720, 1280);
	/// Typical mid-range phone boot splash.
	pub const FHD: (u32, u32) = (1080, 1920);
	/// Typical high-end phone boot splash.
	pub const QHD: (u32, u32) = (1440, 2560);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn solid_rgba_has_expected_length() {
		let buf = solid_rgba(4, 4, [1, 2, 3, 4]);
		assert_eq!(buf.len(), 4 * 4 * 4);
	}

	#[test]
	fn gradient_rgba_has_expected_length() {
		let buf = gradient_rgba(8, 6);
		assert_eq!(buf.len(), 8 * 6 * 4);
	}
}
