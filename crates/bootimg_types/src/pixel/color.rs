//! The pixel formats a container slot can carry on disk.

use std::fmt;

/// One of the six native pixel encodings a boot-logo blob or BMP payload is
/// stored in: `{RGBA, BGRA, RGB565} × {LE, BE}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
	RgbaLe,
	RgbaBe,
	BgraLe,
	BgraBe,
	Rgb565Le,
	Rgb565Be,
}

impl ColorMode {
	/// Bytes occupied by one pixel in this mode: 4 for the RGBA/BGRA family,
	/// 2 for RGB565.
	pub fn bytes_per_pixel(self) -> usize {
		match self {
			ColorMode::RgbaLe | ColorMode::RgbaBe | ColorMode::BgraLe | ColorMode::BgraBe => 4,
			ColorMode::Rgb565Le | ColorMode::Rgb565Be => 2,
		}
	}

	/// Canonical short name used in filenames and CLI `--mode` values, e.g.
	/// `rgbabe`, `bgrale`, `rgb565le`.
	pub fn short_name(self) -> &'static str {
		match self {
			ColorMode::RgbaLe => "rgbale",
			ColorMode::RgbaBe => "rgbabe",
			ColorMode::BgraLe => "bgrale",
			ColorMode::BgraBe => "bgrabe",
			ColorMode::Rgb565Le => "rgb565le",
			ColorMode::Rgb565Be => "rgb565be",
		}
	}

	/// Parses a `--mode` CLI value / filename fragment back into a `ColorMode`.
	pub fn parse(name: &str) -> Option<Self> {
		match name.to_ascii_lowercase().as_str() {
			"rgbale" => Some(ColorMode::RgbaLe),
			"rgbabe" => Some(ColorMode::RgbaBe),
			"bgrale" => Some(ColorMode::BgraLe),
			"bgrabe" => Some(ColorMode::BgraBe),
			"rgb565le" => Some(ColorMode::Rgb565Le),
			"rgb565be" => Some(ColorMode::Rgb565Be),
			_ => None,
		}
	}
}

impl fmt::Display for ColorMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.short_name())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trips_through_short_name() {
		for mode in [
			ColorMode::RgbaLe,
			ColorMode::RgbaBe,
			ColorMode::BgraLe,
			ColorMode::BgraBe,
			ColorMode::Rgb565Le,
			ColorMode::Rgb565Be,
		] {
			assert_eq!(ColorMode::parse(mode.short_name()), Some(mode));
		}
	}

	#[test]
	fn bpp_matches_family() {
		assert_eq!(ColorMode::BgraLe.bytes_per_pixel(), 4);
		assert_eq!(ColorMode::Rgb565Be.bytes_per_pixel(), 2);
	}

	#[test]
	fn parse_rejects_unknown() {
		assert_eq!(ColorMode::parse("yuv420"), None);
	}
}
