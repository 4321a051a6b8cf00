//! The in-memory representation of a loaded container, shared by both
//! format backends (spec.md §3).

use crate::compress;
use crate::error::{BootError, BootFormat, Result};
use crate::pixel::{self, ColorMode};

/// How a slot's `compressed` bytes are encoded natively, and therefore how
/// to get back to canonical RGBA and how to re-encode a replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeFormat {
	/// An MTK blob successfully inflated under this color mode.
	Mtk(ColorMode),
	/// An MTK blob that failed to inflate on load. Treated as opaque bytes:
	/// never decoded, never replaced from an image, round-tripped verbatim.
	MtkRawOpaque,
	/// An OPPO slot: a gzip-framed BMP at this bit depth (24 or 32).
	Oppo(u8),
}

/// One image entry in a [`BootImage`], regardless of container format.
#[derive(Debug, Clone)]
pub struct ImageSlot {
	/// 1-based for MTK, 0-based for OPPO; preserved on disk filenames.
	pub index: u32,
	/// 0 if dimension inference failed for this MTK slot.
	pub width: u32,
	pub height: u32,
	/// The exact bytes stored in the container (compressed).
	pub compressed: Vec<u8>,
	/// Lazily populated, canonical top-down RGBA8888. Invalidated (set to
	/// `None`) whenever `compressed` changes.
	pub decoded_cache: Option<Vec<u8>>,
	pub native_format: NativeFormat,
	/// OPPO only: up to 0x74-byte identifier from the metadata table.
	pub name: Option<String>,
}

impl ImageSlot {
	/// Returns the slot's canonical RGBA pixels, decoding and caching on
	/// first access. A raw-opaque MTK slot has no decodable pixels.
	pub fn decoded_rgba(&mut self) -> Result<&[u8]> {
		if self.decoded_cache.is_none() {
			let rgba = match self.native_format {
				NativeFormat::Mtk(mode) => {
					let raw = compress::zlib_inflate(&self.compressed)?;
					pixel::to_rgba(&raw, mode)?
				}
				NativeFormat::MtkRawOpaque => {
					return Err(BootError::CompressionFailed(
						"slot is raw opaque; it never decompressed on load".to_string(),
					));
				}
				NativeFormat::Oppo(_) => {
					let raw = compress::gzip_decompress(&self.compressed)?;
					let (rgba, _, _, _) = pixel::decode_to_rgba(&raw)?;
					rgba
				}
			};
			self.decoded_cache = Some(rgba);
		}
		Ok(self.decoded_cache.as_deref().unwrap())
	}

	/// Replaces this slot's pixels with `rgba` (which must already match
	/// `self.width`/`self.height` — callers validate that before calling),
	/// re-encoding through the slot's native format and updating
	/// `compressed` in place. Invalidates the decoded cache.
	///
	/// On any encode/compress failure the slot is left untouched: the
	/// caller receives the error and nothing has been mutated, matching the
	/// roll-back contract in spec.md §7.
	pub fn replace_rgba(&mut self, rgba: &[u8]) -> Result<()> {
		let new_compressed = match self.native_format {
			NativeFormat::Mtk(mode) => {
				let raw = pixel::from_rgba(rgba, mode)?;
				compress::zlib_deflate(&raw, 9)?
			}
			NativeFormat::MtkRawOpaque => {
				return Err(BootError::malformed(
					"cannot replace a raw-opaque MTK slot; its native pixel format is unknown",
				));
			}
			NativeFormat::Oppo(bit_depth) => {
				let bmp = pixel::encode_from_rgba(rgba, self.width, self.height, bit_depth)?;
				compress::gzip_compress(&bmp, 9)?
			}
		};

		self.compressed = new_compressed;
		self.decoded_cache = None;
		Ok(())
	}
}

/// Format-specific state preserved verbatim across load/save so an
/// unmodified OPPO container round-trips byte-for-byte. MTK carries no such
/// state: its header is fully recomputed on every write (spec.md §9).
#[derive(Debug, Clone)]
pub struct OppoHeaderState {
	/// `(magic, flag)` of the optional 8-byte DDPH prefix, if present.
	pub ddph: Option<(u32, u32)>,
	/// The three 0x40-byte metadata strings from the splash header.
	pub metadata: [[u8; 0x40]; 3],
	/// The 0x40-byte zero-fill region, preserved verbatim rather than
	/// assumed to be all zero.
	pub zero_fill: [u8; 0x40],
	/// Unused field, preserved and never interpreted (spec.md §9).
	pub unknown: u32,
	pub width: u32,
	pub height: u32,
	/// Unused field, preserved and never interpreted (spec.md §9).
	pub special: u32,
}

/// The in-memory representation of a loaded container (spec.md §3).
#[derive(Debug, Clone)]
pub struct BootImage {
	pub format: BootFormat,
	/// Ordered slots, in on-disk order.
	pub images: Vec<ImageSlot>,
	/// `Some` for OPPO; `None` for MTK, whose header carries no
	/// round-trip-relevant state beyond the blobs themselves.
	pub oppo_header: Option<OppoHeaderState>,
}

impl BootImage {
	/// Replaces the pixels of slot `index` (the `ImageSlot::index` value,
	/// not a position in `images`) with `rgba`, validating dimensions first.
	///
	/// On a dimension mismatch or encode failure the slot's prior
	/// `compressed` bytes are left exactly as they were.
	pub fn replace_image(&mut self, index: u32, rgba: &[u8], width: u32, height: u32) -> Result<()> {
		let slot = self
			.images
			.iter_mut()
			.find(|s| s.index == index)
			.ok_or_else(|| BootError::malformed(format!("no slot with index {index}")))?;

		if width != slot.width || height != slot.height {
			return Err(BootError::DimensionMismatch {
				slot_width: slot.width,
				slot_height: slot.height,
				image_width: width,
				image_height: height,
			});
		}

		slot.replace_rgba(rgba)
	}
}
