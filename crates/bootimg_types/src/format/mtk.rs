//! MediaTek `logo.bin` container: a 512-byte header, a logo table, and a
//! contiguous array of (usually zlib-compressed) blobs (spec.md §4.D).

use crate::compress;
use crate::dimension;
use crate::error::{BootError, BootFormat, Result};
use crate::model::{BootImage, ImageSlot, NativeFormat};
use crate::io::{read_bytes, read_u32_be, read_u32_le, write_bytes_at, write_u32_le_at};
use crate::pixel::ColorMode;

/// Offset of the magic / size / type-name header.
const HEADER_SIZE: usize = 512;
/// Big-endian magic at offset 0.
const MAGIC: u32 = 0x8816_8858;
/// Byte used to pad the header's 472-byte tail and the type-name field.
const FILL: u8 = 0xFF;
/// Offset of the type name within the header.
const TYPE_NAME_OFFSET: usize = 8;
const TYPE_NAME_LEN: usize = 32;

/// Color modes tried, in order, when inferring dimensions for a blob that
/// successfully inflated (spec.md §4.D "Read").
const INFERENCE_ORDER: [ColorMode; 2] = [ColorMode::BgraLe, ColorMode::Rgb565Le];

/// Returns `true` if `data` begins with the MTK magic at offset 0 (big-endian).
pub fn looks_like_mtk(data: &[u8]) -> bool {
	read_u32_be(data, 0).map(|m| m == MAGIC).unwrap_or(false)
}

/// Parses an MTK container, asserting `header.size == table.block_size`,
/// slicing blobs by offset differences, and attempting dimension inference
/// on every blob that successfully inflates.
pub fn load(data: &[u8]) -> Result<BootImage> {
	let magic = read_u32_be(data, 0)?;
	if magic != MAGIC {
		return Err(BootError::malformed(format!(
			"MTK magic mismatch: expected {MAGIC:#010x}, got {magic:#010x}"
		)));
	}

	let type_name = read_bytes(data, TYPE_NAME_OFFSET, TYPE_NAME_LEN)?;
	if !starts_with_ignore_case(type_name, b"LOGO") {
		return Err(BootError::malformed(
			"MTK header type name does not start with \"LOGO\"",
		));
	}

	let header_size = read_u32_le(data, 4)?;

	let logo_count = read_u32_le(data, HEADER_SIZE)? as usize;
	let block_size = read_u32_le(data, HEADER_SIZE + 4)?;

	if block_size != header_size {
		return Err(BootError::malformed(format!(
			"MTK block_size {block_size} does not match header.size {header_size}"
		)));
	}

	let table_offsets_start = HEADER_SIZE + 8;
	let mut offsets = Vec::with_capacity(logo_count);
	for i in 0..logo_count {
		offsets.push(read_u32_le(data, table_offsets_start + i * 4)?);
	}

	let mut images = Vec::with_capacity(logo_count);
	for i in 0..logo_count {
		let start = offsets[i] as usize;
		let end = if i + 1 < logo_count {
			offsets[i + 1] as usize
		} else {
			block_size as usize
		};
		if end < start {
			return Err(BootError::malformed(format!(
				"MTK blob {i} has end offset {end} before start offset {start}"
			)));
		}
		let blob = read_bytes(data, HEADER_SIZE + start, end - start)?.to_vec();

		let (native_format, width, height) = infer_blob_shape(&blob);

		images.push(ImageSlot {
			index: (i + 1) as u32,
			width,
			height,
			compressed: blob,
			decoded_cache: None,
			native_format,
			name: None,
		});
	}

	Ok(BootImage {
		format: BootFormat::Mtk,
		images,
		oppo_header: None,
	})
}

/// Tries each color mode in [`INFERENCE_ORDER`] against the blob's inflated
/// size, returning the first mode/dimensions that inflate and infer
/// successfully, or [`NativeFormat::MtkRawOpaque`] with `(0, 0)` otherwise.
///
/// Exposed publicly so the `repack` CLI command can reinterpret a raw
/// `logo_{N}_raw.z` dump's dimensions the same way `load` does.
pub fn infer_blob_shape(blob: &[u8]) -> (NativeFormat, u32, u32) {
	let Ok(raw) = compress::zlib_inflate(blob) else {
		return (NativeFormat::MtkRawOpaque, 0, 0);
	};

	for &mode in &INFERENCE_ORDER {
		let candidates = dimension::infer_dimensions(raw.len(), mode.bytes_per_pixel());
		if let Some(&(w, h)) = candidates.first() {
			return (NativeFormat::Mtk(mode), w, h);
		}
	}

	// Inflated cleanly but no plausible dimensions: dimensions unknown, but
	// the blob is still a known-good MTK color blob under the first mode we
	// tried, since the caller may still want to re-encode it untouched.
	(NativeFormat::Mtk(INFERENCE_ORDER[0]), 0, 0)
}

/// Re-interprets every decodable MTK slot under a caller-chosen `mode`
/// instead of the mode the loader auto-inferred, recomputing dimensions
/// from the blob's inflated size under that mode.
///
/// This is exposed for the CLI's `unpack --mode` override (spec.md §6 /
/// SPEC_FULL.md §3.3); a slot whose size isn't a multiple of `mode`'s pixel
/// size falls back to `(0, 0)` unknown dimensions rather than failing the
/// whole operation. Raw-opaque slots are left untouched — there is no blob
/// to reinterpret.
pub fn force_color_mode(image: &mut BootImage, mode: ColorMode) -> Result<()> {
	if image.format != BootFormat::Mtk {
		return Err(BootError::malformed("force_color_mode only applies to MTK images"));
	}
	for slot in &mut image.images {
		if matches!(slot.native_format, NativeFormat::MtkRawOpaque) {
			continue;
		}
		let raw = compress::zlib_inflate(&slot.compressed)?;
		let (width, height) = dimension::infer_dimensions(raw.len(), mode.bytes_per_pixel())
			.first()
			.copied()
			.unwrap_or((0, 0));
		slot.native_format = NativeFormat::Mtk(mode);
		slot.width = width;
		slot.height = height;
		slot.decoded_cache = None;
	}
	Ok(())
}

fn starts_with_ignore_case(haystack: &[u8], needle: &[u8]) -> bool {
	haystack.len() >= needle.len()
		&& haystack[..needle.len()]
			.iter()
			.zip(needle)
			.all(|(a, b)| a.to_ascii_uppercase() == b.to_ascii_uppercase())
}

/// Serializes `image` back into an MTK container, recomputing the logo
/// table's offsets and the header/table size fields from the current blob
/// lengths on every call (spec.md §9: never trust a size carried from load).
pub fn save(image: &BootImage) -> Result<Vec<u8>> {
	if image.format != BootFormat::Mtk {
		return Err(BootError::malformed("save(mtk) called on a non-MTK BootImage"));
	}

	let logo_count = image.images.len();
	let table_offsets_start = 8usize;

	let mut offsets = Vec::with_capacity(logo_count);
	let mut running = table_offsets_start + 4 * logo_count;
	for slot in &image.images {
		offsets.push(running as u32);
		running += slot.compressed.len();
	}
	let block_size = running as u32;

	let mut out = vec![FILL; HEADER_SIZE];
	write_bytes_at(&mut out, 0, &MAGIC.to_be_bytes());
	write_u32_le_at(&mut out, 4, block_size);
	write_bytes_at(&mut out, TYPE_NAME_OFFSET, b"LOGO");
	for b in &mut out[TYPE_NAME_OFFSET + 4..TYPE_NAME_OFFSET + TYPE_NAME_LEN] {
		*b = 0;
	}

	write_u32_le_at(&mut out, HEADER_SIZE, logo_count as u32);
	write_u32_le_at(&mut out, HEADER_SIZE + 4, block_size);
	for (i, &offset) in offsets.iter().enumerate() {
		write_u32_le_at(&mut out, HEADER_SIZE + table_offsets_start + i * 4, offset);
	}

	for slot in &image.images {
		out.extend_from_slice(&slot.compressed);
	}

	Ok(out)
}
