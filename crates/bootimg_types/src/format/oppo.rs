//! Qualcomm/OPPO `splash.img` container: an optional DDPH prefix, a splash
//! header at `0x4000`, a metadata table, and a gzip-framed-BMP payload
//! region starting at `0x8000` (spec.md §4.E).

use crate::compress;
use crate::error::{BootError, BootFormat, Result};
use crate::model::{BootImage, ImageSlot, NativeFormat, OppoHeaderState};
use crate::io::{read_bytes, read_u32_le, write_bytes_at, write_u32_le_at};
use crate::pixel;

const DDPH_MAGIC: u32 = 0x4850_4444;
const SPLASH_MAGIC: &[u8; 12] = b"SPLASH LOGO!";

const SPLASH_HEADER_OFFSET: usize = 0x4000;
const METADATA_STRING_LEN: usize = 0x40;
/// 12-byte magic + 3 metadata strings + zero-fill + 5 LE u32 fields.
const SPLASH_HEADER_LEN: usize = 12 + 3 * METADATA_STRING_LEN + METADATA_STRING_LEN + 5 * 4;
const METADATA_TABLE_OFFSET: usize = SPLASH_HEADER_OFFSET + SPLASH_HEADER_LEN;
const METADATA_NAME_LEN: usize = 0x74;
/// offset + realsz + compsz (3 LE u32) + name.
const METADATA_RECORD_LEN: usize = 3 * 4 + METADATA_NAME_LEN;
const PAYLOAD_OFFSET: usize = 0x8000;

/// Returns `true` if `data` is at least `0x4000 + 12` bytes long and its
/// 12-byte magic matches "SPLASH LOGO!" at `0x4000` (spec.md §4.G).
pub fn looks_like_oppo(data: &[u8]) -> bool {
	data.len() >= SPLASH_HEADER_OFFSET + 12
		&& read_bytes(data, SPLASH_HEADER_OFFSET, 12)
			.map(|m| m == SPLASH_MAGIC)
			.unwrap_or(false)
}

fn read_metadata_string(data: &[u8], offset: usize) -> Result<[u8; METADATA_STRING_LEN]> {
	let bytes = read_bytes(data, offset, METADATA_STRING_LEN)?;
	let mut out = [0u8; METADATA_STRING_LEN];
	out.copy_from_slice(bytes);
	Ok(out)
}

/// Parses an OPPO container. Rejects a bad magic at `0x4000`; preserves the
/// DDPH prefix (if present), the header's free-form fields, and every
/// metadata record, decoding each slot's BMP bit depth (but not its pixels
/// — those are decoded lazily via [`ImageSlot::decoded_rgba`]).
pub fn load(data: &[u8]) -> Result<BootImage> {
	if !looks_like_oppo(data) {
		return Err(BootError::malformed(
			"OPPO splash header magic \"SPLASH LOGO!\" not found at offset 0x4000",
		));
	}

	let ddph = {
		let candidate_magic = read_u32_le(data, 0).unwrap_or(0);
		if candidate_magic == DDPH_MAGIC {
			let flag = read_u32_le(data, 4)?;
			Some((candidate_magic, flag))
		} else {
			None
		}
	};

	let mut metadata = [[0u8; METADATA_STRING_LEN]; 3];
	for (i, slot) in metadata.iter_mut().enumerate() {
		*slot = read_metadata_string(data, SPLASH_HEADER_OFFSET + 12 + i * METADATA_STRING_LEN)?;
	}
	let zero_fill_offset = SPLASH_HEADER_OFFSET + 12 + 3 * METADATA_STRING_LEN;
	let zero_fill = read_metadata_string(data, zero_fill_offset)?;

	let fields_offset = zero_fill_offset + METADATA_STRING_LEN;
	let imgnumber = read_u32_le(data, fields_offset)? as usize;
	let unknown = read_u32_le(data, fields_offset + 4)?;
	let width = read_u32_le(data, fields_offset + 8)?;
	let height = read_u32_le(data, fields_offset + 12)?;
	let special = read_u32_le(data, fields_offset + 16)?;

	let mut images = Vec::with_capacity(imgnumber);
	for i in 0..imgnumber {
		let record_offset = METADATA_TABLE_OFFSET + i * METADATA_RECORD_LEN;
		let offset = read_u32_le(data, record_offset)? as usize;
		// realsz is not retained: it's recomputed from the decompressed BMP
		// size on every save rather than trusted from the loaded container.
		let _realsz = read_u32_le(data, record_offset + 4)?;
		let compsz = read_u32_le(data, record_offset + 8)? as usize;
		let name_bytes = read_bytes(data, record_offset + 12, METADATA_NAME_LEN)?;
		let name_len = name_bytes.iter().position(|&b| b == 0).unwrap_or(name_bytes.len());
		let name = String::from_utf8_lossy(&name_bytes[..name_len]).into_owned();

		let compressed = read_bytes(data, PAYLOAD_OFFSET + offset, compsz)?.to_vec();

		let (slot_width, slot_height, bit_depth) = {
			let raw = compress::gzip_decompress(&compressed)?;
			let (_, w, h, bit_depth) = pixel::decode_to_rgba(&raw)?;
			(w, h, bit_depth)
		};

		images.push(ImageSlot {
			index: i as u32,
			width: slot_width,
			height: slot_height,
			compressed,
			decoded_cache: None,
			native_format: NativeFormat::Oppo(bit_depth),
			name: Some(name),
		});
	}

	Ok(BootImage {
		format: BootFormat::Oppo,
		images,
		oppo_header: Some(OppoHeaderState {
			ddph,
			metadata,
			zero_fill,
			unknown,
			width,
			height,
			special,
		}),
	})
}

/// Serializes `image` back into an OPPO container: recomputes each
/// metadata record's `offset` as the running prefix-sum of `compsz`,
/// rewrites `realsz` from the current decompressed BMP size, and
/// byte-for-byte preserves every other header field from
/// [`OppoHeaderState`].
pub fn save(image: &BootImage) -> Result<Vec<u8>> {
	if image.format != BootFormat::Oppo {
		return Err(BootError::malformed("save(oppo) called on a non-OPPO BootImage"));
	}
	let header = image
		.oppo_header
		.as_ref()
		.ok_or_else(|| BootError::malformed("OPPO BootImage missing header state"))?;

	let imgnumber = image.images.len();

	let mut records = Vec::with_capacity(imgnumber);
	let mut running_offset = 0u32;
	for slot in &image.images {
		let realsz = compress::gzip_decompress(&slot.compressed)?.len() as u32;
		records.push((running_offset, realsz, slot.compressed.len() as u32));
		running_offset += slot.compressed.len() as u32;
	}

	let payload_len: usize = image.images.iter().map(|s| s.compressed.len()).sum();
	let mut out = vec![0u8; PAYLOAD_OFFSET + payload_len];

	if let Some((magic, flag)) = header.ddph {
		write_bytes_at(&mut out, 0, &magic.to_le_bytes());
		write_u32_le_at(&mut out, 4, flag);
	}

	write_bytes_at(&mut out, SPLASH_HEADER_OFFSET, SPLASH_MAGIC);
	for (i, string) in header.metadata.iter().enumerate() {
		write_bytes_at(&mut out, SPLASH_HEADER_OFFSET + 12 + i * METADATA_STRING_LEN, string);
	}
	let zero_fill_offset = SPLASH_HEADER_OFFSET + 12 + 3 * METADATA_STRING_LEN;
	write_bytes_at(&mut out, zero_fill_offset, &header.zero_fill);

	let fields_offset = zero_fill_offset + METADATA_STRING_LEN;
	write_u32_le_at(&mut out, fields_offset, imgnumber as u32);
	write_u32_le_at(&mut out, fields_offset + 4, header.unknown);
	write_u32_le_at(&mut out, fields_offset + 8, header.width);
	write_u32_le_at(&mut out, fields_offset + 12, header.height);
	write_u32_le_at(&mut out, fields_offset + 16, header.special);

	for (i, (slot, (offset, realsz, compsz))) in image.images.iter().zip(records).enumerate() {
		let record_offset = METADATA_TABLE_OFFSET + i * METADATA_RECORD_LEN;
		write_u32_le_at(&mut out, record_offset, offset);
		write_u32_le_at(&mut out, record_offset + 4, realsz);
		write_u32_le_at(&mut out, record_offset + 8, compsz);

		let mut name_field = [0u8; METADATA_NAME_LEN];
		if let Some(name) = &slot.name {
			let bytes = name.as_bytes();
			let len = bytes.len().min(METADATA_NAME_LEN);
			name_field[..len].copy_from_slice(&bytes[..len]);
		}
		write_bytes_at(&mut out, record_offset + 12, &name_field);

		write_bytes_at(&mut out, PAYLOAD_OFFSET + offset as usize, &slot.compressed);
	}

	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn build_minimal_container(width: u32, height: u32, bit_depth: u8, pixels: &[u8]) -> Vec<u8> {
		let bmp = pixel::encode_from_rgba(pixels, width, height, bit_depth).unwrap();
		let gz = compress::gzip_compress(&bmp, 6).unwrap();

		let payload_len = gz.len();
		let mut out = vec![0u8; PAYLOAD_OFFSET + payload_len];

		write_bytes_at(&mut out, 0, &DDPH_MAGIC.to_le_bytes());
		write_u32_le_at(&mut out, 4, 1);

		write_bytes_at(&mut out, SPLASH_HEADER_OFFSET, SPLASH_MAGIC);
		let fields_offset = SPLASH_HEADER_OFFSET + 12 + 3 * METADATA_STRING_LEN + METADATA_STRING_LEN;
		write_u32_le_at(&mut out, fields_offset, 1);
		write_u32_le_at(&mut out, fields_offset + 8, width);
		write_u32_le_at(&mut out, fields_offset + 12, height);

		let record_offset = METADATA_TABLE_OFFSET;
		write_u32_le_at(&mut out, record_offset, 0);
		write_u32_le_at(&mut out, record_offset + 4, bmp.len() as u32);
		write_u32_le_at(&mut out, record_offset + 8, payload_len as u32);
		write_bytes_at(&mut out, record_offset + 12, b"slot0");

		write_bytes_at(&mut out, PAYLOAD_OFFSET, &gz);

		out
	}

	#[test]
	fn round_trip_with_no_modifications_is_byte_identical() {
		let pixels = vec![9u8, 8, 7, 255].repeat(4 * 4);
		let container = build_minimal_container(4, 4, 32, &pixels);
		let image = load(&container).unwrap();
		let resaved = save(&image).unwrap();
		assert_eq!(resaved, container);
	}

	#[test]
	fn ddph_is_preserved() {
		let pixels = vec![1u8, 2, 3, 255].repeat(2 * 2);
		let container = build_minimal_container(2, 2, 32, &pixels);
		let image = load(&container).unwrap();
		assert_eq!(image.oppo_header.as_ref().unwrap().ddph, Some((DDPH_MAGIC, 1)));
	}

	#[test]
	fn wrong_magic_is_malformed() {
		let container = vec![0u8; PAYLOAD_OFFSET + 16];
		assert!(matches!(load(&container), Err(BootError::Malformed(_))));
	}

	#[test]
	fn replace_preserving_32bit_keeps_nonzero_alpha() {
		let pixels = vec![5u8, 6, 7, 255].repeat(2 * 2);
		let container = build_minimal_container(2, 2, 32, &pixels);
		let mut image = load(&container).unwrap();

		let replacement = vec![10u8, 20, 30, 200].repeat(2 * 2);
		image.replace_image(0, &replacement, 2, 2).unwrap();

		let resaved = save(&image).unwrap();
		let mut reloaded = load(&resaved).unwrap();
		let decoded = reloaded.images[0].decoded_rgba().unwrap();
		assert!(decoded.chunks_exact(4).all(|p| p == [10, 20, 30, 200]));
		assert!(matches!(reloaded.images[0].native_format, NativeFormat::Oppo(32)));
	}

	#[test]
	fn replace_path_does_not_force_alpha_but_read_path_does_on_zero() {
		let pixels = vec![1u8, 1, 1, 255].repeat(2 * 2);
		let container = build_minimal_container(2, 2, 32, &pixels);
		let mut image = load(&container).unwrap();

		let replacement = vec![9u8, 9, 9, 0].repeat(2 * 2);
		image.replace_image(0, &replacement, 2, 2).unwrap();
		let resaved = save(&image).unwrap();
		let mut reloaded = load(&resaved).unwrap();
		let decoded = reloaded.images[0].decoded_rgba().unwrap();
		assert!(decoded.chunks_exact(4).all(|p| p[3] == 255));
	}

	/// Builds a two-slot container whose header-level `width`/`height` are a
	/// display resolution that neither slot's own BMP actually matches —
	/// mirroring a real multi-resolution splash (e.g. a portrait boot logo
	/// alongside a smaller square charging icon).
	fn build_multi_res_container(
		header_width: u32,
		header_height: u32,
		slots: &[(u32, u32, u8, &[u8])],
	) -> Vec<u8> {
		let framed: Vec<Vec<u8>> = slots
			.iter()
			.map(|(w, h, bit_depth, pixels)| {
				let bmp = pixel::encode_from_rgba(pixels, *w, *h, *bit_depth).unwrap();
				compress::gzip_compress(&bmp, 6).unwrap()
			})
			.collect();

		let payload_len: usize = framed.iter().map(|gz| gz.len()).sum();
		let mut out = vec![0u8; PAYLOAD_OFFSET + payload_len];

		write_bytes_at(&mut out, 0, &DDPH_MAGIC.to_le_bytes());
		write_u32_le_at(&mut out, 4, 1);

		write_bytes_at(&mut out, SPLASH_HEADER_OFFSET, SPLASH_MAGIC);
		let fields_offset = SPLASH_HEADER_OFFSET + 12 + 3 * METADATA_STRING_LEN + METADATA_STRING_LEN;
		write_u32_le_at(&mut out, fields_offset, slots.len() as u32);
		write_u32_le_at(&mut out, fields_offset + 8, header_width);
		write_u32_le_at(&mut out, fields_offset + 12, header_height);

		let mut running_offset = 0u32;
		for (i, gz) in framed.iter().enumerate() {
			let record_offset = METADATA_TABLE_OFFSET + i * METADATA_RECORD_LEN;
			write_u32_le_at(&mut out, record_offset, running_offset);
			write_u32_le_at(&mut out, record_offset + 8, gz.len() as u32);
			write_bytes_at(&mut out, record_offset + 12, format!("slot{i}").as_bytes());

			write_bytes_at(&mut out, PAYLOAD_OFFSET + running_offset as usize, gz);
			running_offset += gz.len() as u32;
		}

		out
	}

	#[test]
	fn slot_dimensions_come_from_its_own_bmp_not_the_header() {
		let boot_logo = vec![9u8, 8, 7, 255].repeat(6 * 10);
		let charging_icon = vec![1u8, 2, 3, 255].repeat(3 * 3);
		let container = build_multi_res_container(
			6,
			10,
			&[(6, 10, 32, &boot_logo), (3, 3, 24, &charging_icon)],
		);

		let image = load(&container).unwrap();
		assert_eq!((image.images[0].width, image.images[0].height), (6, 10));
		assert_eq!((image.images[1].width, image.images[1].height), (3, 3));

		let header = image.oppo_header.as_ref().unwrap();
		assert_eq!((header.width, header.height), (6, 10));
	}

	#[test]
	fn differing_resolution_slot_round_trips_through_unpack_and_replace() {
		let boot_logo = vec![9u8, 8, 7, 255].repeat(6 * 10);
		let charging_icon = vec![1u8, 2, 3, 255].repeat(3 * 3);
		let container = build_multi_res_container(
			6,
			10,
			&[(6, 10, 32, &boot_logo), (3, 3, 24, &charging_icon)],
		);
		let mut image = load(&container).unwrap();

		// The smaller slot must decode at its own size, not the header's.
		let decoded = image.images[1].decoded_rgba().unwrap();
		assert_eq!(decoded.len(), 3 * 3 * 4);

		let replacement = vec![50u8, 60, 70, 255].repeat(3 * 3);
		image.replace_image(1, &replacement, 3, 3).unwrap();

		let resaved = save(&image).unwrap();
		let mut reloaded = load(&resaved).unwrap();
		assert_eq!((reloaded.images[1].width, reloaded.images[1].height), (3, 3));
		assert_eq!((reloaded.images[0].width, reloaded.images[0].height), (6, 10));

		let decoded = reloaded.images[1].decoded_rgba().unwrap();
		assert!(decoded.chunks_exact(4).all(|p| p == [50, 60, 70, 255]));
	}
}
