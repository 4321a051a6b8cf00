//! BMP ↔ RGBA conversion for OPPO splash payloads.
//!
//! OPPO stores each slot as a gzip-framed Windows BMP (8/24/32-bit, rows
//! bottom-up and padded to 4-byte multiples). This module only speaks that
//! one dialect — uncompressed `BITMAPINFOHEADER` files with no compression,
//! no color-space information, no top-down variant — since that is all the
//! container ever produces or consumes.

use crate::error::{BootError, Result};
use crate::io::{read_bytes, read_u16_le, read_u32_le};

const FILE_HEADER_LEN: usize = 14;
const DIB_HEADER_LEN: usize = 40;
const PIXEL_DATA_OFFSET_8BIT: usize = FILE_HEADER_LEN + DIB_HEADER_LEN + 256 * 4;
const PIXEL_DATA_OFFSET: usize = FILE_HEADER_LEN + DIB_HEADER_LEN;

fn row_stride(width: u32, bytes_per_pixel: u32) -> usize {
	let raw = width as usize * bytes_per_pixel as usize;
	(raw + 3) & !3
}

/// Decodes a BMP byte stream into canonical top-down RGBA8888.
///
/// Returns `(rgba, width, height, bit_depth)`. For 32-bit source images, a
/// pixel whose alpha byte is 0 is normalized to 255 — splash screens are
/// always opaque on-device and firmware does not populate this field
/// reliably. This normalization happens only here, on the read path; the
/// write path ([`encode_from_rgba`]) passes alpha through unchanged, which
/// is why a replace-then-reload round-trip can observe alpha values the
/// original capture never had.
pub fn decode_to_rgba(data: &[u8]) -> Result<(Vec<u8>, u32, u32, u8)> {
	if read_bytes(data, 0, 2)? != b"BM" {
		return Err(BootError::malformed("BMP missing 'BM' signature"));
	}

	let data_offset = read_u32_le(data, 10)? as usize;
	let width = read_u32_le(data, 18)?;
	let height = read_u32_le(data, 22)?;
	let bit_depth = read_u16_le(data, 28)? as u8;

	if !matches!(bit_depth, 8 | 24 | 32) {
		return Err(BootError::malformed(format!(
			"unsupported BMP bit depth {bit_depth}"
		)));
	}

	let bytes_per_pixel = (bit_depth / 8) as u32;
	let stride = row_stride(width, bytes_per_pixel);
	let mut rgba = vec![0u8; width as usize * height as usize * 4];

	let palette = if bit_depth == 8 {
		Some(read_bytes(data, PIXEL_DATA_OFFSET_8BIT - 256 * 4, 256 * 4)?)
	} else {
		None
	};

	for y_top in 0..height as usize {
		let src_row = height as usize - 1 - y_top;
		let row_bytes = read_bytes(data, data_offset + src_row * stride, stride)?;
		let dst_row = &mut rgba[y_top * width as usize * 4..(y_top + 1) * width as usize * 4];

		match bit_depth {
			8 => {
				let palette = palette.unwrap();
				for (x, dst) in dst_row.chunks_exact_mut(4).enumerate() {
					let index = row_bytes[x] as usize;
					let entry = &palette[index * 4..index * 4 + 4];
					dst.copy_from_slice(&[entry[2], entry[1], entry[0], 255]);
				}
			}
			24 => {
				for (x, dst) in dst_row.chunks_exact_mut(4).enumerate() {
					let src = &row_bytes[x * 3..x * 3 + 3];
					dst.copy_from_slice(&[src[2], src[1], src[0], 255]);
				}
			}
			32 => {
				for (x, dst) in dst_row.chunks_exact_mut(4).enumerate() {
					let src = &row_bytes[x * 4..x * 4 + 4];
					let alpha = if src[3] == 0 { 255 } else { src[3] };
					dst.copy_from_slice(&[src[2], src[1], src[0], alpha]);
				}
			}
			_ => unreachable!(),
		}
	}

	Ok((rgba, width, height, bit_depth))
}

/// Encodes canonical RGBA8888 `rgba` into a BMP at the given `bit_depth`
/// (24 or 32 only — the write path never chooses 8-bit, since the original
/// bit depth detected on read is always preserved).
///
/// Alpha is passed through unchanged for 32-bit output; see [`decode_to_rgba`]
/// for why this is intentionally asymmetric with the read path.
pub fn encode_from_rgba(rgba: &[u8], width: u32, height: u32, bit_depth: u8) -> Result<Vec<u8>> {
	if !matches!(bit_depth, 24 | 32) {
		return Err(BootError::malformed(format!(
			"cannot encode BMP at bit depth {bit_depth}, only 24 or 32 are supported"
		)));
	}
	if rgba.len() != width as usize * height as usize * 4 {
		return Err(BootError::malformed(format!(
			"RGBA buffer length {} does not match {width}x{height}",
			rgba.len()
		)));
	}

	let bytes_per_pixel = (bit_depth / 8) as u32;
	let stride = row_stride(width, bytes_per_pixel);
	let pixel_data_len = stride * height as usize;
	let file_size = PIXEL_DATA_OFFSET + pixel_data_len;

	let mut out = vec![0u8; PIXEL_DATA_OFFSET];
	out[0] = b'B';
	out[1] = b'M';
	out[2..6].copy_from_slice(&(file_size as u32).to_le_bytes());
	out[10..14].copy_from_slice(&(PIXEL_DATA_OFFSET as u32).to_le_bytes());

	out[14..18].copy_from_slice(&(DIB_HEADER_LEN as u32).to_le_bytes());
	out[18..22].copy_from_slice(&width.to_le_bytes());
	out[22..26].copy_from_slice(&height.to_le_bytes());
	out[26..28].copy_from_slice(&1u16.to_le_bytes());
	out[28..30].copy_from_slice(&(bit_depth as u16).to_le_bytes());
	out[34..38].copy_from_slice(&(pixel_data_len as u32).to_le_bytes());

	out.resize(file_size, 0);

	for y_top in 0..height as usize {
		let dst_row = height as usize - 1 - y_top;
		let src_row = &rgba[y_top * width as usize * 4..(y_top + 1) * width as usize * 4];
		let row_start = PIXEL_DATA_OFFSET + dst_row * stride;

		match bit_depth {
			24 => {
				for (x, px) in src_row.chunks_exact(4).enumerate() {
					let dst = row_start + x * 3;
					out[dst..dst + 3].copy_from_slice(&[px[2], px[1], px[0]]);
				}
			}
			32 => {
				for (x, px) in src_row.chunks_exact(4).enumerate() {
					let dst = row_start + x * 4;
					out[dst..dst + 4].copy_from_slice(&[px[2], px[1], px[0], px[3]]);
				}
			}
			_ => unreachable!(),
		}
	}

	Ok(out)
}
