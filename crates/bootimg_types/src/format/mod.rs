//! Container format backends and the dispatcher that sniffs which one a
//! file uses (spec.md §4.G).

pub mod mtk;
pub mod oppo;

use crate::error::{BootError, BootFormat, Result};
use crate::model::BootImage;

/// Classifies `data` as MTK, OPPO, or neither.
///
/// OPPO is checked first since its magic sits at a fixed offset regardless
/// of what happens to occupy the first four bytes; MTK is then checked by
/// its big-endian magic at offset 0. Extension is never consulted.
pub fn sniff(data: &[u8]) -> Option<BootFormat> {
	if oppo::looks_like_oppo(data) {
		Some(BootFormat::Oppo)
	} else if mtk::looks_like_mtk(data) {
		Some(BootFormat::Mtk)
	} else {
		None
	}
}

/// Sniffs `data`'s format and parses it, or fails with
/// [`BootError::UnsupportedFormat`] if neither container is recognized.
pub fn load(data: &[u8]) -> Result<BootImage> {
	match sniff(data) {
		Some(BootFormat::Mtk) => mtk::load(data),
		Some(BootFormat::Oppo) => oppo::load(data),
		None => Err(BootError::UnsupportedFormat),
	}
}

/// Serializes `image` through the backend matching its own `format` field.
pub fn save(image: &BootImage) -> Result<Vec<u8>> {
	match image.format {
		BootFormat::Mtk => mtk::save(image),
		BootFormat::Oppo => oppo::save(image),
	}
}
