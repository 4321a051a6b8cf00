//! Error types for the boot-image codec.

use thiserror::Error;

/// Result alias used throughout the codec.
pub type Result<T> = std::result::Result<T, BootError>;

/// Errors produced while parsing, converting, or reassembling a boot-logo
/// container.
///
/// Recovery policy: the codec never retries internally. Every fallible
/// operation returns one of these variants to the caller, who decides what
/// to do next. `replace_image` restores the slot's prior `compressed` bytes
/// before propagating an error, so a failed replace never leaves a
/// `BootImage` half-mutated.
#[derive(Debug, Error)]
pub enum BootError {
	/// Container header or table failed validation. Not recoverable for the
	/// current operation.
	#[error("malformed container: {0}")]
	Malformed(String),

	/// The format dispatcher could not recognize the file.
	#[error("unrecognized boot image format")]
	UnsupportedFormat,

	/// `inflate`/`deflate` (or the gzip framing around it) failed.
	///
	/// For OPPO containers this is fatal for the load, since every slot
	/// must decode. For MTK containers a blob that fails to inflate is
	/// degraded to "raw opaque" by the caller rather than surfaced as a
	/// load failure; this variant is returned only from the codec
	/// functions themselves, not from [`crate::format::mtk::load`].
	#[error("compression failure: {0}")]
	CompressionFailed(String),

	/// A replacement PNG's dimensions did not match the slot being
	/// replaced.
	#[error("dimension mismatch: slot is {slot_width}x{slot_height}, replacement is {image_width}x{image_height}")]
	DimensionMismatch {
		/// Width recorded on the slot being replaced.
		slot_width: u32,
		/// Height recorded on the slot being replaced.
		slot_height: u32,
		/// Width of the replacement image.
		image_width: u32,
		/// Height of the replacement image.
		image_height: u32,
	},

	/// A project directory's `.bootmod` descriptor or `images/` folder is
	/// missing or malformed, or an OPPO project's original container could
	/// not be located.
	#[error("invalid project: {0}")]
	ProjectInvalid(String),

	/// A file could not be opened, read, or written.
	#[error(transparent)]
	IoError(#[from] std::io::Error),
}

/// Which container kind a file was recognized as by [`crate::format::sniff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootFormat {
	/// MediaTek `logo.bin`.
	Mtk,
	/// Qualcomm/OPPO `splash.img`.
	Oppo,
}

impl BootFormat {
	/// The `.bootmod` descriptor's `format` field spelling for this kind:
	/// `"mtk"` or `"snapdragon"`.
	pub fn descriptor_name(self) -> &'static str {
		match self {
			BootFormat::Mtk => "mtk",
			BootFormat::Oppo => "snapdragon",
		}
	}

	/// Parses a `.bootmod` descriptor's `format` field back into a `BootFormat`.
	pub fn parse_descriptor_name(name: &str) -> Option<Self> {
		match name {
			"mtk" => Some(BootFormat::Mtk),
			"snapdragon" => Some(BootFormat::Oppo),
			_ => None,
		}
	}
}

impl BootError {
	/// Shorthand for a [`BootError::Malformed`] built from a `format!`-style
	/// message.
	pub fn malformed(msg: impl Into<String>) -> Self {
		BootError::Malformed(msg.into())
	}

	/// Shorthand for a [`BootError::ProjectInvalid`] built from a
	/// `format!`-style message.
	pub fn project_invalid(msg: impl Into<String>) -> Self {
		BootError::ProjectInvalid(msg.into())
	}
}
