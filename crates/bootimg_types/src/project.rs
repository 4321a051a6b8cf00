//! Project workspace: unpacking a container into a folder of PNGs plus a
//! `.bootmod` descriptor, and rebuilding a container from that folder
//! (spec.md §4.H).
//!
//! # Examples
//!
//! ```no_run
//! use bootimg_types::project::Project;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let project = Project::unpack("logo.bin", "logo-project")?;
//! println!("unpacked {} slots", project.image.images.len());
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::compress;
use crate::error::{BootError, BootFormat, Result};
use crate::format;
use crate::model::{BootImage, ImageSlot, NativeFormat};
use crate::pixel::{self, ColorMode};

const DESCRIPTOR_FILENAME: &str = ".bootmod";
const IMAGES_DIRNAME: &str = "images";
const README_FILENAME: &str = "README.txt";
const TOOL_NAME: &str = "bootimg";
const DESCRIPTOR_VERSION: &str = "1";

/// The `.bootmod` JSON descriptor written alongside a project's `images/`
/// folder (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootmodDescriptor {
	pub version: String,
	#[serde(rename = "type")]
	pub project_type: String,
	pub format: String,
	pub created: String,
	pub tool: String,
	pub logo_count: usize,
	pub original_file: String,
}

/// An on-disk working folder for one container, plus the in-memory image
/// this session has loaded or rebuilt from it.
#[derive(Debug)]
pub struct Project {
	pub dir: PathBuf,
	pub descriptor: BootmodDescriptor,
	pub image: BootImage,
}

fn mtk_png_filename(index: u32, width: u32, height: u32) -> String {
	format!("logo_{index}_{width}x{height}.png")
}

fn oppo_png_filename(index: u32) -> String {
	format!("image_{index}.png")
}

/// Parses the 1-based index out of a `logo_{N}_{W}x{H}.png` filename.
/// Returns `None` for anything that doesn't match the pattern, so the
/// directory listing can safely ignore incidental files.
fn parse_mtk_index(filename: &str) -> Option<u32> {
	let stem = filename.strip_suffix(".png")?;
	let rest = stem.strip_prefix("logo_")?;
	let (index_str, _dims) = rest.split_once('_')?;
	index_str.parse().ok()
}

fn save_png(path: &Path, rgba: &[u8], width: u32, height: u32) -> Result<()> {
	let buf = image::RgbaImage::from_raw(width, height, rgba.to_vec())
		.ok_or_else(|| BootError::malformed("RGBA buffer does not match its own dimensions"))?;
	buf.save(path)
		.map_err(|e| BootError::malformed(format!("failed to write PNG {}: {e}", path.display())))
}

fn load_png(path: &Path) -> Result<(Vec<u8>, u32, u32)> {
	let img = image::open(path)
		.map_err(|e| BootError::project_invalid(format!("failed to read PNG {}: {e}", path.display())))?
		.to_rgba8();
	let (width, height) = img.dimensions();
	Ok((img.into_raw(), width, height))
}

impl Project {
	/// Unpacks `container_path` into the empty directory `dir`: a PNG per
	/// slot under `images/`, a `.bootmod` descriptor, and a README.
	///
	/// Fails with [`BootError::ProjectInvalid`] if `dir` already exists and
	/// is non-empty.
	pub fn unpack(container_path: impl AsRef<Path>, dir: impl AsRef<Path>) -> Result<Project> {
		let container_path = container_path.as_ref();
		let data = crate::io::load_file(container_path)?;
		let image = format::load(&data)?;
		Project::unpack_image(image, dir, container_path)
	}

	/// Writes an already-loaded [`BootImage`] out as a project directory.
	///
	/// Split out from [`Project::unpack`] so callers that need to adjust the
	/// loaded image first (e.g. the CLI's `--mode` override for MTK) can
	/// unpack the adjusted image without re-parsing the container.
	/// `container_path` is only used to populate the `.bootmod` descriptor's
	/// `original_file` field.
	pub fn unpack_image(
		mut image: BootImage,
		dir: impl AsRef<Path>,
		container_path: impl AsRef<Path>,
	) -> Result<Project> {
		let dir = dir.as_ref();
		let container_path = container_path.as_ref();

		if dir.exists() && fs::read_dir(dir)?.next().is_some() {
			return Err(BootError::project_invalid(format!(
				"{} is not empty",
				dir.display()
			)));
		}
		fs::create_dir_all(dir)?;
		let images_dir = dir.join(IMAGES_DIRNAME);
		fs::create_dir_all(&images_dir)?;

		for slot in &mut image.images {
			if slot.width == 0 || slot.height == 0 {
				// Dimensions unknown (spec.md §4.F): no PNG is written for
				// this slot, but its compressed bytes still round-trip
				// through the container unmodified.
				continue;
			}
			let rgba = slot.decoded_rgba()?.to_vec();
			let filename = match image.format {
				BootFormat::Mtk => mtk_png_filename(slot.index, slot.width, slot.height),
				BootFormat::Oppo => oppo_png_filename(slot.index),
			};
			save_png(&images_dir.join(filename), &rgba, slot.width, slot.height)?;
		}

		let descriptor = BootmodDescriptor {
			version: DESCRIPTOR_VERSION.to_string(),
			project_type: "bootmod-project".to_string(),
			format: image.format.descriptor_name().to_string(),
			created: Utc::now().to_rfc3339(),
			tool: TOOL_NAME.to_string(),
			logo_count: image.images.len(),
			original_file: match image.format {
				BootFormat::Mtk => container_path
					.file_name()
					.map(|n| n.to_string_lossy().into_owned())
					.unwrap_or_default(),
				BootFormat::Oppo => container_path
					.canonicalize()
					.unwrap_or_else(|_| container_path.to_path_buf())
					.to_string_lossy()
					.into_owned(),
			},
		};
		fs::write(
			dir.join(DESCRIPTOR_FILENAME),
			serde_json::to_string_pretty(&descriptor).map_err(|e| {
				BootError::project_invalid(format!("failed to serialize .bootmod: {e}"))
			})?,
		)?;
		fs::write(
			dir.join(README_FILENAME),
			format!(
				"This directory is a bootimg project unpacked from {}.\n\
				 Edit the PNGs under images/ and repack with `bootimg` or `Project::open`.\n\
				 Do not edit .bootmod by hand; it is regenerated on unpack.\n",
				container_path.display()
			),
		)?;

		Ok(Project { dir: dir.to_path_buf(), descriptor, image })
	}

	/// Reopens a project directory previously created by [`Project::unpack`],
	/// rebuilding a [`BootImage`] from its PNGs and `.bootmod` descriptor.
	pub fn open(dir: impl AsRef<Path>) -> Result<Project> {
		let dir = dir.as_ref();
		let descriptor_path = dir.join(DESCRIPTOR_FILENAME);
		let images_dir = dir.join(IMAGES_DIRNAME);

		if !descriptor_path.is_file() {
			return Err(BootError::project_invalid(format!(
				"{} is missing",
				descriptor_path.display()
			)));
		}
		if !images_dir.is_dir() {
			return Err(BootError::project_invalid(format!(
				"{} is missing",
				images_dir.display()
			)));
		}

		let descriptor: BootmodDescriptor = serde_json::from_str(&fs::read_to_string(&descriptor_path)?)
			.map_err(|e| BootError::project_invalid(format!("malformed .bootmod: {e}")))?;

		let image = match BootFormat::parse_descriptor_name(&descriptor.format) {
			Some(BootFormat::Mtk) => rebuild_mtk(&images_dir)?,
			Some(BootFormat::Oppo) => rebuild_oppo(dir, &images_dir, &descriptor)?,
			None => {
				return Err(BootError::project_invalid(format!(
					"unknown project format {:?}",
					descriptor.format
				)));
			}
		};

		Ok(Project { dir: dir.to_path_buf(), descriptor, image })
	}

	/// Project-mode replace (spec.md §4.H): validates dimensions, re-encodes
	/// through the slot's native format, and updates both the in-memory
	/// slot and its on-disk PNG. Leaves everything untouched on error.
	pub fn replace_image(&mut self, index: u32, png_path: impl AsRef<Path>) -> Result<()> {
		let (rgba, width, height) = load_png(png_path.as_ref())?;
		self.image.replace_image(index, &rgba, width, height)?;

		let images_dir = self.dir.join(IMAGES_DIRNAME);
		let filename = match self.image.format {
			BootFormat::Mtk => mtk_png_filename(index, width, height),
			BootFormat::Oppo => oppo_png_filename(index),
		};
		save_png(&images_dir.join(filename), &rgba, width, height)
	}

	/// Reloads the entire MTK image list from `images/`, replacing in-memory
	/// state wholesale. No edit history is preserved (spec.md §4.H).
	pub fn rescan_mtk(&mut self) -> Result<()> {
		if self.image.format != BootFormat::Mtk {
			return Err(BootError::project_invalid("rescan is only defined for MTK projects"));
		}
		self.image = rebuild_mtk(&self.dir.join(IMAGES_DIRNAME))?;
		Ok(())
	}
}

/// Rebuilds an MTK `BootImage` from `images/logo_*.png`, sorted by the
/// numeric index parsed from each filename (not lexicographically).
fn rebuild_mtk(images_dir: &Path) -> Result<BootImage> {
	let mut entries: Vec<(u32, PathBuf)> = fs::read_dir(images_dir)?
		.filter_map(|e| e.ok())
		.filter_map(|e| {
			let name = e.file_name().to_string_lossy().into_owned();
			parse_mtk_index(&name).map(|index| (index, e.path()))
		})
		.collect();
	entries.sort_by_key(|(index, _)| *index);

	if entries.is_empty() {
		return Err(BootError::project_invalid(format!(
			"{} contains no logo_*.png files",
			images_dir.display()
		)));
	}

	let mut images = Vec::with_capacity(entries.len());
	for (index, path) in entries {
		let (rgba, width, height) = load_png(&path)?;
		let raw = pixel::from_rgba(&rgba, ColorMode::BgraLe)?;
		let compressed = compress::zlib_deflate(&raw, 9)?;
		images.push(ImageSlot {
			index,
			width,
			height,
			compressed,
			decoded_cache: Some(rgba),
			native_format: NativeFormat::Mtk(ColorMode::BgraLe),
			name: None,
		});
	}

	Ok(BootImage { format: BootFormat::Mtk, images, oppo_header: None })
}

/// Rebuilds an OPPO `BootImage` by locating the original `splash.img` named
/// in the descriptor (checked as an absolute path, then relative to `dir`,
/// then relative to `dir`'s parent), loading it to recover header and
/// metadata, and running the replace pipeline for each `images/image_{i}.png`.
fn rebuild_oppo(dir: &Path, images_dir: &Path, descriptor: &BootmodDescriptor) -> Result<BootImage> {
	let original_path = locate_original_file(dir, &descriptor.original_file)?;
	let data = crate::io::load_file(&original_path)?;
	let mut image = format::load(&data)?;

	for slot in &mut image.images {
		let png_path = images_dir.join(oppo_png_filename(slot.index));
		if !png_path.is_file() {
			continue;
		}
		let (rgba, width, height) = load_png(&png_path)?;
		image_slot_replace(slot, &rgba, width, height)?;
	}

	Ok(image)
}

fn image_slot_replace(slot: &mut ImageSlot, rgba: &[u8], width: u32, height: u32) -> Result<()> {
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

fn locate_original_file(dir: &Path, original_file: &str) -> Result<PathBuf> {
	let as_absolute = Path::new(original_file);
	if as_absolute.is_absolute() && as_absolute.is_file() {
		return Ok(as_absolute.to_path_buf());
	}
	let in_project = dir.join(original_file);
	if in_project.is_file() {
		return Ok(in_project);
	}
	if let Some(parent) = dir.parent() {
		let in_parent = parent.join(original_file);
		if in_parent.is_file() {
			return Ok(in_parent);
		}
	}
	Err(BootError::project_invalid(format!(
		"could not locate original splash.img \"{original_file}\" (checked absolute path, project directory, and parent directory)"
	)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	fn solid_rgba(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
		(0..width as usize * height as usize).flat_map(|_| color).collect()
	}

	fn build_mtk_container(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
		let rgba = solid_rgba(width, height, color);
		let raw = pixel::from_rgba(&rgba, ColorMode::BgraLe).unwrap();
		let blob = compress::zlib_deflate(&raw, 9).unwrap();

		let header_size = 512usize;
		let table_offsets_start = 8usize;
		let block_size = table_offsets_start + 4 + blob.len();

		let mut out = vec![0xFFu8; header_size];
		out[0..4].copy_from_slice(&0x8816_8858u32.to_be_bytes());
		out[4..8].copy_from_slice(&(block_size as u32).to_le_bytes());
		out[8..12].copy_from_slice(b"LOGO");
		for b in &mut out[12..40] {
			*b = 0;
		}
		out.extend_from_slice(&1u32.to_le_bytes());
		out.extend_from_slice(&(block_size as u32).to_le_bytes());
		out.extend_from_slice(&((table_offsets_start + 4) as u32).to_le_bytes());
		out.extend_from_slice(&blob);
		out
	}

	#[test]
	fn unpack_then_open_round_trips_mtk_pixels() {
		let dir = tempdir().unwrap();
		let container_path = dir.path().join("logo.bin");
		fs::write(&container_path, build_mtk_container(4, 4, [1, 2, 3, 255])).unwrap();

		let project_dir = dir.path().join("project");
		let project = Project::unpack(&container_path, &project_dir).unwrap();
		assert_eq!(project.descriptor.format, "mtk");
		assert!(project_dir.join(IMAGES_DIRNAME).join("logo_1_4x4.png").is_file());

		let reopened = Project::open(&project_dir).unwrap();
		assert_eq!(reopened.image.images.len(), 1);
	}

	#[test]
	fn unpack_into_nonempty_directory_is_rejected() {
		let dir = tempdir().unwrap();
		fs::write(dir.path().join("stray.txt"), b"hi").unwrap();
		let container_path = dir.path().join("logo.bin");
		fs::write(&container_path, build_mtk_container(2, 2, [0, 0, 0, 255])).unwrap();

		assert!(matches!(
			Project::unpack(&container_path, dir.path()),
			Err(BootError::ProjectInvalid(_))
		));
	}

	#[test]
	fn mtk_index_parsing_ignores_incidental_files() {
		assert_eq!(parse_mtk_index("logo_1_720x1280.png"), Some(1));
		assert_eq!(parse_mtk_index("README.txt"), None);
	}
}
