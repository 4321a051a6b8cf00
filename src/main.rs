//! Command-line front end for `bootimg`: unpack/repack MTK and OPPO boot
//! containers, inspect them, and edit single slots.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bootimg::bootimg_types;
use bootimg::prelude::*;
use clap::{Parser, Subcommand};
use log::{debug, info, warn};

#[derive(Parser)]
#[command(name = "bootimg")]
#[command(author = "bootimg project")]
#[command(version)]
#[command(about = "Universal boot-logo/splash-image editor core for Android-class devices", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Show verbose (debug-level) output.
	#[arg(short, long, global = true)]
	verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Unpack a logo.bin/splash.img into a project directory of PNGs.
	Unpack {
		/// Input container (logo.bin or splash.img).
		input: PathBuf,

		/// Directory to create; must not already contain files.
		output_dir: PathBuf,

		/// Force MTK blob interpretation to this color mode instead of the
		/// auto-inferred one. One of: rgbale, rgbabe, bgrale, bgrabe,
		/// rgb565le, rgb565be. Ignored for OPPO containers.
		#[arg(long, value_name = "COLOR_MODE")]
		mode: Option<String>,

		/// Comma-separated slot indices to unpack (1-based for MTK, 0-based
		/// for OPPO). Default: all slots.
		#[arg(long, value_name = "N,M,...")]
		slots: Option<String>,

		/// Also dump each slot's raw compressed bytes as logo_{N}_raw.z,
		/// in addition to (or instead of, for slots with unknown dimensions)
		/// the decoded PNG. MTK only.
		#[arg(long)]
		raw: bool,

		/// Accepted for parity with the original tool; currently has no
		/// effect on the pixel pipeline.
		#[arg(long)]
		flip: bool,
	},

	/// Rebuild an MTK logo.bin from individual logo_{N}_{mode}.png /
	/// logo_{N}_raw.z files.
	Repack {
		/// Output logo.bin path.
		output: PathBuf,

		/// Input files, each named logo_{N}_{mode}.png or logo_{N}_raw.z.
		#[arg(required = true)]
		files: Vec<PathBuf>,

		/// Accepted for parity with the original tool; currently has no
		/// effect on the pixel pipeline.
		#[arg(long)]
		strip_alpha: bool,
	},

	/// Print a header/slot summary of a container.
	Info {
		/// Input container (logo.bin or splash.img).
		input: PathBuf,
	},

	/// Extract one OPPO slot to a PNG.
	Extract {
		/// Input splash.img.
		input: PathBuf,

		/// 0-based slot index.
		index: u32,

		/// Output PNG path.
		output: PathBuf,
	},

	/// Replace one OPPO slot's pixels and write a new splash.img.
	Replace {
		/// Input splash.img.
		input: PathBuf,

		/// 0-based slot index.
		index: u32,

		/// Replacement PNG; dimensions must match the slot exactly.
		png: PathBuf,

		/// Output splash.img path.
		output: PathBuf,
	},

	/// Print version information.
	Version,
}

fn main() -> ExitCode {
	let cli = Cli::parse();

	let level = if cli.verbose { "debug" } else { "info" };
	env_logger::init_from_env(env_logger::Env::default().default_filter_or(level));

	let result = match cli.command {
		Commands::Unpack { input, output_dir, mode, slots, raw, flip } => {
			cmd_unpack(&input, &output_dir, mode.as_deref(), slots.as_deref(), raw, flip)
		}
		Commands::Repack { output, files, strip_alpha } => cmd_repack(&output, &files, strip_alpha),
		Commands::Info { input } => cmd_info(&input),
		Commands::Extract { input, index, output } => cmd_extract(&input, index, &output),
		Commands::Replace { input, index, png, output } => cmd_replace(&input, index, &png, &output),
		Commands::Version => {
			println!("bootimg {}", env!("CARGO_PKG_VERSION"));
			Ok(())
		}
	};

	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("error: {e}");
			ExitCode::FAILURE
		}
	}
}

fn parse_slot_filter(slots: Option<&str>) -> Result<Option<Vec<u32>>> {
	let Some(raw) = slots else { return Ok(None) };
	let mut parsed = Vec::new();
	for piece in raw.split(',') {
		let piece = piece.trim();
		if piece.is_empty() {
			continue;
		}
		let index: u32 = piece
			.parse()
			.map_err(|_| BootError::malformed(format!("invalid --slots entry {piece:?}")))?;
		parsed.push(index);
	}
	Ok(Some(parsed))
}

fn raw_dump_filename(index: u32) -> String {
	format!("logo_{index}_raw.z")
}

fn cmd_unpack(
	input: &Path,
	output_dir: &Path,
	mode: Option<&str>,
	slots: Option<&str>,
	raw: bool,
	flip: bool,
) -> Result<()> {
	if flip {
		warn!("--flip was given; it currently has no effect on the pixel pipeline");
	}

	info!("loading {}", input.display());
	let bytes = bootimg_types::io::load_file(input)?;
	let mut image = format::load(&bytes)?;
	debug!("sniffed format {:?} with {} slot(s)", image.format, image.images.len());

	// Project-mode unpack always picks the auto-inferred native mode per
	// slot; --mode only matters as an explicit override (SPEC_FULL.md §3.3 /
	// §4 Open Questions — the original CLI's BGRA_BE default never applies
	// here since project mode never falls back to a single blanket mode).
	if let Some(mode_name) = mode {
		if image.format != BootFormat::Mtk {
			warn!("--mode is ignored for non-MTK containers");
		} else {
			let color_mode = ColorMode::parse(mode_name)
				.ok_or_else(|| BootError::malformed(format!("unknown color mode {mode_name:?}")))?;
			info!("forcing MTK color mode to {color_mode}");
			format::mtk::force_color_mode(&mut image, color_mode)?;
		}
	}

	let slot_filter = parse_slot_filter(slots)?;
	if let Some(wanted) = &slot_filter {
		image.images.retain(|slot| wanted.contains(&slot.index));
		debug!("slot filter kept {} slot(s)", image.images.len());
	}

	let raw_dumps: Vec<(u32, Vec<u8>)> =
		image.images.iter().map(|s| (s.index, s.compressed.clone())).collect();

	let project = Project::unpack_image(image, output_dir, input)?;
	info!("unpacked {} slot(s) into {}", project.image.images.len(), output_dir.display());

	if raw && project.image.format == BootFormat::Mtk {
		let images_dir = output_dir.join("images");
		for (index, compressed) in &raw_dumps {
			let path = images_dir.join(raw_dump_filename(*index));
			fs::write(&path, compressed)?;
			debug!("wrote raw dump {}", path.display());
		}
	}

	Ok(())
}

enum RepackSource {
	Mode(ColorMode),
	Raw,
}

fn parse_repack_filename(path: &Path) -> Result<(u32, RepackSource)> {
	let filename = path
		.file_name()
		.ok_or_else(|| BootError::malformed(format!("{} has no filename", path.display())))?
		.to_string_lossy()
		.into_owned();

	let (stem, source_kind) = if let Some(stem) = filename.strip_suffix(".png") {
		(stem.to_string(), None)
	} else if let Some(stem) = filename.strip_suffix(".z") {
		(stem.to_string(), Some(RepackSource::Raw))
	} else {
		return Err(BootError::malformed(format!(
			"{filename} does not end in .png or .z"
		)));
	};

	let rest = stem
		.strip_prefix("logo_")
		.ok_or_else(|| BootError::malformed(format!("{filename} does not start with \"logo_\"")))?;
	let (index_str, suffix) = rest
		.split_once('_')
		.ok_or_else(|| BootError::malformed(format!("{filename} is missing its _{{mode}} suffix")))?;
	let index: u32 = index_str
		.parse()
		.map_err(|_| BootError::malformed(format!("{filename} has a non-numeric slot index")))?;

	let source = match source_kind {
		Some(RepackSource::Raw) => {
			if suffix != "raw" {
				return Err(BootError::malformed(format!(
					"{filename} ends in .z but isn't named logo_{{N}}_raw.z"
				)));
			}
			RepackSource::Raw
		}
		None => {
			let mode = ColorMode::parse(suffix)
				.ok_or_else(|| BootError::malformed(format!("{filename} names unknown color mode {suffix:?}")))?;
			RepackSource::Mode(mode)
		}
	};

	Ok((index, source))
}

fn cmd_repack(output: &Path, files: &[PathBuf], strip_alpha: bool) -> Result<()> {
	if strip_alpha {
		warn!("--strip-alpha was given; it currently has no effect on the pixel pipeline");
	}

	let mut entries = Vec::with_capacity(files.len());
	for path in files {
		let (index, source) = parse_repack_filename(path)?;
		let slot = match source {
			RepackSource::Raw => {
				let compressed = fs::read(path)?;
				let (native_format, width, height) = bootimg_types::format::mtk::infer_blob_shape(&compressed);
				ImageSlot { index, width, height, compressed, decoded_cache: None, native_format, name: None }
			}
			RepackSource::Mode(mode) => {
				let img = image::open(path)
					.map_err(|e| BootError::malformed(format!("failed to read {}: {e}", path.display())))?
					.to_rgba8();
				let (width, height) = img.dimensions();
				let rgba = img.into_raw();
				let raw = bootimg_types::pixel::from_rgba(&rgba, mode)?;
				let compressed = bootimg_types::compress::zlib_deflate(&raw, 9)?;
				ImageSlot {
					index,
					width,
					height,
					compressed,
					decoded_cache: Some(rgba),
					native_format: NativeFormat::Mtk(mode),
					name: None,
				}
			}
		};
		info!("slot {index}: {}x{}", slot.width, slot.height);
		entries.push((index, slot));
	}
	entries.sort_by_key(|(index, _)| *index);

	let image = BootImage {
		format: BootFormat::Mtk,
		images: entries.into_iter().map(|(_, slot)| slot).collect(),
		oppo_header: None,
	};

	let bytes = format::save(&image)?;
	bootimg_types::io::store_file(output, &bytes)?;
	info!("wrote {}", output.display());
	Ok(())
}

fn cmd_info(input: &Path) -> Result<()> {
	let data = bootimg_types::io::load_file(input)?;
	let image = format::load(&data)?;

	match image.format {
		BootFormat::Mtk => {
			let type_name_bytes = bootimg_types::io::read_bytes(&data, 8, 32)?;
			let name_len = type_name_bytes.iter().position(|&b| b == 0 || b == 0xFF).unwrap_or(type_name_bytes.len());
			let type_name = String::from_utf8_lossy(&type_name_bytes[..name_len]);
			let block_size = bootimg_types::io::read_u32_le(&data, 4)?;

			println!("format: mtk");
			println!("type name: {type_name}");
			println!("logo count: {}", image.images.len());
			println!("block size: {block_size}");
			println!("total size: {}", data.len());
			for slot in &image.images {
				let zlib_note = match bootimg_types::compress::zlib_inflate(&slot.compressed) {
					Ok(raw) => format!("zlib compressed, {} bytes decompressed", raw.len()),
					Err(_) => "decompression failed".to_string(),
				};
				println!(
					"  slot {}: {}x{}, {} bytes ({zlib_note})",
					slot.index,
					slot.width,
					slot.height,
					slot.compressed.len()
				);
			}
		}
		BootFormat::Oppo => {
			let header = image
				.oppo_header
				.as_ref()
				.ok_or_else(|| BootError::malformed("OPPO image is missing its header state"))?;
			println!("format: snapdragon");
			println!("image count: {}", image.images.len());
			println!("display resolution: {}x{}", header.width, header.height);
			for slot in &image.images {
				let bit_depth = match slot.native_format {
					NativeFormat::Oppo(bit_depth) => bit_depth,
					_ => 0,
				};
				println!(
					"  slot {}: {:?}, {}x{}, {} bytes compressed, {}-bit BMP",
					slot.index,
					slot.name.as_deref().unwrap_or(""),
					slot.width,
					slot.height,
					slot.compressed.len(),
					bit_depth
				);
			}
		}
	}

	Ok(())
}

fn cmd_extract(input: &Path, index: u32, output: &Path) -> Result<()> {
	let data = bootimg_types::io::load_file(input)?;
	let mut image = format::load(&data)?;
	if image.format != BootFormat::Oppo {
		return Err(BootError::malformed("extract is only defined for OPPO splash.img containers"));
	}

	let slot = image
		.images
		.iter_mut()
		.find(|s| s.index == index)
		.ok_or_else(|| BootError::malformed(format!("no slot with index {index}")))?;
	let rgba = slot.decoded_rgba()?.to_vec();
	let buf = image::RgbaImage::from_raw(slot.width, slot.height, rgba)
		.ok_or_else(|| BootError::malformed("decoded RGBA buffer does not match its own dimensions"))?;
	buf.save(output)
		.map_err(|e| BootError::malformed(format!("failed to write {}: {e}", output.display())))?;
	info!("extracted slot {index} to {}", output.display());
	Ok(())
}

fn cmd_replace(input: &Path, index: u32, png: &Path, output: &Path) -> Result<()> {
	let data = bootimg_types::io::load_file(input)?;
	let mut image = format::load(&data)?;
	if image.format != BootFormat::Oppo {
		return Err(BootError::malformed("replace is only defined for OPPO splash.img containers"));
	}

	if let Some(slot) = image.images.iter().find(|s| s.index == index) {
		if let NativeFormat::Oppo(bit_depth) = slot.native_format {
			info!("slot {index} is a {bit_depth}-bit BMP; preserving bit depth on replace");
		}
	}

	let img = image::open(png)
		.map_err(|e| BootError::malformed(format!("failed to read {}: {e}", png.display())))?
		.to_rgba8();
	let (width, height) = img.dimensions();
	let rgba = img.into_raw();

	image.replace_image(index, &rgba, width, height)?;

	let bytes = format::save(&image)?;
	bootimg_types::io::store_file(output, &bytes)?;
	info!("wrote {}", output.display());
	Ok(())
}
