//! `bootimg` is a universal boot-logo/splash-image editor core for
//! Android-class devices: MediaTek `logo.bin` and Qualcomm/OPPO
//! `splash.img` containers, their compression and pixel-format pipelines,
//! and a project-directory unpack/repack workflow.
//!
//! This crate re-exports [`bootimg_internal`]'s prelude; most consumers
//! should `use bootimg::prelude::*;` rather than depend on
//! `bootimg_types`/`bootimg_internal` directly.

pub use bootimg_internal::*;
