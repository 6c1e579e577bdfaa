//! Rebuilding DNG metadata on the merged raster.
//!
//! The steps run in a fixed order, enforced by the types: [`rebuild`] yields a
//! [`RebuiltDng`], whose exposure overlay yields an [`ExposedDng`], which is the
//! only thing that can be validated. Overlaying before rebuilding would let the
//! reference frame's exposure tags overwrite the accumulated totals.

pub mod reconstruct;
pub mod tags;

pub use reconstruct::{
    finalize, output_base_name, output_file_name, rebuild, ExposedDng, RebuiltDng,
};
pub use tags::{TagRule, DNG_TAG_RULES};
