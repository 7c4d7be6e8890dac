//! infeed-emu library
//!
//! Cycle-accurate model of the input fetch path of a convolution
//! front end: a raster scan address generator, a banked line memory,
//! and the window reader that splices each memory response into a
//! pair of overlapping 32-bit pixel windows.

pub mod config;
pub mod engine;
pub mod fetch;
pub mod geometry;
pub mod mem;
