//! Display abstraction traits and shared components for Chronotap
//!
//! This crate provides:
//! - `DisplayBackend` trait: the two operations the core needs from a panel
//!   (`init` and `draw_region`)
//! - `Rect` screen geometry shared by the renderer and the touch hit-test
//! - `Canvas`, a scratch raster that text is drawn into before a region push
//!
//! # Architecture
//!
//! The panel is never drawn to pixel by pixel. The renderer rasterises one
//! changed region at a time into a `Canvas` using `embedded-graphics`, then
//! hands the finished pixel block to the backend in a single bus transfer:
//!
//! ```text
//! Renderer ──text──▶ Canvas (heap scratch) ──pixels──▶ DisplayBackend::draw_region
//! ```
//!
//! Keeping region pushes atomic is what lets the display and the touch
//! controller share one SPI bus without interleaving transfers.

#![no_std]

extern crate alloc;

pub mod backend;
pub mod canvas;
pub mod geometry;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError};
pub use canvas::Canvas;
pub use geometry::Rect;
