//! Screen rendering
//!
//! `DisplayFrame` is the content, `Layout` says where each field goes and
//! `Renderer` decides what to push to the panel and when.

pub mod frame;
pub mod layout;
pub mod renderer;

pub use frame::{DisplayFrame, FrameStyle};
pub use layout::{Field, Layout, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use renderer::{RenderReport, Renderer};
