//! Backend-neutral rendering
//!
//! Minigames and the summary view describe a frame as a flat list of draw
//! commands; a platform painter turns it into pixels.

pub mod draw_list;

pub use draw_list::{AllAssets, AssetProbe, DrawCmd, DrawList, NoAssets, Rgba, SpriteId};
