//! The core library of the UnicodeHexMono font generator.
//!
//! Every glyph in the font shows its own codepoint as hexadecimal digits,
//! drawn as knockouts from a rounded square. This crate classifies and
//! renders codepoints, splits the codepoint space into font-sized chunks,
//! and drives the external tools that turn them into font files.

#[macro_use]
mod util;

mod codepoint;
mod contour;
mod digits;
mod draw;
mod error;
mod layout;
mod metrics;
mod naming;
mod partition;
mod sfnt;

pub mod consts;
pub mod css;
pub mod export;
pub mod font;
pub mod generator;
pub mod preview;

pub use codepoint::{all_valid_codepoints, hex_digits, is_valid, valid_codepoints, GlyphClass};
pub use contour::{Contour, ContourPoint, PointType, Winding};
pub use digits::{all_digits, DigitPattern};
pub use error::Error;
pub use layout::{render, render_codepoint, render_notdef};
pub use metrics::Metrics;
pub use naming::{glyph_name, FontFileName, FontFormat};
pub use partition::{partition, Chunk, PartitionStrategy, MAX_BUDGET};
