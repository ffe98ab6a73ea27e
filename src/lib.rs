//! # oled-fontgen
//!
//! Turns a TrueType font into a fixed-cell bitmap font table for monochrome
//! SSD1306-class OLED drivers: a sorted UTF-16 code-point array plus page-packed
//! glyph bytes, emitted as a C header or a Rust module.
//!
//! - `cli`: command-line options
//! - `pipeline`: charset → render → table → file

pub mod cli;
pub mod pipeline;

pub use cli::Args;
pub use pipeline::{Summary, run};
