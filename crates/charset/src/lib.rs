//! # Charset Construction
//!
//! Builds the character repertoire a bitmap font table covers, then reduces it
//! to the sorted code-point sequence every later stage indexes by.
//!
//! - `standard`: full byte-pair scans of GB2312 and GBK, plus the fixed kana blocks
//! - `builder`: accumulates characters from scans, kana and UTF-8 text samples
//! - `filter`: drops surrogates, noncharacters, controls and (optionally) ASCII

pub mod builder;
pub mod filter;
pub mod standard;

pub use builder::CharsetBuilder;
pub use filter::{CodePoints, Exclusion, filter_code_points};
pub use standard::Standard;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or filtering a charset.
#[derive(Debug, Error)]
pub enum CharsetError {
    /// The requested text sample could not be opened or is not UTF-8.
    #[error("cannot read text sample {}: {source}", path.display())]
    TextSample {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Nothing survived filtering, so there is nothing to render.
    #[error("no characters selected")]
    Empty,
}
