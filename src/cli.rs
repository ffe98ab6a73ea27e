//! Command-line options.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use font_table::OutputFormat;
use glyph_cell::CellSize;

/// Generate a UTF-8 bitmap font table for SSD1306 OLED displays.
#[derive(Parser, Debug, Clone)]
#[command(name = "oled-fontgen", version)]
pub struct Args {
    /// TrueType font or collection (.ttf / .ttc)
    #[arg(long, default_value = "C:/Windows/Fonts/simsun.ttc")]
    pub ttf: PathBuf,

    /// Face index inside a .ttc collection
    #[arg(long, default_value_t = 0)]
    pub ttc_index: u32,

    /// Cell size in pixels
    #[arg(long, value_enum)]
    pub size: SizeArg,

    /// Base charset scanned from a double-byte encoding
    #[arg(long, value_enum, default_value_t = CharsetArg::Gb2312)]
    pub charset: CharsetArg,

    /// UTF-8 text file whose characters are added
    #[arg(long)]
    pub txt: Option<PathBuf>,

    /// Add Hiragana and Katakana blocks
    #[arg(long)]
    pub kana: bool,

    /// Keep printable ASCII 0x20-0x7E
    #[arg(long)]
    pub include_ascii: bool,

    /// Output file
    #[arg(long)]
    pub output: PathBuf,

    /// Symbol prefix, e.g. utf8_16x16_
    #[arg(long)]
    pub prefix: String,

    /// Output flavour
    #[arg(long, value_enum, default_value_t = FormatArg::C)]
    pub format: FormatArg,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeArg {
    #[value(name = "12")]
    S12,
    #[value(name = "16")]
    S16,
    #[value(name = "24")]
    S24,
}

impl From<SizeArg> for CellSize {
    fn from(size: SizeArg) -> Self {
        match size {
            SizeArg::S12 => CellSize::S12,
            SizeArg::S16 => CellSize::S16,
            SizeArg::S24 => CellSize::S24,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharsetArg {
    Gb2312,
    Gbk,
    /// No base charset; only --txt and --kana
    None,
}

impl CharsetArg {
    pub fn standard(self) -> Option<charset::Standard> {
        match self {
            CharsetArg::Gb2312 => Some(charset::Standard::Gb2312),
            CharsetArg::Gbk => Some(charset::Standard::Gbk),
            CharsetArg::None => None,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    /// Arduino C header
    C,
    /// Rust module
    Rust,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::C => OutputFormat::C,
            FormatArg::Rust => OutputFormat::Rust,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Result<Args, clap::Error> {
        let base = ["oled-fontgen", "--output", "out/font.h", "--prefix", "utf8_16x16_"];
        Args::try_parse_from(base.iter().chain(extra))
    }

    #[test]
    fn defaults() {
        let args = parse(&["--size", "16"]).unwrap();
        assert_eq!(args.ttf, PathBuf::from("C:/Windows/Fonts/simsun.ttc"));
        assert_eq!(args.ttc_index, 0);
        assert_eq!(CellSize::from(args.size), CellSize::S16);
        assert_eq!(args.charset, CharsetArg::Gb2312);
        assert_eq!(args.format, FormatArg::C);
        assert!(!args.kana && !args.include_ascii);
        assert!(args.txt.is_none());
    }

    #[test]
    fn all_flags() {
        let args = parse(&[
            "--size", "24", "--charset", "gbk", "--kana", "--include-ascii", "--txt", "needed.txt",
            "--ttf", "font.ttc", "--ttc-index", "2", "--format", "rust",
        ])
        .unwrap();
        assert_eq!(CellSize::from(args.size), CellSize::S24);
        assert_eq!(args.charset.standard(), Some(charset::Standard::Gbk));
        assert!(args.kana && args.include_ascii);
        assert_eq!(args.txt, Some(PathBuf::from("needed.txt")));
        assert_eq!(args.ttc_index, 2);
        assert_eq!(OutputFormat::from(args.format), OutputFormat::Rust);
    }

    #[test]
    fn rejects_bad_size_and_missing_required() {
        assert!(parse(&["--size", "14"]).is_err());
        assert!(parse(&[]).is_err());
        assert!(Args::try_parse_from(["oled-fontgen", "--size", "12", "--prefix", "p"]).is_err());
    }

    #[test]
    fn charset_none() {
        let args = parse(&["--size", "12", "--charset", "none"]).unwrap();
        assert_eq!(args.charset.standard(), None);
    }
}
