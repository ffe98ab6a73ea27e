//! Text renderings of a [`FontTable`].
//!
//! Both flavours carry the same struct-of-arrays: size and count constants,
//! the sorted code points, the concatenated glyph bytes and a descriptor.

use std::fmt::{self, Write as _};

use log::debug;

use crate::{EmitError, FontTable, SymbolNames};

const U16_PER_LINE: usize = 12;
const U8_PER_LINE: usize = 16;

/// Artifact flavour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Arduino C header with `PROGMEM` arrays.
    #[default]
    C,
    /// Rust module with `static` arrays.
    Rust,
}

/// Render `table` with symbols derived from `prefix`.
pub fn render(table: &FontTable, prefix: &str, format: OutputFormat) -> Result<String, EmitError> {
    let names = SymbolNames::new(prefix);
    debug!("emitting {} glyphs as {format:?} with prefix {}", table.count(), names.prefix());
    let text = match format {
        OutputFormat::C => c_header(table, &names)?,
        OutputFormat::Rust => rust_module(table, &names.to_upper())?,
    };
    Ok(text)
}

/// Lines of `per_line` hex values, four-space indented, joined with `,\n`
/// (no trailing comma after the last value).
fn hex_lines<T: Copy>(values: &[T], per_line: usize, fmt: impl Fn(T) -> String) -> String {
    values
        .chunks(per_line)
        .map(|chunk| {
            let line: Vec<String> = chunk.iter().map(|&v| fmt(v)).collect();
            format!("    {}", line.join(", "))
        })
        .collect::<Vec<_>>()
        .join(",\n")
}

// ─────────────────────────────────────────────────────────────────────────────
// C header
// ─────────────────────────────────────────────────────────────────────────────

fn c_header(table: &FontTable, names: &SymbolNames) -> Result<String, fmt::Error> {
    let n = table.size().pixels();
    let count = table.count();
    let mut out = String::new();

    writeln!(out, "#pragma once")?;
    writeln!(out, "#include <Arduino.h>")?;
    writeln!(out)?;
    writeln!(out, "#define {} {n}", names.height())?;
    writeln!(out, "#define {} {n}", names.width())?;
    writeln!(out, "#define {} {count}", names.count())?;
    writeln!(out)?;

    writeln!(out, "static const uint16_t {}[{count}] PROGMEM = {{", names.map())?;
    writeln!(out, "{}", hex_lines(table.code_points(), U16_PER_LINE, |v| format!("0x{v:04X}")))?;
    writeln!(out, "}};")?;
    writeln!(out)?;

    writeln!(out, "static const uint8_t {}[{}] PROGMEM = {{", names.data(), table.data().len())?;
    writeln!(out, "{}", hex_lines(table.data(), U8_PER_LINE, |v| format!("0x{v:02X}")))?;
    writeln!(out, "}};")?;
    writeln!(out)?;

    writeln!(out, "typedef struct {{")?;
    writeln!(out, "    const uint16_t* map;")?;
    writeln!(out, "    const uint8_t* data;")?;
    writeln!(out, "    uint16_t count;")?;
    writeln!(out, "    uint8_t w;")?;
    writeln!(out, "    uint8_t h;")?;
    writeln!(out, "}} FontUTF8;")?;
    writeln!(out)?;
    writeln!(
        out,
        "static const FontUTF8 {} = {{ {}, {}, {}, {}, {} }};",
        names.font(),
        names.map(),
        names.data(),
        names.count(),
        names.width(),
        names.height(),
    )?;
    writeln!(out)?;
    Ok(out)
}

// ─────────────────────────────────────────────────────────────────────────────
// Rust module
// ─────────────────────────────────────────────────────────────────────────────

fn rust_module(table: &FontTable, names: &SymbolNames) -> Result<String, fmt::Error> {
    let n = table.size().pixels();
    let count = table.count();
    let mut out = String::new();

    writeln!(out, "// This is generated code. Do not edit.")?;
    writeln!(out)?;
    writeln!(out, "pub const {}: u8 = {n};", names.height())?;
    writeln!(out, "pub const {}: u8 = {n};", names.width())?;
    writeln!(out, "pub const {}: u16 = {count};", names.count())?;
    writeln!(out)?;

    writeln!(out, "pub static {}: [u16; {count}] = [", names.map())?;
    writeln!(out, "{},", hex_lines(table.code_points(), U16_PER_LINE, |v| format!("0x{v:04X}")))?;
    writeln!(out, "];")?;
    writeln!(out)?;

    writeln!(out, "pub static {}: [u8; {}] = [", names.data(), table.data().len())?;
    writeln!(out, "{},", hex_lines(table.data(), U8_PER_LINE, |v| format!("0x{v:02X}")))?;
    writeln!(out, "];")?;
    writeln!(out)?;

    writeln!(out, "pub struct FontUtf8 {{")?;
    writeln!(out, "    pub map: &'static [u16],")?;
    writeln!(out, "    pub data: &'static [u8],")?;
    writeln!(out, "    pub count: u16,")?;
    writeln!(out, "    pub w: u8,")?;
    writeln!(out, "    pub h: u8,")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "pub static {}: FontUtf8 = FontUtf8 {{", names.font())?;
    writeln!(out, "    map: &{},", names.map())?;
    writeln!(out, "    data: &{},", names.data())?;
    writeln!(out, "    count: {},", names.count())?;
    writeln!(out, "    w: {},", names.width())?;
    writeln!(out, "    h: {},", names.height())?;
    writeln!(out, "}};")?;
    Ok(out)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
