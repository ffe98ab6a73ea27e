//! One generator run: charset → glyph cells → table → file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use charset::{CharsetBuilder, CodePoints, filter_code_points};
use font::Face;
use font_table::{EmitError, FontTable};
use glyph_cell::{CellSize, GlyphSource, render_glyph};
use log::info;

use crate::cli::Args;

/// Progress is logged after this many glyphs.
const PROGRESS_EVERY: usize = 500;

/// What a successful run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub glyphs: usize,
    pub empty_glyphs: usize,
    pub data_bytes: usize,
    pub stride: usize,
    pub pages: usize,
    pub output: PathBuf,
}

/// Run the whole generator for `args`.
///
/// The charset is checked before the font is opened; the artifact is written
/// once, after everything else succeeded.
pub fn run(args: &Args) -> anyhow::Result<Summary> {
    let code_points = build_code_points(args)?;

    if !args.ttf.exists() {
        bail!("font not found: {}", args.ttf.display());
    }
    let font_data =
        fs::read(&args.ttf).with_context(|| format!("cannot read font {}", args.ttf.display()))?;
    let face = Face::parse(&font_data, args.ttc_index).with_context(|| {
        format!("cannot load face {} of {}", args.ttc_index, args.ttf.display())
    })?;

    let size = CellSize::from(args.size);
    let table = render_table(&face, &code_points, size)?;

    let summary = Summary {
        glyphs: table.count(),
        empty_glyphs: table.empty_glyphs(),
        data_bytes: table.data().len(),
        stride: size.stride(),
        pages: size.pages(),
        output: args.output.clone(),
    };
    info!("Render finished. Empty glyphs: {}", summary.empty_glyphs);
    info!(
        "Data bytes: {} (each glyph {} bytes, {} pages)",
        summary.data_bytes, summary.stride, summary.pages
    );

    let text = font_table::render(&table, &args.prefix, args.format.into())?;
    write_output(&args.output, &text)?;
    info!("Header generated: {}", args.output.display());

    Ok(summary)
}

/// Union of the selected sources, filtered and sorted.
pub fn build_code_points(args: &Args) -> anyhow::Result<CodePoints> {
    let mut builder = CharsetBuilder::new();
    if let Some(standard) = args.charset.standard() {
        builder.add_standard(standard);
    }
    if let Some(path) = &args.txt {
        builder.add_text_file(path)?;
    }
    if args.kana {
        builder.add_kana();
    }
    Ok(filter_code_points(builder.into_chars(), args.include_ascii)?)
}

/// Render every code point in order. Code points without a glyph keep their
/// slot as a blank cell.
pub fn render_table<S: GlyphSource + ?Sized>(
    source: &S,
    code_points: &CodePoints,
    size: CellSize,
) -> Result<FontTable, EmitError> {
    let total = code_points.len();
    let mut glyphs = Vec::with_capacity(total);
    for (i, ch) in code_points.chars().enumerate() {
        glyphs.push(render_glyph(source, ch, size));
        if (i + 1) % PROGRESS_EVERY == 0 {
            info!("Rendered {}/{total} glyphs...", i + 1);
        }
    }
    FontTable::from_glyphs(size, code_points.as_slice().to_vec(), glyphs)
}

fn write_output(path: &Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("cannot create directory {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("cannot write {}", path.display()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{CharsetArg, FormatArg, SizeArg};
    use font::synth::{SynthFont, collection};
    use tempfile::TempDir;

    fn cjk_font() -> Vec<u8> {
        SynthFont::new(1024)
            .rect('中', 128, 128, 896, 896)
            .rect('文', 0, 0, 1024, 512)
            .rect('日', 256, 0, 768, 1024)
            .rect('A', 100, 0, 500, 700)
            .build()
    }

    fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn args(ttf: &Path, output: &Path) -> Args {
        Args {
            ttf: ttf.to_path_buf(),
            ttc_index: 0,
            size: SizeArg::S16,
            charset: CharsetArg::None,
            txt: None,
            kana: false,
            include_ascii: false,
            output: output.to_path_buf(),
            prefix: "utf8_16x16".into(),
            format: FormatArg::C,
        }
    }

    /// The `map` array values of a C header.
    fn header_map(text: &str) -> Vec<u16> {
        text.lines()
            .skip_while(|l| !l.contains("map["))
            .skip(1)
            .take_while(|l| *l != "};")
            .flat_map(|l| l.split(','))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| u16::from_str_radix(v.trim_start_matches("0x"), 16).unwrap())
            .collect()
    }

    #[test]
    fn text_sample_end_to_end() {
        let dir = TempDir::new().unwrap();
        let ttf = write_file(&dir, "cjk.ttf", &cjk_font());
        let txt = write_file(&dir, "needed.txt", "日本\r\n中文\t中\0".as_bytes());
        let output = dir.path().join("fonts/nested/utf8_16x16.h");

        let mut a = args(&ttf, &output);
        a.txt = Some(txt);
        let summary = run(&a).unwrap();

        assert_eq!(summary.glyphs, 4);
        assert_eq!(summary.empty_glyphs, 1); // 本 is not in the font
        assert_eq!(summary.stride, 32);
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.data_bytes, 128);

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("#pragma once\n#include <Arduino.h>\n"));
        assert!(text.contains("#define utf8_16x16_COUNT 4\n"));
        assert!(text.contains("static const uint8_t utf8_16x16_data[128] PROGMEM = {\n"));
        assert_eq!(header_map(&text), vec![0x4E2D, 0x6587, 0x65E5, 0x672C]);
    }

    #[test]
    fn missing_glyph_keeps_its_slot() {
        let data = cjk_font();
        let face = Face::parse(&data, 0).unwrap();
        let cps = filter_code_points("本中日".chars(), false).unwrap();
        let table = render_table(&face, &cps, CellSize::S16).unwrap();

        assert_eq!(table.code_points(), &[0x4E2D, 0x65E5, 0x672C]);
        assert!(table.glyph(0x672C).unwrap().iter().all(|&b| b == 0));
        assert_eq!(&table.glyph(0x4E2D).unwrap()[4..6], &[0xFC, 0x3F]);
        assert_eq!(table.empty_glyphs(), 1);
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let dir = TempDir::new().unwrap();
        let ttf = write_file(&dir, "cjk.ttf", &cjk_font());
        let txt = write_file(&dir, "needed.txt", "中文日A".as_bytes());

        let mut outputs = Vec::new();
        for name in ["a.h", "b.h"] {
            let mut a = args(&ttf, &dir.path().join(name));
            a.txt = Some(txt.clone());
            a.kana = true;
            run(&a).unwrap();
            outputs.push(fs::read(dir.path().join(name)).unwrap());
        }
        assert_eq!(outputs[0], outputs[1]);
    }

    #[test]
    fn empty_charset_fails_before_touching_the_font() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.h");
        let txt = write_file(&dir, "ascii.txt", b"hello world\n");

        let mut a = args(&dir.path().join("no-such-font.ttf"), &output);
        a.txt = Some(txt);
        let err = run(&a).unwrap_err();
        assert!(format!("{err:#}").contains("no characters selected"), "{err:#}");
        assert!(!output.exists());
    }

    #[test]
    fn missing_font_is_an_error() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.h");
        let mut a = args(&dir.path().join("no-such-font.ttf"), &output);
        a.kana = true;
        let err = run(&a).unwrap_err();
        assert!(format!("{err:#}").contains("font not found"), "{err:#}");
        assert!(!output.exists());
    }

    #[test]
    fn unreadable_text_sample_is_an_error() {
        let dir = TempDir::new().unwrap();
        let ttf = write_file(&dir, "cjk.ttf", &cjk_font());
        let output = dir.path().join("out.h");

        let mut a = args(&ttf, &output);
        a.txt = Some(dir.path().join("missing.txt"));
        assert!(run(&a).is_err());

        a.txt = Some(write_file(&dir, "latin1.txt", &[0x41, 0xE9, 0x42]));
        assert!(run(&a).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn ascii_is_opt_in() {
        let dir = TempDir::new().unwrap();
        let ttf = write_file(&dir, "cjk.ttf", &cjk_font());
        let txt = write_file(&dir, "mixed.txt", "A 中".as_bytes());
        let output = dir.path().join("out.h");

        let mut a = args(&ttf, &output);
        a.txt = Some(txt);
        assert_eq!(run(&a).unwrap().glyphs, 1);

        a.include_ascii = true;
        let summary = run(&a).unwrap();
        assert_eq!(summary.glyphs, 3);
        // space has no ink, 'A' and '中' do
        assert_eq!(summary.empty_glyphs, 1);
        let text = fs::read_to_string(&output).unwrap();
        assert_eq!(header_map(&text), vec![0x0020, 0x0041, 0x4E2D]);
    }

    #[test]
    fn face_index_selects_collection_member() {
        let dir = TempDir::new().unwrap();
        let first = SynthFont::new(1000).rect('一', 0, 400, 1000, 600).build();
        let second = cjk_font();
        let ttc = write_file(&dir, "pair.ttc", &collection(&[first, second]));
        let txt = write_file(&dir, "needed.txt", "中文日".as_bytes());
        let output = dir.path().join("out.h");

        let mut a = args(&ttc, &output);
        a.txt = Some(txt);

        a.ttc_index = 1;
        assert_eq!(run(&a).unwrap().empty_glyphs, 0);

        a.ttc_index = 0;
        assert_eq!(run(&a).unwrap().empty_glyphs, 3);

        a.ttc_index = 2;
        let err = run(&a).unwrap_err();
        assert!(format!("{err:#}").contains("face index 2 out of range"), "{err:#}");
    }

    #[test]
    fn stride_follows_cell_size() {
        let dir = TempDir::new().unwrap();
        let ttf = write_file(&dir, "cjk.ttf", &cjk_font());
        let txt = write_file(&dir, "needed.txt", "中文".as_bytes());
        let output = dir.path().join("out.h");

        for (size, stride) in [(SizeArg::S12, 24), (SizeArg::S16, 32), (SizeArg::S24, 72)] {
            let mut a = args(&ttf, &output);
            a.txt = Some(txt.clone());
            a.size = size;
            let summary = run(&a).unwrap();
            assert_eq!(summary.stride, stride);
            assert_eq!(summary.data_bytes, 2 * stride);
            assert_eq!(summary.empty_glyphs, 0);
        }
    }

    #[test]
    fn gb2312_table_lists_each_character_once() {
        let dir = TempDir::new().unwrap();
        let ttf = write_file(&dir, "cjk.ttf", &cjk_font());
        let output = dir.path().join("gb2312.h");

        let mut a = args(&ttf, &output);
        a.charset = CharsetArg::Gb2312;
        a.size = SizeArg::S12;
        let summary = run(&a).unwrap();
        assert_eq!(summary.glyphs, 7445);
        assert_eq!(summary.empty_glyphs, 7445 - 3);

        let map = header_map(&fs::read_to_string(&output).unwrap());
        assert_eq!(map.len(), 7445);
        assert!(map.windows(2).all(|w| w[0] < w[1]));
        assert!(map.iter().all(|&cp| !(0x20..=0x7E).contains(&cp)));
    }

    #[test]
    fn rust_module_output() {
        let dir = TempDir::new().unwrap();
        let ttf = write_file(&dir, "cjk.ttf", &cjk_font());
        let txt = write_file(&dir, "needed.txt", "中".as_bytes());
        let output = dir.path().join("font.rs");

        let mut a = args(&ttf, &output);
        a.txt = Some(txt);
        a.format = FormatArg::Rust;
        run(&a).unwrap();

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("pub static UTF8_16X16_MAP: [u16; 1] = [\n    0x4E2D,\n];\n"));
        assert!(text.contains("pub static UTF8_16X16_FONT: FontUtf8 = FontUtf8 {\n"));
    }
}
