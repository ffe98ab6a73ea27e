//! Charset accumulation from every supported source.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use log::info;

use crate::CharsetError;
use crate::standard::{self, Standard};

/// Characters a text sample never contributes.
const SAMPLE_SKIPPED: [char; 4] = ['\n', '\r', '\t', '\0'];

/// Accumulates the union of all requested character sources.
///
/// The set is ordered, so the filtered output is deterministic no matter in
/// which order sources were added.
#[derive(Clone, Debug, Default)]
pub struct CharsetBuilder {
    chars: BTreeSet<char>,
}

impl CharsetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the full repertoire of a double-byte standard.
    pub fn add_standard(&mut self, standard: Standard) -> &mut Self {
        info!("Building {} charset...", standard.name());
        let scanned = standard.scan();
        info!("{} contributed {} characters", standard.name(), scanned.len());
        self.chars.extend(scanned);
        self
    }

    /// Add the Hiragana, Katakana and Halfwidth Katakana blocks.
    pub fn add_kana(&mut self) -> &mut Self {
        info!("Including Japanese Kana blocks");
        self.chars.extend(standard::kana_chars());
        self
    }

    /// Add every character of `text` except line breaks, tabs and NUL.
    pub fn add_text(&mut self, text: &str) -> &mut Self {
        self.chars
            .extend(text.chars().filter(|ch| !SAMPLE_SKIPPED.contains(ch)));
        self
    }

    /// Read a UTF-8 file and add its characters via [`add_text`](Self::add_text).
    pub fn add_text_file(&mut self, path: &Path) -> Result<&mut Self, CharsetError> {
        info!("Including characters from: {}", path.display());
        let text = fs::read_to_string(path).map_err(|source| CharsetError::TextSample {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.add_text(&text))
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The accumulated, not yet filtered characters.
    pub fn chars(&self) -> &BTreeSet<char> {
        &self.chars
    }

    pub fn into_chars(self) -> BTreeSet<char> {
        self.chars
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
