//! Double-byte CJK charset standards and the fixed kana blocks.
//!
//! Both standards are decoded through the WHATWG GBK decoder from
//! `encoding_rs`; GB2312 is the GBK byte grid restricted to the cells GB2312
//! itself assigns. That decoder is really GB18030, so the cells GB18030 added
//! on top of CP936 are masked out, and the two GB2312 cells whose mapping
//! differs from GBK are pinned to their GB2312 code points.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use encoding_rs::GBK;

// ─────────────────────────────────────────────────────────────────────────────
// Standard
// ─────────────────────────────────────────────────────────────────────────────

/// A legacy double-byte encoding whose full repertoire can be scanned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Standard {
    /// GB2312 (EUC-CN): 7445 characters.
    Gb2312,
    /// GBK: the GB2312 superset covering all CJK Unified Ideographs of Unicode 1.1.
    Gbk,
}

impl Standard {
    /// Resolve a charset label (case-insensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "gb2312" | "gb_2312" | "euc-cn" => Some(Self::Gb2312),
            "gbk" | "cp936" => Some(Self::Gbk),
            _ => None,
        }
    }

    /// Canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Gb2312 => "GB2312",
            Self::Gbk => "GBK",
        }
    }

    /// Legal lead bytes.
    pub fn lead_bytes(self) -> RangeInclusive<u8> {
        match self {
            Self::Gb2312 => 0xA1..=0xF7,
            Self::Gbk => 0x81..=0xFE,
        }
    }

    /// Legal trail bytes (before per-standard exclusions).
    pub fn trail_bytes(self) -> RangeInclusive<u8> {
        match self {
            Self::Gb2312 => 0xA1..=0xFE,
            Self::Gbk => 0x40..=0xFE,
        }
    }

    /// Whether `(lead, trail)` lies in the standard's assigned byte space.
    fn is_assigned(self, lead: u8, trail: u8) -> bool {
        if !self.lead_bytes().contains(&lead) || !self.trail_bytes().contains(&trail) {
            return false;
        }
        match self {
            Self::Gb2312 => gb2312_cell_assigned(lead, trail),
            Self::Gbk => trail != 0x7F && !is_gb18030_addition(lead, trail),
        }
    }

    /// Decode one byte pair to a single character.
    ///
    /// Returns `None` for pairs outside the standard, malformed sequences,
    /// sequences that do not decode to exactly one character, and
    /// user-defined slots (which the decoder maps into the Private Use Area).
    pub fn decode_pair(self, lead: u8, trail: u8) -> Option<char> {
        if !self.is_assigned(lead, trail) {
            return None;
        }
        if let (Self::Gb2312, Some(ch)) = (self, gb2312_override(lead, trail)) {
            return Some(ch);
        }
        let pair = [lead, trail];
        let decoded = GBK.decode_without_bom_handling_and_without_replacement(&pair)?;
        let mut chars = decoded.chars();
        let ch = chars.next()?;
        if chars.next().is_some() || is_private_use(ch) {
            return None;
        }
        Some(ch)
    }

    /// Scan the whole byte-pair space and collect every decodable character.
    ///
    /// Undecodable pairs are skipped; the scan never fails.
    pub fn scan(self) -> BTreeSet<char> {
        let mut chars = BTreeSet::new();
        for lead in self.lead_bytes() {
            for trail in self.trail_bytes() {
                if let Some(ch) = self.decode_pair(lead, trail) {
                    chars.insert(ch);
                }
            }
        }
        chars
    }
}

fn is_private_use(ch: char) -> bool {
    ('\u{E000}'..='\u{F8FF}').contains(&ch)
}

// ─────────────────────────────────────────────────────────────────────────────
// GB2312 cell layout
// ─────────────────────────────────────────────────────────────────────────────

/// Assigned trail-byte ranges of the GB2312 symbol rows, lead 0xA1..=0xA9.
const GB2312_SYMBOL_ROWS: [&[(u8, u8)]; 9] = [
    &[(0xA1, 0xFE)],                             // punctuation
    &[(0xB1, 0xE2), (0xE5, 0xEE), (0xF1, 0xFC)], // enclosed and roman numerals
    &[(0xA1, 0xFE)],                             // full-width ASCII
    &[(0xA1, 0xF3)],                             // hiragana
    &[(0xA1, 0xF6)],                             // katakana
    &[(0xA1, 0xB8), (0xC1, 0xD8)],               // greek
    &[(0xA1, 0xC1), (0xD1, 0xF1)],               // cyrillic
    &[(0xA1, 0xBA), (0xC5, 0xE9)],               // pinyin, bopomofo
    &[(0xA4, 0xEF)],                             // box drawing
];

/// Lead byte of the last hanzi row, which is only partially filled.
const GB2312_LAST_ROW: u8 = 0xD7;
const GB2312_LAST_ROW_END: u8 = 0xF9;

fn gb2312_cell_assigned(lead: u8, trail: u8) -> bool {
    match lead {
        0xA1..=0xA9 => GB2312_SYMBOL_ROWS[(lead - 0xA1) as usize]
            .iter()
            .any(|&(lo, hi)| (lo..=hi).contains(&trail)),
        // rows 10-15 are reserved
        0xAA..=0xAF => false,
        GB2312_LAST_ROW => trail <= GB2312_LAST_ROW_END,
        _ => true,
    }
}

/// GB2312 cells that GBK decodes to a different character.
fn gb2312_override(lead: u8, trail: u8) -> Option<char> {
    match (lead, trail) {
        (0xA1, 0xA4) => Some('\u{30FB}'), // katakana middle dot, GBK: U+00B7
        (0xA1, 0xAA) => Some('\u{2015}'), // horizontal bar, GBK: U+2014
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GB18030 additions
// ─────────────────────────────────────────────────────────────────────────────

/// Cells that CP936 leaves unassigned or in the Private Use Area but GB18030
/// maps to real characters: the euro sign, two pinyin letters, vertical
/// forms, ideographic description characters and the FE row radicals.
fn is_gb18030_addition(lead: u8, trail: u8) -> bool {
    match lead {
        0xA2 => trail == 0xE3,
        0xA6 => matches!(trail, 0xD9..=0xDF | 0xEC | 0xED | 0xF3),
        0xA8 => matches!(trail, 0xBC | 0xBF),
        0xA9 => (0x89..=0x95).contains(&trail),
        0xFE => (0x50..=0xA0).contains(&trail),
        _ => false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Kana
// ─────────────────────────────────────────────────────────────────────────────

/// Japanese kana blocks added by the `--kana` option.
pub const KANA_RANGES: [RangeInclusive<u32>; 4] = [
    0x3040..=0x309F, // Hiragana
    0x30A0..=0x30FF, // Katakana
    0x31F0..=0x31FF, // Katakana Phonetic Extensions
    0xFF66..=0xFF9D, // Halfwidth Katakana
];

/// Every character of the kana blocks.
pub fn kana_chars() -> impl Iterator<Item = char> {
    KANA_RANGES.into_iter().flatten().filter_map(char::from_u32)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
