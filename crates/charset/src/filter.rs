//! Reduction of a character set to the final code-point sequence.
//!
//! The output order is the index order of the emitted glyph table; firmware
//! binary-searches it, so it must be strictly ascending.

use std::collections::BTreeSet;

use log::{info, warn};

use crate::CharsetError;

/// Why a code point was left out of the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Exclusion {
    /// UTF-16 surrogate, never a scalar value.
    Surrogate,
    /// U+FDD0..U+FDEF or a code point ending in FFFE/FFFF.
    Noncharacter,
    /// C0, DEL or C1 control.
    Control,
    /// Printable ASCII, only kept on request.
    Ascii,
    /// Outside the BMP; the code-point table is 16-bit.
    Supplementary,
}

/// Classify a code point, returning `None` if it belongs in the table.
pub fn exclusion(cp: u32, include_ascii: bool) -> Option<Exclusion> {
    match cp {
        0xD800..=0xDFFF => Some(Exclusion::Surrogate),
        0xFDD0..=0xFDEF => Some(Exclusion::Noncharacter),
        _ if cp & 0xFFFE == 0xFFFE => Some(Exclusion::Noncharacter),
        0x00..=0x1F | 0x7F..=0x9F => Some(Exclusion::Control),
        0x20..=0x7E if !include_ascii => Some(Exclusion::Ascii),
        0x1_0000..=u32::MAX => Some(Exclusion::Supplementary),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CodePoints
// ─────────────────────────────────────────────────────────────────────────────

/// A non-empty, strictly ascending sequence of BMP code points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodePoints(Vec<u16>);

impl CodePoints {
    pub fn as_slice(&self) -> &[u16] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().copied()
    }

    /// Characters in table order.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().filter_map(|&cp| char::from_u32(cp as u32))
    }

    /// Table index of `cp`, as the firmware's binary search finds it.
    pub fn index_of(&self, cp: u16) -> Option<usize> {
        self.0.binary_search(&cp).ok()
    }

    pub fn into_vec(self) -> Vec<u16> {
        self.0
    }
}

/// Filter `chars` and materialize the sorted code-point sequence.
///
/// Fails with [`CharsetError::Empty`] when nothing survives.
pub fn filter_code_points<I>(chars: I, include_ascii: bool) -> Result<CodePoints, CharsetError>
where
    I: IntoIterator<Item = char>,
{
    let mut kept = BTreeSet::new();
    let mut supplementary = 0usize;

    for ch in chars {
        let cp = ch as u32;
        match exclusion(cp, include_ascii) {
            None => {
                kept.insert(cp as u16);
            }
            Some(Exclusion::Supplementary) => supplementary += 1,
            Some(_) => {}
        }
    }

    if supplementary > 0 {
        warn!("Dropped {supplementary} code points outside the BMP");
    }
    info!("Unique code points: {}", kept.len());

    if kept.is_empty() {
        return Err(CharsetError::Empty);
    }
    Ok(CodePoints(kept.into_iter().collect()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CharsetBuilder, Standard};

    #[test]
    fn surrogates_always_excluded() {
        for cp in [0xD800, 0xDBFF, 0xDC00, 0xDFFF] {
            assert_eq!(exclusion(cp, true), Some(Exclusion::Surrogate));
        }
    }

    #[test]
    fn noncharacters_always_excluded() {
        for cp in [0xFDD0, 0xFDEF, 0xFFFE, 0xFFFF, 0x1FFFE, 0x10FFFF] {
            assert_eq!(exclusion(cp, true), Some(Exclusion::Noncharacter), "{cp:#X}");
        }
        assert_eq!(exclusion(0xFDCF, false), None);
        assert_eq!(exclusion(0xFDF0, false), None);
        assert_eq!(exclusion(0xFFFD, false), None);
    }

    #[test]
    fn ascii_only_on_request() {
        assert_eq!(exclusion(0x41, false), Some(Exclusion::Ascii));
        assert_eq!(exclusion(0x20, false), Some(Exclusion::Ascii));
        assert_eq!(exclusion(0x7E, false), Some(Exclusion::Ascii));
        assert_eq!(exclusion(0x41, true), None);
    }

    #[test]
    fn controls_always_excluded() {
        assert_eq!(exclusion(0x01, true), Some(Exclusion::Control));
        assert_eq!(exclusion(0x7F, true), Some(Exclusion::Control));
        assert_eq!(exclusion(0x85, true), Some(Exclusion::Control));
        assert_eq!(exclusion(0xA0, false), None);
    }

    #[test]
    fn sorted_and_deduplicated() {
        let cps = filter_code_points("文中文A中".chars(), false).unwrap();
        assert_eq!(cps.as_slice(), &[0x4E2D, 0x6587]);
        assert!(cps.as_slice().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn include_ascii_keeps_printables() {
        let cps = filter_code_points("B中A".chars(), true).unwrap();
        assert_eq!(cps.as_slice(), &[0x41, 0x42, 0x4E2D]);
    }

    #[test]
    fn supplementary_dropped() {
        let cps = filter_code_points("😀中".chars(), false).unwrap();
        assert_eq!(cps.as_slice(), &[0x4E2D]);
    }

    #[test]
    fn empty_result_is_error() {
        let err = filter_code_points("abc 123".chars(), false).unwrap_err();
        assert!(matches!(err, CharsetError::Empty));

        let mut b = CharsetBuilder::new();
        b.add_text("\r\n\t\0");
        assert!(filter_code_points(b.into_chars(), true).is_err());
    }

    #[test]
    fn gb2312_sequence_contains_each_char_once() {
        let mut b = CharsetBuilder::new();
        b.add_standard(Standard::Gb2312);
        let cps = filter_code_points(b.into_chars(), false).unwrap();
        // GB2312 carries no printable ASCII, controls or noncharacters
        assert_eq!(cps.len(), 7445);
        assert!(cps.as_slice().windows(2).all(|w| w[0] < w[1]));
        assert!(cps.index_of(0x554A).is_some());
        assert!(cps.index_of(0x3000).is_some());
        assert!(cps.iter().all(|cp| !(0x20..=0x7E).contains(&cp)));
    }

    #[test]
    fn index_of_matches_position() {
        let cps = filter_code_points("一二三".chars(), false).unwrap();
        for (i, ch) in cps.chars().enumerate() {
            assert_eq!(cps.index_of(ch as u16), Some(i));
        }
        assert_eq!(cps.index_of(0x4E01), None);
    }
}
