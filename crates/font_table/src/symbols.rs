//! Identifier names for the emitted table.

/// Symbol names built from a user prefix.
///
/// The prefix gets a trailing `_` unless it already ends with one. It is not
/// checked for identifier legality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolNames {
    prefix: String,
    upper: bool,
}

impl SymbolNames {
    pub fn new(prefix: &str) -> Self {
        let mut prefix = prefix.to_owned();
        if !prefix.ends_with('_') {
            prefix.push('_');
        }
        Self { prefix, upper: false }
    }

    /// The same names upper-cased, for Rust `const`/`static` items.
    pub fn to_upper(&self) -> Self {
        Self {
            prefix: self.prefix.to_uppercase(),
            upper: true,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn suffixed(&self, suffix: &str) -> String {
        if self.upper {
            format!("{}{}", self.prefix, suffix.to_uppercase())
        } else {
            format!("{}{suffix}", self.prefix)
        }
    }

    pub fn height(&self) -> String {
        self.suffixed("HEIGHT")
    }

    pub fn width(&self) -> String {
        self.suffixed("WIDTH")
    }

    pub fn count(&self) -> String {
        self.suffixed("COUNT")
    }

    /// Code-point array.
    pub fn map(&self) -> String {
        self.suffixed("map")
    }

    /// Concatenated glyph bytes.
    pub fn data(&self) -> String {
        self.suffixed("data")
    }

    /// Descriptor tying the arrays together.
    pub fn font(&self) -> String {
        self.suffixed("font")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_separator_once() {
        assert_eq!(SymbolNames::new("utf8_16x16").prefix(), "utf8_16x16_");
        assert_eq!(SymbolNames::new("utf8_16x16_").prefix(), "utf8_16x16_");
        assert_eq!(SymbolNames::new("").prefix(), "_");
    }

    #[test]
    fn c_names() {
        let names = SymbolNames::new("utf8_12x12_");
        assert_eq!(names.height(), "utf8_12x12_HEIGHT");
        assert_eq!(names.width(), "utf8_12x12_WIDTH");
        assert_eq!(names.count(), "utf8_12x12_COUNT");
        assert_eq!(names.map(), "utf8_12x12_map");
        assert_eq!(names.data(), "utf8_12x12_data");
        assert_eq!(names.font(), "utf8_12x12_font");
    }

    #[test]
    fn upper_case_names() {
        let names = SymbolNames::new("utf8_24x24").to_upper();
        assert_eq!(names.map(), "UTF8_24X24_MAP");
        assert_eq!(names.font(), "UTF8_24X24_FONT");
        assert_eq!(names.count(), "UTF8_24X24_COUNT");
    }

    #[test]
    fn upper_case_prefix_keeps_c_suffixes() {
        assert_eq!(SymbolNames::new("CJK").map(), "CJK_map");
    }

    #[test]
    fn prefix_is_not_validated() {
        assert_eq!(SymbolNames::new("my font-").map(), "my font-_map");
    }
}
