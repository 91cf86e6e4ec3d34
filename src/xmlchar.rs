//! Per-character membership checks for the XML character classes.
//!
//! Tokenizers frequently need to classify a single character without running
//! the regex engine at all. The sets here are built once with real range
//! arithmetic and always include the astral-plane ranges: a `char` already is
//! a full scalar value, so the engine capability flag does not apply.

use crate::charset::CharSet;
use std::sync::OnceLock;

/// XML character classification for `char`.
pub trait XmlChar {
    /// `Char`: any character legal anywhere in a document.
    fn is_xml_char(&self) -> bool;

    /// `S`: space, tab, carriage return, line feed.
    fn is_xml_whitespace(&self) -> bool;

    /// `NameStartChar`
    fn is_xml_name_start_char(&self) -> bool;

    /// `NameChar`
    fn is_xml_name_char(&self) -> bool;

    /// `NCNameStartChar`: `NameStartChar` without the namespace separator.
    fn is_xml_ncname_start_char(&self) -> bool;

    /// `NCNameChar`: `NameChar` without the namespace separator.
    fn is_xml_ncname_char(&self) -> bool;

    /// `PubidChar`
    fn is_xml_pubid_char(&self) -> bool;
}

impl XmlChar for char {
    fn is_xml_char(&self) -> bool {
        xml_char_set().contains(*self)
    }

    fn is_xml_whitespace(&self) -> bool {
        matches!(self, ' ' | '\t' | '\r' | '\n')
    }

    fn is_xml_name_start_char(&self) -> bool {
        name_start_char_set().contains(*self)
    }

    fn is_xml_name_char(&self) -> bool {
        name_char_set().contains(*self)
    }

    fn is_xml_ncname_start_char(&self) -> bool {
        *self != ':' && self.is_xml_name_start_char()
    }

    fn is_xml_ncname_char(&self) -> bool {
        *self != ':' && self.is_xml_name_char()
    }

    fn is_xml_pubid_char(&self) -> bool {
        pubid_char_set().contains(*self)
    }
}

/// `Char`, full scalar range.
pub fn xml_char_set() -> &'static CharSet {
    static SET: OnceLock<CharSet> = OnceLock::new();
    SET.get_or_init(|| {
        let mut set = CharSet::new();
        set.add_char('\u{9}');
        set.add_char('\u{A}');
        set.add_char('\u{D}');
        set.add_range('\u{20}', '\u{D7FF}');
        set.add_range('\u{E000}', '\u{FFFD}');
        set.add_range('\u{10000}', '\u{10FFFF}');
        set
    })
}

/// `NameStartChar`, full scalar range.
pub fn name_start_char_set() -> &'static CharSet {
    static SET: OnceLock<CharSet> = OnceLock::new();
    SET.get_or_init(|| {
        let mut set = CharSet::new();
        set.add_char(':');
        set.add_char('_');
        set.add_range('A', 'Z');
        set.add_range('a', 'z');
        set.add_range('\u{C0}', '\u{D6}');
        set.add_range('\u{D8}', '\u{F6}');
        set.add_range('\u{F8}', '\u{2FF}');
        set.add_range('\u{370}', '\u{37D}');
        set.add_range('\u{37F}', '\u{1FFF}');
        set.add_range('\u{200C}', '\u{200D}');
        set.add_range('\u{2070}', '\u{218F}');
        set.add_range('\u{2C00}', '\u{2FEF}');
        set.add_range('\u{3001}', '\u{D7FF}');
        set.add_range('\u{F900}', '\u{FDCF}');
        set.add_range('\u{FDF0}', '\u{FFFD}');
        set.add_range('\u{10000}', '\u{EFFFF}');
        set
    })
}

/// `NameChar`: `NameStartChar` plus the continuation characters.
pub fn name_char_set() -> &'static CharSet {
    static SET: OnceLock<CharSet> = OnceLock::new();
    SET.get_or_init(|| {
        let mut extra = CharSet::new();
        extra.add_char('-');
        extra.add_char('.');
        extra.add_range('0', '9');
        extra.add_char('\u{B7}');
        extra.add_range('\u{300}', '\u{36F}');
        extra.add_range('\u{203F}', '\u{2040}');
        name_start_char_set().union(&extra)
    })
}

/// `PubidChar`
pub fn pubid_char_set() -> &'static CharSet {
    static SET: OnceLock<CharSet> = OnceLock::new();
    SET.get_or_init(|| {
        let mut set = CharSet::new();
        set.add_char('\u{20}');
        set.add_char('\u{D}');
        set.add_char('\u{A}');
        set.add_range('a', 'z');
        set.add_range('A', 'Z');
        set.add_range('0', '9');
        for ch in "-'()+,./:=?;!*#@$_%".chars() {
            set.add_char(ch);
        }
        set
    })
}

/// `NCNameStartChar`, full scalar range.
pub fn ncname_start_char_set() -> &'static CharSet {
    static SET: OnceLock<CharSet> = OnceLock::new();
    SET.get_or_init(|| name_start_char_set().minus(&CharSet::from_char(':')))
}

/// `NCNameChar`, full scalar range.
pub fn ncname_char_set() -> &'static CharSet {
    static SET: OnceLock<CharSet> = OnceLock::new();
    SET.get_or_init(|| name_char_set().minus(&CharSet::from_char(':')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_boundaries() {
        assert!('\t'.is_xml_char());
        assert!('\n'.is_xml_char());
        assert!('\r'.is_xml_char());
        assert!(' '.is_xml_char());
        assert!('\u{D7FF}'.is_xml_char());
        assert!('\u{E000}'.is_xml_char());
        assert!('\u{FFFD}'.is_xml_char());
        assert!('\u{10000}'.is_xml_char());
        assert!('\u{10FFFF}'.is_xml_char());

        assert!(!'\u{0}'.is_xml_char());
        assert!(!'\u{B}'.is_xml_char());
        assert!(!'\u{1F}'.is_xml_char());
        assert!(!'\u{FFFE}'.is_xml_char());
        assert!(!'\u{FFFF}'.is_xml_char());
    }

    #[test]
    fn name_start_char_boundaries() {
        for ch in [':', '_', 'A', 'Z', 'a', 'z'] {
            assert!(ch.is_xml_name_start_char(), "{ch:?}");
        }
        for ch in [
            '\u{C0}', '\u{D6}', '\u{D8}', '\u{F6}', '\u{F8}', '\u{2FF}', '\u{370}', '\u{37D}',
            '\u{37F}', '\u{1FFF}', '\u{200C}', '\u{200D}', '\u{2070}', '\u{218F}', '\u{2C00}',
            '\u{2FEF}', '\u{3001}', '\u{D7FF}', '\u{F900}', '\u{FDCF}', '\u{FDF0}', '\u{FFFD}',
            '\u{10000}', '\u{EFFFF}',
        ] {
            assert!(ch.is_xml_name_start_char(), "{ch:?}");
        }
        for ch in [
            '-', '.', '0', '9', '\u{B7}', '\u{D7}', '\u{F7}', '\u{300}', '\u{36F}', '\u{37E}',
            '\u{2000}', '\u{2069}', '\u{2190}', '\u{2BFF}', '\u{2FF0}', '\u{3000}', '\u{E000}',
            '\u{F8FF}', '\u{FDD0}', '\u{FFFE}', '\u{F0000}',
        ] {
            assert!(!ch.is_xml_name_start_char(), "{ch:?}");
        }
    }

    #[test]
    fn name_char_adds_the_continuation_characters() {
        for ch in ['-', '.', '0', '9', '\u{B7}', '\u{300}', '\u{36F}', '\u{203F}', '\u{2040}'] {
            assert!(ch.is_xml_name_char(), "{ch:?}");
            assert!(!ch.is_xml_name_start_char(), "{ch:?}");
        }
        assert!(!'\u{2041}'.is_xml_name_char());
        assert!(!'/'.is_xml_name_char());
    }

    #[test]
    fn ncname_excludes_only_the_colon() {
        assert!(!':'.is_xml_ncname_start_char());
        assert!(!':'.is_xml_ncname_char());
        assert!('a'.is_xml_ncname_start_char());
        assert!('-'.is_xml_ncname_char());
        assert!(!ncname_start_char_set().contains(':'));
        assert!(ncname_char_set().contains('\u{B7}'));
    }

    #[test]
    fn whitespace_is_exactly_the_four_s_characters() {
        for ch in [' ', '\t', '\r', '\n'] {
            assert!(ch.is_xml_whitespace());
        }
        assert!(!'\u{A0}'.is_xml_whitespace());
        assert!(!'\u{B}'.is_xml_whitespace());
    }

    #[test]
    fn pubid_char_membership() {
        for ch in "az09-'()+,./:=?;!*#@$_% \r\n".chars() {
            assert!(ch.is_xml_pubid_char(), "{ch:?}");
        }
        for ch in ['"', '<', '>', '&', '\u{E9}', '\t'] {
            assert!(!ch.is_xml_pubid_char(), "{ch:?}");
        }
    }
}
