//! Ordered sets of Unicode scalar-value ranges.
//!
//! [`CharSet`] is the real set algebra behind the textual character-class
//! operations: class interiors are parsed into ranges, combined with actual
//! union/subtraction, and serialized back to the engine's class syntax. The
//! serializer always emits a contained hyphen first, so the positional rules
//! the grammar table relies on hold for every generated fragment.

use crate::pattern::GrammarError;
use std::iter::Peekable;
use std::str::Chars;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CharSet {
    /// Sorted, non-overlapping ranges stored as (start, end) inclusive
    ranges: Vec<(char, char)>,
}

impl CharSet {
    /// Create an empty CharSet
    pub fn new() -> Self {
        CharSet { ranges: Vec::new() }
    }

    /// Create a CharSet from a single character
    pub fn from_char(ch: char) -> Self {
        CharSet {
            ranges: vec![(ch, ch)],
        }
    }

    /// Create a CharSet from an inclusive range
    pub fn from_range(start: char, end: char) -> Self {
        if start <= end {
            CharSet {
                ranges: vec![(start, end)],
            }
        } else {
            CharSet::new()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Add a character to the set
    pub fn add_char(&mut self, ch: char) {
        self.add_range(ch, ch);
    }

    /// Add an inclusive range to the set
    pub fn add_range(&mut self, start: char, end: char) {
        if start > end {
            return;
        }
        self.ranges.push((start, end));
        self.normalize();
    }

    /// Normalize ranges: sort and merge overlapping/adjacent ranges
    fn normalize(&mut self) {
        if self.ranges.len() <= 1 {
            return;
        }
        self.ranges.sort_by_key(|range| range.0);
        let mut merged = Vec::with_capacity(self.ranges.len());
        let mut current = self.ranges[0];

        for &(start, end) in &self.ranges[1..] {
            if start as u32 <= current.1 as u32 + 1 {
                current.1 = current.1.max(end);
            } else {
                merged.push(current);
                current = (start, end);
            }
        }
        merged.push(current);
        self.ranges = merged;
    }

    /// Union of two CharSets
    pub fn union(&self, other: &CharSet) -> CharSet {
        let mut result = self.clone();
        for &(start, end) in &other.ranges {
            result.add_range(start, end);
        }
        result
    }

    /// Subtract other from self (self - other)
    pub fn minus(&self, other: &CharSet) -> CharSet {
        let mut result = self.clone();

        for &(sub_start, sub_end) in &other.ranges {
            let mut kept = Vec::new();

            for &(start, end) in &result.ranges {
                if sub_end < start || sub_start > end {
                    kept.push((start, end));
                    continue;
                }
                // Overlap: keep the pieces on either side, stepping over the
                // surrogate gap where needed.
                if start < sub_start {
                    if let Some(left_end) = prev_scalar(sub_start) {
                        kept.push((start, left_end));
                    }
                }
                if end > sub_end {
                    if let Some(right_start) = next_scalar(sub_end) {
                        kept.push((right_start, end));
                    }
                }
            }
            result.ranges = kept;
        }
        result.normalize();
        result
    }

    /// Check if the set contains a character
    pub fn contains(&self, ch: char) -> bool {
        self.ranges
            .iter()
            .any(|&(start, end)| ch >= start && ch <= end)
    }

    /// The sorted, non-overlapping ranges of the set
    pub fn ranges(&self) -> &[(char, char)] {
        &self.ranges
    }

    /// Parse the interior of a bracketed character class into a set.
    ///
    /// Handles literal characters, `\xNN` / `\uNNNN` / `\u{...}` / `\UNNNNNNNN`
    /// point escapes, escaped punctuation, control escapes, `X-Y` ranges, and
    /// a leading or trailing literal hyphen. Negated classes and class escapes
    /// like `\d` have no range-set representation and are usage errors.
    pub fn from_class_fragment(fragment: &str) -> Result<CharSet, GrammarError> {
        let mut items = Vec::new();
        let mut chars = fragment.chars().peekable();
        let mut first = true;

        while let Some(ch) = chars.next() {
            match ch {
                '^' if first => {
                    return Err(GrammarError::UnsupportedClassSyntax {
                        fragment: fragment.to_string(),
                        detail: "negated classes are not modeled".to_string(),
                    });
                }
                '\\' => items.push(ClassItem::Char(parse_escape(&mut chars, fragment)?)),
                '-' => items.push(ClassItem::Dash),
                _ => items.push(ClassItem::Char(ch)),
            }
            first = false;
        }

        let mut set = CharSet::new();
        let mut index = 0;
        while index < items.len() {
            match items[index] {
                ClassItem::Dash => {
                    // `--` is the engine's set-difference operator
                    if matches!(items.get(index + 1), Some(ClassItem::Dash)) {
                        return Err(GrammarError::UnsupportedClassSyntax {
                            fragment: fragment.to_string(),
                            detail: "doubled set operator `--`".to_string(),
                        });
                    }
                    set.add_char('-');
                    index += 1;
                }
                ClassItem::Char(start) => {
                    if matches!(items.get(index + 1), Some(ClassItem::Dash)) {
                        if let Some(&ClassItem::Char(end)) = items.get(index + 2) {
                            if start > end {
                                return Err(GrammarError::InvalidClassRange { start, end });
                            }
                            set.add_range(start, end);
                            index += 3;
                            continue;
                        }
                    }
                    set.add_char(start);
                    index += 1;
                }
            }
        }
        Ok(set)
    }

    /// Serialize the set back to class-interior syntax.
    ///
    /// A contained hyphen is emitted first and nowhere else; everything
    /// outside printable ASCII becomes a `\u{...}` escape.
    pub fn to_class_fragment(&self) -> String {
        let mut out = String::new();
        let mut rest = self.clone();
        if rest.contains('-') {
            out.push('-');
            rest = rest.minus(&CharSet::from_char('-'));
        }
        for &(start, end) in &rest.ranges {
            push_class_char(&mut out, start);
            if end > start {
                if end as u32 - start as u32 > 1 {
                    out.push('-');
                }
                push_class_char(&mut out, end);
            }
        }
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ClassItem {
    Char(char),
    Dash,
}

fn parse_escape(chars: &mut Peekable<Chars<'_>>, fragment: &str) -> Result<char, GrammarError> {
    let unsupported = |detail: String| GrammarError::UnsupportedClassSyntax {
        fragment: fragment.to_string(),
        detail,
    };
    let escape = chars
        .next()
        .ok_or_else(|| unsupported("trailing backslash".to_string()))?;

    match escape {
        'x' | 'u' | 'U' => {
            let mut digits = String::new();
            if chars.peek() == Some(&'{') {
                chars.next();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(digit) => digits.push(digit),
                        None => return Err(unsupported(format!("unterminated \\{escape}{{"))),
                    }
                }
            } else {
                let width = match escape {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                for _ in 0..width {
                    match chars.next() {
                        Some(digit) => digits.push(digit),
                        None => return Err(unsupported(format!("truncated \\{escape} escape"))),
                    }
                }
            }
            let value = u32::from_str_radix(&digits, 16)
                .map_err(|_| unsupported(format!("bad hex digits in \\{escape}{digits}")))?;
            char::from_u32(value).ok_or_else(|| unsupported(format!("U+{value:X} is not a scalar value")))
        }
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        't' => Ok('\t'),
        'f' => Ok('\x0C'),
        '0' => Ok('\0'),
        other if other.is_ascii_alphanumeric() => {
            Err(unsupported(format!("class escape \\{other} is not a character")))
        }
        other => Ok(other),
    }
}

fn push_class_char(out: &mut String, ch: char) {
    match ch {
        '\\' | ']' | '[' | '^' | '-' | '&' | '~' => {
            out.push('\\');
            out.push(ch);
        }
        '!'..='~' => out.push(ch),
        _ => {
            out.push_str(&format!("\\u{{{:X}}}", ch as u32));
        }
    }
}

/// The scalar value just below `ch`, skipping the surrogate gap.
fn prev_scalar(ch: char) -> Option<char> {
    let mut code = ch as u32;
    while code > 0 {
        code -= 1;
        if let Some(prev) = char::from_u32(code) {
            return Some(prev);
        }
    }
    None
}

/// The scalar value just above `ch`, skipping the surrogate gap.
fn next_scalar(ch: char) -> Option<char> {
    let mut code = ch as u32 + 1;
    while code <= 0x10FFFF {
        if let Some(next) = char::from_u32(code) {
            return Some(next);
        }
        code += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_contains() {
        let mut set = CharSet::new();
        set.add_range('a', 'z');
        set.add_char('0');
        assert!(set.contains('a'));
        assert!(set.contains('m'));
        assert!(set.contains('0'));
        assert!(!set.contains('A'));
    }

    #[test]
    fn adjacent_ranges_merge() {
        let mut set = CharSet::new();
        set.add_range('a', 'f');
        set.add_range('g', 'z');
        assert_eq!(set.ranges(), &[('a', 'z')]);
    }

    #[test]
    fn union_and_minus() {
        let letters = CharSet::from_range('a', 'z');
        let digits = CharSet::from_range('0', '9');
        let both = letters.union(&digits);
        assert!(both.contains('q'));
        assert!(both.contains('7'));

        let no_vowel = letters.minus(&CharSet::from_char('e'));
        assert!(no_vowel.contains('d'));
        assert!(no_vowel.contains('f'));
        assert!(!no_vowel.contains('e'));
        assert_eq!(no_vowel.ranges(), &[('a', 'd'), ('f', 'z')]);
    }

    #[test]
    fn minus_steps_over_the_surrogate_gap() {
        let wide = CharSet::from_range('\u{9}', '\u{FFFD}');
        let cut = wide.minus(&CharSet::from_range('\u{D7FF}', '\u{E000}'));
        assert_eq!(cut.ranges(), &[('\u{9}', '\u{D7FE}'), ('\u{E001}', '\u{FFFD}')]);
    }

    #[test]
    fn parse_plain_ranges_and_singletons() {
        let set = CharSet::from_class_fragment("a-z0-9_").unwrap();
        assert!(set.contains('q'));
        assert!(set.contains('5'));
        assert!(set.contains('_'));
        assert!(!set.contains('-'));
    }

    #[test]
    fn parse_leading_and_trailing_hyphen_as_literal() {
        let leading = CharSet::from_class_fragment("-az").unwrap();
        assert!(leading.contains('-'));
        assert!(leading.contains('a'));
        assert!(leading.contains('z'));
        assert!(!leading.contains('b'));

        let trailing = CharSet::from_class_fragment("az-").unwrap();
        assert!(trailing.contains('-'));
    }

    #[test]
    fn parse_point_escapes() {
        let set = CharSet::from_class_fragment("\\x09\\u00C0-\\u00D6\\u{10000}-\\u{EFFFF}").unwrap();
        assert!(set.contains('\t'));
        assert!(set.contains('\u{C4}'));
        assert!(set.contains('\u{1D306}'));
        assert!(!set.contains('\u{F0000}'));
    }

    #[test]
    fn parse_rejects_negation_and_class_escapes() {
        assert!(matches!(
            CharSet::from_class_fragment("^a-z"),
            Err(GrammarError::UnsupportedClassSyntax { .. })
        ));
        assert!(matches!(
            CharSet::from_class_fragment("\\d"),
            Err(GrammarError::UnsupportedClassSyntax { .. })
        ));
    }

    #[test]
    fn parse_rejects_reversed_range() {
        assert!(matches!(
            CharSet::from_class_fragment("z-a"),
            Err(GrammarError::InvalidClassRange { start: 'z', end: 'a' })
        ));
    }

    #[test]
    fn serialize_puts_hyphen_first_and_round_trips() {
        let set = CharSet::from_class_fragment("a-c-").unwrap();
        let fragment = set.to_class_fragment();
        assert!(fragment.starts_with('-'));
        let reparsed = CharSet::from_class_fragment(&fragment).unwrap();
        assert_eq!(reparsed, set);
    }

    #[test]
    fn serialize_escapes_specials_and_non_ascii() {
        let mut set = CharSet::new();
        set.add_char(']');
        set.add_char('\u{B7}');
        set.add_char(' ');
        let fragment = set.to_class_fragment();
        assert_eq!(fragment, "\\u{20}\\]\\u{B7}");
        assert_eq!(CharSet::from_class_fragment(&fragment).unwrap(), set);
    }

    #[test]
    fn two_character_range_is_emitted_without_a_dash() {
        let set = CharSet::from_range('a', 'b');
        assert_eq!(set.to_class_fragment(), "ab");
    }
}
