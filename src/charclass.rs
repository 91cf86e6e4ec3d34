//! Character-class algebra over pattern source text.
//!
//! Two operations, both pure: extracting the interior of a bracket expression,
//! and removing one token from it. The validation rules are textual (a hyphen
//! token must sit at the very first body position, the token must occur
//! verbatim), but the removal itself is performed with real range arithmetic
//! via [`CharSet`] and re-serialized, so subtracting `a` from `[a-z]` yields a
//! class matching `b` through `z` rather than a mangled source string.
//!
//! Violations are authoring bugs in the grammar table, surfaced at load time;
//! they are not recoverable conditions for a downstream caller.

use crate::charset::CharSet;
use crate::pattern::{GrammarError, XmlPattern};

/// The fragment between the first `[` and the last `]` of a bracket
/// expression. Fails when the pattern is not a bracket expression; nesting
/// beyond that is not validated.
pub fn class_body(pattern: &XmlPattern) -> Result<&str, GrammarError> {
    let source = pattern.source();
    if !source.starts_with('[') {
        return Err(GrammarError::NotACharClass {
            source: source.to_string(),
        });
    }
    let close = source.rfind(']').ok_or_else(|| GrammarError::NotACharClass {
        source: source.to_string(),
    })?;
    Ok(&source[1..close])
}

/// A new pattern whose class body is the input's body minus `token`.
///
/// Preconditions, checked on the source text:
/// - the input is a bracket expression;
/// - `token` is non-empty and occurs verbatim in the class body;
/// - a hyphen token occurs as the very first body character (a hyphen
///   anywhere else has range-forming significance, and removing it silently
///   would change the class's meaning).
///
/// The result inherits the input's unicode flag. Anything after the closing
/// `]` (such as a quantifier) is preserved unchanged.
pub fn subtract_literal(pattern: &XmlPattern, token: &str) -> Result<XmlPattern, GrammarError> {
    if token.is_empty() {
        return Err(GrammarError::InvalidSearch {
            search: token.to_string(),
        });
    }
    let source = pattern.source();
    if !source.starts_with('[') {
        return Err(GrammarError::NotACharClass {
            source: source.to_string(),
        });
    }
    let close = source.rfind(']').ok_or_else(|| GrammarError::NotACharClass {
        source: source.to_string(),
    })?;
    let body = &source[1..close];
    let tail = &source[close + 1..];

    let position = body.find(token).ok_or_else(|| GrammarError::SearchNotFound {
        search: token.to_string(),
        source: source.to_string(),
    })?;
    if token == "-" && position != 0 {
        return Err(GrammarError::HyphenNotFirst {
            source: source.to_string(),
        });
    }

    let body_set = CharSet::from_class_fragment(body)?;
    let token_set = CharSet::from_class_fragment(token)?;
    let remainder = body_set.minus(&token_set);
    let new_source = format!("[{}]{}", remainder.to_class_fragment(), tail);
    XmlPattern::new(&new_source, pattern.is_unicode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn class(source: &str) -> XmlPattern {
        XmlPattern::new(source, false).unwrap()
    }

    #[test]
    fn class_body_is_a_left_inverse_of_class_construction() {
        assert_eq!(class_body(&class("[a-z]")).unwrap(), "a-z");
        assert_eq!(class_body(&class("[-az]")).unwrap(), "-az");
        assert_eq!(
            class_body(&class("[\\x20\\x09\\x0D\\x0A]")).unwrap(),
            "\\x20\\x09\\x0D\\x0A"
        );
    }

    #[test]
    fn class_body_rejects_non_bracket_patterns() {
        assert_eq!(
            class_body(&class("abc")).unwrap_err(),
            GrammarError::NotACharClass {
                source: "abc".to_string()
            }
        );
    }

    #[test]
    fn subtracting_a_range_member_splits_the_range() {
        let result = subtract_literal(&class("[a-z]"), "a").unwrap();
        assert_eq!(result.source(), "[b-z]");
        for ch in 'b'..='z' {
            assert!(result.matches_whole(&ch.to_string()));
        }
        assert!(!result.is_match("a"));
        assert!(!result.is_match("-"));
    }

    #[test]
    fn hyphen_is_untouched_when_not_the_removed_token() {
        let result = subtract_literal(&class("[-az]"), "a").unwrap();
        assert!(result.matches_whole("-"));
        assert!(result.matches_whole("z"));
        assert!(!result.is_match("a"));
    }

    #[test]
    fn leading_hyphen_can_be_removed() {
        let result = subtract_literal(&class("[-az]"), "-").unwrap();
        assert!(result.matches_whole("a"));
        assert!(result.matches_whole("z"));
        assert!(!result.is_match("-"));
    }

    #[test]
    fn non_leading_hyphen_cannot_be_removed() {
        assert_eq!(
            subtract_literal(&class("[az-]"), "-").unwrap_err(),
            GrammarError::HyphenNotFirst {
                source: "[az-]".to_string()
            }
        );
    }

    #[test]
    fn empty_token_is_rejected() {
        assert_eq!(
            subtract_literal(&class("[a-z]"), "").unwrap_err(),
            GrammarError::InvalidSearch {
                search: String::new()
            }
        );
    }

    #[test]
    fn missing_token_is_rejected() {
        assert_eq!(
            subtract_literal(&class("[abc]"), "x").unwrap_err(),
            GrammarError::SearchNotFound {
                search: "x".to_string(),
                source: "[abc]".to_string()
            }
        );
    }

    #[test]
    fn non_bracket_pattern_is_rejected() {
        assert_eq!(
            subtract_literal(&class("a-z"), "a").unwrap_err(),
            GrammarError::NotACharClass {
                source: "a-z".to_string()
            }
        );
    }

    #[test]
    fn unicode_flag_is_inherited() {
        let astral = XmlPattern::new("[:a\\u{10000}-\\u{EFFFF}]", true).unwrap();
        let result = subtract_literal(&astral, ":").unwrap();
        assert!(result.is_unicode());
        assert!(result.matches_whole("\u{1D306}"));
        assert!(!result.is_match(":"));
    }

    #[test]
    fn trailing_quantifier_is_preserved() {
        let result = subtract_literal(&class("[abc]+"), "b").unwrap();
        assert_eq!(result.source(), "[ac]+");
        assert!(result.matches_whole("acca"));
    }

    proptest! {
        #[test]
        fn subtraction_removes_exactly_the_token(chars in prop::collection::btree_set(prop::char::range('b', 'y'), 2..10usize)) {
            let body: String = chars.iter().collect();
            let pattern = XmlPattern::new(&format!("[{body}]"), false).unwrap();
            let token = *chars.iter().next().unwrap();
            let result = subtract_literal(&pattern, &token.to_string()).unwrap();
            for ch in 'a'..='z' {
                let expected = chars.contains(&ch) && ch != token;
                prop_assert_eq!(result.matches_whole(&ch.to_string()), expected);
            }
        }
    }
}
