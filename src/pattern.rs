//! Compiled pattern type and the two sanctioned composition combinators.
//!
//! Every grammar production is an [`XmlPattern`]: an immutable wrapper around
//! the literal regex source, the astral-capability flag it was built with, and
//! the compiled engine. Patterns are created once at table-construction time
//! and only ever read afterwards, so they can be shared freely.

use std::error::Error;
use std::fmt;

/// Errors raised while defining the grammar table.
///
/// All of these are load-time failures: they signal a bug in a pattern
/// definition, not a condition a downstream caller is expected to recover
/// from. Matching against a finished pattern never produces an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// The pattern source does not start with `[`, so it cannot be used
    /// with the character-class algebra.
    NotACharClass { source: String },

    /// The search token passed to `subtract_literal` was empty.
    InvalidSearch { search: String },

    /// The search token does not occur verbatim in the class body.
    SearchNotFound { search: String, source: String },

    /// A hyphen can only be removed when it is the first body character;
    /// anywhere else it has range-forming significance.
    HyphenNotFirst { source: String },

    /// A bare `|` was passed to `concat`; an ungrouped top-level alternation
    /// silently changes the meaning of the neighboring parts.
    TopLevelAlternation { assembled: String },

    /// `group` was invoked with no parts.
    EmptyGroup,

    /// A class fragment uses syntax the range-set parser does not model
    /// (negation, `\d`-style class escapes, doubled set operators).
    UnsupportedClassSyntax { fragment: String, detail: String },

    /// A `X-Y` range with reversed endpoints.
    InvalidClassRange { start: char, end: char },

    /// The assembled source failed to compile.
    Compile { source: String, message: String },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::NotACharClass { source } => {
                write!(f, "/{}/ is not a character class expression", source)
            }
            GrammarError::InvalidSearch { search } => {
                write!(f, "{:?} is not a valid search token", search)
            }
            GrammarError::SearchNotFound { search, source } => {
                write!(f, "{:?} does not occur in /{}/", search, source)
            }
            GrammarError::HyphenNotFirst { source } => {
                write!(f, "\"-\" is not at the first position of /{}/", source)
            }
            GrammarError::TopLevelAlternation { assembled } => {
                write!(
                    f,
                    "use group instead of concat to wrap expressions with `|` (after /{}/)",
                    assembled
                )
            }
            GrammarError::EmptyGroup => {
                write!(f, "group requires at least one part")
            }
            GrammarError::UnsupportedClassSyntax { fragment, detail } => {
                write!(f, "unsupported class syntax in [{}]: {}", fragment, detail)
            }
            GrammarError::InvalidClassRange { start, end } => {
                write!(
                    f,
                    "invalid class range U+{:04X}-U+{:04X}",
                    *start as u32, *end as u32
                )
            }
            GrammarError::Compile { source, message } => {
                write!(f, "/{}/ failed to compile: {}", source, message)
            }
        }
    }
}

impl Error for GrammarError {}

/// One matched segment of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    start: usize,
    end: usize,
    text: String,
}

impl PatternMatch {
    fn from_backend(matched: fancy_regex::Match<'_>) -> Self {
        PatternMatch {
            start: matched.start(),
            end: matched.end(),
            text: matched.as_str().to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }
}

/// Capture groups of a successful match, addressable by index or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternCaptures {
    groups: Vec<Option<PatternMatch>>,
    names: Vec<(String, usize)>,
}

impl PatternCaptures {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group 0 is the whole match.
    pub fn get(&self, index: usize) -> Option<&PatternMatch> {
        self.groups.get(index).and_then(Option::as_ref)
    }

    pub fn name(&self, name: &str) -> Option<&PatternMatch> {
        let index = self
            .names
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, index)| *index)?;
        self.get(index)
    }
}

/// An immutable compiled pattern: literal source, flag set, engine.
///
/// The multiline flag is always set; the unicode flag records whether the
/// source carries astral-plane class ranges, as decided by the capability
/// flag the pattern was built with.
#[derive(Debug, Clone)]
pub struct XmlPattern {
    source: String,
    unicode: bool,
    regex: fancy_regex::Regex,
}

impl XmlPattern {
    /// Compile a pattern directly from literal source.
    pub fn new(source: &str, unicode: bool) -> Result<Self, GrammarError> {
        let mut builder = fancy_regex::RegexBuilder::new(source);
        builder.multi_line(true);
        let regex = builder.build().map_err(|error| GrammarError::Compile {
            source: source.to_string(),
            message: error.to_string(),
        })?;
        Ok(XmlPattern {
            source: source.to_string(),
            unicode,
            regex,
        })
    }

    /// The literal regex source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the pattern was built with astral-plane class ranges.
    pub fn is_unicode(&self) -> bool {
        self.unicode
    }

    /// Unanchored match test. An engine fault (e.g. a backtrack limit) is
    /// ordinary "no match" data, never an error.
    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input).unwrap_or(false)
    }

    /// Leftmost match, if any.
    pub fn find(&self, input: &str) -> Option<PatternMatch> {
        match self.regex.find(input) {
            Ok(found) => found.map(PatternMatch::from_backend),
            Err(_) => None,
        }
    }

    /// Leftmost match at or after `start`, for cursor-driven tokenizers.
    pub fn find_at(&self, input: &str, start: usize) -> Option<PatternMatch> {
        match self.regex.captures_from_pos(input, start) {
            Ok(captures) => captures
                .as_ref()
                .and_then(|caps| caps.get(0))
                .map(PatternMatch::from_backend),
            Err(_) => None,
        }
    }

    /// Whether the pattern matches `input` in full.
    pub fn matches_whole(&self, input: &str) -> bool {
        self.find(input)
            .map(|found| found.start() == 0 && found.end() == input.len())
            .unwrap_or(false)
    }

    /// Capture groups of the leftmost match, if any.
    pub fn captures(&self, input: &str) -> Option<PatternCaptures> {
        let captures = match self.regex.captures(input) {
            Ok(captures) => captures?,
            Err(_) => return None,
        };
        let mut groups = Vec::with_capacity(captures.len());
        for index in 0..captures.len() {
            groups.push(captures.get(index).map(PatternMatch::from_backend));
        }
        let names = self
            .regex
            .capture_names()
            .enumerate()
            .filter_map(|(index, name)| name.map(|name| (name.to_string(), index)))
            .collect();
        Some(PatternCaptures { groups, names })
    }
}

impl fmt::Display for XmlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.source)
    }
}

/// One element of a composite pattern: a literal source snippet or an
/// already-compiled pattern.
#[derive(Debug, Clone, Copy)]
pub enum Part<'a> {
    Lit(&'a str),
    Pat(&'a XmlPattern),
}

impl<'a> From<&'a str> for Part<'a> {
    fn from(text: &'a str) -> Self {
        Part::Lit(text)
    }
}

impl<'a> From<&'a XmlPattern> for Part<'a> {
    fn from(pattern: &'a XmlPattern) -> Self {
        Part::Pat(pattern)
    }
}

impl Part<'_> {
    fn source(&self) -> &str {
        match self {
            Part::Lit(text) => text,
            Part::Pat(pattern) => pattern.source(),
        }
    }
}

/// Concatenate parts into one pattern without grouping.
///
/// A literal `|` is rejected here: at the top level of an ungrouped
/// concatenation it would rebind the neighboring parts. Use [`group`] for
/// alternations.
pub fn concat(parts: &[Part<'_>], unicode: bool) -> Result<XmlPattern, GrammarError> {
    let mut source = String::new();
    for part in parts {
        match part {
            Part::Lit(text) => {
                if *text == "|" {
                    return Err(GrammarError::TopLevelAlternation { assembled: source });
                }
                source.push_str(text);
            }
            Part::Pat(pattern) => source.push_str(pattern.source()),
        }
    }
    XmlPattern::new(&source, unicode)
}

/// Concatenate parts and wrap them in a non-capturing group, so a trailing
/// quantifier or an embedded alternation binds to the whole expression.
pub fn group(parts: &[Part<'_>], unicode: bool) -> Result<XmlPattern, GrammarError> {
    if parts.is_empty() {
        return Err(GrammarError::EmptyGroup);
    }
    let mut source = String::from("(?:");
    for part in parts {
        source.push_str(part.source());
    }
    source.push(')');
    XmlPattern::new(&source, unicode)
}
