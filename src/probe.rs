//! Capability probe for astral-plane matching.
//!
//! Regex engines differ in whether a point escape for a character outside the
//! 16-bit range matches the character as a single code point or falls apart
//! into unrelated units. The probe is run once, before any production is
//! defined, and its outcome decides which character-class variant every
//! production gets.

use std::sync::OnceLock;

/// The probed astral character, U+1D306 TETRAGRAM FOR CENTRE, written as a
/// point escape in the pattern and literally in the sample.
const ASTRAL_PROBE: &str = "\\u{1D306}";
const ASTRAL_SAMPLE: &str = "\u{1D306}";

/// Minimal engine seam so the probe can be exercised against engines with
/// different capability levels.
pub trait RegexEngine {
    /// Compile `pattern` and return the text of its first match in
    /// `haystack`, if any.
    fn first_match(&self, pattern: &str, haystack: &str) -> Result<Option<String>, String>;
}

/// The ambient engine used by the rest of the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FancyRegexEngine;

impl RegexEngine for FancyRegexEngine {
    fn first_match(&self, pattern: &str, haystack: &str) -> Result<Option<String>, String> {
        let regex = fancy_regex::Regex::new(pattern).map_err(|error| error.to_string())?;
        let found = regex.find(haystack).map_err(|error| error.to_string())?;
        Ok(found.map(|matched| matched.as_str().to_string()))
    }
}

/// Probe `engine` for code-point-aware astral matching.
///
/// Supported means the probe produced a match whose length, in the UTF-16
/// code units a surrogate-oriented runtime counts in, is exactly one
/// surrogate pair. Engines that reject the point-escape syntax, fail while
/// matching, or match something shorter are all reported as unsupported;
/// the failure is absorbed here, never propagated.
pub fn detect_unicode_support(engine: &dyn RegexEngine) -> bool {
    match engine.first_match(ASTRAL_PROBE, ASTRAL_SAMPLE) {
        Ok(Some(matched)) => matched.encode_utf16().count() == 2,
        _ => false,
    }
}

/// Process-wide capability flag: computed once with the ambient engine,
/// immutable thereafter.
pub fn unicode_support() -> bool {
    static SUPPORT: OnceLock<bool> = OnceLock::new();
    *SUPPORT.get_or_init(|| detect_unicode_support(&FancyRegexEngine))
}
