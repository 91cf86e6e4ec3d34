//! The XML 1.1 + Namespaces production table.
//!
//! Every field of [`XmlGrammar`] is one named production of the formal
//! grammar, compiled bottom-up from literal class definitions, the two
//! composition combinators, and class subtraction. The table is built exactly
//! once per capability flag value; the process-wide instance uses the probed
//! flag and is immutable afterwards.
//!
//! `QName` is the one atom that ships dedicated anchored (`qname_exact`) and
//! capturing (`qname_group`) variants, because namespace resolution validates
//! and splits qualified names constantly. For `Name`, `NCName`, and
//! `Nmtoken`, [`XmlPattern::matches_whole`] is the whole-string validation
//! path.
//!
//! Character-range boundaries are transcribed from the grammar verbatim; an
//! off-by-one here silently admits or rejects valid names. Classes that later
//! lose a character through subtraction keep that character textually intact
//! in their source (the hyphen of `Char` sits in first position for exactly
//! this reason).

use crate::charclass::{class_body, subtract_literal};
use crate::pattern::{concat, group, GrammarError, Part, XmlPattern};
use crate::probe::unicode_support;
use std::sync::OnceLock;

pub const CDATA_START: &str = "<![CDATA[";
pub const CDATA_END: &str = "]]>";
pub const COMMENT_START: &str = "<!--";
pub const COMMENT_END: &str = "-->";
pub const DOCTYPE_DECL_START: &str = "<!DOCTYPE";
pub const ELEMENTDECL_START: &str = "<!ELEMENT";
pub const ATTLIST_DECL_START: &str = "<!ATTLIST";
pub const ENTITY_DECL_START: &str = "<!ENTITY";
pub const NOTATION_DECL_START: &str = "<!NOTATION";
pub const PUBLIC: &str = "PUBLIC";
pub const SYSTEM: &str = "SYSTEM";
pub const UNICODE_REPLACEMENT_CHARACTER: char = '\u{FFFD}';

/// `Char` restricted to the 16-bit range. The hyphen is first so comment
/// bodies can subtract it.
const CHAR_BMP: &str = "[-\\x09\\x0A\\x0D\\x20-\\x2C\\x2E-\\u{D7FF}\\u{E000}-\\u{FFFD}]";

const S_CHAR: &str = "[\\x20\\x09\\x0D\\x0A]";

/// `NameStartChar` restricted to the 16-bit range. The colon is first so the
/// namespace variants can subtract it.
const NAME_START_CHAR_BMP: &str = "[:_a-zA-Z\\u{C0}-\\u{D6}\\u{D8}-\\u{F6}\\u{F8}-\\u{2FF}\
\\u{370}-\\u{37D}\\u{37F}-\\u{1FFF}\\u{200C}-\\u{200D}\\u{2070}-\\u{218F}\\u{2C00}-\\u{2FEF}\
\\u{3001}-\\u{D7FF}\\u{F900}-\\u{FDCF}\\u{FDF0}-\\u{FFFD}]";

/// The continuation characters `NameChar` adds over `NameStartChar`, hyphen
/// first.
const NAME_EXTRA_CHARS: &str = "-.0-9\\u{B7}";
const NAME_EXTRA_RANGES: &str = "\\u{300}-\\u{36F}\\u{203F}-\\u{2040}";

const PUBID_CHAR: &str = "[-\\x20\\x0D\\x0Aa-zA-Z0-9'()+,./:=?;!*#@$_%]";

const VERSION_NUM: &str = "1[.]\\d+";
const ENC_NAME: &str = "[A-Za-z][-A-Za-z0-9._]*";

macro_rules! parts {
    ($($part:expr),+ $(,)?) => {
        &[$(Part::from($part)),+]
    };
}

/// Threads the capability flag into the combinators while the table is built.
struct Builder {
    unicode: bool,
}

impl Builder {
    fn class(&self, source: &str) -> Result<XmlPattern, GrammarError> {
        XmlPattern::new(source, self.unicode)
    }

    fn reg(&self, parts: &[Part<'_>]) -> Result<XmlPattern, GrammarError> {
        concat(parts, self.unicode)
    }

    fn regg(&self, parts: &[Part<'_>]) -> Result<XmlPattern, GrammarError> {
        group(parts, self.unicode)
    }
}

/// The complete production table. Field names follow the grammar's rule
/// names; every pattern is immutable and freely shareable once built.
#[derive(Debug, Clone)]
pub struct XmlGrammar {
    /// The capability flag the table was built with.
    pub unicode: bool,

    pub xml_char: XmlPattern,
    pub s: XmlPattern,
    pub s_opt: XmlPattern,
    pub name_start_char: XmlPattern,
    pub name_char: XmlPattern,
    pub name: XmlPattern,
    pub nmtoken: XmlPattern,
    pub ncname_start_char: XmlPattern,
    pub ncname_char: XmlPattern,
    pub ncname: XmlPattern,
    pub qname: XmlPattern,
    pub qname_exact: XmlPattern,
    pub qname_group: XmlPattern,
    pub entity_ref: XmlPattern,
    pub char_ref: XmlPattern,
    pub reference: XmlPattern,
    pub pe_reference: XmlPattern,
    pub entity_value: XmlPattern,
    pub att_value: XmlPattern,
    pub comment: XmlPattern,
    pub pi: XmlPattern,
    pub cd_sect: XmlPattern,
    pub pubid_char: XmlPattern,
    pub pubid_literal: XmlPattern,
    pub system_literal: XmlPattern,
    pub external_id: XmlPattern,
    pub external_id_match: XmlPattern,
    pub ndata_decl: XmlPattern,
    pub entity_def: XmlPattern,
    pub ge_decl: XmlPattern,
    pub pe_def: XmlPattern,
    pub pe_decl: XmlPattern,
    pub entity_decl: XmlPattern,
    pub public_id: XmlPattern,
    pub notation_decl: XmlPattern,
    pub mixed: XmlPattern,
    pub children: XmlPattern,
    pub contentspec: XmlPattern,
    pub elementdecl: XmlPattern,
    pub tokenized_type: XmlPattern,
    pub notation_type: XmlPattern,
    pub enumeration: XmlPattern,
    pub enumerated_type: XmlPattern,
    pub att_type: XmlPattern,
    pub default_decl: XmlPattern,
    pub att_def: XmlPattern,
    pub attlist_decl: XmlPattern,
    pub eq: XmlPattern,
    pub version_info: XmlPattern,
    pub encoding_decl: XmlPattern,
    pub sd_decl: XmlPattern,
    pub xml_decl: XmlPattern,
}

impl XmlGrammar {
    /// Build the table for one capability flag value.
    ///
    /// Probe-before-build is the caller's obligation: the flag fixes the
    /// class variant of every production at construction time and is never
    /// re-evaluated per match.
    pub fn build(unicode: bool) -> Result<XmlGrammar, GrammarError> {
        let b = Builder { unicode };

        // Character classes (two variants, selected here once).
        let char_bmp = b.class(CHAR_BMP)?;
        let xml_char = if unicode {
            b.reg(parts!["[", class_body(&char_bmp)?, "\\u{10000}-\\u{10FFFF}", "]"])?
        } else {
            char_bmp
        };

        let s_char = b.class(S_CHAR)?;
        let s = b.reg(parts![&s_char, "+"])?;
        let s_opt = b.reg(parts![&s_char, "*"])?;

        let name_start_bmp = b.class(NAME_START_CHAR_BMP)?;
        let name_start_char = if unicode {
            b.reg(parts![
                "[",
                class_body(&name_start_bmp)?,
                "\\u{10000}-\\u{EFFFF}",
                "]",
            ])?
        } else {
            name_start_bmp
        };
        let name_char = b.reg(parts![
            "[",
            NAME_EXTRA_CHARS,
            class_body(&name_start_char)?,
            NAME_EXTRA_RANGES,
            "]",
        ])?;

        // Lexical atoms.
        let name = b.reg(parts![&name_start_char, &name_char, "*"])?;
        let nmtoken = b.reg(parts![&name_char, "+"])?;

        // Namespace names: the same classes minus the separator.
        let ncname_start_char = subtract_literal(&name_start_char, ":")?;
        let ncname_char = subtract_literal(&name_char, ":")?;
        let ncname = b.reg(parts![&ncname_start_char, &ncname_char, "*"])?;
        let qname_suffix = b.regg(parts![":", &ncname])?;
        let qname = b.reg(parts![&ncname, &qname_suffix, "?"])?;
        let qname_exact = b.reg(parts!["^", &qname, "$"])?;
        let qname_group = b.reg(parts!["(", &qname, ")"])?;

        // References.
        let entity_ref = b.reg(parts!["&", &name, ";"])?;
        let char_ref = b.regg(parts!["&#[0-9]+;|&#x[0-9a-fA-F]+;"])?;
        let reference = b.regg(parts![&entity_ref, "|", &char_ref])?;
        let pe_reference = b.reg(parts!["%", &name, ";"])?;

        // Literal value grammars.
        let entity_value = {
            let double = b.regg(parts!["[^%&\"]", "|", &pe_reference, "|", &reference])?;
            let single = b.regg(parts!["[^%&']", "|", &pe_reference, "|", &reference])?;
            let double_quoted = b.reg(parts!["\"", &double, "*", "\""])?;
            let single_quoted = b.reg(parts!["'", &single, "*", "'"])?;
            b.regg(parts![&double_quoted, "|", &single_quoted])?
        };
        let att_value = {
            let double = b.regg(parts!["[^<&\"]", "|", &reference])?;
            let single = b.regg(parts!["[^<&']", "|", &reference])?;
            b.regg(parts![
                "\"", &double, "*", "\"", "|", "'", &single, "*", "'",
            ])?
        };

        // Comments may contain single hyphens but never two in a row.
        let comment = {
            let char_no_dash = subtract_literal(&xml_char, "-")?;
            let dash_pair = b.reg(parts!["-", &char_no_dash])?;
            let body = b.regg(parts![&char_no_dash, "|", &dash_pair])?;
            b.reg(parts![COMMENT_START, &body, "*", COMMENT_END])?
        };

        // Processing instructions: group 1 is the target, group 2 the
        // optional body up to the first close marker. A target spelling
        // `xml` is NOT excluded, diverging from the formal rule; documents
        // in the wild lean on that leniency.
        let pi = {
            let body = b.regg(parts![&s, "(", &xml_char, "*?", ")"])?;
            b.reg(parts!["^<\\?", "(", &name, ")", &body, "?", "\\?>"])?
        };

        let cd_sect = b.reg(parts!["<!\\[CDATA\\[", &xml_char, "*?", "\\]\\]>"])?;

        // External identifiers.
        let pubid_char = b.class(PUBID_CHAR)?;
        let pubid_literal = {
            let single_char = subtract_literal(&pubid_char, "'")?;
            b.regg(parts![
                "\"", &pubid_char, "*", "\"", "|", "'", &single_char, "*", "'",
            ])?
        };
        let system_literal = b.regg(parts!["\"[^\"]*\"", "|", "'[^']*'"])?;
        let external_id = {
            let system_form = b.regg(parts![SYSTEM, &s, &system_literal])?;
            let public_form = b.regg(parts![PUBLIC, &s, &pubid_literal, &s, &system_literal])?;
            b.regg(parts![&system_form, "|", &public_form])?
        };
        // Matching variant with named captures so a caller can tell the
        // SYSTEM-only form from PUBLIC+SYSTEM without re-parsing.
        let external_id_match = {
            let system_form = b.regg(parts![
                SYSTEM,
                &s,
                "(?P<SystemLiteralOnly>",
                &system_literal,
                ")",
            ])?;
            let public_form = b.regg(parts![
                PUBLIC,
                &s,
                "(?P<PubidLiteral>",
                &pubid_literal,
                ")",
                &s,
                "(?P<SystemLiteral>",
                &system_literal,
                ")",
            ])?;
            let either = b.regg(parts![&system_form, "|", &public_form])?;
            b.reg(parts!["^", &either])?
        };

        // Entity declarations.
        let ndata_decl = b.reg(parts![&s, "NDATA", &s, &name])?;
        let entity_def = {
            let ndata_opt = b.regg(parts![&ndata_decl])?;
            let external = b.regg(parts![&external_id, &ndata_opt, "?"])?;
            b.regg(parts![&entity_value, "|", &external])?
        };
        let ge_decl = b.reg(parts![
            ENTITY_DECL_START,
            &s,
            &name,
            &s,
            &entity_def,
            &s_opt,
            ">",
        ])?;
        let pe_def = b.regg(parts![&entity_value, "|", &external_id])?;
        let pe_decl = b.reg(parts![
            ENTITY_DECL_START,
            &s,
            "%",
            &s,
            &name,
            &s,
            &pe_def,
            &s_opt,
            ">",
        ])?;
        let entity_decl = b.regg(parts![&ge_decl, "|", &pe_decl])?;

        // Notation declarations.
        let public_id = b.reg(parts![PUBLIC, &s, &pubid_literal])?;
        let notation_decl = {
            let id = b.regg(parts![&external_id, "|", &public_id])?;
            b.reg(parts![NOTATION_DECL_START, &s, &name, &s, &id, &s_opt, ">"])?
        };

        // Element declarations. `children` is a deliberate non-recursive
        // over-approximation: any parenthesized group plus an optional
        // quantifier, without verifying choice/sequence nesting. A faithful
        // recursive translation would expose the matcher to exponential
        // backtracking on adversarial input.
        let mixed = {
            let more = b.regg(parts![&s_opt, "\\|", &s_opt, &qname])?;
            let with_names = b.reg(parts![
                "\\(", &s_opt, "#PCDATA", &more, "*", &s_opt, "\\)\\*",
            ])?;
            let alone = b.reg(parts!["\\(", &s_opt, "#PCDATA", &s_opt, "\\)"])?;
            b.regg(parts![&with_names, "|", &alone])?
        };
        let children = b.reg(parts!["\\([^>]+\\)", "[?*+]?"])?;
        let contentspec = b.regg(parts!["EMPTY", "|", "ANY", "|", &mixed, "|", &children])?;
        let elementdecl = {
            let decl_name = b.regg(parts![&qname_group, "|", &pe_reference])?;
            let content = b.regg(parts![&contentspec, "|", &pe_reference])?;
            b.reg(parts![
                ELEMENTDECL_START,
                &s,
                &decl_name,
                &s,
                &content,
                &s_opt,
                ">",
            ])?
        };

        // Attribute-list declarations.
        let tokenized_type = b.regg(parts![
            "ID", "|", "IDREF", "|", "IDREFS", "|", "ENTITY", "|", "ENTITIES", "|", "NMTOKEN",
            "|", "NMTOKENS",
        ])?;
        let notation_type = {
            let more = b.regg(parts![&s_opt, "\\|", &s_opt, &name])?;
            b.reg(parts![
                "NOTATION", &s, "\\(", &s_opt, &name, &more, "*", &s_opt, "\\)",
            ])?
        };
        let enumeration = {
            let more = b.regg(parts![&s_opt, "\\|", &s_opt, &nmtoken])?;
            b.reg(parts!["\\(", &s_opt, &nmtoken, &more, "*", &s_opt, "\\)"])?
        };
        let enumerated_type = b.regg(parts![&notation_type, "|", &enumeration])?;
        let att_type = b.regg(parts!["CDATA", "|", &tokenized_type, "|", &enumerated_type])?;
        let default_decl = {
            let fixed = b.regg(parts!["#FIXED", &s])?;
            let value = b.regg(parts![&fixed, "?", &att_value])?;
            b.regg(parts!["#REQUIRED|#IMPLIED", "|", &value])?
        };
        let att_def = b.reg(parts![&s, &name, &s, &att_type, &s, &default_decl])?;
        let attlist_decl = {
            let def = b.regg(parts![&att_def])?;
            b.reg(parts![ATTLIST_DECL_START, &s, &name, &def, "*", &s_opt, ">"])?
        };

        // Prolog.
        let eq = b.reg(parts![&s_opt, "=", &s_opt])?;
        let version_info = {
            let quoted = b.regg(parts!["'", VERSION_NUM, "'", "|", "\"", VERSION_NUM, "\""])?;
            b.reg(parts![&s, "version", &eq, &quoted])?
        };
        let encoding_decl = {
            let quoted = b.regg(parts!["'", ENC_NAME, "'", "|", "\"", ENC_NAME, "\""])?;
            b.reg(parts![&s, "encoding", &eq, &quoted])?
        };
        let sd_decl = {
            let value = b.regg(parts!["yes", "|", "no"])?;
            let quoted = b.regg(parts!["'", &value, "'", "|", "\"", &value, "\""])?;
            b.reg(parts![&s, "standalone", &eq, &quoted])?
        };
        let xml_decl = {
            let encoding_opt = b.regg(parts![&encoding_decl])?;
            let standalone_opt = b.regg(parts![&sd_decl])?;
            b.reg(parts![
                "^<\\?xml",
                &version_info,
                &encoding_opt,
                "?",
                &standalone_opt,
                "?",
                &s_opt,
                "\\?>",
            ])?
        };

        Ok(XmlGrammar {
            unicode,
            xml_char,
            s,
            s_opt,
            name_start_char,
            name_char,
            name,
            nmtoken,
            ncname_start_char,
            ncname_char,
            ncname,
            qname,
            qname_exact,
            qname_group,
            entity_ref,
            char_ref,
            reference,
            pe_reference,
            entity_value,
            att_value,
            comment,
            pi,
            cd_sect,
            pubid_char,
            pubid_literal,
            system_literal,
            external_id,
            external_id_match,
            ndata_decl,
            entity_def,
            ge_decl,
            pe_def,
            pe_decl,
            entity_decl,
            public_id,
            notation_decl,
            mixed,
            children,
            contentspec,
            elementdecl,
            tokenized_type,
            notation_type,
            enumeration,
            enumerated_type,
            att_type,
            default_decl,
            att_def,
            attlist_decl,
            eq,
            version_info,
            encoding_decl,
            sd_decl,
            xml_decl,
        })
    }
}

/// The process-wide production table, built once with the probed capability
/// flag. A build failure is an authoring bug in the table itself and aborts
/// with the offending source and precondition.
pub fn grammar() -> &'static XmlGrammar {
    static GRAMMAR: OnceLock<XmlGrammar> = OnceLock::new();
    GRAMMAR.get_or_init(|| {
        XmlGrammar::build(unicode_support())
            .unwrap_or_else(|error| panic!("XML grammar table failed to build: {error}"))
    })
}
