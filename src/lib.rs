//! xml-grammar - The lexical grammar of XML 1.1 + Namespaces
//!
//! A compiled table of the regular productions of XML 1.1 (with the
//! Namespaces in XML extensions): character classes, names, references,
//! literals, comments, processing instructions, CDATA sections, and the
//! declaration grammar of the internal DTD subset.
//!
//! The table comes in two variants. At first use the crate probes whether
//! supplementary-plane (astral) characters can be expressed as class ranges
//! and builds the wider or the narrower variant accordingly; the choice is
//! made once per process and every production records it.
//!
//! # Quick Start
//!
//! ```rust
//! use xml_grammar::grammar;
//!
//! let g = grammar();
//!
//! assert!(g.qname_exact.is_match("xs:element"));
//! assert!(!g.qname_exact.is_match("a:b:c"));
//!
//! let pi = g.pi.captures("<?xml-stylesheet href='a.xsl'?>").unwrap();
//! assert_eq!(pi.get(1).unwrap().as_str(), "xml-stylesheet");
//! ```

pub mod charclass;
pub mod charset;
pub mod grammar;
pub mod pattern;
pub mod probe;
pub mod xmlchar;

pub use charclass::{class_body, subtract_literal};
pub use charset::CharSet;
pub use grammar::{
    grammar, XmlGrammar, ATTLIST_DECL_START, CDATA_END, CDATA_START, COMMENT_END, COMMENT_START,
    DOCTYPE_DECL_START, ELEMENTDECL_START, ENTITY_DECL_START, NOTATION_DECL_START, PUBLIC, SYSTEM,
    UNICODE_REPLACEMENT_CHARACTER,
};
pub use pattern::{concat, group, GrammarError, Part, PatternCaptures, PatternMatch, XmlPattern};
pub use probe::{detect_unicode_support, unicode_support, FancyRegexEngine, RegexEngine};
pub use xmlchar::XmlChar;
