//! Braid error types.
//!
//! Inside the combinator engine a failure is a value ([`ParseResult::Failure`]).
//! The types here only appear at the edges: [`GrammarError`] while a grammar
//! is being assembled, and [`ParseError`] when a top-level `try_parse` gives up.
//!
//! [`ParseResult::Failure`]: crate::ParseResult::Failure

use std::sync::Arc;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::position::Position;
use crate::result::{FailureReport, Furthest};

/// Problems detected while constructing parsers or language tables.
#[derive(Error, Diagnostic, Debug)]
pub enum GrammarError {
    #[error("Grammar error: invalid pattern /{pattern}/")]
    #[diagnostic(code(braid::grammar::invalid_pattern))]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Grammar error: pattern /{pattern}/ has no capture group {group}")]
    #[diagnostic(code(braid::grammar::invalid_group))]
    InvalidGroup { pattern: String, group: usize },

    #[error("Grammar error: unknown rule '{name}'")]
    #[diagnostic(
        code(braid::grammar::unknown_rule),
        help("every rule a builder refers to must be registered on the same LanguageBuilder")
    )]
    UnknownRule { name: String },

    #[error("Grammar error: rule '{name}' produces {found}, not {requested}")]
    #[diagnostic(code(braid::grammar::rule_type_mismatch))]
    RuleTypeMismatch {
        name: String,
        requested: &'static str,
        found: &'static str,
    },

    #[error("Grammar error: rule '{name}' is declared more than once")]
    #[diagnostic(code(braid::grammar::duplicate_rule))]
    DuplicateRule { name: String },
}

/// A failed top-level parse: the deepest position reached and everything that
/// would have been accepted there.
#[derive(Error, Diagnostic, Debug)]
#[error("Parse error at {furthest}: expected {}", .expected.join(", "))]
#[diagnostic(code(braid::parse::unexpected_input))]
pub struct ParseError {
    pub furthest: Position,
    pub expected: Vec<String>,
    #[source_code]
    src: Arc<NamedSource<String>>,
    #[label("parsing stopped here")]
    span: SourceSpan,
    #[help]
    help: Option<String>,
}

impl ParseError {
    pub(crate) fn new(source_name: &str, input: &str, furthest: Furthest) -> Self {
        let expected = furthest.expected_list();
        let position = furthest.position;
        let width = input
            .get(position.index..)
            .and_then(|rest| rest.chars().next())
            .map_or(0, char::len_utf8);
        let help = match expected.as_slice() {
            [] => None,
            [only] => Some(format!("expected {only}")),
            many => Some(format!("expected one of: {}", many.join(", "))),
        };

        Self {
            furthest: position,
            expected,
            src: Arc::new(NamedSource::new(source_name, input.to_string())),
            span: SourceSpan::new(position.index.into(), width),
            help,
        }
    }

    /// The payload callers serialize or compare: position plus expectations.
    pub fn report(&self) -> FailureReport {
        FailureReport {
            furthest: self.furthest,
            expected: self.expected.clone(),
        }
    }

    pub fn span(&self) -> SourceSpan {
        self.span
    }
}
