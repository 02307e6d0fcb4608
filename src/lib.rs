//! Braid: parser combinators with furthest-failure diagnostics.
//!
//! Grammars are assembled from small [`Parser`] values. Every parser reports,
//! besides its own outcome, the deepest position any abandoned alternative
//! reached and what was expected there, so a failed parse points at the most
//! informative location rather than at the first alternative that gave up.
//!
//! Recursive grammars are written with [`reference`], [`recursive`] or a
//! [`LanguageBuilder`] of mutually referring rules.
//!
//! ```
//! use braid::{recursive, string};
//!
//! let depth = recursive(|nested| {
//!     nested
//!         .wrap(string("("), string(")"))
//!         .map(|d: usize| d + 1)
//!         .or(string("x").result(0))
//! });
//!
//! assert_eq!(depth.try_parse("(((x)))").ok(), Some(3));
//! let err = depth.try_parse("((x)").unwrap_err();
//! assert_eq!(err.furthest.index, 4);
//! ```

pub use crate::combinators::{
    choice, fail, not_followed_by, position, separate_by, separate_by1, sequence, sequence_map,
    succeed, Sequence,
};
pub use crate::config::ParseConfig;
pub use crate::context::Context;
pub use crate::errors::{GrammarError, ParseError};
pub use crate::language::{Language, LanguageBuilder, RuleSet};
pub use crate::parser::Parser;
pub use crate::position::{Marker, NamedMarker, Position, Range};
pub use crate::primitives::{
    any_char, eof, none_of, one_of, optional_whitespace, regexp, regexp_group, string, whitespace,
    END_OF_INPUT,
};
pub use crate::reference::{recursive, reference, Reference};
pub use crate::result::{merge_trails, Expected, FailureReport, Furthest, ParseResult, Success};

pub mod combinators;
pub mod config;
pub mod context;
pub mod errors;
pub mod language;
pub mod parser;
pub mod position;
pub mod primitives;
pub mod reference;
pub mod result;
