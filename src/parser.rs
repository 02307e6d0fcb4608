//! The parser value and its method combinators.
//!
//! A [`Parser<T>`] is an immutable, cheaply clonable function from a
//! [`Context`] to a [`ParseResult<T>`]. Combinators never mutate their inputs;
//! each builds a new parser around clones of the old ones.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::combinators::{choice, separate_by, sequence};
use crate::config::ParseConfig;
use crate::context::Context;
use crate::errors::ParseError;
use crate::position::{Marker, NamedMarker, Range};
use crate::primitives::{eof, END_OF_INPUT};
use crate::result::{merge_trails, ParseResult, Success};

type ParseFn<T> = dyn for<'i> Fn(Context<'i>) -> ParseResult<'i, T> + Send + Sync;

pub struct Parser<T> {
    run: Arc<ParseFn<T>>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Self {
            run: Arc::clone(&self.run),
        }
    }
}

impl<T> fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("output", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// CONSTRUCTION AND INVOCATION
// ============================================================================

impl<T: 'static> Parser<T> {
    /// Wraps a parse function. This is how leaf parsers are made.
    pub fn new<F>(f: F) -> Self
    where
        F: for<'i> Fn(Context<'i>) -> ParseResult<'i, T> + Send + Sync + 'static,
    {
        Self { run: Arc::new(f) }
    }

    /// Runs the parser at `ctx`.
    pub fn run<'i>(&self, ctx: Context<'i>) -> ParseResult<'i, T> {
        (self.run)(ctx)
    }

    /// Runs the parser from the start of `input`, exposing the full result.
    /// Trailing input is allowed.
    pub fn parse<'i>(&self, input: &'i str) -> ParseResult<'i, T> {
        self.run(Context::new(input))
    }

    /// Like [`parse`](Self::parse), but applies `config`.
    pub fn parse_with<'i>(&self, input: &'i str, config: &ParseConfig) -> ParseResult<'i, T> {
        let mut result = self.parse(input);
        if config.require_eof {
            result = require_end(result);
        }
        if !config.report_furthest_on_success {
            if let ParseResult::Success(success) = &mut result {
                success.furthest = None;
            }
        }
        result
    }

    /// Parses the whole of `input`, returning the value or a diagnostic.
    pub fn try_parse(&self, input: &str) -> Result<T, ParseError> {
        self.try_parse_with(input, &ParseConfig::default())
    }

    pub fn try_parse_with(&self, input: &str, config: &ParseConfig) -> Result<T, ParseError> {
        match self.parse_with(input, config) {
            ParseResult::Success(success) => Ok(success.value),
            ParseResult::Failure(furthest) => {
                debug!(
                    source = %config.source_name,
                    index = furthest.position.index,
                    expected = ?furthest.expected,
                    "parse failed"
                );
                Err(ParseError::new(&config.source_name, input, furthest))
            }
        }
    }
}

fn require_end<T>(result: ParseResult<'_, T>) -> ParseResult<'_, T> {
    match result {
        ParseResult::Success(success) if !success.rest.is_at_end() => {
            success.rest.fail(END_OF_INPUT).with_prior(success.furthest)
        }
        other => other,
    }
}

// ============================================================================
// COMBINATORS
// ============================================================================

impl<T: 'static> Parser<T> {
    /// Transforms the value of a successful match.
    pub fn map<U: 'static, F>(self, f: F) -> Parser<U>
    where
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        Parser::new(move |ctx| self.run(ctx).map(&f))
    }

    /// Replaces the value of a successful match with `value`.
    pub fn result<U>(self, value: U) -> Parser<U>
    where
        U: Clone + Send + Sync + 'static,
    {
        self.map(move |_| value.clone())
    }

    /// Monadic bind: the parser to run next is chosen by the value just parsed.
    pub fn chain<U: 'static, F>(self, next: F) -> Parser<U>
    where
        F: Fn(T) -> Parser<U> + Send + Sync + 'static,
    {
        Parser::new(move |ctx| match self.run(ctx) {
            ParseResult::Success(success) => next(success.value)
                .run(success.rest)
                .with_prior(success.furthest),
            ParseResult::Failure(furthest) => ParseResult::Failure(furthest),
        })
    }

    /// Runs `self` then `other`, keeping the left value.
    pub fn skip<U: 'static>(self, other: Parser<U>) -> Parser<T> {
        sequence((self, other)).map(|(value, _)| value)
    }

    /// Runs `self` then `other`, keeping the right value.
    pub fn then<U: 'static>(self, other: Parser<U>) -> Parser<U> {
        sequence((self, other)).map(|(_, value)| value)
    }

    /// Requires `open` before and `close` after, keeping the middle value.
    pub fn wrap<L: 'static, R: 'static>(self, open: Parser<L>, close: Parser<R>) -> Parser<T> {
        sequence((open, self, close)).map(|(_, value, _)| value)
    }

    /// Surrounds the parser with `ws` on both sides.
    pub fn trim<W: 'static>(self, ws: Parser<W>) -> Parser<T> {
        self.wrap(ws.clone(), ws)
    }

    /// Requires the input to end right after the match.
    pub fn then_eof(self) -> Parser<T> {
        self.skip(eof())
    }

    /// Reports failures of this parser as expecting exactly `label`.
    pub fn describe(self, label: impl Into<String>) -> Parser<T> {
        let label = label.into();
        Parser::new(move |ctx| match self.run(ctx) {
            ParseResult::Failure(furthest) => ParseResult::Failure(furthest.relabel(label.clone())),
            success => success,
        })
    }

    /// Ordered choice between `self` and `other`.
    pub fn or(self, other: Parser<T>) -> Parser<T> {
        choice([self, other])
    }

    /// Zero or more repetitions. Never fails.
    ///
    /// An iteration that succeeds without consuming input ends the repetition
    /// and is not collected.
    pub fn many(self) -> Parser<Vec<T>> {
        Parser::new(move |ctx| {
            let mut values = Vec::new();
            let mut trail = None;
            let mut cursor = ctx;
            loop {
                match self.run(cursor) {
                    ParseResult::Success(success) => {
                        trail = merge_trails(trail, success.furthest);
                        if success.rest.position().index == cursor.position().index {
                            break;
                        }
                        values.push(success.value);
                        cursor = success.rest;
                    }
                    ParseResult::Failure(furthest) => {
                        trail = merge_trails(trail, Some(furthest));
                        break;
                    }
                }
            }
            ParseResult::Success(Success {
                value: values,
                rest: cursor,
                furthest: trail,
            })
        })
    }

    /// Exactly `count` repetitions.
    pub fn times(self, count: usize) -> Parser<Vec<T>> {
        Parser::new(move |ctx| {
            // `count` may come from the input; never reserve more than it could hold
            let mut values = Vec::with_capacity(count.min(ctx.remaining().len()));
            let mut trail = None;
            let mut cursor = ctx;
            for _ in 0..count {
                match self.run(cursor) {
                    ParseResult::Success(success) => {
                        trail = merge_trails(trail, success.furthest);
                        values.push(success.value);
                        cursor = success.rest;
                    }
                    ParseResult::Failure(furthest) => {
                        return ParseResult::Failure(furthest).with_prior(trail);
                    }
                }
            }
            ParseResult::Success(Success {
                value: values,
                rest: cursor,
                furthest: trail,
            })
        })
    }

    /// `count` or more repetitions.
    pub fn at_least(self, count: usize) -> Parser<Vec<T>> {
        sequence((self.clone().times(count), self.many())).map(|(mut head, tail)| {
            head.extend(tail);
            head
        })
    }

    /// Matches `self` without consuming anything.
    pub fn lookahead(self) -> Parser<T> {
        Parser::new(move |ctx| match self.run(ctx) {
            ParseResult::Success(success) => ParseResult::Success(Success {
                value: success.value,
                rest: ctx,
                furthest: success.furthest,
            }),
            failure => failure,
        })
    }

    /// Zero or one occurrence. Never fails.
    pub fn optional(self) -> Parser<Option<T>> {
        Parser::new(move |ctx| match self.run(ctx) {
            ParseResult::Success(success) => ParseResult::Success(success).map(Some),
            ParseResult::Failure(furthest) => ParseResult::Success(Success {
                value: None,
                rest: ctx,
                furthest: Some(furthest),
            }),
        })
    }

    /// Items separated by `separator`; see [`separate_by`].
    pub fn separate_by<S: 'static>(self, separator: Parser<S>) -> Parser<Vec<T>> {
        separate_by(self, separator)
    }

    /// Pairs the value with the range of input it was parsed from.
    pub fn mark(self) -> Parser<Marker<T>> {
        Parser::new(move |ctx| {
            let from = ctx.position();
            match self.run(ctx) {
                ParseResult::Success(success) => ParseResult::Success(Success {
                    value: Marker {
                        value: success.value,
                        range: Range::new(from, success.rest.position()),
                    },
                    rest: success.rest,
                    furthest: success.furthest,
                }),
                ParseResult::Failure(furthest) => ParseResult::Failure(furthest),
            }
        })
    }

    /// Like [`mark`](Self::mark), also tagging the match with `name`.
    pub fn node(self, name: impl Into<String>) -> Parser<NamedMarker<T>> {
        let name = name.into();
        self.mark().map(move |marker| marker.named(name.clone()))
    }
}
