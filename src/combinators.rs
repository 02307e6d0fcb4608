//! Combinators that take several parsers at once, plus constant parsers.

use crate::context::Context;
use crate::parser::Parser;
use crate::position::Position;
use crate::result::{merge_trails, Furthest, ParseResult, Success};

// ============================================================================
// SEQUENCING
// ============================================================================

/// A fixed-size group of parsers that can run one after another.
///
/// Implemented for tuples of [`Parser`]s of up to eight elements; the output
/// is the tuple of their values.
pub trait Sequence: Send + Sync + 'static {
    type Output;

    fn run_sequence<'i>(&self, ctx: Context<'i>) -> ParseResult<'i, Self::Output>;
}

macro_rules! impl_sequence {
    ($($parser:ident: $value:ident),+) => {
        impl<$($value: 'static),+> Sequence for ($(Parser<$value>,)+) {
            type Output = ($($value,)+);

            fn run_sequence<'i>(&self, ctx: Context<'i>) -> ParseResult<'i, Self::Output> {
                let ($($parser,)+) = self;
                let mut trail: Option<Furthest> = None;
                let mut cursor = ctx;
                $(
                    let $parser = match $parser.run(cursor) {
                        ParseResult::Success(success) => {
                            trail = merge_trails(trail, success.furthest);
                            cursor = success.rest;
                            success.value
                        }
                        ParseResult::Failure(furthest) => {
                            return ParseResult::Failure(furthest).with_prior(trail);
                        }
                    };
                )+
                ParseResult::Success(Success {
                    value: ($($parser,)+),
                    rest: cursor,
                    furthest: trail,
                })
            }
        }
    };
}

impl_sequence!(p1: A);
impl_sequence!(p1: A, p2: B);
impl_sequence!(p1: A, p2: B, p3: C);
impl_sequence!(p1: A, p2: B, p3: C, p4: D);
impl_sequence!(p1: A, p2: B, p3: C, p4: D, p5: E);
impl_sequence!(p1: A, p2: B, p3: C, p4: D, p5: E, p6: F);
impl_sequence!(p1: A, p2: B, p3: C, p4: D, p5: E, p6: F, p7: G);
impl_sequence!(p1: A, p2: B, p3: C, p4: D, p5: E, p6: F, p7: G, p8: H);

/// Runs every parser in order, each starting where the previous one stopped,
/// and collects their values into a tuple. Fails at the first failing step.
pub fn sequence<S: Sequence>(parsers: S) -> Parser<S::Output>
where
    S::Output: 'static,
{
    Parser::new(move |ctx| parsers.run_sequence(ctx))
}

/// [`sequence`] followed by `f` applied to the tuple of values.
pub fn sequence_map<S, U, F>(parsers: S, f: F) -> Parser<U>
where
    S: Sequence,
    S::Output: 'static,
    U: 'static,
    F: Fn(S::Output) -> U + Send + Sync + 'static,
{
    sequence(parsers).map(f)
}

// ============================================================================
// CHOICE
// ============================================================================

/// Ordered choice: the first alternative that succeeds wins. Every alternative
/// starts from the same position. With no alternatives, always fails.
pub fn choice<T: 'static>(alternatives: impl IntoIterator<Item = Parser<T>>) -> Parser<T> {
    let alternatives: Vec<Parser<T>> = alternatives.into_iter().collect();
    Parser::new(move |ctx| {
        let mut trail: Option<Furthest> = None;
        for alternative in &alternatives {
            match alternative.run(ctx) {
                ParseResult::Success(success) => {
                    return ParseResult::Success(success).with_prior(trail);
                }
                ParseResult::Failure(furthest) => {
                    trail = merge_trails(trail, Some(furthest));
                }
            }
        }
        match trail {
            Some(furthest) => ParseResult::Failure(furthest),
            None => ctx.fail("no alternatives"),
        }
    })
}

// ============================================================================
// SEPARATED LISTS
// ============================================================================

/// Zero or more `item`s separated by `separator`.
///
/// An `item` is required after every separator: a trailing separator makes
/// the whole parser fail where the missing item should have been.
pub fn separate_by<T: 'static, S: 'static>(item: Parser<T>, separator: Parser<S>) -> Parser<Vec<T>> {
    Parser::new(move |ctx| match item.run(ctx) {
        ParseResult::Success(first) => continue_separated(&item, &separator, first),
        ParseResult::Failure(furthest) => ParseResult::Success(Success {
            value: Vec::new(),
            rest: ctx,
            furthest: Some(furthest),
        }),
    })
}

/// One or more `item`s separated by `separator`.
pub fn separate_by1<T: 'static, S: 'static>(item: Parser<T>, separator: Parser<S>) -> Parser<Vec<T>> {
    Parser::new(move |ctx| match item.run(ctx) {
        ParseResult::Success(first) => continue_separated(&item, &separator, first),
        ParseResult::Failure(furthest) => ParseResult::Failure(furthest),
    })
}

fn continue_separated<'i, T: 'static, S: 'static>(
    item: &Parser<T>,
    separator: &Parser<S>,
    first: Success<'i, T>,
) -> ParseResult<'i, Vec<T>> {
    let mut values = vec![first.value];
    let mut trail = first.furthest;
    let mut cursor = first.rest;
    loop {
        let after_separator = match separator.run(cursor) {
            ParseResult::Success(success) => {
                trail = merge_trails(trail, success.furthest);
                success.rest
            }
            ParseResult::Failure(furthest) => {
                trail = merge_trails(trail, Some(furthest));
                break;
            }
        };
        match item.run(after_separator) {
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
}

// ============================================================================
// CONSTANTS
// ============================================================================

/// Always succeeds with `value`, consuming nothing.
pub fn succeed<T>(value: T) -> Parser<T>
where
    T: Clone + Send + Sync + 'static,
{
    Parser::new(move |ctx| ctx.succeed(value.clone()))
}

/// Succeeds, consuming nothing, only where `parser` does not match.
///
/// A match is reported as a failure expecting anything but the matched text.
pub fn not_followed_by<T: 'static>(parser: Parser<T>) -> Parser<()> {
    Parser::new(move |ctx| match parser.run(ctx) {
        ParseResult::Success(success) => {
            let consumed = success.rest.position().index - ctx.position().index;
            let matched = &ctx.remaining()[..consumed];
            ctx.fail(format!("not '{matched}'"))
        }
        ParseResult::Failure(_) => ctx.succeed(()),
    })
}

/// Always fails, expecting `label`.
pub fn fail<T: 'static>(label: impl Into<String>) -> Parser<T> {
    let label = label.into();
    Parser::new(move |ctx| ctx.fail(label.clone()))
}

/// The current position, consuming nothing.
pub fn position() -> Parser<Position> {
    Parser::new(|ctx| ctx.succeed(ctx.position()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{eof, regexp, string};

    #[test]
    fn test_sequence_collects_tuple() {
        let parser = sequence((string("a"), string("b"), string("c")));
        let value = parser.parse("abc").into_value();
        assert_eq!(
            value,
            Some(("a".to_string(), "b".to_string(), "c".to_string()))
        );
    }

    #[test]
    fn test_sequence_fails_at_first_failing_step() {
        let parser = sequence((string("foo"), string("bar"), string("baz")));
        let result = parser.parse("foobaz");
        assert_eq!(result.furthest().map(|p| p.index), Some(3));
        assert_eq!(result.expected(), Some(vec!["'bar'".to_string()]));
    }

    #[test]
    fn test_sequence_keeps_deeper_backtracked_failure() {
        let maybe_long = string("abc").or(string("a"));
        let parser = sequence((maybe_long, string("x")));
        let result = parser.parse("aby");
        // `abc` got to index 0, `x` fails at 1; the deepest point wins.
        assert_eq!(result.furthest().map(|p| p.index), Some(1));
        assert_eq!(result.expected(), Some(vec!["'x'".to_string()]));
    }

    #[test]
    fn test_sequence_map() {
        let parser = sequence_map((string("1"), string("+"), string("2")), |(a, op, b)| {
            format!("{b}{op}{a}")
        });
        assert_eq!(parser.parse("1+2").into_value(), Some("2+1".to_string()));
    }

    #[test]
    fn test_choice_merges_failures() {
        let parser = choice([string("a"), string("b"), string("c")]);
        let result = parser.parse("d");
        assert_eq!(
            result.expected(),
            Some(vec!["'a'".to_string(), "'b'".to_string(), "'c'".to_string()])
        );
    }

    #[test]
    fn test_choice_success_carries_prior_failures() {
        let parser = choice([sequence((string("a"), string("x"))).map(|_| 1), string("a").map(|_| 2)]);
        let result = parser.parse("ay");
        assert_eq!(result.value(), Some(&2));
        assert_eq!(result.furthest().map(|p| p.index), Some(1));
        assert_eq!(result.expected(), Some(vec!["'x'".to_string()]));
    }

    #[test]
    fn test_empty_choice_fails() {
        let parser: Parser<()> = choice(Vec::new());
        assert!(!parser.parse("").is_success());
    }

    #[test]
    fn test_separate_by() {
        let parser = separate_by(string("this"), string(",")).skip(eof());
        let count = |input: &str| parser.parse(input).into_value().map(|v| v.len());
        assert_eq!(count(""), Some(0));
        assert_eq!(count("this"), Some(1));
        assert_eq!(count("this,this"), Some(2));
        assert_eq!(count("this,this,this"), Some(3));
        assert_eq!(count("this, this"), None);
        assert_eq!(count("foo"), None);
    }

    #[test]
    fn test_separate_by_trailing_separator_fails() {
        let parser = separate_by(string("a"), string(","));
        let result = parser.parse("a,a,");
        assert!(!result.is_success());
        assert_eq!(result.furthest().map(|p| p.index), Some(4));
        assert_eq!(result.expected(), Some(vec!["'a'".to_string()]));
    }

    #[test]
    fn test_separate_by1_requires_one() {
        let parser = separate_by1(string("a"), string(","));
        assert!(!parser.parse("").is_success());
        assert_eq!(parser.parse("a,a").into_value().map(|v| v.len()), Some(2));
    }

    #[test]
    fn test_not_followed_by() {
        let keyword = string("if").skip(not_followed_by(regexp("[a-z]").unwrap()));
        assert_eq!(keyword.parse("if x").into_value(), Some("if".to_string()));

        let ident = keyword.parse("iffy");
        assert!(!ident.is_success());
        assert_eq!(ident.furthest().map(|p| p.index), Some(2));
        assert_eq!(ident.expected(), Some(vec!["not 'f'".to_string()]));

        let at_end = not_followed_by(string("x")).parse("");
        assert_eq!(at_end.into_result().map(|s| s.rest.position().index).ok(), Some(0));
    }

    #[test]
    fn test_constants() {
        assert_eq!(succeed(7).parse("anything").into_value(), Some(7));
        let failed = fail::<()>("never").parse("x");
        assert_eq!(failed.expected(), Some(vec!["never".to_string()]));
        let at = string("ab").then(position()).parse("abc").into_value();
        assert_eq!(at.map(|p| p.index), Some(2));
    }
}
