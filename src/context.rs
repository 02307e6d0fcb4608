//! The parse context: an input and a cursor into it.
//!
//! Contexts are `Copy` and never mutated. Advancing produces a new context, so
//! backtracking is simply a matter of going on with an older one.

use crate::position::Position;
use crate::result::{Furthest, ParseResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context<'i> {
    input: &'i str,
    position: Position,
}

impl<'i> Context<'i> {
    pub fn new(input: &'i str) -> Self {
        Self {
            input,
            position: Position::start(),
        }
    }

    pub fn input(&self) -> &'i str {
        self.input
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Everything from the cursor to the end of the input. Empty at the end.
    pub fn remaining(&self) -> &'i str {
        self.input.get(self.position.index..).unwrap_or("")
    }

    pub fn is_at_end(&self) -> bool {
        self.remaining().is_empty()
    }

    pub fn next_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Up to `count` characters from the cursor, without advancing.
    pub fn peek(&self, count: usize) -> &'i str {
        let rest = self.remaining();
        match rest.char_indices().nth(count) {
            Some((end, _)) => &rest[..end],
            None => rest,
        }
    }

    /// The longest run of characters from the cursor satisfying `pred`.
    pub fn peek_while(&self, pred: impl Fn(char) -> bool) -> &'i str {
        let rest = self.remaining();
        let end = rest
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map_or(rest.len(), |(i, _)| i);
        &rest[..end]
    }

    /// The context after consuming `matched`, which must be a prefix of
    /// [`remaining`](Self::remaining).
    pub fn advance(&self, matched: &str) -> Self {
        debug_assert!(
            self.remaining().starts_with(matched),
            "advanced over text that is not at the cursor"
        );
        Self {
            input: self.input,
            position: self.position.advanced_over(matched),
        }
    }

    /// The context after consuming up to `count` characters.
    pub fn advance_chars(&self, count: usize) -> Self {
        self.advance(self.peek(count))
    }

    /// A failure at the cursor expecting `label`.
    pub fn fail<T>(&self, label: impl Into<String>) -> ParseResult<'i, T> {
        ParseResult::Failure(Furthest::new(self.position, label))
    }

    /// A success leaving the cursor where it is.
    pub fn succeed<T>(&self, value: T) -> ParseResult<'i, T> {
        ParseResult::success(value, *self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_does_not_advance() {
        let ctx = Context::new("hello");
        assert_eq!(ctx.peek(2), "he");
        assert_eq!(ctx.position().index, 0);
    }

    #[test]
    fn test_peek_is_clamped_at_end() {
        let ctx = Context::new("hi");
        assert_eq!(ctx.peek(10), "hi");
        let end = ctx.advance_chars(10);
        assert!(end.is_at_end());
        assert_eq!(end.peek(3), "");
        assert_eq!(end.next_char(), None);
    }

    #[test]
    fn test_peek_while() {
        let ctx = Context::new("123abc");
        assert_eq!(ctx.peek_while(|c| c.is_ascii_digit()), "123");
        assert_eq!(ctx.peek_while(|c| c.is_alphabetic()), "");
    }

    #[test]
    fn test_advance_tracks_lines() {
        let ctx = Context::new("ab\ncd").advance("ab\nc");
        assert_eq!(ctx.remaining(), "d");
        assert_eq!(ctx.position().line, 2);
        assert_eq!(ctx.position().column, 2);
    }

    #[test]
    fn test_advance_chars_multibyte() {
        let ctx = Context::new("äöü!").advance_chars(2);
        assert_eq!(ctx.remaining(), "ü!");
        assert_eq!(ctx.position().index, 4);
        assert_eq!(ctx.position().column, 3);
    }

    #[test]
    fn test_fail_reports_cursor() {
        let ctx = Context::new("xyz").advance_chars(1);
        let result: ParseResult<'_, ()> = ctx.fail("'q'");
        assert_eq!(result.furthest(), Some(ctx.position()));
        assert_eq!(result.expected(), Some(vec!["'q'".to_string()]));
    }
}
