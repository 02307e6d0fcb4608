//! Leaf parsers that look at the input directly.
//!
//! Each one reports a single descriptive label on failure; composite grammars
//! are built from these with the combinators.

use regex::Regex;

use crate::errors::GrammarError;
use crate::parser::Parser;
use crate::result::ParseResult;

/// Label used whenever the input was supposed to be exhausted.
pub const END_OF_INPUT: &str = "end of input";

/// Matches exactly `literal`.
pub fn string(literal: impl Into<String>) -> Parser<String> {
    let literal = literal.into();
    let label = format!("'{literal}'");
    Parser::new(move |ctx| {
        if ctx.remaining().starts_with(literal.as_str()) {
            ParseResult::success(literal.clone(), ctx.advance(&literal))
        } else {
            ctx.fail(label.clone())
        }
    })
}

/// Matches `pattern` at the cursor and yields the matched text.
pub fn regexp(pattern: &str) -> Result<Parser<String>, GrammarError> {
    regexp_group(pattern, 0)
}

/// Matches `pattern` at the cursor and yields capture `group` (0 is the whole
/// match). The whole match is consumed either way; a group that did not
/// participate yields an empty string.
pub fn regexp_group(pattern: &str, group: usize) -> Result<Parser<String>, GrammarError> {
    let re = Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
        GrammarError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        }
    })?;
    if group >= re.captures_len() {
        return Err(GrammarError::InvalidGroup {
            pattern: pattern.to_string(),
            group,
        });
    }

    let label = format!("/{pattern}/");
    Ok(Parser::new(move |ctx| {
        let rest = ctx.remaining();
        match re.captures(rest) {
            Some(captures) => {
                let whole = captures.get(0).map_or("", |m| m.as_str());
                let value = captures.get(group).map_or("", |m| m.as_str());
                ParseResult::success(value.to_string(), ctx.advance(whole))
            }
            None => ctx.fail(label.clone()),
        }
    }))
}

/// Succeeds only at the end of the input.
pub fn eof() -> Parser<()> {
    Parser::new(|ctx| {
        if ctx.is_at_end() {
            ctx.succeed(())
        } else {
            ctx.fail(END_OF_INPUT)
        }
    })
}

/// Any single character.
pub fn any_char() -> Parser<char> {
    char_where("any character", |_| true)
}

/// A single character contained in `chars`.
pub fn one_of(chars: &str) -> Parser<char> {
    let set = chars.to_string();
    char_where(format!("one of '{chars}'"), move |c| set.contains(c))
}

/// A single character not contained in `chars`.
pub fn none_of(chars: &str) -> Parser<char> {
    let set = chars.to_string();
    char_where(format!("none of '{chars}'"), move |c| !set.contains(c))
}

/// One or more whitespace characters.
pub fn whitespace() -> Parser<String> {
    Parser::new(|ctx| {
        let run = ctx.peek_while(char::is_whitespace);
        if run.is_empty() {
            ctx.fail("whitespace")
        } else {
            ParseResult::success(run.to_string(), ctx.advance(run))
        }
    })
}

/// Zero or more whitespace characters. Never fails.
pub fn optional_whitespace() -> Parser<String> {
    Parser::new(|ctx| {
        let run = ctx.peek_while(char::is_whitespace);
        ParseResult::success(run.to_string(), ctx.advance(run))
    })
}

fn char_where<F>(label: impl Into<String>, pred: F) -> Parser<char>
where
    F: Fn(char) -> bool + Send + Sync + 'static,
{
    let label = label.into();
    Parser::new(move |ctx| match ctx.next_char() {
        Some(c) if pred(c) => ParseResult::success(c, ctx.advance_chars(1)),
        _ => ctx.fail(label.clone()),
    })
}
