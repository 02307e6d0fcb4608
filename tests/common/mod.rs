//! Shared fixtures for the integration tests.

#![allow(dead_code)]

pub mod math;

use braid::{ParseResult, Position};

/// Index and expectations of a result that must have failed.
pub fn failure_at<T: std::fmt::Debug>(result: ParseResult<'_, T>) -> (usize, Vec<String>) {
    match result {
        ParseResult::Failure(furthest) => (furthest.position.index, furthest.expected_list()),
        ParseResult::Success(success) => panic!("expected a failure, parsed {:?}", success.value),
    }
}

/// Labels as owned strings, for comparing against `expected()`.
pub fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Line and column of `index` in `input`, counted the slow way.
pub fn naive_position(input: &str, index: usize) -> Position {
    let mut line = 1;
    let mut column = 1;
    for c in input[..index].chars() {
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    Position {
        index,
        line,
        column,
    }
}
