//! The parse result model and furthest-failure bookkeeping.
//!
//! Every combinator that tries more than one thing threads a [`Furthest`]
//! through its attempts with [`merge_trails`], so the failure reported to the
//! caller is always the deepest point reached by any branch, successful or not.

use std::cmp::Ordering;

use im::OrdSet;
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::position::Position;

/// Deduplicated, ordered set of human readable token descriptions.
pub type Expected = OrdSet<String>;

/// The deepest failure point seen so far and what was expected there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Furthest {
    pub position: Position,
    pub expected: Expected,
}

impl Furthest {
    /// A failure at `position` expecting exactly `label`.
    pub fn new(position: Position, label: impl Into<String>) -> Self {
        Self {
            position,
            expected: OrdSet::unit(label.into()),
        }
    }

    /// Keeps the deeper of the two; on a tie the expectations are united.
    pub fn merge(self, other: Furthest) -> Furthest {
        match self.position.index.cmp(&other.position.index) {
            Ordering::Greater => self,
            Ordering::Less => other,
            Ordering::Equal => Furthest {
                position: self.position,
                expected: self.expected.union(other.expected),
            },
        }
    }

    /// Same position, but `label` replaces everything that was expected.
    pub fn relabel(self, label: impl Into<String>) -> Furthest {
        Furthest::new(self.position, label)
    }

    pub fn expected_list(&self) -> Vec<String> {
        self.expected.iter().cloned().collect()
    }

    pub fn report(&self) -> FailureReport {
        FailureReport {
            furthest: self.position,
            expected: self.expected_list(),
        }
    }
}

/// Merges two optional trails, treating `None` as "nothing failed yet".
pub fn merge_trails(a: Option<Furthest>, b: Option<Furthest>) -> Option<Furthest> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.merge(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// The diagnostic payload surfaced to callers when a parse fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    pub furthest: Position,
    pub expected: Vec<String>,
}

/// A successful match.
#[derive(Debug, Clone)]
pub struct Success<'i, T> {
    pub value: T,
    /// The context right after the matched input.
    pub rest: Context<'i>,
    /// Deepest failure among the alternatives abandoned on the way here.
    pub furthest: Option<Furthest>,
}

/// Outcome of running a parser against a context.
#[derive(Debug, Clone)]
pub enum ParseResult<'i, T> {
    Success(Success<'i, T>),
    Failure(Furthest),
}

impl<'i, T> ParseResult<'i, T> {
    pub fn success(value: T, rest: Context<'i>) -> Self {
        ParseResult::Success(Success {
            value,
            rest,
            furthest: None,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ParseResult::Success(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            ParseResult::Success(success) => Some(&success.value),
            ParseResult::Failure(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            ParseResult::Success(success) => Some(success.value),
            ParseResult::Failure(_) => None,
        }
    }

    /// The furthest-failure record, always present on a failure.
    pub fn trail(&self) -> Option<&Furthest> {
        match self {
            ParseResult::Success(success) => success.furthest.as_ref(),
            ParseResult::Failure(furthest) => Some(furthest),
        }
    }

    pub fn furthest(&self) -> Option<Position> {
        self.trail().map(|furthest| furthest.position)
    }

    pub fn expected(&self) -> Option<Vec<String>> {
        self.trail().map(Furthest::expected_list)
    }

    /// Folds an earlier accumulator into this result's trail.
    pub fn with_prior(self, prior: Option<Furthest>) -> Self {
        let Some(prior) = prior else {
            return self;
        };
        match self {
            ParseResult::Success(mut success) => {
                success.furthest = merge_trails(Some(prior), success.furthest);
                ParseResult::Success(success)
            }
            ParseResult::Failure(furthest) => ParseResult::Failure(prior.merge(furthest)),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseResult<'i, U> {
        match self {
            ParseResult::Success(success) => ParseResult::Success(Success {
                value: f(success.value),
                rest: success.rest,
                furthest: success.furthest,
            }),
            ParseResult::Failure(furthest) => ParseResult::Failure(furthest),
        }
    }

    pub fn into_result(self) -> Result<Success<'i, T>, Furthest> {
        match self {
            ParseResult::Success(success) => Ok(success),
            ParseResult::Failure(furthest) => Err(furthest),
        }
    }
}
