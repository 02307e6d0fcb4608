//! Lazily resolved parsers, for grammars that refer to themselves.
//!
//! A reference is a parser whose behaviour is looked up in a slot when it is
//! invoked rather than when it is built. The slot is filled at most once,
//! either by a builder closure on first use ([`reference`]) or explicitly
//! ([`Reference::define`], [`recursive`], and the language tables).
//!
//! Handles given out for self-reference are weak, so a parser that contains
//! itself does not keep itself alive.

use std::any::type_name;
use std::sync::{Arc, Weak};

use once_cell::sync::OnceCell;
use tracing::{trace, warn};

use crate::context::Context;
use crate::parser::Parser;
use crate::result::ParseResult;

type Builder<T> = Box<dyn Fn() -> Parser<T> + Send + Sync>;

/// The memoized cell behind every reference.
pub(crate) struct Slot<T> {
    label: String,
    inner: OnceCell<Parser<T>>,
    builder: Option<Builder<T>>,
}

impl<T: 'static> Slot<T> {
    pub(crate) fn unbound(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            inner: OnceCell::new(),
            builder: None,
        }
    }

    fn lazy(label: impl Into<String>, builder: Builder<T>) -> Self {
        Self {
            label: label.into(),
            inner: OnceCell::new(),
            builder: Some(builder),
        }
    }

    /// Fills the slot. Returns `false` if it was already filled.
    pub(crate) fn bind(&self, parser: Parser<T>) -> bool {
        self.inner.set(parser).is_ok()
    }

    pub(crate) fn is_resolved(&self) -> bool {
        self.inner.get().is_some()
    }

    fn resolve(&self) -> Option<&Parser<T>> {
        if let Some(parser) = self.inner.get() {
            return Some(parser);
        }
        let builder = self.builder.as_ref()?;
        Some(self.inner.get_or_init(|| {
            trace!(reference = %self.label, "resolving lazy reference");
            builder()
        }))
    }

    fn run<'i>(&self, ctx: Context<'i>) -> ParseResult<'i, T> {
        match self.resolve() {
            Some(parser) => parser.run(ctx),
            None => {
                warn!(reference = %self.label, "reference invoked before it was defined");
                ctx.fail(self.label.clone())
            }
        }
    }
}

/// A parser that owns `slot`.
pub(crate) fn strong_handle<T: 'static>(slot: &Arc<Slot<T>>) -> Parser<T> {
    let slot = Arc::clone(slot);
    Parser::new(move |ctx| slot.run(ctx))
}

/// A parser that only points at `slot`; used inside the slot's own grammar.
pub(crate) fn weak_handle<T: 'static>(slot: &Arc<Slot<T>>) -> Parser<T> {
    let label = slot.label.clone();
    let slot: Weak<Slot<T>> = Arc::downgrade(slot);
    Parser::new(move |ctx| match slot.upgrade() {
        Some(slot) => slot.run(ctx),
        None => {
            warn!(reference = %label, "reference invoked after its grammar was dropped");
            ctx.fail(label.clone())
        }
    })
}

/// A parser built by `builder` the first time it is invoked.
///
/// The builder runs at most once, even under concurrent first use; every
/// later invocation, including recursive ones, reuses the built parser. Combine
/// with a `once_cell::sync::Lazy` static to define a self-referential grammar.
pub fn reference<T: 'static, F>(builder: F) -> Parser<T>
where
    F: Fn() -> Parser<T> + Send + Sync + 'static,
{
    let slot = Arc::new(Slot::lazy(type_name::<T>(), Box::new(builder)));
    strong_handle(&slot)
}

/// Builds a parser that can refer to itself through the handle passed to `build`.
pub fn recursive<T: 'static>(build: impl FnOnce(Parser<T>) -> Parser<T>) -> Parser<T> {
    let placeholder = Reference::new(type_name::<T>());
    let parser = build(placeholder.parser());
    placeholder.define(parser)
}

/// A placeholder that can be used before the parser it stands for exists.
pub struct Reference<T> {
    slot: Arc<Slot<T>>,
}

impl<T: 'static> Reference<T> {
    /// `label` is what a failure reports if the placeholder is invoked while
    /// still undefined.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Slot::unbound(label)),
        }
    }

    /// A handle to the eventual parser, usable in its own definition.
    pub fn parser(&self) -> Parser<T> {
        weak_handle(&self.slot)
    }

    pub fn is_defined(&self) -> bool {
        self.slot.is_resolved()
    }

    /// Binds the placeholder and returns the owning parser.
    pub fn define(self, parser: Parser<T>) -> Parser<T> {
        let fresh = self.slot.bind(parser);
        debug_assert!(fresh, "placeholder slots are bound exactly once");
        strong_handle(&self.slot)
    }
}
