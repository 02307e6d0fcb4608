//! Language tables: named, mutually recursive rules resolved together.
//!
//! Rules are registered on a [`LanguageBuilder`] in any order. Building runs
//! in two phases:
//!
//! 1. one empty slot is allocated per rule name and the complete [`RuleSet`]
//!    is assembled from them;
//! 2. every rule builder is invoked against that complete set and its result
//!    is bound into the rule's slot.
//!
//! Because the set is complete before any builder runs, a builder can ask for
//! any rule, including itself and rules registered after it.
//!
//! Rules may produce different value types. The set stores them type-erased
//! and checks the requested type on every lookup.

use std::any::{type_name, Any};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use crate::errors::GrammarError;
use crate::parser::Parser;
use crate::position::NamedMarker;
use crate::reference::{weak_handle, Slot};

struct RuleEntry {
    slot: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

/// Every rule of a language, as seen by the rule builders.
pub struct RuleSet {
    rules: BTreeMap<String, RuleEntry>,
}

impl RuleSet {
    fn slot<T: 'static>(&self, name: &str) -> Result<Arc<Slot<T>>, GrammarError> {
        let entry = self
            .rules
            .get(name)
            .ok_or_else(|| GrammarError::UnknownRule {
                name: name.to_string(),
            })?;
        Arc::clone(&entry.slot)
            .downcast::<Slot<T>>()
            .map_err(|_| GrammarError::RuleTypeMismatch {
                name: name.to_string(),
                requested: type_name::<T>(),
                found: entry.type_name,
            })
    }

    /// A parser for rule `name`. Usable immediately, even if the rule itself
    /// has not been built yet.
    pub fn get<T: 'static>(&self, name: &str) -> Result<Parser<T>, GrammarError> {
        Ok(weak_handle(&self.slot::<T>(name)?))
    }

    /// Like [`get`](Self::get), wrapping each match in a [`NamedMarker`]
    /// carrying the rule name.
    pub fn node<T: 'static>(&self, name: &str) -> Result<Parser<NamedMarker<T>>, GrammarError> {
        Ok(self.get::<T>(name)?.node(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.rules.iter().map(|(name, entry)| (name, entry.type_name)))
            .finish()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

trait PendingRule {
    fn name(&self) -> &str;

    fn allocate(&self) -> RuleEntry;

    fn bind(self: Box<Self>, rules: &RuleSet) -> Result<(), GrammarError>;
}

struct TypedRule<T, F> {
    name: String,
    build: F,
    _output: PhantomData<fn() -> T>,
}

impl<T, F> PendingRule for TypedRule<T, F>
where
    T: 'static,
    F: FnOnce(&RuleSet) -> Result<Parser<T>, GrammarError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn allocate(&self) -> RuleEntry {
        RuleEntry {
            slot: Arc::new(Slot::<T>::unbound(self.name.clone())),
            type_name: type_name::<T>(),
        }
    }

    fn bind(self: Box<Self>, rules: &RuleSet) -> Result<(), GrammarError> {
        let TypedRule { name, build, .. } = *self;
        let slot = rules.slot::<T>(&name)?;
        let parser = build(rules)?;
        let fresh = slot.bind(parser);
        debug_assert!(fresh, "rule '{name}' bound twice");
        Ok(())
    }
}

/// Collects rule builders; see the [module docs](self).
#[derive(Default)]
pub struct LanguageBuilder {
    rules: Vec<Box<dyn PendingRule>>,
}

impl LanguageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers rule `name`. `build` receives the complete rule set.
    pub fn rule<T, F>(mut self, name: impl Into<String>, build: F) -> Self
    where
        T: 'static,
        F: FnOnce(&RuleSet) -> Result<Parser<T>, GrammarError> + 'static,
    {
        self.rules.push(Box::new(TypedRule {
            name: name.into(),
            build,
            _output: PhantomData,
        }));
        self
    }

    /// Ties the rules together.
    pub fn build(self) -> Result<Language, GrammarError> {
        let mut rules = BTreeMap::new();
        for pending in &self.rules {
            if rules
                .insert(pending.name().to_string(), pending.allocate())
                .is_some()
            {
                return Err(GrammarError::DuplicateRule {
                    name: pending.name().to_string(),
                });
            }
        }
        let rule_set = RuleSet { rules };

        for pending in self.rules {
            pending.bind(&rule_set)?;
        }

        debug!(rules = rule_set.rules.len(), "built language");
        Ok(Language {
            rules: Arc::new(rule_set),
        })
    }
}

impl fmt::Debug for LanguageBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| rule.name()))
            .finish()
    }
}

// ============================================================================
// LANGUAGE
// ============================================================================

/// A built language: every rule resolved and ready to parse.
///
/// Parsers obtained here keep the whole rule table alive, so they stay usable
/// after the `Language` itself is dropped.
#[derive(Clone, Debug)]
pub struct Language {
    rules: Arc<RuleSet>,
}

impl Language {
    pub fn get<T: 'static>(&self, name: &str) -> Result<Parser<T>, GrammarError> {
        let rule = self.rules.get::<T>(name)?;
        let rules = Arc::clone(&self.rules);
        Ok(Parser::new(move |ctx| {
            // the rule table owns the slots the weak handles point at
            let _ = &rules;
            rule.run(ctx)
        }))
    }

    pub fn node<T: 'static>(&self, name: &str) -> Result<Parser<NamedMarker<T>>, GrammarError> {
        Ok(self.get::<T>(name)?.node(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains(name)
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.names()
    }
}
