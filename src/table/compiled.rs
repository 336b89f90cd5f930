//! The immutable dispatch table produced by a successful build.

use super::error::CompileError;
use crate::core::{Event, State};
use crate::effects::Action;
use crate::predicate::{Combination, Family, PredicateValue};
use crate::rule::Rule;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Exact lookup key: a state, an event and one value of every family the
/// table mentions.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DispatchKey<S, E> {
    pub state: S,
    pub event: E,
    pub predicates: Combination,
}

/// Map from [`DispatchKey`] to the single rule that handles it.
///
/// Several keys may share one rule when its match covers more than one
/// combination.
pub struct CompiledTable<S: State, E: Event, Env = ()> {
    entries: HashMap<DispatchKey<S, E>, Arc<Rule<S, E, Env>>>,
    families: Vec<Family>,
    entry_actions: HashMap<S, Vec<Action<E, Env>>>,
    exit_actions: HashMap<S, Vec<Action<E, Env>>>,
    warnings: Vec<CompileError<S, E>>,
}

impl<S: State, E: Event, Env> CompiledTable<S, E, Env> {
    pub(crate) fn new(
        entries: HashMap<DispatchKey<S, E>, Arc<Rule<S, E, Env>>>,
        families: Vec<Family>,
        entry_actions: HashMap<S, Vec<Action<E, Env>>>,
        exit_actions: HashMap<S, Vec<Action<E, Env>>>,
        warnings: Vec<CompileError<S, E>>,
    ) -> Self {
        CompiledTable {
            entries,
            families,
            entry_actions,
            exit_actions,
            warnings,
        }
    }

    /// Restrict supplied predicate values to the table's families.
    ///
    /// Returns `None` when a family has no value, or when two different
    /// values of one family were supplied.
    pub fn snapshot(&self, predicates: &[PredicateValue]) -> Option<Combination> {
        let mut chosen: BTreeMap<Family, PredicateValue> = BTreeMap::new();
        for value in predicates {
            if !self.families.contains(&value.family()) {
                continue;
            }
            match chosen.insert(value.family(), *value) {
                Some(previous) if previous != *value => return None,
                _ => {}
            }
        }

        if chosen.len() == self.families.len() {
            Some(chosen.into_values().collect())
        } else {
            None
        }
    }

    /// Rule for an exact key. An event with a payload falls back to its
    /// [`wildcard`](Event::wildcard) when no rule names the exact value.
    pub fn lookup(
        &self,
        state: &S,
        event: &E,
        predicates: &Combination,
    ) -> Option<&Rule<S, E, Env>> {
        let mut key = DispatchKey {
            state: state.clone(),
            event: event.clone(),
            predicates: predicates.clone(),
        };
        if let Some(rule) = self.entries.get(&key) {
            return Some(rule.as_ref());
        }

        key.event = event.wildcard()?;
        self.entries.get(&key).map(Arc::as_ref)
    }

    /// Snapshot the supplied values and look the result up.
    pub fn find(
        &self,
        state: &S,
        event: &E,
        predicates: &[PredicateValue],
    ) -> Option<&Rule<S, E, Env>> {
        let combination = self.snapshot(predicates)?;
        self.lookup(state, event, &combination)
    }

    pub fn entry_actions(&self, state: &S) -> &[Action<E, Env>] {
        self.entry_actions.get(state).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn exit_actions(&self, state: &S) -> &[Action<E, Env>] {
        self.exit_actions.get(state).map(Vec::as_slice).unwrap_or_default()
    }

    /// Families mentioned anywhere in the table, in order of first mention.
    pub fn families(&self) -> &[Family] {
        &self.families
    }

    /// Non-fatal findings, such as tolerated duplicates.
    pub fn warnings(&self) -> &[CompileError<S, E>] {
        &self.warnings
    }

    pub fn keys(&self) -> impl Iterator<Item = &DispatchKey<S, E>> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: State, E: Event, Env> fmt::Debug for CompiledTable<S, E, Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledTable")
            .field("entries", &self.entries.len())
            .field("families", &self.families)
            .field("warnings", &self.warnings.len())
            .finish()
    }
}
