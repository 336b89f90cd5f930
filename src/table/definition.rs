//! Flat input to the table compiler.

use super::error::CompileError;
use crate::core::{Event, State};
use crate::effects::Action;
use crate::rule::Rule;
use std::collections::HashMap;

/// Everything a table declares: rules in declaration order, entry and exit
/// actions per state, and authoring errors found while the blocks were
/// evaluated.
pub struct Definition<S: State, E: Event, Env = ()> {
    pub(crate) rules: Vec<Rule<S, E, Env>>,
    pub(crate) entry_actions: HashMap<S, Vec<Action<E, Env>>>,
    pub(crate) exit_actions: HashMap<S, Vec<Action<E, Env>>>,
    pub(crate) errors: Vec<CompileError<S, E>>,
}

impl<S: State, E: Event, Env> Definition<S, E, Env> {
    pub fn new() -> Self {
        Definition {
            rules: Vec::new(),
            entry_actions: HashMap::new(),
            exit_actions: HashMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn from_rules(rules: Vec<Rule<S, E, Env>>) -> Self {
        Definition {
            rules,
            ..Self::new()
        }
    }

    pub fn push_rule(&mut self, rule: Rule<S, E, Env>) {
        self.rules.push(rule);
    }

    pub fn push_error(&mut self, error: impl Into<CompileError<S, E>>) {
        self.errors.push(error.into());
    }

    /// Append entry actions for `state`, after any already declared.
    pub fn on_entry(&mut self, state: S, actions: impl IntoIterator<Item = Action<E, Env>>) {
        self.entry_actions.entry(state).or_default().extend(actions);
    }

    /// Append exit actions for `state`, after any already declared.
    pub fn on_exit(&mut self, state: S, actions: impl IntoIterator<Item = Action<E, Env>>) {
        self.exit_actions.entry(state).or_default().extend(actions);
    }

    /// Merge another definition after this one.
    pub fn extend(&mut self, other: Definition<S, E, Env>) {
        self.rules.extend(other.rules);
        for (state, actions) in other.entry_actions {
            self.on_entry(state, actions);
        }
        for (state, actions) in other.exit_actions {
            self.on_exit(state, actions);
        }
        self.errors.extend(other.errors);
    }

    pub fn rules(&self) -> &[Rule<S, E, Env>] {
        &self.rules
    }

    pub fn errors(&self) -> &[CompileError<S, E>] {
        &self.errors
    }
}

impl<S: State, E: Event, Env> Default for Definition<S, E, Env> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event, Env> From<Vec<Rule<S, E, Env>>> for Definition<S, E, Env> {
    fn from(rules: Vec<Rule<S, E, Env>>) -> Self {
        Definition::from_rules(rules)
    }
}
