//! Resolution of one event against a compiled table.

use crate::core::{Event, State};
use crate::effects::Action;
use crate::predicate::PredicateValue;
use crate::rule::{Rule, RuleSummary};
use crate::table::CompiledTable;

/// What happened to a dispatched event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionOutcome<S, E> {
    /// A rule ran and the machine is now in `to`.
    Executed { from: S, to: S, event: E },

    /// No rule handles the event with these predicates in the current state.
    NotFound {
        event: E,
        predicates: Vec<PredicateValue>,
    },

    /// A rule was found but its guard refused.
    NotExecuted { rule: RuleSummary<S, E> },
}

impl<S, E> TransitionOutcome<S, E> {
    pub fn is_executed(&self) -> bool {
        matches!(self, TransitionOutcome::Executed { .. })
    }
}

/// A rule ready to run, with every action in firing order.
pub(crate) struct Plan<'a, S, E, Env> {
    pub(crate) rule: &'a Rule<S, E, Env>,
    pub(crate) actions: Vec<&'a Action<E, Env>>,
}

impl<S, E: Event, Env> Plan<'_, S, E, Env> {
    pub(crate) fn requires_async(&self) -> bool {
        self.actions.iter().any(|action| action.is_effect())
    }
}

pub(crate) enum Lookup<'a, S, E, Env> {
    NotFound,
    NotExecuted(&'a Rule<S, E, Env>),
    Ready(Plan<'a, S, E, Env>),
}

/// Find the rule for `event` and collect its actions.
///
/// Rule actions come first. Exit actions of the current state and entry
/// actions of the next state follow only when the state changes.
pub(crate) fn lookup<'a, S: State, E: Event, Env>(
    table: &'a CompiledTable<S, E, Env>,
    current: &S,
    event: &E,
    predicates: &[PredicateValue],
) -> Lookup<'a, S, E, Env> {
    let Some(rule) = table.find(current, event, predicates) else {
        return Lookup::NotFound;
    };
    if !rule.can_execute() {
        return Lookup::NotExecuted(rule);
    }

    let mut actions: Vec<&Action<E, Env>> = rule.actions.iter().collect();
    if rule.next != *current {
        actions.extend(table.exit_actions(current));
        actions.extend(table.entry_actions(&rule.next));
    }
    Lookup::Ready(Plan { rule, actions })
}
