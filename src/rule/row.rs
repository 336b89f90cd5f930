//! Stamped rules: one given state, one event.

use crate::core::{Event, Guard, State};
use crate::effects::Action;
use crate::location::SourceLocation;
use crate::predicate::Match;
use std::fmt;
use uuid::Uuid;

/// One candidate transition: given state and event, constrained by a match,
/// leading to a next state while running actions in order.
///
/// Rules can be written directly as a table literal:
///
/// ```rust
/// use predicate_fsm::rule::Rule;
/// use predicate_fsm::predicate::Match;
/// use predicate_fsm::{event_enum, location, predicate_enum, state_enum};
///
/// state_enum! { enum Door { Open, Closed } }
/// event_enum! { enum Push { Pull, Shove } }
/// predicate_enum! { enum Lock { Engaged, Free } }
///
/// let rules: Vec<Rule<Door, Push>> = vec![
///     Rule::new(Door::Closed, Push::Pull, Door::Open)
///         .matching(Match::all_of([Lock::Free]))
///         .at(location!()),
///     Rule::new(Door::Open, Push::Shove, Door::Closed),
/// ];
/// assert_eq!(rules.len(), 2);
/// ```
pub struct Rule<S, E, Env = ()> {
    pub state: S,
    pub event: E,
    pub matching: Match,
    pub next: S,
    pub guard: Option<Guard>,
    pub actions: Vec<Action<E, Env>>,
    pub location: SourceLocation,
    /// Super-state the rule was inherited from, if any.
    pub group: Option<Uuid>,
    /// Whether the rule replaces inherited rules with the same declared key.
    pub overriding: bool,
}

impl<S: State, E: Event, Env> Rule<S, E, Env> {
    #[track_caller]
    pub fn new(state: S, event: E, next: S) -> Self {
        Rule {
            state,
            event,
            matching: Match::new(),
            next,
            guard: None,
            actions: Vec::new(),
            location: SourceLocation::caller(),
            group: None,
            overriding: false,
        }
    }

    pub fn matching(mut self, matching: Match) -> Self {
        self.matching = matching;
        self
    }

    pub fn guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn action(mut self, action: Action<E, Env>) -> Self {
        self.actions.push(action);
        self
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// Whether the rule's guard allows it to execute right now.
    pub fn can_execute(&self) -> bool {
        self.guard.as_ref().is_none_or(Guard::check)
    }

    pub fn is_conditional(&self) -> bool {
        self.guard.is_some()
    }

    /// Whether any action needs asynchronous dispatch.
    pub fn has_effects(&self) -> bool {
        self.actions.iter().any(Action::is_effect)
    }

    /// Whether two rules share state, declared match and event.
    pub fn same_declared_key(&self, other: &Self) -> bool {
        self.state == other.state && self.event == other.event && self.matching == other.matching
    }

    /// Diagnostic view of the rule, without actions or guard.
    pub fn summary(&self) -> RuleSummary<S, E> {
        RuleSummary {
            state: self.state.clone(),
            event: self.event.clone(),
            next: self.next.clone(),
            matching: self.matching.clone(),
            location: self.location,
            conditional: self.is_conditional(),
        }
    }
}

impl<S: Clone, E: Clone, Env> Clone for Rule<S, E, Env> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            event: self.event.clone(),
            matching: self.matching.clone(),
            next: self.next.clone(),
            guard: self.guard.clone(),
            actions: self.actions.clone(),
            location: self.location,
            group: self.group,
            overriding: self.overriding,
        }
    }
}

impl<S: fmt::Debug, E: fmt::Debug, Env> fmt::Debug for Rule<S, E, Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("state", &self.state)
            .field("event", &self.event)
            .field("matching", &self.matching)
            .field("next", &self.next)
            .field("actions", &self.actions.len())
            .field("location", &self.location)
            .finish()
    }
}

/// What diagnostics and errors report about a rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleSummary<S, E> {
    pub state: S,
    pub event: E,
    pub next: S,
    pub matching: Match,
    pub location: SourceLocation,
    pub conditional: bool,
}

impl<S: fmt::Debug, E: fmt::Debug> fmt::Display for RuleSummary<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ define({:?})", self.state)?;
        if !self.matching.is_empty() {
            write!(f, " | matching({})", self.matching)?;
        }
        if self.conditional {
            f.write_str(" | condition")?;
        }
        write!(
            f,
            " | when({:?}) | then({:?}) }} at {}",
            self.event, self.next, self.location
        )
    }
}
