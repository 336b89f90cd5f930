//! Rules that have not yet been assigned a given state.

use super::row::Rule;
use crate::core::{Event, Guard, State};
use crate::effects::Action;
use crate::location::SourceLocation;
use crate::predicate::Match;
use uuid::Uuid;

/// A rule as written inside a state or super-state block.
///
/// The given state is supplied later by the enclosing definition. A template
/// may name several events; stamping produces one [`Rule`] per event.
pub struct RuleTemplate<S, E, Env = ()> {
    pub events: Vec<E>,
    pub matching: Match,
    /// `None` keeps the machine in the given state.
    pub next: Option<S>,
    pub guard: Option<Guard>,
    pub actions: Vec<Action<E, Env>>,
    pub location: SourceLocation,
    pub group: Option<Uuid>,
    pub overriding: bool,
}

impl<S: State, E: Event, Env> RuleTemplate<S, E, Env> {
    pub fn new(location: SourceLocation) -> Self {
        RuleTemplate {
            events: Vec::new(),
            matching: Match::new(),
            next: None,
            guard: None,
            actions: Vec::new(),
            location,
            group: None,
            overriding: false,
        }
    }

    /// Stamp the template with a concrete given state.
    pub fn with_given_state(&self, state: &S) -> Vec<Rule<S, E, Env>> {
        self.events
            .iter()
            .map(|event| Rule {
                state: state.clone(),
                event: event.clone(),
                matching: self.matching.clone(),
                next: self.next.clone().unwrap_or_else(|| state.clone()),
                guard: self.guard.clone(),
                actions: self.actions.clone(),
                location: self.location,
                group: self.group,
                overriding: self.overriding,
            })
            .collect()
    }
}

impl<S: Clone, E: Clone, Env> Clone for RuleTemplate<S, E, Env> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
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
