//! Builder for one authored transition.

use crate::core::{Event, Guard, State};
use crate::effects::Action;
use crate::location::SourceLocation;
use crate::predicate::Match;
use crate::rule::RuleTemplate;

/// Builder for a rule written inside a state or super-state.
///
/// The given state is supplied by the enclosing [`Define`](super::Define).
/// Events, next state and match may also come from enclosing blocks.
pub struct Transition<S, E, Env = ()> {
    template: RuleTemplate<S, E, Env>,
}

impl<S: State, E: Event, Env> Transition<S, E, Env> {
    /// Create an empty transition at the caller's location.
    #[track_caller]
    pub fn new() -> Self {
        Self {
            template: RuleTemplate::new(SourceLocation::caller()),
        }
    }

    /// Create a transition triggered by any of `events`.
    #[track_caller]
    pub fn when(events: impl IntoIterator<Item = E>) -> Self {
        Self {
            template: RuleTemplate::new(SourceLocation::caller()),
        }
        .events(events)
    }

    /// Add triggering events.
    pub fn events(mut self, events: impl IntoIterator<Item = E>) -> Self {
        self.template.events.extend(events);
        self
    }

    /// Constrain the transition to predicate combinations covered by
    /// `matching`, in addition to any match already set.
    pub fn matching(mut self, matching: Match) -> Self {
        self.template.matching = self.template.matching.combined(&matching);
        self
    }

    /// Set the next state. Without one the machine stays in the given state.
    pub fn then(mut self, state: S) -> Self {
        self.template.next = Some(state);
        self
    }

    /// Add a guard evaluated on every dispatch (optional).
    pub fn guard(mut self, guard: Guard) -> Self {
        self.template.guard = Some(guard);
        self
    }

    /// Add a guard using a closure (optional).
    pub fn condition<F>(self, predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Append an action.
    pub fn action(mut self, action: Action<E, Env>) -> Self {
        self.template.actions.push(action);
        self
    }

    /// Append several actions, in order.
    pub fn actions(mut self, actions: impl IntoIterator<Item = Action<E, Env>>) -> Self {
        self.template.actions.extend(actions);
        self
    }

    /// Replace inherited super-state rules with the same state, match and
    /// event.
    pub fn overriding(mut self) -> Self {
        self.template.overriding = true;
        self
    }

    /// Override the captured source location.
    pub fn at(mut self, location: SourceLocation) -> Self {
        self.template.location = location;
        self
    }

    pub fn location(&self) -> SourceLocation {
        self.template.location
    }

    pub(crate) fn into_template(self) -> RuleTemplate<S, E, Env> {
        self.template
    }
}

impl<S: State, E: Event, Env> Default for Transition<S, E, Env> {
    #[track_caller]
    fn default() -> Self {
        Self::new()
    }
}
