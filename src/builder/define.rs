//! State definitions and reusable super-states.

use super::rules::Rules;
use crate::core::{Event, State};
use crate::effects::Action;
use crate::location::SourceLocation;
use crate::rule::RuleTemplate;
use crate::table::{Definition, EmptyBuilderError};
use uuid::Uuid;

/// A reusable bundle of rules and entry/exit actions.
///
/// Adopting a super-state copies its rules into every given state of the
/// adopting [`Define`]. Rules keep the id of the super-state that declared
/// them so that [`Transition::overriding`](super::Transition::overriding)
/// can tell inherited rules apart.
pub struct SuperState<S, E, Env = ()> {
    id: Uuid,
    adopted: Vec<SuperState<S, E, Env>>,
    rules: Rules<S, E, Env>,
    entry: Vec<Action<E, Env>>,
    exit: Vec<Action<E, Env>>,
    location: SourceLocation,
}

impl<S: State, E: Event, Env> SuperState<S, E, Env> {
    #[track_caller]
    pub fn new() -> Self {
        SuperState {
            id: Uuid::new_v4(),
            adopted: Vec::new(),
            rules: Rules::new(),
            entry: Vec::new(),
            exit: Vec::new(),
            location: SourceLocation::caller(),
        }
    }

    /// Include another super-state. Adopted rules and actions come before
    /// this super-state's own.
    pub fn adopts(mut self, other: SuperState<S, E, Env>) -> Self {
        self.adopted.push(other);
        self
    }

    pub fn rule(mut self, rule: impl Into<Rules<S, E, Env>>) -> Self {
        let mut rules = rule.into();
        for template in &mut rules.templates {
            template.group = Some(self.id);
        }
        self.rules.extend(rules);
        self
    }

    pub fn rules<R: Into<Rules<S, E, Env>>>(self, rules: impl IntoIterator<Item = R>) -> Self {
        rules.into_iter().fold(self, |state, rule| state.rule(rule))
    }

    pub fn on_entry(mut self, action: Action<E, Env>) -> Self {
        self.entry.push(action);
        self
    }

    pub fn on_exit(mut self, action: Action<E, Env>) -> Self {
        self.exit.push(action);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn location(&self) -> SourceLocation {
        self.location
    }

    /// Rule templates, adopted super-states first.
    fn templates(&self) -> Vec<&RuleTemplate<S, E, Env>> {
        self.adopted
            .iter()
            .flat_map(SuperState::templates)
            .chain(self.rules.templates.iter())
            .collect()
    }

    fn entry_actions(&self) -> Vec<&Action<E, Env>> {
        self.adopted
            .iter()
            .flat_map(SuperState::entry_actions)
            .chain(self.entry.iter())
            .collect()
    }

    fn exit_actions(&self) -> Vec<&Action<E, Env>> {
        self.adopted
            .iter()
            .flat_map(SuperState::exit_actions)
            .chain(self.exit.iter())
            .collect()
    }

    fn errors(&self) -> Vec<&EmptyBuilderError> {
        self.adopted
            .iter()
            .flat_map(SuperState::errors)
            .chain(self.rules.errors.iter())
            .collect()
    }
}

/// The rules and entry/exit actions of one or more given states.
///
/// ```rust
/// use predicate_fsm::builder::{Define, SuperState, Transition};
/// use predicate_fsm::effects::Action;
/// use predicate_fsm::{event_enum, state_enum};
///
/// state_enum! { enum Gate { Locked, Unlocked } }
/// event_enum! { enum Input { Coin, Reset } }
///
/// let resettable = SuperState::new().rule(Transition::when([Input::Reset]).then(Gate::Locked));
///
/// let unlocked: Define<Gate, Input> = Define::state(Gate::Unlocked)
///     .adopts(resettable)
///     .on_entry(Action::new(|| println!("unlocked")))
///     .rule(Transition::when([Input::Coin]));
/// ```
pub struct Define<S, E, Env = ()> {
    states: Vec<S>,
    adopted: Vec<SuperState<S, E, Env>>,
    rules: Rules<S, E, Env>,
    entry: Vec<Action<E, Env>>,
    exit: Vec<Action<E, Env>>,
    location: SourceLocation,
}

impl<S: State, E: Event, Env> Define<S, E, Env> {
    #[track_caller]
    pub fn state(state: S) -> Self {
        Self::empty_at(SourceLocation::caller()).and_state(state)
    }

    /// Define several given states at once. An empty list is reported as an
    /// empty `define` block.
    #[track_caller]
    pub fn states(states: impl IntoIterator<Item = S>) -> Self {
        let mut define = Self::empty_at(SourceLocation::caller());
        define.states.extend(states);
        define
    }

    fn empty_at(location: SourceLocation) -> Self {
        Define {
            states: Vec::new(),
            adopted: Vec::new(),
            rules: Rules::new(),
            entry: Vec::new(),
            exit: Vec::new(),
            location,
        }
    }

    /// Apply the same definition to another given state.
    pub fn and_state(mut self, state: S) -> Self {
        self.states.push(state);
        self
    }

    pub fn adopts(mut self, super_state: SuperState<S, E, Env>) -> Self {
        self.adopted.push(super_state);
        self
    }

    pub fn rule(mut self, rule: impl Into<Rules<S, E, Env>>) -> Self {
        self.rules.extend(rule.into());
        self
    }

    pub fn rules<R: Into<Rules<S, E, Env>>>(self, rules: impl IntoIterator<Item = R>) -> Self {
        rules.into_iter().fold(self, |define, rule| define.rule(rule))
    }

    pub fn on_entry(mut self, action: Action<E, Env>) -> Self {
        self.entry.push(action);
        self
    }

    pub fn on_exit(mut self, action: Action<E, Env>) -> Self {
        self.exit.push(action);
        self
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// Flatten into rules stamped with each given state.
    ///
    /// Inherited rules come first, in adoption order. Entry and exit actions
    /// are this definition's own, then those of adopted super-states.
    pub fn into_definition(self) -> Definition<S, E, Env> {
        let mut definition = Definition::new();

        let mut errors: Vec<EmptyBuilderError> = self
            .adopted
            .iter()
            .flat_map(SuperState::errors)
            .cloned()
            .chain(self.rules.errors.iter().cloned())
            .collect();

        let templates: Vec<&RuleTemplate<S, E, Env>> = self
            .adopted
            .iter()
            .flat_map(SuperState::templates)
            .chain(self.rules.templates.iter())
            .collect();

        if self.states.is_empty() || (templates.is_empty() && self.adopted.is_empty()) {
            errors.insert(
                0,
                EmptyBuilderError {
                    caller: "define",
                    location: self.location,
                },
            );
        }

        for template in templates.iter().filter(|t| t.events.is_empty()) {
            errors.push(EmptyBuilderError {
                caller: "when",
                location: template.location,
            });
        }

        for state in &self.states {
            for template in &templates {
                for rule in template.with_given_state(state) {
                    definition.push_rule(rule);
                }
            }

            let entry = self
                .entry
                .iter()
                .chain(self.adopted.iter().flat_map(SuperState::entry_actions))
                .cloned();
            definition.on_entry(state.clone(), entry);

            let exit = self
                .exit
                .iter()
                .chain(self.adopted.iter().flat_map(SuperState::exit_actions))
                .cloned();
            definition.on_exit(state.clone(), exit);
        }

        for error in errors {
            definition.push_error(error);
        }
        definition
    }
}

impl<S: State, E: Event, Env> From<Define<S, E, Env>> for Definition<S, E, Env> {
    fn from(define: Define<S, E, Env>) -> Self {
        define.into_definition()
    }
}
