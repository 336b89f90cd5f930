//! Rule lists and the blocks that share fields across them.
//!
//! A block applies one field to every rule it contains: [`matching`] adds a
//! match, [`when`] supplies events, [`then`] supplies a next state and
//! [`actions`] prepends actions. Blocks nest. An empty block is recorded as
//! an [`EmptyBuilderError`] and reported when the table is built.

use super::transition::Transition;
use crate::core::{Event, State};
use crate::effects::Action;
use crate::location::SourceLocation;
use crate::predicate::Match;
use crate::rule::RuleTemplate;
use crate::table::EmptyBuilderError;

/// Authored rules not yet bound to a state, plus authoring errors found
/// while collecting them.
pub struct Rules<S, E, Env = ()> {
    pub(crate) templates: Vec<RuleTemplate<S, E, Env>>,
    pub(crate) errors: Vec<EmptyBuilderError>,
}

impl<S: State, E: Event, Env> Rules<S, E, Env> {
    pub fn new() -> Self {
        Rules {
            templates: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Append a transition or a nested block.
    pub fn rule(mut self, rule: impl Into<Rules<S, E, Env>>) -> Self {
        self.extend(rule.into());
        self
    }

    pub fn extend(&mut self, other: Rules<S, E, Env>) {
        self.templates.extend(other.templates);
        self.errors.extend(other.errors);
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn errors(&self) -> &[EmptyBuilderError] {
        &self.errors
    }

    fn empty_block(caller: &'static str, location: SourceLocation) -> Self {
        Rules {
            templates: Vec::new(),
            errors: vec![EmptyBuilderError { caller, location }],
        }
    }
}

impl<S: State, E: Event, Env> Default for Rules<S, E, Env> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event, Env> From<Transition<S, E, Env>> for Rules<S, E, Env> {
    fn from(transition: Transition<S, E, Env>) -> Self {
        Rules {
            templates: vec![transition.into_template()],
            errors: Vec::new(),
        }
    }
}

impl<S: State, E: Event, Env, R> FromIterator<R> for Rules<S, E, Env>
where
    R: Into<Rules<S, E, Env>>,
{
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        iter.into_iter().fold(Rules::new(), |rules, rule| rules.rule(rule))
    }
}

fn collect<S: State, E: Event, Env>(
    children: impl IntoIterator<Item = impl Into<Rules<S, E, Env>>>,
) -> Rules<S, E, Env> {
    children.into_iter().collect()
}

/// Constrain every child rule by `condition`, in addition to its own match.
#[track_caller]
pub fn matching<S: State, E: Event, Env>(
    condition: Match,
    children: impl IntoIterator<Item = impl Into<Rules<S, E, Env>>>,
) -> Rules<S, E, Env> {
    let location = SourceLocation::caller();
    let mut rules = collect(children);
    if rules.is_empty() {
        return Rules::empty_block("matching", location).with_errors(rules.errors);
    }

    let condition = match condition.location() {
        Some(_) => condition,
        None => condition.at(location),
    };
    for template in &mut rules.templates {
        template.matching = template.matching.combined(&condition);
    }
    rules
}

/// Trigger every child rule that names no events of its own by `events`.
#[track_caller]
pub fn when<S: State, E: Event, Env>(
    events: impl IntoIterator<Item = E>,
    children: impl IntoIterator<Item = impl Into<Rules<S, E, Env>>>,
) -> Rules<S, E, Env> {
    let location = SourceLocation::caller();
    let events: Vec<E> = events.into_iter().collect();
    let mut rules = collect(children);
    if events.is_empty() || rules.is_empty() {
        return Rules::empty_block("when", location).with_errors(rules.errors);
    }

    for template in rules.templates.iter_mut().filter(|t| t.events.is_empty()) {
        template.events = events.clone();
    }
    rules
}

/// Send every child rule that names no next state of its own to `state`.
#[track_caller]
pub fn then<S: State, E: Event, Env>(
    state: S,
    children: impl IntoIterator<Item = impl Into<Rules<S, E, Env>>>,
) -> Rules<S, E, Env> {
    let location = SourceLocation::caller();
    let mut rules = collect(children);
    if rules.is_empty() {
        return Rules::empty_block("then", location).with_errors(rules.errors);
    }

    for template in rules.templates.iter_mut().filter(|t| t.next.is_none()) {
        template.next = Some(state.clone());
    }
    rules
}

/// Run `leading` before the actions of every child rule.
#[track_caller]
pub fn actions<S: State, E: Event, Env>(
    leading: impl IntoIterator<Item = Action<E, Env>>,
    children: impl IntoIterator<Item = impl Into<Rules<S, E, Env>>>,
) -> Rules<S, E, Env> {
    let location = SourceLocation::caller();
    let leading: Vec<Action<E, Env>> = leading.into_iter().collect();
    let mut rules = collect(children);
    if rules.is_empty() {
        return Rules::empty_block("actions", location).with_errors(rules.errors);
    }

    for template in &mut rules.templates {
        let own = std::mem::take(&mut template.actions);
        template.actions = leading.iter().cloned().chain(own).collect();
    }
    rules
}

impl<S, E, Env> Rules<S, E, Env> {
    fn with_errors(mut self, errors: Vec<EmptyBuilderError>) -> Self {
        self.errors.extend(errors);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::Predicate;
    use std::sync::{Arc, Mutex};

    crate::state_enum! {
        enum Gate {
            Locked,
            Unlocked,
            Alarming,
        }
    }

    crate::event_enum! {
        enum Input {
            Coin,
            Pass,
        }
    }

    crate::predicate_enum! {
        enum Enforcement {
            Weak,
            Strong,
        }
    }

    crate::predicate_enum! {
        enum Reward {
            Punishment,
            Prize,
        }
    }

    type Built = Rules<Gate, Input>;
    type Row = Transition<Gate, Input>;

    #[test]
    fn matching_block_combines_with_child_matches() {
        let rules: Built = matching(
            Match::all_of([Enforcement::Weak]),
            [
                Row::when([Input::Pass]).then(Gate::Locked),
                Row::when([Input::Coin])
                    .matching(Match::all_of([Reward::Prize]))
                    .then(Gate::Unlocked),
            ],
        );

        assert_eq!(rules.templates[0].matching, Match::all_of([Enforcement::Weak]));
        assert_eq!(
            rules.templates[1].matching,
            Match::all_of([Enforcement::Weak.erased(), Reward::Prize.erased()])
        );
        assert!(rules.errors().is_empty());
    }

    #[test]
    fn when_block_supplies_missing_events() {
        let rules: Built = when(
            [Input::Pass],
            [
                Row::new().then(Gate::Alarming),
                Row::when([Input::Coin]).then(Gate::Unlocked),
            ],
        );

        assert_eq!(rules.templates[0].events, vec![Input::Pass]);
        assert_eq!(rules.templates[1].events, vec![Input::Coin]);
    }

    #[test]
    fn then_block_supplies_missing_next_state() {
        let rules: Built = then(
            Gate::Alarming,
            [
                Row::when([Input::Pass]),
                Row::when([Input::Coin]).then(Gate::Unlocked),
            ],
        );

        assert_eq!(rules.templates[0].next, Some(Gate::Alarming));
        assert_eq!(rules.templates[1].next, Some(Gate::Unlocked));
    }

    #[test]
    fn actions_block_runs_outer_actions_first() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let record = |label: &'static str| {
            let log = Arc::clone(&log);
            Action::new(move || log.lock().unwrap().push(label))
        };

        let rules: Built = actions(
            [record("outer")],
            [Row::when([Input::Coin]).action(record("inner"))],
        );
        for action in &rules.templates[0].actions {
            action.run(&Input::Coin).unwrap();
        }

        assert_eq!(*log.lock().unwrap(), vec!["outer", "inner"]);
    }

    #[test]
    fn nested_blocks_compose() {
        let rules: Built = matching(
            Match::all_of([Enforcement::Strong]),
            [when(
                [Input::Pass],
                [then(Gate::Alarming, [Row::new()])],
            )],
        );

        let template = &rules.templates[0];
        assert_eq!(template.events, vec![Input::Pass]);
        assert_eq!(template.next, Some(Gate::Alarming));
        assert_eq!(template.matching, Match::all_of([Enforcement::Strong]));
    }

    #[test]
    fn empty_blocks_record_their_caller() {
        let empty: [Transition<Gate, Input>; 0] = [];
        let line = line!() + 1;
        let rules: Built = when([Input::Coin], empty);

        assert!(rules.is_empty());
        assert_eq!(rules.errors().len(), 1);
        assert_eq!(rules.errors()[0].caller, "when");
        assert_eq!(rules.errors()[0].location.line, line);
    }

    #[test]
    fn errors_from_nested_empty_blocks_are_kept() {
        let empty: [Transition<Gate, Input>; 0] = [];
        let rules: Built = matching(
            Match::all_of([Enforcement::Weak]),
            [
                then(Gate::Locked, empty),
                Rules::from(Row::when([Input::Coin])),
            ],
        );

        assert_eq!(rules.len(), 1);
        assert_eq!(rules.errors()[0].caller, "then");
    }

    #[test]
    fn outer_block_reports_when_only_nested_errors_remain() {
        let empty: [Transition<Gate, Input>; 0] = [];
        let rules: Built = matching(Match::all_of([Enforcement::Weak]), [actions([], empty)]);

        let callers: Vec<&str> = rules.errors().iter().map(|e| e.caller).collect();
        assert_eq!(callers, vec!["matching", "actions"]);
    }
}
