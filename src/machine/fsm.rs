//! The machine façade: owns the current state and a compiled table.

use super::dispatch::{lookup, Lookup, Plan, TransitionOutcome};
use super::error::{FsmError, TableAlreadyBuiltError};
use super::logger::Logger;
use crate::config::FsmConfig;
use crate::core::{Event, State, TransitionHistory, TransitionRecord};
use crate::location::SourceLocation;
use crate::predicate::PredicateValue;
use crate::table::{compile, CompileError, CompiledTable, Definition};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;

/// A finite-state machine dispatching events through a predicate-aware
/// transition table.
///
/// The table is built once. Events are then handled one at a time: the
/// current state, the supplied predicate values and the event select at
/// most one rule, whose actions run before the state changes.
///
/// # Example
///
/// ```rust
/// use predicate_fsm::builder::{Define, TableBuilder, Transition};
/// use predicate_fsm::machine::{Fsm, TransitionOutcome};
/// use predicate_fsm::{event_enum, location, state_enum};
///
/// state_enum! { enum Gate { Locked, Unlocked } }
/// event_enum! { enum Input { Coin, Pass } }
///
/// let mut fsm: Fsm<Gate, Input> = Fsm::new(Gate::Locked);
/// let table: TableBuilder<Gate, Input> = TableBuilder::new()
///     .define(
///         Define::state(Gate::Locked)
///             .rule(Transition::when([Input::Coin]).then(Gate::Unlocked)),
///     )
///     .define(
///         Define::state(Gate::Unlocked)
///             .rule(Transition::when([Input::Pass]).then(Gate::Locked)),
///     );
/// fsm.build_table(table, location!()).unwrap();
///
/// let outcome = fsm.handle_event(Input::Coin, &[]).unwrap();
/// assert!(outcome.is_executed());
/// assert_eq!(fsm.state(), &Gate::Unlocked);
/// ```
pub struct Fsm<S: State, E: Event, Env = ()> {
    state: S,
    table: Option<Arc<CompiledTable<S, E, Env>>>,
    built_at: Option<SourceLocation>,
    history: TransitionHistory<S, E>,
    config: FsmConfig,
    logger: Logger,
}

impl<S: State, E: Event, Env> Fsm<S, E, Env> {
    /// Create a machine in `initial` with the default configuration.
    pub fn new(initial: S) -> Self {
        Self::with_config(initial, FsmConfig::default())
    }

    pub fn with_config(initial: S, config: FsmConfig) -> Self {
        let logger = Logger::new(config.sink());
        Fsm {
            state: initial,
            table: None,
            built_at: None,
            history: TransitionHistory::new(),
            config,
            logger,
        }
    }

    /// Current state (pure)
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Check if the machine is in a final state (pure)
    pub fn is_final(&self) -> bool {
        self.state.is_final()
    }

    pub fn is_built(&self) -> bool {
        self.table.is_some()
    }

    /// Executed transitions, oldest first (pure)
    pub fn history(&self) -> &TransitionHistory<S, E> {
        &self.history
    }

    pub fn table(&self) -> Option<&CompiledTable<S, E, Env>> {
        self.table.as_deref()
    }

    /// Non-fatal findings of the successful build.
    pub fn warnings(&self) -> &[CompileError<S, E>] {
        self.table.as_ref().map(|t| t.warnings()).unwrap_or_default()
    }

    pub fn config(&self) -> &FsmConfig {
        &self.config
    }

    /// Compile and install the transition table.
    ///
    /// A failed build leaves the machine without a table and may be retried.
    /// After a successful build every further call fails with
    /// [`FsmError::TableAlreadyBuilt`].
    pub fn build_table(
        &mut self,
        table: impl Into<Definition<S, E, Env>>,
        location: SourceLocation,
    ) -> Result<(), FsmError<S, E>> {
        if let Some(original) = self.built_at {
            return Err(TableAlreadyBuiltError {
                original,
                attempted: location,
            }
            .into());
        }

        let compiled = match compile(table.into(), self.config.compile_options()) {
            Ok(compiled) => compiled,
            Err(errors) => {
                self.logger.build_failed(&errors);
                return Err(errors.into());
            }
        };
        self.logger.build_warnings(compiled.warnings());
        self.logger.build_succeeded(compiled.len(), &location);
        self.table = Some(Arc::new(compiled));
        self.built_at = Some(location);
        Ok(())
    }

    /// [`build_table`](Self::build_table) recording the caller's location.
    #[track_caller]
    pub fn build(&mut self, table: impl Into<Definition<S, E, Env>>) -> Result<(), FsmError<S, E>> {
        let location = SourceLocation::caller();
        self.build_table(table, location)
    }

    /// Dispatch `event` synchronously.
    ///
    /// Fails with [`FsmError::AsyncActionInSyncDispatch`] before running
    /// anything if the chosen rule would run an effect action.
    pub fn handle_event(
        &mut self,
        event: E,
        predicates: &[PredicateValue],
    ) -> Result<TransitionOutcome<S, E>, FsmError<S, E>> {
        let table = Arc::clone(self.table.as_ref().ok_or(FsmError::TableNotBuilt)?);
        let plan = match self.resolve(&table, &event, predicates) {
            Ok(plan) => plan,
            Err(outcome) => return Ok(outcome),
        };

        if plan.requires_async() {
            return Err(FsmError::AsyncActionInSyncDispatch {
                state: self.state.clone(),
                event,
            });
        }

        for action in &plan.actions {
            action.run(&event).map_err(|source| FsmError::ActionFailed {
                state: self.state.clone(),
                event: event.clone(),
                source,
            })?;
        }

        Ok(self.commit(&plan, event))
    }

    /// Select the rule for `event`, or the outcome when none can run.
    fn resolve<'t>(
        &self,
        table: &'t CompiledTable<S, E, Env>,
        event: &E,
        predicates: &[PredicateValue],
    ) -> Result<Plan<'t, S, E, Env>, TransitionOutcome<S, E>> {
        match lookup(table, &self.state, event, predicates) {
            Lookup::Ready(plan) => Ok(plan),
            Lookup::NotFound => {
                self.logger.transition_not_found(event, predicates);
                Err(TransitionOutcome::NotFound {
                    event: event.clone(),
                    predicates: predicates.to_vec(),
                })
            }
            Lookup::NotExecuted(rule) => {
                let rule = rule.summary();
                self.logger.transition_not_executed(&rule);
                Err(TransitionOutcome::NotExecuted { rule })
            }
        }
    }

    /// Move to the rule's next state once every action has succeeded.
    fn commit(&mut self, plan: &Plan<'_, S, E, Env>, event: E) -> TransitionOutcome<S, E> {
        let from = self.state.clone();
        let to = plan.rule.next.clone();

        self.history.push(TransitionRecord {
            from: from.clone(),
            to: to.clone(),
            event: event.clone(),
            timestamp: Utc::now(),
        });
        self.state = to.clone();
        self.logger.transition_executed(&plan.rule.summary());

        TransitionOutcome::Executed { from, to, event }
    }
}

impl<S: State, E: Event, Env: Clone + Send + Sync + 'static> Fsm<S, E, Env> {
    /// Dispatch `event`, awaiting effect actions in order.
    ///
    /// The state changes only after the last action has completed.
    pub async fn handle_event_async(
        &mut self,
        event: E,
        predicates: &[PredicateValue],
        env: &Env,
    ) -> Result<TransitionOutcome<S, E>, FsmError<S, E>> {
        let table = Arc::clone(self.table.as_ref().ok_or(FsmError::TableNotBuilt)?);
        let plan = match self.resolve(&table, &event, predicates) {
            Ok(plan) => plan,
            Err(outcome) => return Ok(outcome),
        };

        for action in &plan.actions {
            action
                .run_async(&event, env)
                .await
                .map_err(|source| FsmError::ActionFailed {
                    state: self.state.clone(),
                    event: event.clone(),
                    source,
                })?;
        }

        Ok(self.commit(&plan, event))
    }
}

impl<S: State, E: Event, Env> fmt::Debug for Fsm<S, E, Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fsm")
            .field("state", &self.state)
            .field("built_at", &self.built_at)
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuplicatePolicy;
    use crate::core::Guard;
    use crate::effects::{Action, ActionError};
    use crate::machine::DiagnosticSink;
    use crate::rule::Rule;
    use std::sync::Mutex;
    use stillwater::prelude::*;

    crate::state_enum! {
        enum Door {
            Closed,
            Open,
            Jammed,
        }
        final: [Jammed]
    }

    crate::event_enum! {
        enum Push {
            Pull,
            Shove,
            Kick,
        }
    }

    crate::predicate_enum! {
        enum Latch {
            Set,
            Loose,
        }
    }

    #[derive(Default)]
    struct Recording {
        lines: Mutex<Vec<String>>,
    }

    impl DiagnosticSink for Recording {
        fn warning(&self, message: &str) {
            self.lines.lock().unwrap().push(format!("warn: {message}"));
        }

        fn info(&self, message: &str) {
            self.lines.lock().unwrap().push(format!("info: {message}"));
        }
    }

    fn here(line: u32) -> SourceLocation {
        SourceLocation::new("fsm.rs", line)
    }

    fn door_rules() -> Vec<Rule<Door, Push>> {
        vec![
            Rule::new(Door::Closed, Push::Pull, Door::Open)
                .matching(crate::predicate::Match::all_of([Latch::Loose])),
            Rule::new(Door::Closed, Push::Pull, Door::Closed)
                .matching(crate::predicate::Match::all_of([Latch::Set])),
            Rule::new(Door::Open, Push::Shove, Door::Closed),
            Rule::new(Door::Closed, Push::Kick, Door::Jammed),
        ]
    }

    #[test]
    fn dispatch_before_build_fails() {
        let mut fsm: Fsm<Door, Push> = Fsm::new(Door::Closed);
        assert_eq!(fsm.handle_event(Push::Pull, &[]), Err(FsmError::TableNotBuilt));
    }

    #[test]
    fn predicates_select_the_rule() {
        let mut fsm: Fsm<Door, Push> = Fsm::new(Door::Closed);
        fsm.build_table(door_rules(), here(1)).unwrap();

        let outcome = fsm.handle_event(Push::Pull, &[Latch::Set.into()]).unwrap();
        assert!(outcome.is_executed());
        assert_eq!(fsm.state(), &Door::Closed);

        fsm.handle_event(Push::Pull, &[Latch::Loose.into()]).unwrap();
        assert_eq!(fsm.state(), &Door::Open);
        assert_eq!(fsm.history().len(), 2);
    }

    #[test]
    fn missing_rule_is_not_found_and_state_is_kept() {
        let mut fsm: Fsm<Door, Push> = Fsm::new(Door::Open);
        fsm.build_table(door_rules(), here(1)).unwrap();

        let outcome = fsm.handle_event(Push::Pull, &[Latch::Set.into()]).unwrap();

        assert_eq!(
            outcome,
            TransitionOutcome::NotFound {
                event: Push::Pull,
                predicates: vec![Latch::Set.into()],
            }
        );
        assert_eq!(fsm.state(), &Door::Open);
        assert!(fsm.history().is_empty());
    }

    #[test]
    fn second_build_reports_both_locations() {
        let mut fsm: Fsm<Door, Push> = Fsm::new(Door::Closed);
        fsm.build_table(door_rules(), here(1)).unwrap();

        let error = fsm.build_table(door_rules(), here(2)).unwrap_err();
        assert_eq!(
            error,
            FsmError::TableAlreadyBuilt(TableAlreadyBuiltError {
                original: here(1),
                attempted: here(2),
            })
        );
    }

    #[test]
    fn failed_build_can_be_retried() {
        let mut fsm: Fsm<Door, Push> = Fsm::new(Door::Closed);

        let error = fsm.build_table(Vec::<Rule<Door, Push>>::new(), here(1)).unwrap_err();
        assert!(error.build_errors().is_some());
        assert!(!fsm.is_built());

        fsm.build_table(door_rules(), here(2)).unwrap();
        assert!(fsm.is_built());
    }

    #[test]
    fn build_records_the_caller() {
        let mut fsm: Fsm<Door, Push> = Fsm::new(Door::Closed);
        let line = line!() + 1;
        fsm.build(door_rules()).unwrap();

        match fsm.build(door_rules()) {
            Err(FsmError::TableAlreadyBuilt(error)) => assert_eq!(error.original.line, line),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn failing_action_keeps_the_state() {
        let mut fsm: Fsm<Door, Push> = Fsm::new(Door::Open);
        let rules = vec![Rule::new(Door::Open, Push::Shove, Door::Closed)
            .action(Action::fallible(|_| Err(ActionError::failed("hinge"))))];
        fsm.build_table(rules, here(1)).unwrap();

        let error = fsm.handle_event(Push::Shove, &[]).unwrap_err();

        assert!(matches!(error, FsmError::ActionFailed { state: Door::Open, .. }));
        assert_eq!(fsm.state(), &Door::Open);
        assert!(fsm.history().is_empty());
    }

    #[test]
    fn refused_guard_reports_the_rule() {
        let mut fsm: Fsm<Door, Push> = Fsm::new(Door::Open);
        let rules = vec![Rule::new(Door::Open, Push::Shove, Door::Closed)
            .guard(Guard::new(|| false))
            .at(here(9))];
        fsm.build_table(rules, here(1)).unwrap();

        match fsm.handle_event(Push::Shove, &[]).unwrap() {
            TransitionOutcome::NotExecuted { rule } => {
                assert_eq!(rule.location, here(9));
                assert!(rule.conditional);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(fsm.state(), &Door::Open);
    }

    #[test]
    fn final_state_is_reported() {
        let mut fsm: Fsm<Door, Push> = Fsm::new(Door::Closed);
        fsm.build_table(door_rules(), here(1)).unwrap();

        fsm.handle_event(Push::Kick, &[Latch::Set.into()]).unwrap();
        assert!(fsm.is_final());
    }

    #[test]
    fn effect_actions_are_refused_synchronously() {
        let mut fsm: Fsm<Door, Push> = Fsm::new(Door::Open);
        let ran = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&ran);
        let rules = vec![Rule::new(Door::Open, Push::Shove, Door::Closed)
            .action(Action::new(move || *flag.lock().unwrap() = true))
            .action(Action::effect(|_| pure(()).boxed()))];
        fsm.build_table(rules, here(1)).unwrap();

        let error = fsm.handle_event(Push::Shove, &[]).unwrap_err();

        assert!(matches!(error, FsmError::AsyncActionInSyncDispatch { .. }));
        assert!(!*ran.lock().unwrap());
        assert_eq!(fsm.state(), &Door::Open);
    }

    #[tokio::test]
    async fn async_dispatch_runs_effects_before_committing() {
        #[derive(Clone)]
        struct Env {
            log: Arc<Mutex<Vec<String>>>,
        }

        let mut fsm: Fsm<Door, Push, Env> = Fsm::new(Door::Open);
        let rules = vec![Rule::new(Door::Open, Push::Shove, Door::Closed).action(Action::effect(
            |event: &Push| {
                let name = format!("{event:?}");
                from_fn(move |env: &Env| {
                    env.log.lock().unwrap().push(name.clone());
                    Ok(())
                })
                .boxed()
            },
        ))];
        fsm.build_table(rules, here(1)).unwrap();

        let env = Env {
            log: Arc::new(Mutex::new(Vec::new())),
        };
        let outcome = fsm.handle_event_async(Push::Shove, &[], &env).await.unwrap();

        assert!(outcome.is_executed());
        assert_eq!(fsm.state(), &Door::Closed);
        assert_eq!(*env.log.lock().unwrap(), vec!["Shove".to_string()]);
    }

    #[tokio::test]
    async fn failed_effect_keeps_the_state() {
        let mut fsm: Fsm<Door, Push> = Fsm::new(Door::Open);
        let rules = vec![Rule::new(Door::Open, Push::Shove, Door::Closed)
            .action(Action::effect(|_| fail(ActionError::failed("timeout")).boxed()))];
        fsm.build_table(rules, here(1)).unwrap();

        let error = fsm.handle_event_async(Push::Shove, &[], &()).await.unwrap_err();

        assert!(matches!(error, FsmError::ActionFailed { .. }));
        assert_eq!(fsm.state(), &Door::Open);
    }

    #[test]
    fn diagnostics_reach_the_configured_sink() {
        let recording = Arc::new(Recording::default());
        let config = FsmConfig::builder()
            .duplicates(DuplicatePolicy::Warn)
            .sink(recording.clone())
            .build();
        let mut fsm: Fsm<Door, Push> = Fsm::with_config(Door::Open, config);
        let rules = vec![
            Rule::new(Door::Open, Push::Shove, Door::Closed),
            Rule::new(Door::Open, Push::Shove, Door::Closed),
        ];
        fsm.build_table(rules, here(1)).unwrap();
        assert_eq!(fsm.warnings().len(), 1);

        fsm.handle_event(Push::Pull, &[]).unwrap();
        fsm.handle_event(Push::Shove, &[]).unwrap();

        let lines = recording.lines.lock().unwrap();
        if cfg!(feature = "diagnostics") {
            assert_eq!(lines.len(), 3);
            assert!(lines[0].starts_with("warn: duplicate transitions"));
            assert_eq!(lines[1], "warn: no transition found for event 'Pull'");
            assert!(lines[2].starts_with("info: transition { define(Open)"));
        } else {
            assert!(lines.is_empty());
        }
    }

    #[test]
    fn history_grows_by_one_record_per_executed_event() {
        let mut fsm: Fsm<Door, Push> = Fsm::new(Door::Open);
        let rules = vec![
            Rule::new(Door::Open, Push::Shove, Door::Closed),
            Rule::new(Door::Closed, Push::Shove, Door::Open),
        ];
        fsm.build_table(rules, here(1)).unwrap();

        for _ in 0..20_000 {
            fsm.handle_event(Push::Shove, &[]).unwrap();
        }
        fsm.handle_event(Push::Kick, &[]).unwrap();

        assert_eq!(fsm.history().len(), 20_000);
        assert_eq!(fsm.state(), &Door::Open);
        let first = &fsm.history().transitions()[0];
        assert_eq!((first.from, first.to), (Door::Open, Door::Closed));
    }
}
