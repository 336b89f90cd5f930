//! Predicate FSM: a finite state machine with a validating transition table
//! compiler
//!
//! Transitions are declared per state, optionally conditioned on predicate
//! values drawn from small enumerable families. The table compiler expands
//! every rule over all predicate combinations observed anywhere in the table,
//! rejects contradictions and ambiguous rules as a whole, and produces a flat
//! dispatch table. At runtime each event is resolved with a single lookup.
//!
//! # Core Concepts
//!
//! - **State / Event**: Type-safe identities via the `State` and `Event` traits
//! - **Predicates**: Finite condition families, combined with `Match`
//! - **Rules**: Given state, event, match, next state and ordered actions
//! - **Table**: Compiled once; every error of a build is reported together
//! - **Machine**: Dispatches events synchronously or with awaited effects
//!
//! # Example
//!
//! ```rust
//! use predicate_fsm::builder::{Define, TableBuilder, Transition};
//! use predicate_fsm::machine::Fsm;
//! use predicate_fsm::predicate::Match;
//! use predicate_fsm::{event_enum, location, predicate_enum, state_enum};
//!
//! state_enum! { enum Turnstile { Locked, Unlocked, Alarming } }
//! event_enum! { enum Input { Coin, Pass } }
//! predicate_enum! { enum Enforcement { Weak, Strong } }
//!
//! let table: TableBuilder<Turnstile, Input> = TableBuilder::new()
//!     .define(
//!         Define::state(Turnstile::Locked)
//!             .rule(Transition::when([Input::Coin]).then(Turnstile::Unlocked))
//!             .rule(Transition::when([Input::Pass]).matching(Match::all_of([Enforcement::Weak])))
//!             .rule(
//!                 Transition::when([Input::Pass])
//!                     .matching(Match::all_of([Enforcement::Strong]))
//!                     .then(Turnstile::Alarming),
//!             ),
//!     )
//!     .define(
//!         Define::state(Turnstile::Unlocked)
//!             .rule(Transition::when([Input::Pass]).then(Turnstile::Locked)),
//!     );
//!
//! let mut fsm: Fsm<Turnstile, Input> = Fsm::new(Turnstile::Locked);
//! fsm.build_table(table, location!()).unwrap();
//!
//! fsm.handle_event(Input::Pass, &[Enforcement::Weak.into()]).unwrap();
//! assert_eq!(fsm.state(), &Turnstile::Locked);
//!
//! fsm.handle_event(Input::Pass, &[Enforcement::Strong.into()]).unwrap();
//! assert_eq!(fsm.state(), &Turnstile::Alarming);
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod effects;
mod location;
pub mod machine;
pub mod predicate;
pub mod rule;
pub mod table;

// Re-export commonly used types
pub use crate::core::{Event, Guard, State, TransitionHistory, TransitionRecord};
pub use effects::{Action, ActionError};
pub use location::SourceLocation;
pub use machine::{Fsm, FsmError, TransitionOutcome};
pub use predicate::{Match, Predicate, PredicateValue};
