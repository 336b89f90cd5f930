//! Builder API for authoring transition tables.
//!
//! This module provides fluent builders, sharing blocks and macros that
//! flatten into the [`Definition`](crate::table::Definition) consumed by the
//! table compiler. Authoring mistakes such as empty blocks are collected and
//! reported with the build rather than raised immediately.
//!
//! # Example
//!
//! ```
//! use predicate_fsm::builder::{matching, when, Define, TableBuilder, Transition};
//! use predicate_fsm::predicate::Match;
//! use predicate_fsm::{event_enum, predicate_enum, state_enum};
//!
//! state_enum! { enum Gate { Locked, Unlocked, Alarming } }
//! event_enum! { enum Input { Coin, Pass } }
//! predicate_enum! { enum Enforcement { Weak, Strong } }
//!
//! let table: TableBuilder<Gate, Input> = TableBuilder::new().define(
//!     Define::state(Gate::Locked)
//!         .rule(Transition::when([Input::Coin]).then(Gate::Unlocked))
//!         .rule(when(
//!             [Input::Pass],
//!             [
//!                 matching(Match::all_of([Enforcement::Weak]), [Transition::new()]),
//!                 matching(
//!                     Match::all_of([Enforcement::Strong]),
//!                     [Transition::new().then(Gate::Alarming)],
//!                 ),
//!             ],
//!         )),
//! );
//! assert_eq!(table.build().rules().len(), 3);
//! ```

mod define;
pub mod macros;
mod rules;
mod table;
mod transition;

pub use define::{Define, SuperState};
pub use rules::{actions, matching, then, when, Rules};
pub use table::TableBuilder;
pub use transition::Transition;
