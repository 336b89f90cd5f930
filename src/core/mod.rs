//! Core identity types for the state machine.
//!
//! This module contains the pieces every other layer builds on:
//! - State and event identity via the `State` and `Event` traits
//! - Runtime guards for conditional transitions
//! - Immutable history of executed transitions
//! - Wildcard payloads for events that carry data

mod guard;
mod history;
mod state;
mod value;

pub use guard::Guard;
pub use history::{TransitionHistory, TransitionRecord};
pub use state::{Event, State};
pub use value::{FsmValue, NoValueError};
