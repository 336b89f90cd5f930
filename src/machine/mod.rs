//! Runtime dispatch.
//!
//! [`Fsm`] owns the current state and the compiled table, resolves each
//! event to at most one rule, runs its actions and then commits the next
//! state. Diagnostics go through a [`DiagnosticSink`].

mod dispatch;
mod error;
mod fsm;
mod logger;

pub use dispatch::TransitionOutcome;
pub use error::{FsmError, TableAlreadyBuiltError};
pub use fsm::Fsm;
pub use logger::{DiagnosticSink, Logger, TracingSink};
