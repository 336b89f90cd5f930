//! Errors raised by the machine façade.

use crate::core::{Event, State};
use crate::effects::ActionError;
use crate::location::SourceLocation;
use crate::table::BuildErrors;
use thiserror::Error;

/// A second build attempted after a successful one.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("transition table already built at {original}, cannot build again at {attempted}")]
pub struct TableAlreadyBuiltError {
    pub original: SourceLocation,
    pub attempted: SourceLocation,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FsmError<S: State, E: Event> {
    #[error(transparent)]
    Build(#[from] BuildErrors<S, E>),

    #[error(transparent)]
    TableAlreadyBuilt(#[from] TableAlreadyBuiltError),

    #[error("transition table has not been built")]
    TableNotBuilt,

    #[error("action failed in state {state:?} handling {event:?}: {source}")]
    ActionFailed {
        state: S,
        event: E,
        #[source]
        source: ActionError,
    },

    #[error("effect action reached in state {state:?} handling {event:?}; dispatch asynchronously")]
    AsyncActionInSyncDispatch { state: S, event: E },
}

impl<S: State, E: Event> FsmError<S, E> {
    /// Build errors, when the failure came from compiling a table.
    pub fn build_errors(&self) -> Option<&BuildErrors<S, E>> {
        match self {
            FsmError::Build(errors) => Some(errors),
            _ => None,
        }
    }
}
