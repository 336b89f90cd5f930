//! Transition, entry and exit actions.

use crate::core::Event;
use std::fmt;
use std::sync::Arc;
use stillwater::effect::{BoxedEffect, Effect};
use thiserror::Error;

/// Errors raised by actions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("Action failed: {0}")]
    Failed(String),

    #[error("Effect action can only run through asynchronous dispatch")]
    RequiresAsync,
}

impl ActionError {
    pub fn failed(message: impl Into<String>) -> Self {
        ActionError::Failed(message.into())
    }
}

/// Synchronous action body. Receives the dispatched event.
pub type SyncAction<E> = Arc<dyn Fn(&E) -> Result<(), ActionError> + Send + Sync>;

/// Factory for an effectful action.
/// Called once per execution to create a fresh effect.
pub type EffectAction<E, Env> =
    Arc<dyn Fn(&E) -> BoxedEffect<(), ActionError, Env> + Send + Sync>;

/// An action run when a transition executes or a state is entered or left.
///
/// Synchronous actions run in both dispatch modes. Effect actions suspend and
/// only run through asynchronous dispatch.
pub enum Action<E, Env = ()> {
    Sync(SyncAction<E>),
    Effect(EffectAction<E, Env>),
}

impl<E: Event, Env> Action<E, Env> {
    /// Infallible action that ignores the event.
    pub fn new<F>(action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Action::Sync(Arc::new(move |_| {
            action();
            Ok(())
        }))
    }

    /// Infallible action receiving the dispatched event.
    pub fn with_event<F>(action: F) -> Self
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        Action::Sync(Arc::new(move |event| {
            action(event);
            Ok(())
        }))
    }

    /// Action that may fail. A failure leaves the machine's state unchanged.
    pub fn fallible<F>(action: F) -> Self
    where
        F: Fn(&E) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        Action::Sync(Arc::new(action))
    }

    /// Effectful action built from a factory.
    pub fn effect<F>(factory: F) -> Self
    where
        F: Fn(&E) -> BoxedEffect<(), ActionError, Env> + Send + Sync + 'static,
    {
        Action::Effect(Arc::new(factory))
    }

    pub fn is_effect(&self) -> bool {
        matches!(self, Action::Effect(_))
    }

    /// Run a synchronous action.
    pub fn run(&self, event: &E) -> Result<(), ActionError> {
        match self {
            Action::Sync(action) => action(event),
            Action::Effect(_) => Err(ActionError::RequiresAsync),
        }
    }
}

impl<E: Event, Env: Clone + Send + Sync + 'static> Action<E, Env> {
    /// Run the action, awaiting it if it is effectful.
    pub async fn run_async(&self, event: &E, env: &Env) -> Result<(), ActionError> {
        match self {
            Action::Sync(action) => action(event),
            Action::Effect(factory) => factory(event).run(env).await,
        }
    }
}

impl<E, Env> Clone for Action<E, Env> {
    fn clone(&self) -> Self {
        match self {
            Action::Sync(action) => Action::Sync(Arc::clone(action)),
            Action::Effect(factory) => Action::Effect(Arc::clone(factory)),
        }
    }
}

impl<E, Env> fmt::Debug for Action<E, Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Sync(_) => f.write_str("Action::Sync(..)"),
            Action::Effect(_) => f.write_str("Action::Effect(..)"),
        }
    }
}
