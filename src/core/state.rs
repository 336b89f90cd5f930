//! Identity traits for the states and events of a machine.
//!
//! The engine never inspects a state or event beyond equality, hashing and
//! its name. Both are plain values owned by the caller.

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: states are copied into dispatch keys and history records
/// - `Eq` + `Hash`: states are part of every dispatch key
/// - `Debug`: states appear in diagnostics and error reports
///
/// # Example
///
/// ```rust
/// use predicate_fsm::core::State;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum DoorState {
///     Open,
///     Closed,
///     Welded,
/// }
///
/// impl State for DoorState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///             Self::Welded => "Welded",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Welded)
///     }
/// }
/// ```
pub trait State: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}

/// Trait for the events a machine reacts to.
///
/// Events carry the same identity contract as states: they are hashed into
/// dispatch keys and compared structurally.
pub trait Event: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// Get the event's name for display/logging.
    fn name(&self) -> &str;

    /// The same event with its payload replaced by [`FsmValue::Any`](super::FsmValue::Any).
    ///
    /// Dispatch falls back to this event when no rule handles the exact
    /// one. Events without payloads keep the default `None`.
    ///
    /// ```rust
    /// use predicate_fsm::core::{Event, FsmValue};
    ///
    /// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    /// enum Vend {
    ///     Insert(FsmValue<u32>),
    ///     Refund,
    /// }
    ///
    /// impl Event for Vend {
    ///     fn name(&self) -> &str {
    ///         match self {
    ///             Self::Insert(_) => "Insert",
    ///             Self::Refund => "Refund",
    ///         }
    ///     }
    ///
    ///     fn wildcard(&self) -> Option<Self> {
    ///         match self {
    ///             Self::Insert(amount) if amount.is_some() => Some(Self::Insert(FsmValue::Any)),
    ///             _ => None,
    ///         }
    ///     }
    /// }
    ///
    /// assert_eq!(Vend::Insert(5.into()).wildcard(), Some(Vend::Insert(FsmValue::Any)));
    /// assert_eq!(Vend::Refund.wildcard(), None);
    /// ```
    fn wildcard(&self) -> Option<Self> {
        None
    }
}
