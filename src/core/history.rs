//! Record of executed transitions.
//!
//! The dispatcher appends one record per executed transition. The history is
//! immutable: `record` returns a new history with the transition added.

use super::state::{Event, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single executed transition.
///
/// # Example
///
/// ```rust
/// use predicate_fsm::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: "locked",
///     to: "unlocked",
///     event: "coin",
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.from, "locked");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord<S, E> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// The event that triggered the transition
    pub event: E,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
}

impl<S: PartialEq, E> TransitionRecord<S, E> {
    /// Whether the transition left the machine in the state it started in.
    pub fn is_self_transition(&self) -> bool {
        self.from == self.to
    }
}

/// Ordered history of executed transitions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionHistory<S, E> {
    transitions: Vec<TransitionRecord<S, E>>,
}

impl<S, E> Default for TransitionHistory<S, E> {
    fn default() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }
}

impl<S: State, E: Event> TransitionHistory<S, E> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a transition, returning a new history.
    ///
    /// The existing history is left unchanged.
    pub fn record(&self, transition: TransitionRecord<S, E>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Append a transition in place.
    pub(crate) fn push(&mut self, transition: TransitionRecord<S, E>) {
        self.transitions.push(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the first record followed by the `to`
    /// state of every record.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Events in the order they were executed.
    pub fn events(&self) -> Vec<&E> {
        self.transitions.iter().map(|t| &t.event).collect()
    }

    /// Total duration from first to last transition.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// All recorded transitions, oldest first.
    pub fn transitions(&self) -> &[TransitionRecord<S, E>] {
        &self.transitions
    }

    /// Most recent transition, if any.
    pub fn last(&self) -> Option<&TransitionRecord<S, E>> {
        self.transitions.last()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

impl<S, E> TransitionHistory<S, E>
where
    S: State + Serialize,
    E: Event + Serialize,
{
    /// Export the history as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
