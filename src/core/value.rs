//! Event payloads that a rule can match regardless of their value.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use thiserror::Error;

/// Payload of an event that carries data.
///
/// A rule written for `Any` handles every value of that event that has no
/// rule of its own. Equality and hashing stay structural, so `Some(x)` and
/// `Any` are distinct dispatch keys; the fallback happens at lookup through
/// [`Event::wildcard`](super::Event::wildcard).
///
/// # Example
///
/// ```rust
/// use predicate_fsm::core::FsmValue;
///
/// let paid = FsmValue::Some(50u32);
/// assert!(paid.matches(&FsmValue::Any));
/// assert!(!paid.matches(&FsmValue::Some(20)));
/// assert_eq!(paid.value(), Some(&50));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum FsmValue<T> {
    Some(T),
    Any,
}

/// Raised when the value of [`FsmValue::Any`] is requested.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("FsmValue::Any has no value")]
pub struct NoValueError;

impl<T> FsmValue<T> {
    pub fn is_some(&self) -> bool {
        matches!(self, FsmValue::Some(_))
    }

    pub fn is_any(&self) -> bool {
        matches!(self, FsmValue::Any)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            FsmValue::Some(value) => Some(value),
            FsmValue::Any => None,
        }
    }

    pub fn try_value(&self) -> Result<&T, NoValueError> {
        self.value().ok_or(NoValueError)
    }

    /// The wildcard of this payload.
    pub fn any(&self) -> Self {
        FsmValue::Any
    }
}

impl<T: PartialEq> FsmValue<T> {
    /// Wildcard comparison: `Any` matches every value.
    pub fn matches(&self, other: &FsmValue<T>) -> bool {
        match (self, other) {
            (FsmValue::Some(left), FsmValue::Some(right)) => left == right,
            _ => true,
        }
    }

    /// Whether this is `Some(value)`.
    pub fn is(&self, value: &T) -> bool {
        self.value() == Some(value)
    }
}

impl<T> From<T> for FsmValue<T> {
    fn from(value: T) -> Self {
        FsmValue::Some(value)
    }
}

impl<T: Display> Display for FsmValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsmValue::Some(value) => write!(f, "{value}"),
            FsmValue::Any => f.write_str("any"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ANY: FsmValue<&str> = FsmValue::Any;
    const ONE: FsmValue<&str> = FsmValue::Some("1");
    const TWO: FsmValue<&str> = FsmValue::Some("2");

    #[test]
    fn value_is_only_available_for_some() {
        assert_eq!(ANY.value(), None);
        assert_eq!(ONE.value(), Some(&"1"));
        assert_eq!(ANY.try_value(), Err(NoValueError));
        assert_eq!(TWO.try_value(), Ok(&"2"));
        assert_eq!(NoValueError.to_string(), "FsmValue::Any has no value");
    }

    #[test]
    fn any_matches_every_value() {
        assert!(ANY.matches(&ANY));
        assert!(ANY.matches(&ONE));
        assert!(TWO.matches(&ANY));
        assert!(ONE.matches(&ONE));
        assert!(!ONE.matches(&TWO));
    }

    #[test]
    fn equality_and_hashing_stay_structural() {
        assert_ne!(ANY, ONE);
        let keys: HashSet<FsmValue<&str>> = [ANY, ONE, TWO, ONE].into_iter().collect();
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn convenience_comparison_and_display() {
        assert!(ONE.is(&"1"));
        assert!(!ONE.is(&"2"));
        assert!(!ANY.is(&"1"));
        assert_eq!(ONE.any(), ANY);
        assert_eq!(FsmValue::from(7).to_string(), "7");
        assert_eq!(FsmValue::<u8>::Any.to_string(), "any");
    }
}
