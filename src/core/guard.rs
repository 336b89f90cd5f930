//! Runtime guards for conditional transitions.
//!
//! A guard is re-evaluated on every dispatch. It is distinct from predicate
//! matching, which is resolved once when the table is compiled.

use std::fmt;
use std::sync::Arc;

/// Runtime condition attached to a transition.
///
/// When the transition is matched structurally but its guard returns `false`,
/// the dispatch reports the transition as not executed and the state does not
/// change.
///
/// # Example
///
/// ```rust
/// use predicate_fsm::core::Guard;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// let open = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&open);
/// let guard = Guard::new(move || flag.load(Ordering::SeqCst));
///
/// assert!(!guard.check());
/// open.store(true, Ordering::SeqCst);
/// assert!(guard.check());
/// ```
#[derive(Clone)]
pub struct Guard {
    predicate: Arc<dyn Fn() -> bool + Send + Sync>,
}

impl Guard {
    /// Create a guard from a condition closure.
    ///
    /// The closure is called on every dispatch of the guarded transition and
    /// its result is never cached.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Evaluate the guard.
    pub fn check(&self) -> bool {
        (self.predicate)()
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
