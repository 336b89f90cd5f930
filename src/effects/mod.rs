//! Actions executed during dispatch.
//!
//! Synchronous actions are plain closures. Effectful actions use Stillwater's
//! effect system so they can suspend while running.
//!
//! # Conventions
//!
//! - Effect actions are stored as factories producing a `BoxedEffect`
//!   (one allocation per execution)
//! - Use free-standing constructors: `pure()`, `fail()`, `from_fn()`
//! - Actions of one event always run one after another, never concurrently

mod action;

pub use action::{Action, ActionError, EffectAction, SyncAction};
