//! Transition table compilation.
//!
//! A [`Definition`] holds rules exactly as authored. [`compile`] validates
//! it as a whole and turns it into a [`CompiledTable`], a flat map from
//! `(state, predicate combination, event)` to the one rule that handles it.

mod compiled;
mod compiler;
mod definition;
mod error;

pub use compiled::{CompiledTable, DispatchKey};
pub use compiler::compile;
pub use definition::Definition;
pub use error::{
    BuildErrors, ClashError, CompileError, DuplicatesError, EmptyBuilderError, ImplicitClash,
    ImplicitClashesError,
};
