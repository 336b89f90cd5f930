//! Machine configuration.
//!
//! Controls how the table compiler treats duplicate and overlapping rules
//! and where diagnostics are written.
//!
//! # Example
//!
//! ```rust
//! use predicate_fsm::config::{DuplicatePolicy, FsmConfig, OverlapPolicy};
//!
//! let config = FsmConfig::builder()
//!     .duplicates(DuplicatePolicy::Reject)
//!     .overlap(OverlapPolicy::MostSpecific)
//!     .build();
//!
//! assert_eq!(config.compile_options().duplicates, DuplicatePolicy::Reject);
//! ```

mod builder;

pub use builder::FsmConfigBuilder;

use crate::machine::{DiagnosticSink, TracingSink};
use std::fmt;
use std::sync::Arc;

/// How rules that claim the same dispatch key with the same next state are
/// treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep one rule, report the duplicates as warnings.
    #[default]
    Warn,

    /// Fail the build.
    Reject,
}

/// How rules with different matches that overlap on a dispatch key are
/// resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlapPolicy {
    /// Every overlap with differing next states is a clash.
    #[default]
    Strict,

    /// The rule constraining the most predicate values at that key wins.
    /// Only equally specific rules with differing next states clash.
    MostSpecific,
}

/// Options consumed by the table compiler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub duplicates: DuplicatePolicy,
    pub overlap: OverlapPolicy,
}

/// Configuration of one machine.
#[derive(Clone)]
pub struct FsmConfig {
    pub(crate) compile: CompileOptions,
    pub(crate) sink: Arc<dyn DiagnosticSink>,
}

impl FsmConfig {
    pub fn builder() -> FsmConfigBuilder {
        FsmConfigBuilder::new()
    }

    pub fn compile_options(&self) -> CompileOptions {
        self.compile
    }

    pub fn sink(&self) -> Arc<dyn DiagnosticSink> {
        Arc::clone(&self.sink)
    }
}

impl Default for FsmConfig {
    fn default() -> Self {
        FsmConfig {
            compile: CompileOptions::default(),
            sink: Arc::new(TracingSink),
        }
    }
}

impl fmt::Debug for FsmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsmConfig")
            .field("compile", &self.compile)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_warn_on_duplicates_and_clash_strictly() {
        let config = FsmConfig::default();
        assert_eq!(config.compile_options().duplicates, DuplicatePolicy::Warn);
        assert_eq!(config.compile_options().overlap, OverlapPolicy::Strict);
    }
}
