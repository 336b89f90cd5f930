//! Builder API for machine configuration.

use super::{CompileOptions, DuplicatePolicy, FsmConfig, OverlapPolicy};
use crate::machine::{DiagnosticSink, TracingSink};
use std::sync::Arc;

/// Builder for creating a machine configuration
pub struct FsmConfigBuilder {
    duplicates: DuplicatePolicy,
    overlap: OverlapPolicy,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl FsmConfigBuilder {
    pub fn new() -> Self {
        Self {
            duplicates: DuplicatePolicy::default(),
            overlap: OverlapPolicy::default(),
            sink: None,
        }
    }

    /// Set how duplicate rules are treated
    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Set how overlapping matches are resolved
    pub fn overlap(mut self, policy: OverlapPolicy) -> Self {
        self.overlap = policy;
        self
    }

    /// Send diagnostics to a custom sink
    pub fn sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the configuration
    pub fn build(self) -> FsmConfig {
        FsmConfig {
            compile: CompileOptions {
                duplicates: self.duplicates,
                overlap: self.overlap,
            },
            sink: self.sink.unwrap_or_else(|| Arc::new(TracingSink)),
        }
    }
}

impl Default for FsmConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
