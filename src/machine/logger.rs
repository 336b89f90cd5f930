//! Diagnostics emitted while dispatching events.
//!
//! Messages are built here and handed to a [`DiagnosticSink`]. The default
//! sink forwards to `tracing`. With the `diagnostics` feature disabled,
//! nothing is emitted.

use crate::core::{Event, State};
use crate::location::SourceLocation;
use crate::predicate::PredicateValue;
use crate::rule::RuleSummary;
use crate::table::{BuildErrors, CompileError};
use std::fmt;
use std::sync::Arc;

/// Destination for machine diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn warning(&self, message: &str);
    fn info(&self, message: &str);

    fn debug(&self, _message: &str) {}
}

/// Sink that forwards diagnostics to the `tracing` subscriber.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warning(&self, message: &str) {
        tracing::warn!(target: "predicate_fsm", "{message}");
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "predicate_fsm", "{message}");
    }

    fn debug(&self, message: &str) {
        tracing::debug!(target: "predicate_fsm", "{message}");
    }
}

#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn DiagnosticSink>,
}

impl Logger {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Logger { sink }
    }

    pub fn transition_not_found<E: Event>(&self, event: &E, predicates: &[PredicateValue]) {
        if cfg!(feature = "diagnostics") {
            self.sink.warning(&not_found_message(event, predicates));
        }
    }

    pub fn transition_not_executed<S: State, E: Event>(&self, rule: &RuleSummary<S, E>) {
        if cfg!(feature = "diagnostics") {
            self.sink.info(&not_executed_message(rule));
        }
    }

    pub fn transition_executed<S: State, E: Event>(&self, rule: &RuleSummary<S, E>) {
        if cfg!(feature = "diagnostics") {
            self.sink.info(&executed_message(rule));
        }
    }

    pub fn build_succeeded(&self, entries: usize, location: &SourceLocation) {
        if cfg!(feature = "diagnostics") {
            self.sink
                .debug(&format!("table built at {location} with {entries} entries"));
        }
    }

    pub fn build_failed<S: State, E: Event>(&self, errors: &BuildErrors<S, E>) {
        if cfg!(feature = "diagnostics") {
            self.sink.warning(&errors.to_string());
        }
    }

    pub fn build_warnings<S: State, E: Event>(&self, warnings: &[CompileError<S, E>]) {
        if cfg!(feature = "diagnostics") {
            for warning in warnings {
                self.sink.warning(&warning.to_string());
            }
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

pub(crate) fn not_found_message<E: Event>(event: &E, predicates: &[PredicateValue]) -> String {
    let mut message = format!("no transition found for event '{}'", event.name());
    if !predicates.is_empty() {
        let listed: Vec<String> = predicates.iter().map(ToString::to_string).collect();
        message.push_str(&format!(" matching predicates [{}]", listed.join(", ")));
    }
    message
}

pub(crate) fn not_executed_message<S: State, E: Event>(rule: &RuleSummary<S, E>) -> String {
    format!("conditional transition {rule} not executed")
}

pub(crate) fn executed_message<S: State, E: Event>(rule: &RuleSummary<S, E>) -> String {
    format!("transition {rule} was executed")
}
