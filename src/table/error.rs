//! Errors reported while compiling a transition table.
//!
//! Every check of one build runs to completion; all failures are returned
//! together as [`BuildErrors`].

use crate::core::{Event, State};
use crate::location::SourceLocation;
use crate::predicate::{Combination, MatchError, PredicateValue};
use crate::rule::RuleSummary;
use std::fmt;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// An authoring block that requires at least one element contained none.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("empty '{caller}' block at {location}")]
pub struct EmptyBuilderError {
    /// Name of the block, e.g. `"define"`, `"when"`, `"then"`, `"matching"`.
    pub caller: &'static str,
    pub location: SourceLocation,
}

/// Rules with the same dispatch key and the same next state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("duplicate transitions:{}", describe_groups(.duplicates))]
pub struct DuplicatesError<S: State, E: Event> {
    /// One group per set of interchangeable rules.
    pub duplicates: Vec<Vec<RuleSummary<S, E>>>,
}

/// Rules with the same state, match and event leading to different states.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error(
    "the same state, match and event cannot lead to more than one next state:{}",
    describe_groups(.clashes)
)]
pub struct ClashError<S: State, E: Event> {
    /// One group per declared key; one rule per distinct next state.
    pub clashes: Vec<Vec<RuleSummary<S, E>>>,
}

/// Rules with different matches that claim one concrete predicate
/// combination while leading to different states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplicitClash<S, E> {
    pub state: S,
    pub event: E,
    pub predicates: Combination,
    pub rules: Vec<RuleSummary<S, E>>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("overlapping matches lead to different next states:{}", describe_implicit(.clashes))]
pub struct ImplicitClashesError<S: State, E: Event> {
    pub clashes: Vec<ImplicitClash<S, E>>,
}

/// One failure found while compiling a table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompileError<S: State, E: Event> {
    #[error(transparent)]
    EmptyBuilder(#[from] EmptyBuilderError),

    #[error("the table contains no transitions")]
    EmptyTable,

    #[error("predicate {value} at {location} is missing from its family's case list")]
    UnlistedPredicate {
        value: PredicateValue,
        location: SourceLocation,
    },

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("overriding transition {0} has no inherited transition to override")]
    NothingToOverride(RuleSummary<S, E>),

    #[error(transparent)]
    Duplicates(DuplicatesError<S, E>),

    #[error(transparent)]
    Clash(ClashError<S, E>),

    #[error(transparent)]
    ImplicitClashes(ImplicitClashesError<S, E>),
}

/// Every error found by one build, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildErrors<S: State, E: Event> {
    errors: NonEmptyVec<CompileError<S, E>>,
}

impl<S: State, E: Event> BuildErrors<S, E> {
    pub(crate) fn new(errors: NonEmptyVec<CompileError<S, E>>) -> Self {
        BuildErrors { errors }
    }

    pub fn errors(&self) -> &NonEmptyVec<CompileError<S, E>> {
        &self.errors
    }

    /// The first error found.
    pub fn first(&self) -> &CompileError<S, E> {
        self.errors.head()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompileError<S, E>> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always `false`; a build reports at least one error.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_vec(self) -> Vec<CompileError<S, E>> {
        self.errors.into_vec()
    }

    pub fn empty_builders(&self) -> Vec<&EmptyBuilderError> {
        self.iter()
            .filter_map(|e| match e {
                CompileError::EmptyBuilder(inner) => Some(inner),
                _ => None,
            })
            .collect()
    }

    pub fn match_errors(&self) -> Vec<&MatchError> {
        self.iter()
            .filter_map(|e| match e {
                CompileError::Match(inner) => Some(inner),
                _ => None,
            })
            .collect()
    }

    pub fn duplicates(&self) -> Option<&DuplicatesError<S, E>> {
        self.iter().find_map(|e| match e {
            CompileError::Duplicates(inner) => Some(inner),
            _ => None,
        })
    }

    pub fn clashes(&self) -> Option<&ClashError<S, E>> {
        self.iter().find_map(|e| match e {
            CompileError::Clash(inner) => Some(inner),
            _ => None,
        })
    }

    pub fn implicit_clashes(&self) -> Option<&ImplicitClashesError<S, E>> {
        self.iter().find_map(|e| match e {
            CompileError::ImplicitClashes(inner) => Some(inner),
            _ => None,
        })
    }
}

impl<S: State, E: Event> fmt::Display for BuildErrors<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table build failed with {} error(s)", self.errors.len())?;
        for error in self.errors.iter() {
            write!(f, "\n- {error}")?;
        }
        Ok(())
    }
}

impl<S: State, E: Event> std::error::Error for BuildErrors<S, E> {}

impl<S: State, E: Event> IntoIterator for BuildErrors<S, E> {
    type Item = CompileError<S, E>;
    type IntoIter = <NonEmptyVec<CompileError<S, E>> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

fn describe_groups<S: fmt::Debug, E: fmt::Debug>(groups: &[Vec<RuleSummary<S, E>>]) -> String {
    groups
        .iter()
        .map(|group| {
            group
                .iter()
                .map(|rule| format!("\n    {rule}"))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe_implicit<S: fmt::Debug, E: fmt::Debug>(clashes: &[ImplicitClash<S, E>]) -> String {
    clashes
        .iter()
        .map(|clash| {
            let rules: String = clash
                .rules
                .iter()
                .map(|rule| format!("\n    {rule}"))
                .collect();
            format!(
                "\n  {:?} | {} | {:?}:{}",
                clash.state, clash.predicates, clash.event, rules
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::Match;

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum Gate {
        Shut,
        Open,
    }

    impl State for Gate {
        fn name(&self) -> &str {
            match self {
                Self::Shut => "Shut",
                Self::Open => "Open",
            }
        }
    }

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum Knock {
        Once,
    }

    impl Event for Knock {
        fn name(&self) -> &str {
            "Once"
        }
    }

    fn summary(next: Gate, line: u32) -> RuleSummary<Gate, Knock> {
        RuleSummary {
            state: Gate::Shut,
            event: Knock::Once,
            next,
            matching: Match::new(),
            location: SourceLocation::new("gate.rs", line),
            conditional: false,
        }
    }

    #[test]
    fn empty_builder_names_caller_and_location() {
        let error = EmptyBuilderError {
            caller: "when",
            location: SourceLocation::new("file", 3),
        };
        assert_eq!(error.to_string(), "empty 'when' block at file:3");
    }

    #[test]
    fn clash_error_lists_every_rule() {
        let error = ClashError {
            clashes: vec![vec![summary(Gate::Open, 1), summary(Gate::Shut, 2)]],
        };
        let text = error.to_string();

        assert!(text.contains("then(Open) } at gate.rs:1"));
        assert!(text.contains("then(Shut) } at gate.rs:2"));
    }

    #[test]
    fn build_errors_expose_typed_views() {
        let errors: BuildErrors<Gate, Knock> = BuildErrors::new(NonEmptyVec::new(
            CompileError::EmptyBuilder(EmptyBuilderError {
                caller: "define",
                location: SourceLocation::new("f", 1),
            }),
            vec![CompileError::Duplicates(DuplicatesError {
                duplicates: vec![vec![summary(Gate::Open, 1), summary(Gate::Open, 2)]],
            })],
        ));

        assert_eq!(errors.len(), 2);
        assert!(!errors.is_empty());
        assert!(matches!(errors.first(), CompileError::EmptyBuilder(_)));
        assert_eq!(errors.empty_builders().len(), 1);
        assert!(errors.duplicates().is_some());
        assert!(errors.clashes().is_none());
        assert!(errors.to_string().starts_with("table build failed with 2 error(s)"));
    }
}
