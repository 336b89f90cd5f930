//! Predicate algebra.
//!
//! Predicates are finite-valued condition axes ("families"). This module
//! erases them to a common value type, enumerates combinations across
//! families, and expands `Match` expressions into the concrete combinations
//! they cover. Nothing here depends on states, events or rules.

mod combination;
mod matching;
mod value;

pub use combination::{all_combinations, permutations_of_all_cases, Combination};
pub use matching::{FinalisedMatch, Match, MatchError};
pub use value::{Family, Predicate, PredicateValue};
