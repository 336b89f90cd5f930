//! Match expressions over predicate combinations.
//!
//! A `Match` is a conjunction (`all`) optionally refined by a disjunction of
//! conjunctive branches (`any`). Finalising a match expands it into the set
//! of concrete combinations it covers within a family universe.

use super::combination::{permutations_of_all_cases, Combination};
use super::value::{Family, PredicateValue};
use crate::location::SourceLocation;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Constraint over predicate combinations.
///
/// A combination satisfies the match when it contains every `all` value and,
/// if any branches are present, every value of at least one branch. An empty
/// match is unconditioned and covers every combination.
///
/// # Example
///
/// ```rust
/// use predicate_fsm::predicate::{Combination, Match};
/// use predicate_fsm::predicate_enum;
///
/// predicate_enum! {
///     enum Enforcement { Strong, Weak }
/// }
/// predicate_enum! {
///     enum Reward { Punishing, Rewarding }
/// }
///
/// let m = Match::new()
///     .and(Enforcement::Weak)
///     .or([Reward::Punishing])
///     .or([Reward::Rewarding]);
///
/// let snapshot = Combination::from_values([Enforcement::Weak.into(), Reward::Punishing.into()]);
/// assert!(m.matches(&snapshot));
/// ```
#[derive(Clone, Default)]
pub struct Match {
    all: BTreeSet<PredicateValue>,
    any: Vec<BTreeSet<PredicateValue>>,
    location: Option<SourceLocation>,
}

impl Match {
    /// The unconditioned match.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match requiring every value in `values`.
    pub fn all_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<PredicateValue>,
    {
        Match {
            all: values.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Match requiring at least one of the conjunctive `branches`.
    pub fn any_of<I, B, V>(branches: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: IntoIterator<Item = V>,
        V: Into<PredicateValue>,
    {
        branches
            .into_iter()
            .fold(Self::default(), |m, branch| m.or(branch))
    }

    /// Match requiring at least one of `values`, each as its own branch.
    pub fn one_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<PredicateValue>,
    {
        values
            .into_iter()
            .fold(Self::default(), |m, value| m.or([value]))
    }

    /// Add a required value.
    pub fn and(mut self, value: impl Into<PredicateValue>) -> Self {
        self.all.insert(value.into());
        self
    }

    /// Add an alternative conjunctive branch.
    pub fn or<B, V>(mut self, branch: B) -> Self
    where
        B: IntoIterator<Item = V>,
        V: Into<PredicateValue>,
    {
        self.any
            .push(branch.into_iter().map(Into::into).collect());
        self
    }

    /// Attach the location the match was written at.
    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn all(&self) -> &BTreeSet<PredicateValue> {
        &self.all
    }

    pub fn any(&self) -> &[BTreeSet<PredicateValue>] {
        &self.any
    }

    pub fn location(&self) -> Option<SourceLocation> {
        self.location
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty() && self.any.iter().all(BTreeSet::is_empty)
    }

    /// Every value mentioned anywhere in the match.
    pub fn values(&self) -> BTreeSet<PredicateValue> {
        self.all
            .iter()
            .chain(self.any.iter().flatten())
            .copied()
            .collect()
    }

    /// Families mentioned anywhere in the match.
    pub fn families(&self) -> BTreeSet<Family> {
        self.values().iter().map(|v| v.family()).collect()
    }

    /// Effective conjunctive branches: `all` merged into each `any` branch.
    pub fn branches(&self) -> Vec<BTreeSet<PredicateValue>> {
        if self.any.is_empty() {
            return vec![self.all.clone()];
        }
        self.any
            .iter()
            .map(|branch| self.all.union(branch).copied().collect())
            .collect()
    }

    /// Conjunction of two matches.
    ///
    /// Required values are unioned and alternative branches distributed, so
    /// the result covers exactly the combinations covered by both operands.
    /// The location of `self` is kept, falling back to that of `other`.
    pub fn combined(&self, other: &Match) -> Match {
        let any = match (self.any.is_empty(), other.any.is_empty()) {
            (true, _) => other.any.clone(),
            (_, true) => self.any.clone(),
            (false, false) => self
                .any
                .iter()
                .flat_map(|lhs| {
                    other
                        .any
                        .iter()
                        .map(move |rhs| lhs.union(rhs).copied().collect())
                })
                .collect(),
        };

        Match {
            all: self.all.union(&other.all).copied().collect(),
            any,
            location: self.location.or(other.location),
        }
    }

    /// Whether `combination` satisfies the match.
    pub fn matches(&self, combination: &Combination) -> bool {
        self.branches()
            .iter()
            .any(|branch| combination.is_superset(branch))
    }

    /// Check that no branch requires two values of one family.
    pub fn validate(&self) -> Result<(), MatchError> {
        let mut conflicts = Vec::new();
        for branch in self.branches() {
            let mut seen: BTreeMap<Family, PredicateValue> = BTreeMap::new();
            for value in &branch {
                if let Some(previous) = seen.insert(value.family(), *value) {
                    let pair = (previous, *value);
                    if !conflicts.contains(&pair) {
                        conflicts.push(pair);
                    }
                }
            }
        }

        if conflicts.is_empty() {
            Ok(())
        } else {
            Err(MatchError {
                matching: self.clone(),
                conflicts,
            })
        }
    }

    /// Expand the match into every combination over `universe` it covers.
    pub fn finalised(&self, universe: &[Family]) -> Result<FinalisedMatch, MatchError> {
        self.validate()?;

        let mut combinations: BTreeMap<Combination, usize> = BTreeMap::new();
        for branch in self.branches() {
            let rank = branch.len();
            let partial: Vec<PredicateValue> = branch.into_iter().collect();
            for combination in permutations_of_all_cases(&partial, universe) {
                let entry = combinations.entry(combination).or_insert(rank);
                *entry = (*entry).max(rank);
            }
        }

        Ok(FinalisedMatch { combinations })
    }

    fn normalised(&self) -> (&BTreeSet<PredicateValue>, BTreeSet<&BTreeSet<PredicateValue>>) {
        (&self.all, self.any.iter().collect())
    }
}

impl PartialEq for Match {
    fn eq(&self, other: &Self) -> bool {
        self.normalised() == other.normalised()
    }
}

impl Eq for Match {}

impl Hash for Match {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalised().hash(state);
    }
}

impl fmt::Debug for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, values: &BTreeSet<PredicateValue>) -> fmt::Result {
            let joined: Vec<String> = values.iter().map(ToString::to_string).collect();
            write!(f, "[{}]", joined.join(", "))
        }

        if self.is_empty() {
            return f.write_str("[]");
        }
        if !self.all.is_empty() {
            f.write_str("all: ")?;
            list(f, &self.all)?;
        }
        if !self.any.is_empty() {
            if !self.all.is_empty() {
                f.write_str(", ")?;
            }
            f.write_str("any: ")?;
            for (i, branch) in self.any.iter().enumerate() {
                if i > 0 {
                    f.write_str(" | ")?;
                }
                list(f, branch)?;
            }
        }
        Ok(())
    }
}

/// The concrete combinations covered by a match within a family universe.
///
/// Each combination carries the rank of the most specific branch covering
/// it, which is the number of values that branch constrains.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FinalisedMatch {
    combinations: BTreeMap<Combination, usize>,
}

impl FinalisedMatch {
    pub fn contains(&self, combination: &Combination) -> bool {
        self.combinations.contains_key(combination)
    }

    pub fn rank_of(&self, combination: &Combination) -> Option<usize> {
        self.combinations.get(combination).copied()
    }

    pub fn combinations(&self) -> impl Iterator<Item = &Combination> {
        self.combinations.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Combination, usize)> {
        self.combinations.iter().map(|(c, rank)| (c, *rank))
    }

    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }
}

/// A match that requires two values of one family at the same time.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error(
    "matching({matching}){} can never be satisfied: {}",
    at_suffix(.matching),
    describe_conflicts(.conflicts)
)]
pub struct MatchError {
    pub matching: Match,
    pub conflicts: Vec<(PredicateValue, PredicateValue)>,
}

impl MatchError {
    pub fn location(&self) -> Option<SourceLocation> {
        self.matching.location()
    }
}

fn at_suffix(matching: &Match) -> String {
    matching
        .location()
        .map(|l| format!(" at {l}"))
        .unwrap_or_default()
}

fn describe_conflicts(conflicts: &[(PredicateValue, PredicateValue)]) -> String {
    conflicts
        .iter()
        .map(|(a, b)| format!("{a}, {b}"))
        .collect::<Vec<_>>()
        .join("; ")
}
