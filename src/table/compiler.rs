//! Compilation of a [`Definition`] into a [`CompiledTable`].
//!
//! Every check runs on every build and failures are accumulated with
//! `Validation`, so one build reports all of its problems at once.
//!
//! The steps, in order:
//!
//! 1. inherited rules are replaced by overriding rules with the same
//!    declared key;
//! 2. the family universe is collected from every match;
//! 3. each match is checked and expanded into concrete combinations;
//! 4. rules sharing state, declared match and event are grouped: same next
//!    state is a duplicate, different next states a clash;
//! 5. surviving rules claim dispatch keys, and keys claimed by several rules
//!    are resolved under the configured [`OverlapPolicy`].

use super::compiled::{CompiledTable, DispatchKey};
use super::definition::Definition;
use super::error::{
    BuildErrors, ClashError, CompileError, DuplicatesError, ImplicitClash, ImplicitClashesError,
};
use crate::config::{CompileOptions, DuplicatePolicy, OverlapPolicy};
use crate::core::{Event, State};
use crate::predicate::{Family, FinalisedMatch, Match, MatchError};
use crate::rule::{Rule, RuleSummary};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check<S, E> = Validation<(), NonEmptyVec<CompileError<S, E>>>;

/// Compile a definition, returning every error found.
pub fn compile<S: State, E: Event, Env>(
    definition: Definition<S, E, Env>,
    options: CompileOptions,
) -> Result<CompiledTable<S, E, Env>, BuildErrors<S, E>> {
    let Definition {
        rules,
        entry_actions,
        exit_actions,
        errors,
    } = definition;

    let mut checks: Vec<Check<S, E>> = errors.into_iter().map(|e| Validation::fail(e)).collect();
    if rules.is_empty() && checks.is_empty() {
        checks.push(Validation::fail(CompileError::EmptyTable));
    }

    let (rules, override_errors) = apply_overrides(rules);
    checks.extend(override_errors.into_iter().map(|e| Validation::fail(e)));
    checks.extend(unlisted_values(&rules).into_iter().map(|e| Validation::fail(e)));

    let universe = universe_of(&rules);
    let (finalised, match_errors) = finalise_all(&rules, &universe);
    checks.extend(
        match_errors
            .into_iter()
            .map(|e| Validation::fail(CompileError::Match(e))),
    );

    let explicit = explicit_conflicts(&rules);
    let resolution = resolve_overlaps(&rules, &finalised, &explicit.kept, options.overlap);

    let mut warnings = Vec::new();
    let duplicates: Vec<_> = explicit
        .duplicates
        .into_iter()
        .chain(resolution.duplicates)
        .collect();
    if !duplicates.is_empty() {
        let error = CompileError::Duplicates(DuplicatesError { duplicates });
        match options.duplicates {
            DuplicatePolicy::Warn => warnings.push(error),
            DuplicatePolicy::Reject => checks.push(Validation::fail(error)),
        }
    }

    if !explicit.clashes.is_empty() {
        checks.push(Validation::fail(CompileError::Clash(ClashError {
            clashes: explicit.clashes,
        })));
    }

    if !resolution.clashes.is_empty() {
        checks.push(Validation::fail(CompileError::ImplicitClashes(
            ImplicitClashesError {
                clashes: resolution.clashes,
            },
        )));
    }

    match Validation::all_vec(checks) {
        Validation::Success(_) => {
            let rules: Vec<Arc<Rule<S, E, Env>>> = rules.into_iter().map(Arc::new).collect();
            let entries = resolution
                .winners
                .into_iter()
                .map(|(key, index)| (key, Arc::clone(&rules[index])))
                .collect();
            Ok(CompiledTable::new(
                entries,
                universe,
                entry_actions,
                exit_actions,
                warnings,
            ))
        }
        Validation::Failure(errors) => Err(BuildErrors::new(errors)),
    }
}

/// Drop inherited rules replaced by a later overriding rule from another
/// super-state group. An overriding rule that replaces nothing is an error.
fn apply_overrides<S: State, E: Event, Env>(
    rules: Vec<Rule<S, E, Env>>,
) -> (Vec<Rule<S, E, Env>>, Vec<CompileError<S, E>>) {
    let mut replaced = vec![false; rules.len()];
    let mut errors = Vec::new();

    for (index, rule) in rules.iter().enumerate().filter(|(_, r)| r.overriding) {
        let mut found = false;
        for (earlier, candidate) in rules[..index].iter().enumerate() {
            if !candidate.overriding
                && candidate.group.is_some()
                && candidate.group != rule.group
                && candidate.same_declared_key(rule)
            {
                replaced[earlier] = true;
                found = true;
            }
        }
        if !found {
            errors.push(CompileError::NothingToOverride(rule.summary()));
        }
    }

    let kept = rules
        .into_iter()
        .zip(replaced)
        .filter_map(|(rule, gone)| (!gone).then_some(rule))
        .collect();
    (kept, errors)
}

fn unlisted_values<S: State, E: Event, Env>(rules: &[Rule<S, E, Env>]) -> Vec<CompileError<S, E>> {
    let mut seen = HashSet::new();
    let mut errors = Vec::new();
    for rule in rules {
        let location = rule.matching.location().unwrap_or(rule.location);
        for value in rule.matching.values() {
            if !value.is_listed() && seen.insert((value, location)) {
                errors.push(CompileError::UnlistedPredicate { value, location });
            }
        }
    }
    errors
}

/// Every family mentioned by any match, in name order.
/// Families in the order rules first mention them. Families first named by
/// one match are ordered by name.
fn universe_of<S: State, E: Event, Env>(rules: &[Rule<S, E, Env>]) -> Vec<Family> {
    let mut universe: Vec<Family> = Vec::new();
    for family in rules.iter().flat_map(|rule| rule.matching.families()) {
        if !universe.contains(&family) {
            universe.push(family);
        }
    }
    universe
}

/// Expand every rule's match. Invalid matches yield `None` and one error
/// per distinct match and location.
fn finalise_all<S: State, E: Event, Env>(
    rules: &[Rule<S, E, Env>],
    universe: &[Family],
) -> (Vec<Option<FinalisedMatch>>, Vec<MatchError>) {
    let mut cache: HashMap<&Match, Result<FinalisedMatch, MatchError>> = HashMap::new();
    let mut finalised = Vec::with_capacity(rules.len());
    let mut errors: Vec<MatchError> = Vec::new();

    for rule in rules {
        let outcome = cache
            .entry(&rule.matching)
            .or_insert_with(|| rule.matching.finalised(universe));
        match outcome {
            Ok(expanded) => finalised.push(Some(expanded.clone())),
            Err(error) => {
                let mut error = error.clone();
                error.matching = match rule.matching.location() {
                    Some(_) => rule.matching.clone(),
                    None => rule.matching.clone().at(rule.location),
                };
                if !errors
                    .iter()
                    .any(|e| e == &error && e.location() == error.location())
                {
                    errors.push(error);
                }
                finalised.push(None);
            }
        }
    }

    (finalised, errors)
}

struct Explicit<S, E> {
    /// One representative per declared key, ascending.
    kept: Vec<usize>,
    duplicates: Vec<Vec<RuleSummary<S, E>>>,
    clashes: Vec<Vec<RuleSummary<S, E>>>,
}

/// Group rules by declared key, then bucket each group by next state.
fn explicit_conflicts<S: State, E: Event, Env>(rules: &[Rule<S, E, Env>]) -> Explicit<S, E> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut positions: HashMap<(&S, &E, &Match), usize> = HashMap::new();
    for (index, rule) in rules.iter().enumerate() {
        let key = (&rule.state, &rule.event, &rule.matching);
        match positions.get(&key) {
            Some(&group) => groups[group].push(index),
            None => {
                positions.insert(key, groups.len());
                groups.push(vec![index]);
            }
        }
    }

    let mut report = Explicit {
        kept: Vec::new(),
        duplicates: Vec::new(),
        clashes: Vec::new(),
    };

    for group in groups {
        let mut buckets: Vec<Vec<usize>> = Vec::new();
        for index in group {
            match buckets
                .iter_mut()
                .find(|bucket| rules[bucket[0]].next == rules[index].next)
            {
                Some(bucket) => bucket.push(index),
                None => buckets.push(vec![index]),
            }
        }

        report.duplicates.extend(
            buckets
                .iter()
                .filter(|bucket| bucket.len() > 1)
                .map(|bucket| summaries(rules, bucket)),
        );

        if let [only] = buckets.as_slice() {
            report.kept.push(only[0]);
        } else {
            report
                .clashes
                .push(buckets.iter().map(|bucket| rules[bucket[0]].summary()).collect());
        }
    }

    report.kept.sort_unstable();
    report
}

struct Resolution<S, E> {
    winners: Vec<(DispatchKey<S, E>, usize)>,
    duplicates: Vec<Vec<RuleSummary<S, E>>>,
    clashes: Vec<ImplicitClash<S, E>>,
}

/// Assign each dispatch key to one rule.
fn resolve_overlaps<S: State, E: Event, Env>(
    rules: &[Rule<S, E, Env>],
    finalised: &[Option<FinalisedMatch>],
    kept: &[usize],
    overlap: OverlapPolicy,
) -> Resolution<S, E> {
    let mut order: Vec<DispatchKey<S, E>> = Vec::new();
    let mut claims: HashMap<DispatchKey<S, E>, Vec<(usize, usize)>> = HashMap::new();

    for &index in kept {
        let Some(expanded) = &finalised[index] else {
            continue;
        };
        let rule = &rules[index];
        for (combination, rank) in expanded.iter() {
            let key = DispatchKey {
                state: rule.state.clone(),
                event: rule.event.clone(),
                predicates: combination.clone(),
            };
            match claims.get_mut(&key) {
                Some(claimants) => claimants.push((index, rank)),
                None => {
                    order.push(key.clone());
                    claims.insert(key, vec![(index, rank)]);
                }
            }
        }
    }

    let mut resolution = Resolution {
        winners: Vec::with_capacity(order.len()),
        duplicates: Vec::new(),
        clashes: Vec::new(),
    };
    let mut reported: HashSet<Vec<usize>> = HashSet::new();

    for key in order {
        let Some(claimants) = claims.remove(&key) else {
            continue;
        };
        let contenders: Vec<usize> = match overlap {
            OverlapPolicy::Strict => claimants.iter().map(|&(index, _)| index).collect(),
            OverlapPolicy::MostSpecific => {
                let top = claimants.iter().map(|&(_, rank)| rank).max().unwrap_or(0);
                claimants
                    .iter()
                    .filter(|&&(_, rank)| rank == top)
                    .map(|&(index, _)| index)
                    .collect()
            }
        };
        let Some(&first) = contenders.first() else {
            continue;
        };

        if contenders.iter().all(|&i| rules[i].next == rules[first].next) {
            if contenders.len() > 1 && reported.insert(contenders.clone()) {
                resolution.duplicates.push(summaries(rules, &contenders));
            }
            resolution.winners.push((key, first));
        } else {
            resolution.clashes.push(ImplicitClash {
                state: key.state,
                event: key.event,
                predicates: key.predicates,
                rules: summaries(rules, &contenders),
            });
        }
    }

    resolution
}

fn summaries<S: State, E: Event, Env>(
    rules: &[Rule<S, E, Env>],
    indices: &[usize],
) -> Vec<RuleSummary<S, E>> {
    indices.iter().map(|&i| rules[i].summary()).collect()
}
