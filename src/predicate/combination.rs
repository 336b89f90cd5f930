//! Predicate combinations and their cartesian expansion.

use super::value::{Family, PredicateValue};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A set of predicate values holding at most one value per family.
///
/// Equality and hashing are structural. Iteration order is the value ordering
/// (family, then declaration ordinal).
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Combination(BTreeSet<PredicateValue>);

impl Combination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = PredicateValue>,
    {
        Combination(values.into_iter().collect())
    }

    pub fn insert(&mut self, value: PredicateValue) -> bool {
        self.0.insert(value)
    }

    pub fn contains(&self, value: &PredicateValue) -> bool {
        self.0.contains(value)
    }

    pub fn is_superset(&self, values: &BTreeSet<PredicateValue>) -> bool {
        self.0.is_superset(values)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PredicateValue> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Families represented in the combination.
    pub fn families(&self) -> BTreeSet<Family> {
        self.0.iter().map(|v| v.family()).collect()
    }

    /// Whether no family contributes more than one value.
    pub fn is_consistent(&self) -> bool {
        self.families().len() == self.0.len()
    }

    /// Value held for `family`, if any.
    pub fn value_of(&self, family: &Family) -> Option<&PredicateValue> {
        self.0.iter().find(|v| v.family() == *family)
    }
}

impl FromIterator<PredicateValue> for Combination {
    fn from_iter<I: IntoIterator<Item = PredicateValue>>(iter: I) -> Self {
        Combination::from_values(iter)
    }
}

impl fmt::Debug for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}

/// Full cartesian product of `families`, one value per family.
///
/// Duplicate families are collapsed. With no families the result is a single
/// empty combination; if any family has no values the result is empty.
pub fn all_combinations(families: &[Family]) -> BTreeSet<Combination> {
    let families: BTreeSet<Family> = families.iter().copied().collect();
    let axes: Vec<Vec<PredicateValue>> = families.iter().map(Family::cases).collect();
    product(&axes)
}

/// Every combination over `universe` that extends `partial`.
///
/// Families fixed by `partial` keep their value; every other family of
/// `universe` ranges over all of its cases. Families named only by `partial`
/// are kept as fixed axes. A partial assignment holding two values of one
/// family cannot be extended and yields the empty set.
pub fn permutations_of_all_cases(
    partial: &[PredicateValue],
    universe: &[Family],
) -> BTreeSet<Combination> {
    let mut fixed: BTreeMap<Family, PredicateValue> = BTreeMap::new();
    for value in partial {
        match fixed.get(&value.family()) {
            Some(existing) if existing != value => return BTreeSet::new(),
            _ => {
                fixed.insert(value.family(), *value);
            }
        }
    }

    let mut families: BTreeSet<Family> = universe.iter().copied().collect();
    families.extend(fixed.keys().copied());

    let axes: Vec<Vec<PredicateValue>> = families
        .iter()
        .map(|family| match fixed.get(family) {
            Some(value) => vec![*value],
            None => family.cases(),
        })
        .collect();
    product(&axes)
}

fn product(axes: &[Vec<PredicateValue>]) -> BTreeSet<Combination> {
    if axes.iter().any(Vec::is_empty) {
        return BTreeSet::new();
    }

    let mut partials: Vec<Vec<PredicateValue>> = vec![Vec::new()];
    for axis in axes {
        partials = partials
            .into_iter()
            .flat_map(|prefix| {
                axis.iter().map(move |value| {
                    let mut next = prefix.clone();
                    next.push(*value);
                    next
                })
            })
            .collect();
    }

    partials.into_iter().map(Combination::from_values).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::Predicate;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum P {
        A,
        B,
    }

    impl Predicate for P {
        const FAMILY: &'static str = "P";
        fn all_cases() -> &'static [Self] {
            &[Self::A, Self::B]
        }
        fn label(&self) -> &'static str {
            match self {
                Self::A => "a",
                Self::B => "b",
            }
        }
    }

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Q {
        A,
        B,
    }

    impl Predicate for Q {
        const FAMILY: &'static str = "Q";
        fn all_cases() -> &'static [Self] {
            &[Self::A, Self::B]
        }
        fn label(&self) -> &'static str {
            match self {
                Self::A => "a",
                Self::B => "b",
            }
        }
    }

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum R {
        A,
        B,
        C,
    }

    impl Predicate for R {
        const FAMILY: &'static str = "R";
        fn all_cases() -> &'static [Self] {
            &[Self::A, Self::B, Self::C]
        }
        fn label(&self) -> &'static str {
            match self {
                Self::A => "a",
                Self::B => "b",
                Self::C => "c",
            }
        }
    }

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Void {}

    impl Predicate for Void {
        const FAMILY: &'static str = "Void";
        fn all_cases() -> &'static [Self] {
            &[]
        }
        fn label(&self) -> &'static str {
            match *self {}
        }
    }

    fn combo(values: &[PredicateValue]) -> Combination {
        values.iter().copied().collect()
    }

    #[test]
    fn no_families_yield_single_empty_combination() {
        let all = all_combinations(&[]);
        assert_eq!(all.len(), 1);
        assert!(all.iter().all(Combination::is_empty));
    }

    #[test]
    fn product_size_matches_family_sizes() {
        let all = all_combinations(&[Family::of::<P>(), Family::of::<Q>(), Family::of::<R>()]);
        assert_eq!(all.len(), 2 * 2 * 3);
        assert!(all.iter().all(|c| c.len() == 3 && c.is_consistent()));
    }

    #[test]
    fn repeated_families_are_collapsed() {
        let all = all_combinations(&[Family::of::<P>(), Family::of::<P>()]);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn empty_family_short_circuits() {
        let all = all_combinations(&[Family::of::<P>(), Family::of::<Void>()]);
        assert!(all.is_empty());
    }

    #[test]
    fn partial_assignment_extends_over_free_families() {
        let universe = [Family::of::<P>(), Family::of::<Q>(), Family::of::<R>()];
        let expanded = permutations_of_all_cases(&[P::A.erased()], &universe);

        assert_eq!(expanded.len(), 6);
        assert!(expanded.iter().all(|c| c.contains(&P::A.erased())));
        assert!(expanded.contains(&combo(&[P::A.erased(), Q::B.erased(), R::C.erased()])));
    }

    #[test]
    fn partial_outside_universe_is_kept_fixed() {
        let expanded = permutations_of_all_cases(&[P::B.erased()], &[Family::of::<Q>()]);
        assert_eq!(expanded.len(), 2);
        assert!(expanded.iter().all(|c| c.contains(&P::B.erased())));
    }

    #[test]
    fn contradictory_partial_cannot_be_extended() {
        let universe = [Family::of::<P>(), Family::of::<Q>()];
        let expanded = permutations_of_all_cases(&[P::A.erased(), P::B.erased()], &universe);
        assert!(expanded.is_empty());
    }

    #[test]
    fn repeated_partial_value_is_idempotent() {
        let universe = [Family::of::<P>(), Family::of::<Q>()];
        let once = permutations_of_all_cases(&[P::A.erased()], &universe);
        let twice = permutations_of_all_cases(&[P::A.erased(), P::A.erased()], &universe);
        assert_eq!(once, twice);
    }

    #[test]
    fn combination_reports_consistency() {
        assert!(combo(&[P::A.erased(), Q::A.erased()]).is_consistent());
        assert!(!combo(&[P::A.erased(), P::B.erased()]).is_consistent());
    }

    #[test]
    fn combination_displays_in_order() {
        let c = combo(&[Q::B.erased(), P::A.erased()]);
        assert_eq!(c.to_string(), "[P.a, Q.b]");
        assert_eq!(c.value_of(&Family::of::<Q>()), Some(&Q::B.erased()));
    }
}
