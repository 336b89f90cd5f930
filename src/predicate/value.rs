//! Predicate families and their erased values.

use std::any::TypeId;
use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};

/// A finite, enumerable condition axis.
///
/// Every variant of an implementing type is one value of the family. The
/// family's full value set is fixed by `all_cases`, in declaration order.
///
/// Usually implemented through [`predicate_enum!`](crate::predicate_enum).
///
/// # Example
///
/// ```rust
/// use predicate_fsm::predicate::{Predicate, PredicateValue};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Enforcement {
///     Strong,
///     Weak,
/// }
///
/// impl Predicate for Enforcement {
///     const FAMILY: &'static str = "Enforcement";
///
///     fn all_cases() -> &'static [Self] {
///         &[Self::Strong, Self::Weak]
///     }
///
///     fn label(&self) -> &'static str {
///         match self {
///             Self::Strong => "strong",
///             Self::Weak => "weak",
///         }
///     }
/// }
///
/// let value: PredicateValue = Enforcement::Weak.into();
/// assert_eq!(value.to_string(), "Enforcement.weak");
/// assert_eq!(value.ordinal(), 1);
/// ```
pub trait Predicate: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Display name of the family.
    const FAMILY: &'static str;

    /// Every value of the family, in declaration order.
    fn all_cases() -> &'static [Self];

    /// Display label of this value.
    fn label(&self) -> &'static str;

    /// Erase the value for storage alongside values of other families.
    fn erased(self) -> PredicateValue {
        PredicateValue::of(self)
    }
}

/// Handle on a predicate family, independent of its concrete type.
#[derive(Clone, Copy)]
pub struct Family {
    id: TypeId,
    name: &'static str,
    cases: fn() -> Vec<PredicateValue>,
}

fn cases_of<P: Predicate>() -> Vec<PredicateValue> {
    P::all_cases().iter().map(|p| PredicateValue::of(*p)).collect()
}

impl Family {
    pub fn of<P: Predicate>() -> Self {
        Family {
            id: TypeId::of::<P>(),
            name: P::FAMILY,
            cases: cases_of::<P>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Every value of the family, in declaration order.
    pub fn cases(&self) -> Vec<PredicateValue> {
        (self.cases)()
    }

    pub fn len(&self) -> usize {
        self.cases().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PartialEq for Family {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Family {}

impl Hash for Family {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Family {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Family {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(other.name)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl Debug for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// One value of a predicate family, erased to a common type.
///
/// Values compare by family and declaration ordinal, so the ordering of a set
/// of values is stable across runs.
#[derive(Clone, Copy)]
pub struct PredicateValue {
    family: Family,
    ordinal: usize,
    label: &'static str,
}

impl PredicateValue {
    pub fn of<P: Predicate>(value: P) -> Self {
        let cases = P::all_cases();
        // Values missing from `all_cases` get an out-of-range ordinal and are
        // rejected when a table is compiled.
        let ordinal = cases
            .iter()
            .position(|case| *case == value)
            .unwrap_or(cases.len());
        PredicateValue {
            family: Family::of::<P>(),
            ordinal,
            label: value.label(),
        }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    /// Position of the value in its family's declaration order.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Whether the value appears in its own family's case list.
    pub fn is_listed(&self) -> bool {
        self.ordinal < self.family.len()
    }
}

impl<P: Predicate> From<P> for PredicateValue {
    fn from(value: P) -> Self {
        PredicateValue::of(value)
    }
}

impl PartialEq for PredicateValue {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family && self.ordinal == other.ordinal
    }
}

impl Eq for PredicateValue {}

impl Hash for PredicateValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.family.hash(state);
        self.ordinal.hash(state);
    }
}

impl PartialOrd for PredicateValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PredicateValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.family
            .cmp(&other.family)
            .then_with(|| self.ordinal.cmp(&other.ordinal))
    }
}

impl Debug for PredicateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.family.name, self.label)
    }
}

impl fmt::Display for PredicateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.family.name, self.label)
    }
}
