//! Source provenance attached to authored rules.

use std::fmt;
use std::panic::Location;

/// Where a rule, block or build call was written.
///
/// Carried only for diagnostics. It never takes part in rule equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: &'static str,
    pub line: u32,
}

impl SourceLocation {
    pub const fn new(file: &'static str, line: u32) -> Self {
        SourceLocation { file, line }
    }

    /// Location of the caller of the enclosing `#[track_caller]` function.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        SourceLocation {
            file: location.file(),
            line: location.line(),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Capture the current file and line as a [`SourceLocation`].
///
/// ```
/// use predicate_fsm::location;
///
/// let here = location!();
/// assert!(here.file.ends_with(".rs"));
/// ```
#[macro_export]
macro_rules! location {
    () => {
        $crate::SourceLocation::new(file!(), line!())
    };
}
