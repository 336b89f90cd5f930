//! Rule representation.
//!
//! A [`Rule`] is the flat record the table compiler consumes. A
//! [`RuleTemplate`] is the same record before a given state has been
//! assigned, as produced by the authoring blocks.

mod row;
mod template;

pub use row::{Rule, RuleSummary};
pub use template::RuleTemplate;
pub use crate::location::SourceLocation;
