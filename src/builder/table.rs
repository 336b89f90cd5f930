//! Builder collecting every definition of one table.

use super::define::Define;
use crate::core::{Event, State};
use crate::rule::Rule;
use crate::table::Definition;

/// Builder for a whole transition table.
///
/// Definitions are kept in the order they are added. Rules may also be
/// written directly as a table literal with [`TableBuilder::row`].
pub struct TableBuilder<S: State, E: Event, Env = ()> {
    definition: Definition<S, E, Env>,
}

impl<S: State, E: Event, Env> TableBuilder<S, E, Env> {
    pub fn new() -> Self {
        Self {
            definition: Definition::new(),
        }
    }

    /// Add the rules and actions of one or more given states.
    pub fn define(mut self, define: Define<S, E, Env>) -> Self {
        self.definition.extend(define.into_definition());
        self
    }

    /// Add several definitions at once.
    pub fn defines(self, defines: impl IntoIterator<Item = Define<S, E, Env>>) -> Self {
        defines.into_iter().fold(self, TableBuilder::define)
    }

    /// Add a fully written rule.
    pub fn row(mut self, rule: Rule<S, E, Env>) -> Self {
        self.definition.push_rule(rule);
        self
    }

    /// Add several fully written rules.
    pub fn rows(self, rules: impl IntoIterator<Item = Rule<S, E, Env>>) -> Self {
        rules.into_iter().fold(self, TableBuilder::row)
    }

    /// Finish building.
    pub fn build(self) -> Definition<S, E, Env> {
        self.definition
    }
}

impl<S: State, E: Event, Env> Default for TableBuilder<S, E, Env> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event, Env> From<TableBuilder<S, E, Env>> for Definition<S, E, Env> {
    fn from(builder: TableBuilder<S, E, Env>) -> Self {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Transition;
    use crate::config::CompileOptions;
    use crate::table::compile;

    crate::state_enum! {
        enum Light {
            Red,
            Green,
        }
    }

    crate::event_enum! {
        enum Tick {
            Timer,
        }
    }

    #[test]
    fn definitions_and_rows_are_kept_in_order() {
        let definition: Definition<Light, Tick> = TableBuilder::new()
            .define(
                Define::state(Light::Red).rule(Transition::when([Tick::Timer]).then(Light::Green)),
            )
            .row(Rule::new(Light::Green, Tick::Timer, Light::Red))
            .build();

        let states: Vec<Light> = definition.rules().iter().map(|r| r.state).collect();
        assert_eq!(states, vec![Light::Red, Light::Green]);
    }

    #[test]
    fn built_tables_compile() {
        let builder: TableBuilder<Light, Tick> = TableBuilder::new().defines([
            Define::state(Light::Red).rule(Transition::when([Tick::Timer]).then(Light::Green)),
            Define::state(Light::Green).rule(Transition::when([Tick::Timer]).then(Light::Red)),
        ]);

        let table = compile(builder.into(), CompileOptions::default()).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn empty_builder_compiles_to_an_empty_table_error() {
        let builder: TableBuilder<Light, Tick> = TableBuilder::new();
        let errors = compile(builder.build(), CompileOptions::default()).unwrap_err();

        assert_eq!(errors.len(), 1);
    }
}
