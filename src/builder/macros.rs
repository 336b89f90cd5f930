//! Macros for declaring states, events and predicate families.

/// Generate a `State` implementation for a fieldless enum.
///
/// # Example
///
/// ```
/// use predicate_fsm::core::State;
/// use predicate_fsm::state_enum;
///
/// state_enum! {
///     pub enum Turnstile {
///         Locked,
///         Unlocked,
///         Broken,
///     }
///     final: [Broken]
/// }
///
/// assert_eq!(Turnstile::Locked.name(), "Locked");
/// assert!(Turnstile::Broken.is_final());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }
    };
}

/// Generate an `Event` implementation for a fieldless enum.
///
/// ```
/// use predicate_fsm::core::Event;
/// use predicate_fsm::event_enum;
///
/// event_enum! {
///     enum Input { Coin, Pass }
/// }
///
/// assert_eq!(Input::Pass.name(), "Pass");
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Event for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

/// Declare a predicate family from a fieldless enum.
///
/// Every variant becomes a case of the family, in declaration order.
///
/// ```
/// use predicate_fsm::predicate::{Family, Predicate, PredicateValue};
/// use predicate_fsm::predicate_enum;
///
/// predicate_enum! {
///     pub enum Enforcement { Weak, Strong }
/// }
///
/// assert_eq!(Family::of::<Enforcement>().len(), 2);
/// assert_eq!(PredicateValue::from(Enforcement::Strong).to_string(), "Enforcement.Strong");
/// ```
#[macro_export]
macro_rules! predicate_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::predicate::Predicate for $name {
            const FAMILY: &'static str = stringify!($name);

            fn all_cases() -> &'static [Self] {
                &[$(Self::$variant),*]
            }

            fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
