//! Macros for ergonomic state machine construction.

/// Declare a state enum with explicit labels.
///
/// Each label is the variant's [`State::name`](crate::core::State::name), its
/// serde representation and its `Display` output.
///
/// # Example
///
/// ```
/// use turnstile::core::State;
/// use turnstile::state_enum;
///
/// state_enum! {
///     pub enum OrderState {
///         Created = "created",
///         WaitingForPayment = "waiting_for_payment",
///         Completed = "completed",
///     }
/// }
///
/// assert_eq!(OrderState::WaitingForPayment.name(), "waiting_for_payment");
/// assert_eq!(OrderState::Completed.to_string(), "completed");
/// assert_eq!(OrderState::ALL.len(), 3);
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $label:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $label)]
                $variant
            ),*
        }

        impl $name {
            /// Every state, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => $label),*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::State::name(self))
            }
        }
    };
}

/// Build a [`TransitionTable`](crate::core::TransitionTable) declaratively.
///
/// Each entry is `state => [targets...]`, `state => []` for a terminal state,
/// or `state => any` for a state that may reach every declared state.
/// Expands to the table builder, so it evaluates to
/// `Result<TransitionTable<_>, BuildError>`.
///
/// # Example
///
/// ```
/// use turnstile::{state_enum, transitions};
///
/// state_enum! {
///     enum Door {
///         Open = "open",
///         Closed = "closed",
///         Welded = "welded",
///     }
/// }
///
/// let table = transitions! {
///     Door::Open => [Door::Closed],
///     Door::Closed => any,
///     Door::Welded => [],
/// }
/// .unwrap();
///
/// assert_eq!(table.targets(&Door::Closed).len(), 3);
/// assert!(table.is_terminal(&Door::Welded));
/// ```
#[macro_export]
macro_rules! transitions {
    (@build $builder:expr;) => {
        $builder.build()
    };
    (@build $builder:expr; $from:expr => any $(, $($rest:tt)*)?) => {
        $crate::transitions!(@build $builder.any($from); $($($rest)*)?)
    };
    (@build $builder:expr; $from:expr => [$($to:expr),* $(,)?] $(, $($rest:tt)*)?) => {
        $crate::transitions!(@build $builder.allow($from, [$($to),*]); $($($rest)*)?)
    };
    ($($body:tt)+) => {
        $crate::transitions!(@build $crate::core::TransitionTable::builder(); $($body)+)
    };
}
