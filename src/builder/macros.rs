//! Macros for ergonomic state machine construction.

/// Register several states on a builder, binding each handle to a name.
///
/// # Example
///
/// ```
/// use statecraft::{register_states, FsmBuilder, State};
///
/// let mut builder = FsmBuilder::new();
/// register_states! { builder;
///     solid = State::new("solid").order(1),
///     liquid = State::new("liquid").order(2),
/// }
///
/// builder.start(solid);
/// let fsm = builder.build().unwrap();
/// assert_eq!(fsm.current_state(), solid);
/// assert_ne!(solid, liquid);
/// ```
#[macro_export]
macro_rules! register_states {
    (
        $builder:expr;
        $($handle:ident = $state:expr),* $(,)?
    ) => {
        $(
            let $handle = $builder.state($state);
        )*
    };
}
