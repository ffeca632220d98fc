//! Given-When-Then harness for exercising a reducer in isolation.
//!
//! A test prepares a state and an environment, feeds one action through the
//! reducer, and then inspects the mutated state and the returned effects
//! through assertion closures. No runtime or storage is involved, so every
//! admission rule can be pinned down deterministically.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use gatepass_core::{effect::Effect, reducer::Reducer};

type StateCheck<S> = Box<dyn FnOnce(&S)>;
type EffectCheck<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Drives a single reducer step with Given-When-Then phrasing.
///
/// # Example
///
/// ```ignore
/// use gatepass_testing::ReducerTest;
///
/// ReducerTest::new(LedgerReducer::new())
///     .with_env(ledger_environment())
///     .given_state(GuestLedgerState::new(guest))
///     .when_action(LedgerAction::RecordAccess { /* ... */ })
///     .then_state(|state| assert_eq!(state.guest.used_passes, 2))
///     .then_effects(assertions::assert_has_future_effect)
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial: Option<S>,
    action: Option<A>,
    state_checks: Vec<StateCheck<S>>,
    effect_checks: Vec<EffectCheck<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Start a test around the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial: None,
            action: None,
            state_checks: Vec::new(),
            effect_checks: Vec::new(),
        }
    }

    /// Inject the environment the reducer runs against
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// The state the scenario starts from (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// The single action under test (When)
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.action = Some(action);
        self
    }

    /// Check the state left behind by the action (Then)
    #[must_use]
    pub fn then_state<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_checks.push(Box::new(check));
        self
    }

    /// Check the effects the action produced (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_checks.push(Box::new(check));
        self
    }

    /// Execute the step and every registered check.
    ///
    /// # Panics
    ///
    /// Panics when the scenario is missing its state, action, or
    /// environment, or when a check fails.
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self.initial.expect("given_state() was not called");
        let action = self.action.expect("when_action() was not called");
        let env = self.environment.expect("with_env() was not called");

        let effects = self.reducer.reduce(&mut state, action, &env);

        for check in self.state_checks {
            check(&state);
        }
        for check in self.effect_checks {
            check(&effects);
        }
    }
}

/// Common effect assertions.
pub mod assertions {
    use gatepass_core::effect::Effect;

    /// Assert the reducer produced no work to run.
    ///
    /// A lone `Effect::None` counts as no work.
    ///
    /// # Panics
    ///
    /// Panics when any real effect is present.
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.is_empty() || matches!(effects, [Effect::None]),
            "expected no effects, found {}: {effects:?}",
            effects.len(),
        );
    }

    /// Assert at least one async effect was scheduled.
    ///
    /// # Panics
    ///
    /// Panics when no `Effect::Future` is present.
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "expected a future effect, found none"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatepass_core::{smallvec, SmallVec};

    // A stripped-down turnstile: admissions consume capacity and announce
    // themselves; an admission that would overdraw is ignored.
    #[derive(Clone, Debug)]
    struct TurnstileState {
        admitted: u32,
        capacity: u32,
    }

    #[derive(Clone, Debug)]
    enum TurnstileAction {
        Admit(u32),
    }

    struct TurnstileEnv {
        announce: bool,
    }

    struct TurnstileReducer;

    impl Reducer for TurnstileReducer {
        type State = TurnstileState;
        type Action = TurnstileAction;
        type Environment = TurnstileEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            let TurnstileAction::Admit(count) = action;
            if state.admitted + count > state.capacity {
                return smallvec![Effect::None];
            }
            state.admitted += count;
            if env.announce {
                smallvec![Effect::future(async { None })]
            } else {
                smallvec![Effect::None]
            }
        }
    }

    #[test]
    fn admission_within_capacity_announces() {
        ReducerTest::new(TurnstileReducer)
            .with_env(TurnstileEnv { announce: true })
            .given_state(TurnstileState {
                admitted: 1,
                capacity: 4,
            })
            .when_action(TurnstileAction::Admit(2))
            .then_state(|state| {
                assert_eq!(state.admitted, 3);
            })
            .then_effects(|effects| {
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn overdraw_leaves_state_alone() {
        ReducerTest::new(TurnstileReducer)
            .with_env(TurnstileEnv { announce: true })
            .given_state(TurnstileState {
                admitted: 3,
                capacity: 4,
            })
            .when_action(TurnstileAction::Admit(2))
            .then_state(|state| {
                assert_eq!(state.admitted, 3);
            })
            .then_effects(|effects| {
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn silent_admission_produces_no_effects() {
        ReducerTest::new(TurnstileReducer)
            .with_env(TurnstileEnv { announce: false })
            .given_state(TurnstileState {
                admitted: 0,
                capacity: 2,
            })
            .when_action(TurnstileAction::Admit(1))
            .then_state(|state| {
                assert_eq!(state.admitted, 1);
            })
            .then_effects(|effects| {
                assertions::assert_no_effects(effects);
            })
            .run();
    }
}
