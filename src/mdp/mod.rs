//! Markov decision process contract and state-graph enumeration.
//!
//! Defines the [`MdpModel`] trait that domain models implement and the
//! breadth-first [`StateGraph`] enumeration the exact solver runs on.
//! Everything downstream — value iteration, Q-learning, simulation — talks
//! to a domain only through this contract.
//!
//! # Conventions
//!
//! - States and actions are immutable values, deduplicated by structural
//!   equality. Transitions build fresh states; nothing is mutated in place.
//! - `actions(state)` returns an empty list iff `state` is terminal, and the
//!   list order is canonical: solvers break value ties by first occurrence.
//! - Outcome probabilities for a `(state, action)` pair must sum to 1.
//!   Violations fail fast as [`Error::ContractViolation`]; they are never
//!   silently renormalized.
//!
//! # References
//!
//! - Puterman (1994), "Markov Decision Processes", Ch. 2
//! - Sutton & Barto (2018), "Reinforcement Learning: An Introduction", Ch. 3

mod graph;

pub use graph::{StateGraph, DEFAULT_MAX_STATES};

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{Error, Result};

/// Tolerance for the outcome probability-sum check.
pub const PROB_TOLERANCE: f64 = 1e-9;

/// One stochastic outcome of taking an action: the successor state, the
/// probability of reaching it, and the reward collected on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<S> {
    /// State the transition lands in.
    pub next_state: S,
    /// Probability of this outcome, in `[0, 1]`.
    pub probability: f64,
    /// Immediate reward for this outcome.
    pub reward: f64,
}

impl<S> Outcome<S> {
    /// Creates an outcome.
    pub fn new(next_state: S, probability: f64, reward: f64) -> Self {
        Self {
            next_state,
            probability,
            reward,
        }
    }
}

/// A finite Markov decision process supplied by a domain.
///
/// Implementations must be pure and deterministic: repeated calls with the
/// same arguments return identical results. All stochasticity lives in the
/// outcome probabilities, never in the calls themselves.
///
/// `State` and `Action` are ordinary values. `Ord` supplies the canonical
/// ordering used for reproducible tie-breaking; implementations should emit
/// `actions(state)` in a deterministic order consistent with it.
pub trait MdpModel {
    /// World description at a decision point.
    type State: Clone + Eq + Hash + Ord + Debug;
    /// Decision available in some state.
    type Action: Clone + Eq + Hash + Ord + Debug;

    /// The initial state.
    fn start_state(&self) -> Self::State;

    /// Legal actions from `state`, in canonical order.
    ///
    /// Empty iff `state` is terminal.
    fn actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Stochastic outcomes of taking `action` in `state`.
    ///
    /// Empty only when `state` is terminal (in which case the action is
    /// ignored); otherwise the probabilities must sum to 1 and every action
    /// from [`actions`](Self::actions) must be accepted.
    fn transitions(&self, state: &Self::State, action: &Self::Action) -> Vec<Outcome<Self::State>>;

    /// Discount factor in `[0, 1]`.
    ///
    /// A discount of exactly 1 requires the reachable state graph to be a
    /// finite DAG (every path hits a terminal state) for value iteration to
    /// converge.
    fn discount(&self) -> f64;

    /// Whether `state` has no legal actions.
    fn is_terminal(&self, state: &Self::State) -> bool {
        self.actions(state).is_empty()
    }
}

/// Checks one outcome list against the model contract.
///
/// A non-terminal `(state, action)` pair must produce a non-empty list whose
/// probabilities each lie in `[0, 1]` and together sum to 1 within
/// [`PROB_TOLERANCE`].
pub fn check_outcomes<S: Debug>(outcomes: &[Outcome<S>], context: &dyn Debug) -> Result<()> {
    if outcomes.is_empty() {
        return Err(Error::ContractViolation(format!(
            "action not covered by transition function at {context:?}"
        )));
    }
    let mut sum = 0.0;
    for outcome in outcomes {
        if !(0.0..=1.0).contains(&outcome.probability) {
            return Err(Error::ContractViolation(format!(
                "outcome probability {} out of range at {context:?}",
                outcome.probability
            )));
        }
        sum += outcome.probability;
    }
    if (sum - 1.0).abs() > PROB_TOLERANCE {
        return Err(Error::ContractViolation(format!(
            "outcome probabilities sum to {sum} at {context:?}"
        )));
    }
    Ok(())
}

/// Verifies the full contract over a set of states.
///
/// For every non-terminal state and every advertised action, the outcome
/// list must pass [`check_outcomes`]. Intended for tests and for vetting a
/// new domain model before handing it to a solver.
pub fn verify_contract<M: MdpModel>(model: &M, states: &[M::State]) -> Result<()> {
    for state in states {
        for action in model.actions(state) {
            let outcomes = model.transitions(state, &action);
            check_outcomes(&outcomes, &(state, &action))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two-day coin model: each day either pays 1 (p = 0.5) or nothing.
    struct CoinMdp;

    impl MdpModel for CoinMdp {
        type State = u32;
        type Action = u8;

        fn start_state(&self) -> u32 {
            0
        }

        fn actions(&self, state: &u32) -> Vec<u8> {
            if *state >= 2 {
                Vec::new()
            } else {
                vec![0]
            }
        }

        fn transitions(&self, state: &u32, _action: &u8) -> Vec<Outcome<u32>> {
            if *state >= 2 {
                return Vec::new();
            }
            vec![
                Outcome::new(state + 1, 0.5, 1.0),
                Outcome::new(state + 1, 0.5, 0.0),
            ]
        }

        fn discount(&self) -> f64 {
            1.0
        }
    }

    #[test]
    fn test_terminal_via_empty_actions() {
        let mdp = CoinMdp;
        assert!(!mdp.is_terminal(&0));
        assert!(mdp.is_terminal(&2));
    }

    #[test]
    fn test_check_outcomes_accepts_valid_list() {
        let outcomes = vec![Outcome::new(1u32, 0.5, 1.0), Outcome::new(2, 0.5, 0.0)];
        assert!(check_outcomes(&outcomes, &"test").is_ok());
    }

    #[test]
    fn test_check_outcomes_rejects_bad_sum() {
        let outcomes = vec![Outcome::new(1u32, 0.5, 1.0), Outcome::new(2, 0.4, 0.0)];
        let err = check_outcomes(&outcomes, &"test").unwrap_err();
        assert!(matches!(err, Error::ContractViolation(_)));
    }

    #[test]
    fn test_check_outcomes_rejects_empty_list() {
        let outcomes: Vec<Outcome<u32>> = Vec::new();
        let err = check_outcomes(&outcomes, &"test").unwrap_err();
        assert!(matches!(err, Error::ContractViolation(_)));
    }

    #[test]
    fn test_check_outcomes_rejects_out_of_range_probability() {
        let outcomes = vec![Outcome::new(1u32, 1.4, 1.0), Outcome::new(2, -0.4, 0.0)];
        let err = check_outcomes(&outcomes, &"test").unwrap_err();
        assert!(matches!(err, Error::ContractViolation(_)));
    }

    #[test]
    fn test_verify_contract_on_coin_model() {
        let mdp = CoinMdp;
        assert!(verify_contract(&mdp, &[0, 1, 2]).is_ok());
    }
}
