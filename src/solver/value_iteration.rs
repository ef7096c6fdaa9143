//! Value iteration over an enumerated state graph.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::mdp::{MdpModel, StateGraph};

/// Convergence and cap settings for [`ValueIteration`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ValueIterationConfig {
    /// Convergence threshold: stop once `max_s |V_new(s) - V_prev(s)|`
    /// drops below this.
    pub epsilon: f64,
    /// Sweep cap. Running out of sweeps before converging is fatal.
    pub max_sweeps: usize,
    /// State cap handed to graph enumeration.
    pub max_states: usize,
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-3,
            max_sweeps: 1_000,
            max_states: crate::mdp::DEFAULT_MAX_STATES,
        }
    }
}

impl ValueIterationConfig {
    /// Sets the convergence threshold.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the sweep cap.
    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = max_sweeps;
        self
    }

    /// Sets the enumeration state cap.
    pub fn with_max_states(mut self, max_states: usize) -> Self {
        self.max_states = max_states;
        self
    }
}

/// Converged output of one solver run.
///
/// `policy` has an entry for every non-terminal state; terminal states carry
/// value 0 and no policy entry.
#[derive(Debug, Clone)]
pub struct ValueIterationSolution<S, A> {
    /// Expected discounted return per state.
    pub values: HashMap<S, f64>,
    /// Optimal action per non-terminal state.
    pub policy: HashMap<S, A>,
    /// Sweeps performed before convergence.
    pub sweeps: usize,
    /// Final residual `max_s |ΔV|` (below epsilon).
    pub residual: f64,
}

/// Bellman fixed-point solver.
///
/// Each sweep recomputes every state's value from the complete previous
/// sweep (synchronous updates):
///
/// ```text
/// Q(s,a)   = Σ_outcomes p · (r + γ · V_prev(s'))
/// V_new(s) = max_a Q(s,a)
/// ```
///
/// Value ties between actions are broken by first occurrence in the
/// model's canonical action order, so the derived policy is deterministic.
///
/// Convergence is guaranteed for discount < 1 (the Bellman operator is a
/// γ-contraction); for discount = 1 the model's state graph must be a
/// finite DAG.
#[derive(Debug, Clone, Default)]
pub struct ValueIteration {
    config: ValueIterationConfig,
}

impl ValueIteration {
    /// Creates a solver with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solver with explicit settings.
    pub fn with_config(config: ValueIterationConfig) -> Self {
        Self { config }
    }

    /// Enumerates the model's reachable states and solves over them.
    pub fn solve<M: MdpModel>(&self, model: &M) -> Result<ValueIterationSolution<M::State, M::Action>> {
        let graph = StateGraph::explore_capped(model, self.config.max_states)?;
        self.solve_graph(model, &graph)
    }

    /// Solves over an already-enumerated state graph.
    ///
    /// The graph must have been enumerated from this same model, so that
    /// every successor state is present in it.
    pub fn solve_graph<M: MdpModel>(
        &self,
        model: &M,
        graph: &StateGraph<M::State>,
    ) -> Result<ValueIterationSolution<M::State, M::Action>> {
        let discount = model.discount();
        let states = graph.states();
        let actions: Vec<Vec<M::Action>> = states.iter().map(|s| model.actions(s)).collect();

        let mut values: HashMap<M::State, f64> =
            states.iter().map(|s| (s.clone(), 0.0)).collect();

        let mut sweeps = 0;
        let mut residual = f64::INFINITY;
        while residual >= self.config.epsilon {
            if sweeps >= self.config.max_sweeps {
                return Err(Error::NotConverged { sweeps, residual });
            }

            let mut next = HashMap::with_capacity(values.len());
            residual = 0.0;
            for (state, state_actions) in states.iter().zip(&actions) {
                let value = if state_actions.is_empty() {
                    0.0
                } else {
                    state_actions
                        .iter()
                        .map(|a| q_value(model, state, a, &values, discount))
                        .fold(f64::NEG_INFINITY, f64::max)
                };
                residual = residual.max((value - values[state]).abs());
                next.insert(state.clone(), value);
            }
            values = next;
            sweeps += 1;
            debug!(sweep = sweeps, residual, "value iteration sweep");
        }

        // Greedy policy from the converged values, ties to the first action.
        let mut policy = HashMap::new();
        for (state, state_actions) in states.iter().zip(&actions) {
            let mut best: Option<(&M::Action, f64)> = None;
            for action in state_actions {
                let q = q_value(model, state, action, &values, discount);
                if best.map_or(true, |(_, best_q)| q > best_q) {
                    best = Some((action, q));
                }
            }
            if let Some((action, _)) = best {
                policy.insert(state.clone(), action.clone());
            }
        }

        debug!(
            states = states.len(),
            sweeps, residual, "value iteration converged"
        );
        Ok(ValueIterationSolution {
            values,
            policy,
            sweeps,
            residual,
        })
    }
}

fn q_value<M: MdpModel>(
    model: &M,
    state: &M::State,
    action: &M::Action,
    values: &HashMap<M::State, f64>,
    discount: f64,
) -> f64 {
    model
        .transitions(state, action)
        .iter()
        .map(|o| o.probability * (o.reward + discount * values[&o.next_state]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdp::Outcome;

    /// One decision state: keep earning 1 per step forever (discounted) or
    /// cash out 1.5 once and stop. With γ = 0.5 the loop is worth
    /// 1 / (1 - 0.5) = 2, so staying is optimal.
    struct StayOrQuit;

    const STAY: u8 = 0;
    const QUIT: u8 = 1;

    impl MdpModel for StayOrQuit {
        type State = &'static str;
        type Action = u8;

        fn start_state(&self) -> &'static str {
            "in"
        }

        fn actions(&self, state: &&'static str) -> Vec<u8> {
            if *state == "in" {
                vec![STAY, QUIT]
            } else {
                Vec::new()
            }
        }

        fn transitions(&self, state: &&'static str, action: &u8) -> Vec<Outcome<&'static str>> {
            match (*state, *action) {
                ("in", STAY) => vec![Outcome::new("in", 1.0, 1.0)],
                ("in", _) => vec![Outcome::new("out", 1.0, 1.5)],
                _ => Vec::new(),
            }
        }

        fn discount(&self) -> f64 {
            0.5
        }
    }

    /// Deterministic chain of `length` steps, reward 1 per step, γ = 1.
    struct Chain {
        length: u32,
    }

    impl MdpModel for Chain {
        type State = u32;
        type Action = u8;

        fn start_state(&self) -> u32 {
            0
        }

        fn actions(&self, state: &u32) -> Vec<u8> {
            if *state >= self.length {
                Vec::new()
            } else {
                vec![0]
            }
        }

        fn transitions(&self, state: &u32, _action: &u8) -> Vec<Outcome<u32>> {
            if *state >= self.length {
                Vec::new()
            } else {
                vec![Outcome::new(state + 1, 1.0, 1.0)]
            }
        }

        fn discount(&self) -> f64 {
            1.0
        }
    }

    #[test]
    fn test_two_state_model_matches_analytic_optimum() {
        let solution = ValueIteration::new().solve(&StayOrQuit).unwrap();
        assert_eq!(solution.policy[&"in"], STAY);
        assert!((solution.values[&"in"] - 2.0).abs() < 1e-2);
        assert_eq!(solution.values[&"out"], 0.0);
    }

    #[test]
    fn test_terminal_states_get_no_policy_entry() {
        let solution = ValueIteration::new().solve(&StayOrQuit).unwrap();
        assert!(!solution.policy.contains_key(&"out"));
    }

    #[test]
    fn test_acyclic_chain_converges_within_path_length_sweeps() {
        let length = 10;
        let solution = ValueIteration::new().solve(&Chain { length }).unwrap();
        // One extra sweep observes the sub-epsilon residual.
        assert!(solution.sweeps <= length as usize + 1);
        assert!((solution.values[&0] - length as f64).abs() < 1e-9);
    }

    #[test]
    fn test_sweep_cap_is_fatal_not_partial() {
        // Undiscounted self-loop with positive reward: V diverges, the
        // residual never drops, and the solver must refuse to answer.
        struct Loop;
        impl MdpModel for Loop {
            type State = u8;
            type Action = u8;
            fn start_state(&self) -> u8 {
                0
            }
            fn actions(&self, _state: &u8) -> Vec<u8> {
                vec![0]
            }
            fn transitions(&self, _state: &u8, _action: &u8) -> Vec<Outcome<u8>> {
                vec![Outcome::new(0, 1.0, 1.0)]
            }
            fn discount(&self) -> f64 {
                1.0
            }
        }

        let solver =
            ValueIteration::with_config(ValueIterationConfig::default().with_max_sweeps(25));
        let err = solver.solve(&Loop).unwrap_err();
        assert!(matches!(err, Error::NotConverged { sweeps: 25, .. }));
    }

    #[test]
    fn test_value_ties_break_to_first_action() {
        // Both actions are worth exactly 1; the canonical order must win.
        struct Tied;
        impl MdpModel for Tied {
            type State = u8;
            type Action = &'static str;
            fn start_state(&self) -> u8 {
                0
            }
            fn actions(&self, state: &u8) -> Vec<&'static str> {
                if *state == 0 {
                    vec!["first", "second"]
                } else {
                    Vec::new()
                }
            }
            fn transitions(&self, state: &u8, _action: &&'static str) -> Vec<Outcome<u8>> {
                if *state == 0 {
                    vec![Outcome::new(1, 1.0, 1.0)]
                } else {
                    Vec::new()
                }
            }
            fn discount(&self) -> f64 {
                1.0
            }
        }

        let solution = ValueIteration::new().solve(&Tied).unwrap();
        assert_eq!(solution.policy[&0], "first");
    }
}
