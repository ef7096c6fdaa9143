//! Q-learning with linear function approximation.

use std::collections::HashMap;

use rand::prelude::IndexedRandom;
use rand::Rng;

use super::{Agent, FeatureExtractor};
use crate::error::{Error, Result};
use crate::mdp::MdpModel;

/// Epsilon-greedy Q-learning over a linear value function.
///
/// The action-value estimate is `Q(s,a) = w · φ(s,a)` with features from
/// the injected [`FeatureExtractor`] and a sparse weight vector defaulting
/// to zero. Each [`feedback`](Agent::feedback) call takes one stochastic
/// gradient step on the squared TD error with a Robbins–Monro step size of
/// `1/sqrt(n)`, where `n` counts [`select_action`](Agent::select_action)
/// calls across the whole learning run.
///
/// The agent only needs the model's action sets and discount factor; it
/// never reads transition probabilities.
#[derive(Debug)]
pub struct QLearningAgent<'a, M, F, R>
where
    M: MdpModel,
    F: FeatureExtractor<M::State, M::Action>,
    R: Rng,
{
    model: &'a M,
    extractor: F,
    rng: R,
    exploration_prob: f64,
    weights: HashMap<F::Key, f64>,
    iterations: u64,
}

impl<'a, M, F, R> QLearningAgent<'a, M, F, R>
where
    M: MdpModel,
    F: FeatureExtractor<M::State, M::Action>,
    R: Rng,
{
    /// Default exploration probability, as commonly used for small MDPs.
    pub const DEFAULT_EXPLORATION_PROB: f64 = 0.2;

    /// Creates an agent with the default exploration probability.
    pub fn new(model: &'a M, extractor: F, rng: R) -> Self {
        Self {
            model,
            extractor,
            rng,
            exploration_prob: Self::DEFAULT_EXPLORATION_PROB,
            weights: HashMap::new(),
            iterations: 0,
        }
    }

    /// Sets the exploration probability at construction.
    pub fn with_exploration_prob(mut self, exploration_prob: f64) -> Self {
        self.exploration_prob = exploration_prob;
        self
    }

    /// Changes the exploration probability mid-run, e.g. to 0 for greedy
    /// evaluation after training.
    pub fn set_exploration_prob(&mut self, exploration_prob: f64) {
        self.exploration_prob = exploration_prob;
    }

    /// Current estimate `Q(s,a) = w · φ(s,a)`.
    ///
    /// A pure read: weights for unseen feature keys count as zero and are
    /// not inserted.
    pub fn q_value(&self, state: &M::State, action: &M::Action) -> f64 {
        self.extractor
            .features(state, action)
            .iter()
            .map(|(key, value)| self.weights.get(key).copied().unwrap_or(0.0) * value)
            .sum()
    }

    /// Greedy action under the current estimate, ties broken by first
    /// occurrence in the model's canonical action order. `None` for
    /// terminal states. Does not touch the iteration counter.
    pub fn greedy_action(&self, state: &M::State) -> Option<M::Action> {
        let mut best: Option<(M::Action, f64)> = None;
        for action in self.model.actions(state) {
            let q = self.q_value(state, &action);
            if best.as_ref().map_or(true, |(_, best_q)| q > *best_q) {
                best = Some((action, q));
            }
        }
        best.map(|(action, _)| action)
    }

    /// Current learning rate `1/sqrt(n)`.
    ///
    /// `n` is the number of actions requested so far; asking before the
    /// first request is an error rather than a division by zero.
    pub fn step_size(&self) -> Result<f64> {
        if self.iterations == 0 {
            return Err(Error::StepSizeUndefined);
        }
        Ok(1.0 / (self.iterations as f64).sqrt())
    }

    /// Number of actions requested so far.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Learned weight vector.
    pub fn weights(&self) -> &HashMap<F::Key, f64> {
        &self.weights
    }
}

impl<M, F, R> Agent<M> for QLearningAgent<'_, M, F, R>
where
    M: MdpModel,
    F: FeatureExtractor<M::State, M::Action>,
    R: Rng,
{
    fn select_action(&mut self, state: &M::State) -> Result<M::Action> {
        let actions = self.model.actions(state);
        if actions.is_empty() {
            return Err(Error::TerminalState);
        }
        self.iterations += 1;
        if self.rng.random::<f64>() < self.exploration_prob {
            let choice = actions
                .choose(&mut self.rng)
                .cloned()
                .ok_or(Error::TerminalState)?;
            return Ok(choice);
        }
        self.greedy_action(state).ok_or(Error::TerminalState)
    }

    fn feedback(
        &mut self,
        state: &M::State,
        action: &M::Action,
        reward: f64,
        next_state: Option<&M::State>,
    ) -> Result<()> {
        let mut target = reward;
        if let Some(next) = next_state {
            let continuation = self
                .model
                .actions(next)
                .iter()
                .map(|a| self.q_value(next, a))
                .fold(f64::NEG_INFINITY, f64::max);
            if continuation.is_finite() {
                target += self.model.discount() * continuation;
            }
        }
        let prediction = self.q_value(state, action);
        let step = self.step_size()?;
        for (key, value) in self.extractor.features(state, action) {
            *self.weights.entry(key).or_insert(0.0) -= step * (prediction - target) * value;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::IdentityFeatures;
    use crate::mdp::Outcome;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    /// Two sequential decisions; "good" pays 10, "bad" pays 1.
    struct TwoDay;

    impl MdpModel for TwoDay {
        type State = u8;
        type Action = &'static str;

        fn start_state(&self) -> u8 {
            0
        }

        fn actions(&self, state: &u8) -> Vec<&'static str> {
            if *state >= 2 {
                Vec::new()
            } else {
                vec!["bad", "good"]
            }
        }

        fn transitions(&self, state: &u8, action: &&'static str) -> Vec<Outcome<u8>> {
            if *state >= 2 {
                return Vec::new();
            }
            let reward = if *action == "good" { 10.0 } else { 1.0 };
            vec![Outcome::new(state + 1, 1.0, reward)]
        }

        fn discount(&self) -> f64 {
            1.0
        }
    }

    fn make_agent(
        model: &TwoDay,
        exploration_prob: f64,
    ) -> QLearningAgent<'_, TwoDay, IdentityFeatures, SmallRng> {
        QLearningAgent::new(model, IdentityFeatures, SmallRng::seed_from_u64(42))
            .with_exploration_prob(exploration_prob)
    }

    #[test]
    fn test_q_value_defaults_to_zero_without_inserting() {
        let model = TwoDay;
        let agent = make_agent(&model, 0.2);
        assert_eq!(agent.q_value(&0, &"good"), 0.0);
        assert!(agent.weights().is_empty());
    }

    #[test]
    fn test_step_size_undefined_before_first_action() {
        let model = TwoDay;
        let agent = make_agent(&model, 0.2);
        assert_eq!(agent.step_size().unwrap_err(), Error::StepSizeUndefined);
    }

    #[test]
    fn test_step_size_decays_as_inverse_sqrt() {
        let model = TwoDay;
        let mut agent = make_agent(&model, 0.2);
        let mut sizes = Vec::new();
        for n in 1..=9u64 {
            agent.select_action(&0).unwrap();
            if [1, 4, 9].contains(&n) {
                sizes.push(agent.step_size().unwrap());
            }
        }
        assert_eq!(sizes[0], 1.0);
        assert_eq!(sizes[1], 0.5);
        assert!((sizes[2] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_select_action_on_terminal_state_fails() {
        let model = TwoDay;
        let mut agent = make_agent(&model, 0.2);
        assert_eq!(agent.select_action(&2).unwrap_err(), Error::TerminalState);
    }

    #[test]
    fn test_greedy_selection_tracks_weights() {
        let model = TwoDay;
        let mut agent = make_agent(&model, 0.0);
        // One sample of each action drives the weights apart.
        agent.select_action(&1).unwrap();
        agent.feedback(&1, &"good", 10.0, None).unwrap();
        agent.select_action(&1).unwrap();
        agent.feedback(&1, &"bad", 1.0, None).unwrap();
        assert!(agent.q_value(&1, &"good") > agent.q_value(&1, &"bad"));
        assert_eq!(agent.select_action(&1).unwrap(), "good");
    }

    #[test]
    fn test_greedy_ties_break_to_first_action() {
        let model = TwoDay;
        let agent = make_agent(&model, 0.0);
        // All weights zero: everything ties, first action in order wins.
        assert_eq!(agent.greedy_action(&0), Some("bad"));
    }

    #[test]
    fn test_feedback_moves_prediction_toward_target() {
        let model = TwoDay;
        let mut agent = make_agent(&model, 0.2);
        agent.select_action(&1).unwrap();
        agent.feedback(&1, &"good", 10.0, None).unwrap();
        // Step size 1 on the first update: prediction lands on the target.
        assert!((agent.q_value(&1, &"good") - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_terminal_feedback_ignores_continuation() {
        let model = TwoDay;
        let mut agent = make_agent(&model, 0.2);
        agent.select_action(&1).unwrap();
        // next_state = Some(terminal): no actions there, target stays r.
        agent.feedback(&1, &"good", 10.0, Some(&2)).unwrap();
        assert!((agent.q_value(&1, &"good") - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_exploration_prob_one_still_returns_legal_action() {
        let model = TwoDay;
        let mut agent = make_agent(&model, 1.0);
        for _ in 0..20 {
            let action = agent.select_action(&0).unwrap();
            assert!(action == "good" || action == "bad");
        }
    }
}
