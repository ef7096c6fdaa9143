//! Episode simulation over an MDP.

use std::collections::HashMap;

use rand::Rng;
use tracing::{debug, trace};

use super::Agent;
use crate::error::{Error, Result};
use crate::mdp::{check_outcomes, MdpModel};

/// Episode count and per-episode step cap for a [`Simulator`] run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SimulationConfig {
    /// Number of episodes to run.
    pub episodes: usize,
    /// Step cap per episode; exceeding it without reaching a terminal
    /// state is fatal.
    pub max_steps: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            episodes: 100,
            max_steps: 1_000,
        }
    }
}

impl SimulationConfig {
    /// Sets the episode count.
    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    /// Sets the per-episode step cap.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}

/// What a simulation run produced.
#[derive(Debug, Clone)]
pub struct SimulationOutcome<S, A> {
    /// Total discounted reward per episode, in episode order.
    pub episode_rewards: Vec<f64>,
    /// First action taken from each state encountered, with the reward
    /// observed on that first visit. Never overwritten on later visits.
    pub first_visit_policy: HashMap<S, (A, f64)>,
}

/// Drives an [`Agent`] through simulated episodes of a model.
///
/// Each step asks the agent for an action, samples exactly one outcome
/// from the model's outcome list by its probability weights, and reports
/// the transition back to the agent. Outcome sampling draws from the RNG
/// injected at construction, so a seeded simulator is reproducible.
#[derive(Debug)]
pub struct Simulator<R: Rng> {
    rng: R,
    config: SimulationConfig,
}

impl<R: Rng> Simulator<R> {
    /// Creates a simulator with default settings.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            config: SimulationConfig::default(),
        }
    }

    /// Creates a simulator with explicit settings.
    pub fn with_config(rng: R, config: SimulationConfig) -> Self {
        Self { rng, config }
    }

    /// Runs the configured number of episodes.
    ///
    /// Returns per-episode total rewards (discounted by the model's factor
    /// per step) and the accumulated first-visit policy. Any contract
    /// violation, agent error, or step-cap overrun aborts the whole run.
    pub fn run<M, A>(
        &mut self,
        model: &M,
        agent: &mut A,
    ) -> Result<SimulationOutcome<M::State, M::Action>>
    where
        M: MdpModel,
        A: Agent<M>,
    {
        let mut episode_rewards = Vec::with_capacity(self.config.episodes);
        let mut first_visit_policy: HashMap<M::State, (M::Action, f64)> = HashMap::new();

        for episode in 0..self.config.episodes {
            let mut state = model.start_state();
            let mut total_reward = 0.0;
            let mut total_discount = 1.0;
            let mut steps = 0;

            while !model.is_terminal(&state) {
                if steps >= self.config.max_steps {
                    return Err(Error::EpisodeCapExceeded {
                        limit: self.config.max_steps,
                    });
                }
                let action = agent.select_action(&state)?;
                let outcomes = model.transitions(&state, &action);
                check_outcomes(&outcomes, &(&state, &action))?;

                let index = self.sample_outcome(outcomes.iter().map(|o| o.probability));
                let outcome = &outcomes[index];
                trace!(?state, ?action, reward = outcome.reward, "simulated step");

                first_visit_policy
                    .entry(state.clone())
                    .or_insert_with(|| (action.clone(), outcome.reward));

                if model.is_terminal(&outcome.next_state) {
                    agent.feedback(&state, &action, outcome.reward, None)?;
                } else {
                    agent.feedback(&state, &action, outcome.reward, Some(&outcome.next_state))?;
                }

                total_reward += total_discount * outcome.reward;
                total_discount *= model.discount();
                state = outcome.next_state.clone();
                steps += 1;
            }

            debug!(episode, total_reward, steps, "episode finished");
            episode_rewards.push(total_reward);
        }

        Ok(SimulationOutcome {
            episode_rewards,
            first_visit_policy,
        })
    }

    /// Samples an index by probability weight.
    fn sample_outcome(&mut self, probabilities: impl Iterator<Item = f64>) -> usize {
        let draw: f64 = self.rng.random();
        let mut cumulative = 0.0;
        let mut last = 0;
        for (i, p) in probabilities.enumerate() {
            cumulative += p;
            last = i;
            if draw < cumulative {
                return i;
            }
        }
        // Floating-point slack: the draw landed past the accumulated sum.
        last
    }
}
