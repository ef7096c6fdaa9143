//! Model-free online learning: Q-learning and episode simulation.
//!
//! The exact solver needs the full transition model; the components here
//! only sample it. A [`Simulator`] drives an [`Agent`] through episodes of
//! an [`MdpModel`](crate::mdp::MdpModel), and [`QLearningAgent`] learns an
//! action-value function as a linear combination of features supplied by a
//! pluggable [`FeatureExtractor`].
//!
//! All randomness (epsilon-greedy draws, outcome sampling) comes from RNGs
//! injected at construction, so seeded runs are fully reproducible.
//!
//! # References
//!
//! - Watkins & Dayan (1992), "Q-learning"
//! - Sutton & Barto (2018), "Reinforcement Learning: An Introduction", Ch. 6, 9

mod features;
mod q_learning;
mod simulator;

pub use features::{FeatureExtractor, IdentityFeatures};
pub use q_learning::QLearningAgent;
pub use simulator::{SimulationConfig, SimulationOutcome, Simulator};

use crate::error::Result;
use crate::mdp::MdpModel;

/// An online learner driven by the [`Simulator`].
///
/// The simulator calls [`select_action`](Agent::select_action) on each
/// non-terminal state and reports every sampled transition back through
/// [`feedback`](Agent::feedback).
pub trait Agent<M: MdpModel> {
    /// Chooses an action for a non-terminal `state`.
    ///
    /// Calling this on a terminal state is a caller bug and fails with
    /// [`Error::TerminalState`](crate::error::Error::TerminalState).
    fn select_action(&mut self, state: &M::State) -> Result<M::Action>;

    /// Reports one observed transition. `next_state` is `None` when the
    /// episode ended in a terminal state.
    fn feedback(
        &mut self,
        state: &M::State,
        action: &M::Action,
        reward: f64,
        next_state: Option<&M::State>,
    ) -> Result<()>;
}
