//! Error types shared by the solver and learning components.
//!
//! All errors here are fatal to the enclosing solve/learn call and propagate
//! to the caller; nothing retries and nothing returns a partial result
//! disguised as a final one.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while enumerating, solving, or learning over an MDP.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The model broke its own contract: outcome probabilities for a
    /// `(state, action)` pair do not sum to 1, or an advertised action was
    /// rejected by the transition function. Never renormalized.
    #[error("model contract violation: {0}")]
    ContractViolation(String),

    /// State enumeration visited more states than the configured cap.
    /// The reachable set is unbounded or the cap is too small.
    #[error("state enumeration exceeded cap of {limit} states")]
    StateCapExceeded { limit: usize },

    /// Value iteration ran out of sweeps before the residual dropped below
    /// the convergence threshold.
    #[error("value iteration did not converge: residual {residual} after {sweeps} sweeps")]
    NotConverged { sweeps: usize, residual: f64 },

    /// A simulated episode ran longer than the configured step cap without
    /// reaching a terminal state.
    #[error("episode exceeded cap of {limit} steps without terminating")]
    EpisodeCapExceeded { limit: usize },

    /// An action was requested for a state with no legal actions.
    /// Callers must check for terminal states before asking the agent.
    #[error("action requested for a terminal state")]
    TerminalState,

    /// The learning step size was requested before any action had been
    /// selected (iteration count still zero).
    #[error("step size undefined: no action has been requested yet")]
    StepSizeUndefined,
}
