//! Breadth-first enumeration of the reachable state set.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use super::{check_outcomes, MdpModel};
use crate::error::{Error, Result};

/// Default cap on discovered states.
pub const DEFAULT_MAX_STATES: usize = 100_000;

/// All states reachable from a model's start state, in discovery order.
///
/// Built by breadth-first traversal following every action and every
/// stochastic outcome, deduplicating states by structural equality. The
/// traversal only terminates when the reachable set is finite; the model
/// must bound it (a capped backlog, a day horizon) and the `max_states`
/// guard turns a runaway model into [`Error::StateCapExceeded`] instead of
/// an endless loop.
#[derive(Debug, Clone)]
pub struct StateGraph<S> {
    states: Vec<S>,
}

impl<S: Clone + Eq + std::hash::Hash + Ord + std::fmt::Debug> StateGraph<S> {
    /// Enumerates every reachable state, with the default cap.
    pub fn explore<M>(model: &M) -> Result<Self>
    where
        M: MdpModel<State = S>,
    {
        Self::explore_capped(model, DEFAULT_MAX_STATES)
    }

    /// Enumerates every reachable state, failing once more than
    /// `max_states` distinct states have been discovered.
    ///
    /// Outcome lists are checked against the model contract as they are
    /// followed, so a probability bug surfaces here rather than deep inside
    /// a solver sweep.
    pub fn explore_capped<M>(model: &M, max_states: usize) -> Result<Self>
    where
        M: MdpModel<State = S>,
    {
        let start = model.start_state();
        let mut states = vec![start.clone()];
        let mut seen: HashSet<S> = HashSet::from([start.clone()]);
        let mut frontier = VecDeque::from([start]);

        while let Some(state) = frontier.pop_front() {
            for action in model.actions(&state) {
                let outcomes = model.transitions(&state, &action);
                check_outcomes(&outcomes, &(&state, &action))?;
                for outcome in outcomes {
                    if seen.contains(&outcome.next_state) {
                        continue;
                    }
                    if states.len() >= max_states {
                        return Err(Error::StateCapExceeded { limit: max_states });
                    }
                    seen.insert(outcome.next_state.clone());
                    states.push(outcome.next_state.clone());
                    frontier.push_back(outcome.next_state);
                }
            }
        }

        debug!(states = states.len(), "state graph enumerated");
        Ok(Self { states })
    }

    /// States in discovery order (start state first).
    pub fn states(&self) -> &[S] {
        &self.states
    }

    /// Number of distinct reachable states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the graph is empty (never true for a well-formed model).
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Whether `state` was discovered.
    pub fn contains(&self, state: &S) -> bool {
        self.states.contains(state)
    }
}
