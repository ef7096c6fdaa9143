//! Exact dynamic-programming solver.
//!
//! Computes the optimal value function and a deterministic policy by
//! repeated application of the Bellman optimality operator over the
//! enumerated state graph.
//!
//! # References
//!
//! - Bellman (1957), "Dynamic Programming"
//! - Puterman (1994), "Markov Decision Processes", Ch. 6

mod value_iteration;

pub use value_iteration::{ValueIteration, ValueIterationConfig, ValueIterationSolution};
