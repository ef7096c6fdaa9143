//! Day-by-day job scheduling as a Markov decision process.
//!
//! Models a stringing shop that processes a bounded number of jobs per day,
//! each with a type tag and a due-date countdown, and solves the resulting
//! MDP two independent ways:
//!
//! - **exact**: breadth-first state enumeration plus value iteration over
//!   the enumerated graph ([`solver`]);
//! - **approximate**: Q-learning with linear function approximation and
//!   epsilon-greedy exploration, trained by simulated episodes
//!   ([`learning`]).
//!
//! Both talk to the domain only through the [`mdp::MdpModel`] contract, so
//! any finite MDP plugs in; the stringing shop in [`models`] is one such
//! domain. Comparing the two policies, reporting, and loading intake data
//! from files are all left to callers.
//!
//! # Modules
//!
//! - **`mdp`**: the model contract, transition outcomes, state-graph
//!   enumeration
//! - **`solver`**: Bellman fixed-point value iteration
//! - **`learning`**: Q-learning agent, feature extractors, episode simulator
//! - **`models`**: the concrete stringing-shop domain and its reward table
//! - **`error`**: shared error types
//!
//! # Example
//!
//! ```
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//! use rl_schedule::learning::{IdentityFeatures, QLearningAgent, Simulator};
//! use rl_schedule::mdp::MdpModel;
//! use rl_schedule::models::{Job, JobType, StringingShop};
//! use rl_schedule::solver::ValueIteration;
//!
//! let shop = StringingShop::new(
//!     vec![
//!         vec![Job::intake(JobType::StdReg), Job::intake(JobType::ExpReg)],
//!         vec![Job::intake(JobType::SpdReg)],
//!     ],
//!     1, // one job per day
//!     2, // two-day horizon
//! );
//!
//! // Exact policy.
//! let exact = ValueIteration::new().solve(&shop)?;
//!
//! // Learned policy from simulated episodes.
//! let mut agent =
//!     QLearningAgent::new(&shop, IdentityFeatures, SmallRng::seed_from_u64(42));
//! let mut simulator = Simulator::new(SmallRng::seed_from_u64(42));
//! let learned = simulator.run(&shop, &mut agent)?;
//!
//! assert!(exact.policy.contains_key(&shop.start_state()));
//! assert_eq!(learned.episode_rewards.len(), 100);
//! # Ok::<(), rl_schedule::error::Error>(())
//! ```
//!
//! # References
//!
//! - Puterman (1994), "Markov Decision Processes"
//! - Sutton & Barto (2018), "Reinforcement Learning: An Introduction"

pub mod error;
pub mod learning;
pub mod mdp;
pub mod models;
pub mod solver;
