//! The stringing shop as a Markov decision process.

use serde::{Deserialize, Serialize};

use super::{Job, RewardTable};
use crate::mdp::{MdpModel, Outcome};

/// World at one decision point: the pending jobs and the day index.
///
/// `pending` is always sorted (the canonical job order), so states that
/// differ only in intake order compare equal. Days count from 1; a state
/// past the shop's horizon is terminal.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ShopState {
    /// Jobs waiting to be processed, sorted.
    pub pending: Vec<Job>,
    /// Day index, starting at 1.
    pub day: u32,
}

impl ShopState {
    /// Creates a state, sorting `pending` into canonical order.
    pub fn new(mut pending: Vec<Job>, day: u32) -> Self {
        pending.sort();
        Self { pending, day }
    }
}

/// The subset of pending jobs to process this day, sorted.
///
/// An empty set is the no-op action of a day with nothing pending.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ProcessJobs(pub Vec<Job>);

impl ProcessJobs {
    /// Creates an action, sorting the jobs into canonical order.
    pub fn new(mut jobs: Vec<Job>) -> Self {
        jobs.sort();
        Self(jobs)
    }
}

/// Default headroom above daily capacity before intake is turned away.
pub const DEFAULT_BACKLOG_SLACK: usize = 5;

/// A racquet-stringing shop scheduling its daily workload.
///
/// Each day the shop processes up to `max_per_day` of its pending jobs,
/// collects their rewards per the [`RewardTable`], ages everything left
/// over, and takes in the next day's arrivals (up to a bounded backlog,
/// which keeps the reachable state set finite). The horizon `num_days`
/// makes the state graph a finite DAG, so the undiscounted model is safe
/// for value iteration.
///
/// With a non-zero return probability, each processed job independently
/// bounces back from an unsatisfied customer and re-enters the next day's
/// queue with a refreshed countdown; the outcome list then enumerates
/// every return subset with product probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringingShop {
    intake: Vec<Vec<Job>>,
    max_per_day: usize,
    num_days: u32,
    backlog_slack: usize,
    return_probability: f64,
    rewards: RewardTable,
}

impl StringingShop {
    /// Creates a shop over per-day intake groups.
    ///
    /// `num_days` is clamped to the number of intake days. Day 1 starts
    /// with the first group already pending; the group for day `d + 1`
    /// arrives while transitioning out of day `d`.
    pub fn new(intake: Vec<Vec<Job>>, max_per_day: usize, num_days: u32) -> Self {
        let num_days = num_days.min(intake.len() as u32);
        Self {
            intake,
            max_per_day,
            num_days,
            backlog_slack: DEFAULT_BACKLOG_SLACK,
            return_probability: 0.0,
            rewards: RewardTable::default(),
        }
    }

    /// Sets the probability that a processed job bounces back.
    ///
    /// # Panics
    /// Panics if `p` is outside `[0, 1]`.
    pub fn with_return_probability(mut self, p: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&p),
            "return probability must be in [0, 1], got {p}"
        );
        self.return_probability = p;
        self
    }

    /// Sets how many jobs beyond daily capacity may queue up before
    /// further intake is turned away.
    pub fn with_backlog_slack(mut self, slack: usize) -> Self {
        self.backlog_slack = slack;
        self
    }

    /// Replaces the reward table.
    pub fn with_rewards(mut self, rewards: RewardTable) -> Self {
        self.rewards = rewards;
        self
    }

    /// Daily processing capacity.
    pub fn max_per_day(&self) -> usize {
        self.max_per_day
    }

    /// Planning horizon in days.
    pub fn num_days(&self) -> u32 {
        self.num_days
    }

    fn backlog_cap(&self) -> usize {
        self.max_per_day + self.backlog_slack
    }

    /// Pending jobs with the action's jobs removed (one instance each).
    fn remaining_after(&self, pending: &[Job], action: &ProcessJobs) -> Vec<Job> {
        let mut remaining = pending.to_vec();
        for job in &action.0 {
            if let Some(index) = remaining.iter().position(|j| j == job) {
                remaining.remove(index);
            }
        }
        remaining
    }

    /// Successor pending list and base reward, before any customer returns.
    fn settle_day(&self, state: &ShopState, action: &ProcessJobs) -> (Vec<Job>, f64) {
        let mut reward: f64 = action.0.iter().map(|j| self.rewards.processing_reward(j)).sum();

        let mut remaining: Vec<Job> =
            self.remaining_after(&state.pending, action).iter().map(Job::aged).collect();

        // Next day's arrivals, turned away once the backlog is full.
        if let Some(arrivals) = self.intake.get(state.day as usize) {
            for job in arrivals {
                if remaining.len() >= self.backlog_cap() {
                    break;
                }
                remaining.push(*job);
            }
        }
        remaining.sort();

        for job in &remaining {
            reward += self.rewards.holdover_penalty(job.days_until_due);
        }
        (remaining, reward)
    }
}

impl MdpModel for StringingShop {
    type State = ShopState;
    type Action = ProcessJobs;

    fn start_state(&self) -> ShopState {
        ShopState::new(self.intake.first().cloned().unwrap_or_default(), 1)
    }

    fn actions(&self, state: &ShopState) -> Vec<ProcessJobs> {
        if state.day > self.num_days {
            return Vec::new();
        }
        if state.pending.len() <= self.max_per_day {
            // Everything fits; processing it all dominates any subset.
            return vec![ProcessJobs(state.pending.clone())];
        }
        let mut actions: Vec<ProcessJobs> = combinations(&state.pending, self.max_per_day)
            .into_iter()
            .map(ProcessJobs)
            .collect();
        // Duplicate jobs in the backlog yield duplicate subsets.
        actions.sort();
        actions.dedup();
        actions
    }

    fn transitions(&self, state: &ShopState, action: &ProcessJobs) -> Vec<Outcome<ShopState>> {
        if state.day > self.num_days {
            return Vec::new();
        }
        let (remaining, reward) = self.settle_day(state, action);
        let next_day = state.day + 1;

        let p = self.return_probability;
        if p == 0.0 || action.0.is_empty() {
            return vec![Outcome::new(ShopState::new(remaining, next_day), 1.0, reward)];
        }

        // Each processed job independently bounces back with probability p
        // and rejoins the queue with a refreshed countdown.
        let processed = &action.0;
        let mut outcomes = Vec::with_capacity(1 << processed.len());
        for mask in 0u32..(1 << processed.len()) {
            let mut pending = remaining.clone();
            let mut probability = 1.0;
            for (i, job) in processed.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    probability *= p;
                    pending.push(Job::intake(job.job_type));
                } else {
                    probability *= 1.0 - p;
                }
            }
            outcomes.push(Outcome::new(
                ShopState::new(pending, next_day),
                probability,
                reward,
            ));
        }
        outcomes
    }

    fn discount(&self) -> f64 {
        1.0
    }
}

/// All size-`k` combinations of `items`, in lexicographic index order.
fn combinations(items: &[Job], k: usize) -> Vec<Vec<Job>> {
    let n = items.len();
    if k > n {
        return Vec::new();
    }
    let mut result = Vec::new();
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        result.push(indices.iter().map(|&i| items[i]).collect());
        // Advance the rightmost index that still has room.
        let mut i = k;
        loop {
            if i == 0 {
                return result;
            }
            i -= 1;
            if indices[i] != i + n - k {
                break;
            }
        }
        indices[i] += 1;
        for j in i + 1..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}
