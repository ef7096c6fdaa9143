//! Reward table for the stringing shop.
//!
//! Collects every dollar amount the shop model pays or charges, so the
//! economics can be tuned without touching the transition logic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Job, JobType};

/// Penalty charged per unprocessed job that will be due tomorrow
/// (`days_until_due <= 0` after the daily decrement).
///
/// The shop's historical books computed this as `10·d − 1` dollars for a
/// countdown of `d`, which reads as an operator-precedence slip for the
/// intended `(d − 1)·10`. Both formulas are offered: [`Scaled`] is the
/// presumable intent and the default, [`Legacy`] reproduces the historical
/// arithmetic exactly for anyone reconciling against old numbers.
///
/// [`Scaled`]: DueTomorrowPenalty::Scaled
/// [`Legacy`]: DueTomorrowPenalty::Legacy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DueTomorrowPenalty {
    /// `(d − 1) · per_day` dollars.
    Scaled { per_day: f64 },
    /// `10 · d − 1` dollars, precedence slip included.
    Legacy,
}

impl Default for DueTomorrowPenalty {
    fn default() -> Self {
        DueTomorrowPenalty::Scaled { per_day: 10.0 }
    }
}

impl DueTomorrowPenalty {
    fn amount(&self, days_until_due: i32) -> f64 {
        let d = f64::from(days_until_due);
        match self {
            DueTomorrowPenalty::Scaled { per_day } => (d - 1.0) * per_day,
            DueTomorrowPenalty::Legacy => 10.0 * d - 1.0,
        }
    }
}

/// Dollar amounts for processing and holding jobs.
///
/// Processing a job pays its type's base reward plus a small urgency bonus
/// that favors older jobs of the same type. Holding a job overnight costs
/// nothing until it nears its due date, then the due-tomorrow and overdue
/// penalties kick in (both return negative contributions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardTable {
    /// Base reward per job type, in dollars.
    pub base_rewards: BTreeMap<JobType, f64>,
    /// Bonus per day a job has aged past intake, breaking reward ties in
    /// favor of older jobs. Small by design.
    pub urgency_bonus_per_day: f64,
    /// Penalty per day overdue for each unprocessed job.
    pub overdue_penalty_per_day: f64,
    /// Policy for jobs that will be due tomorrow.
    pub due_tomorrow_penalty: DueTomorrowPenalty,
}

impl Default for RewardTable {
    fn default() -> Self {
        let base_rewards = BTreeMap::from([
            (JobType::SpdReg, 40.0),
            (JobType::SpdSmt, 18.0),
            (JobType::ExpReg, 30.0),
            (JobType::ExpSmt, 18.0),
            (JobType::StdReg, 20.0),
            (JobType::StdSmt, 18.0),
        ]);
        Self {
            base_rewards,
            urgency_bonus_per_day: 0.01,
            overdue_penalty_per_day: 20.0,
            due_tomorrow_penalty: DueTomorrowPenalty::default(),
        }
    }
}

impl RewardTable {
    /// Overrides the base reward for one job type.
    pub fn with_base_reward(mut self, job_type: JobType, amount: f64) -> Self {
        self.base_rewards.insert(job_type, amount);
        self
    }

    /// Sets the due-tomorrow penalty policy.
    pub fn with_due_tomorrow_penalty(mut self, penalty: DueTomorrowPenalty) -> Self {
        self.due_tomorrow_penalty = penalty;
        self
    }

    /// Sets the per-day overdue penalty.
    pub fn with_overdue_penalty_per_day(mut self, amount: f64) -> Self {
        self.overdue_penalty_per_day = amount;
        self
    }

    /// Base reward for a job type.
    pub fn base_reward(&self, job_type: JobType) -> f64 {
        self.base_rewards.get(&job_type).copied().unwrap_or(0.0)
    }

    /// Reward for processing `job` today, evaluated at its pre-decrement
    /// countdown: base reward plus the urgency bonus for every day the job
    /// has already waited.
    pub fn processing_reward(&self, job: &Job) -> f64 {
        let days_waited = job.job_type.lead_time_days() - job.days_until_due;
        self.base_reward(job.job_type) + self.urgency_bonus_per_day * f64::from(days_waited)
    }

    /// Reward contribution (≤ 0) of holding a job overnight, evaluated at
    /// its post-decrement countdown.
    pub fn holdover_penalty(&self, days_until_due: i32) -> f64 {
        let mut penalty = 0.0;
        if days_until_due < 0 {
            penalty += self.overdue_penalty_per_day * f64::from(days_until_due);
        }
        if days_until_due <= 0 {
            penalty += self.due_tomorrow_penalty.amount(days_until_due);
        }
        penalty
    }
}
