//! Concrete scheduling domain: a racquet-stringing shop.
//!
//! Implements the [`MdpModel`](crate::mdp::MdpModel) contract for a shop
//! that strings a bounded number of racquets per day. Each pending job
//! carries a type tag and a days-until-due countdown; each day the shop
//! picks which jobs to process, collects their rewards, and pays penalties
//! for whatever it lets slip past its due date.
//!
//! Intake records arrive already grouped by day — reading and grouping
//! them from files is the caller's concern, not this crate's.

mod job;
mod reward;
mod shop;

pub use job::{Job, JobType};
pub use reward::{DueTomorrowPenalty, RewardTable};
pub use shop::{ProcessJobs, ShopState, StringingShop};
