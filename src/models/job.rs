//! Job intake values: request types and due-date countdowns.

use serde::{Deserialize, Serialize};

/// Stringing request category.
///
/// The tag combines turnaround class (`Spd` same-day, `Exp` next-day,
/// `Std` three-day) with string material (`Reg` regular, `Smt` synthetic).
/// The derived ordering is the canonical ordering used everywhere jobs or
/// actions need a deterministic order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum JobType {
    /// Same-day, regular string.
    SpdReg,
    /// Same-day, synthetic string.
    SpdSmt,
    /// Next-day, regular string.
    ExpReg,
    /// Next-day, synthetic string.
    ExpSmt,
    /// Standard three-day, regular string.
    StdReg,
    /// Standard three-day, synthetic string.
    StdSmt,
}

impl JobType {
    /// All types, in canonical order.
    pub const ALL: [JobType; 6] = [
        JobType::SpdReg,
        JobType::SpdSmt,
        JobType::ExpReg,
        JobType::ExpSmt,
        JobType::StdReg,
        JobType::StdSmt,
    ];

    /// Promised turnaround in days: how many days a fresh request of this
    /// type has until it is due.
    pub fn lead_time_days(&self) -> i32 {
        match self {
            JobType::SpdReg | JobType::SpdSmt => 0,
            JobType::ExpReg | JobType::ExpSmt => 1,
            JobType::StdReg | JobType::StdSmt => 3,
        }
    }

    /// Tag as it appears in intake records.
    pub fn code(&self) -> &'static str {
        match self {
            JobType::SpdReg => "SpdReg",
            JobType::SpdSmt => "SpdSMT",
            JobType::ExpReg => "ExpReg",
            JobType::ExpSmt => "ExpSMT",
            JobType::StdReg => "StdReg",
            JobType::StdSmt => "StdSMT",
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// One pending stringing job: its request type and how many days remain
/// until it is due. Zero means due today; negative means overdue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Job {
    /// Request category.
    pub job_type: JobType,
    /// Days until due; decremented once per day the job waits.
    pub days_until_due: i32,
}

impl Job {
    /// Creates a job with an explicit countdown.
    pub fn new(job_type: JobType, days_until_due: i32) -> Self {
        Self {
            job_type,
            days_until_due,
        }
    }

    /// Creates a freshly-taken-in job, due after its type's lead time.
    pub fn intake(job_type: JobType) -> Self {
        Self::new(job_type, job_type.lead_time_days())
    }

    /// The job after waiting one more day.
    pub fn aged(&self) -> Self {
        Self::new(self.job_type, self.days_until_due - 1)
    }
}

impl std::fmt::Display for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.job_type, self.days_until_due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_times() {
        assert_eq!(JobType::SpdReg.lead_time_days(), 0);
        assert_eq!(JobType::ExpSmt.lead_time_days(), 1);
        assert_eq!(JobType::StdReg.lead_time_days(), 3);
    }

    #[test]
    fn test_intake_due_matches_lead_time() {
        for job_type in JobType::ALL {
            assert_eq!(
                Job::intake(job_type).days_until_due,
                job_type.lead_time_days()
            );
        }
    }

    #[test]
    fn test_aged_decrements_due() {
        let job = Job::intake(JobType::StdReg);
        assert_eq!(job.aged().days_until_due, 2);
        assert_eq!(job.aged().aged().aged().aged().days_until_due, -1);
    }

    #[test]
    fn test_ordering_is_type_then_due() {
        let mut jobs = vec![
            Job::new(JobType::StdReg, 1),
            Job::new(JobType::SpdReg, 0),
            Job::new(JobType::StdReg, 0),
        ];
        jobs.sort();
        assert_eq!(
            jobs,
            vec![
                Job::new(JobType::SpdReg, 0),
                Job::new(JobType::StdReg, 0),
                Job::new(JobType::StdReg, 1),
            ]
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let job = Job::new(JobType::ExpSmt, 1);
        let json = serde_json::to_string(&job).unwrap();
        assert_eq!(serde_json::from_str::<Job>(&json).unwrap(), job);
    }
}
