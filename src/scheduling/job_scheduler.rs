use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};

use crate::scheduling::types::Job;

/// Hands out due jobs one at a time. The routine check is due immediately,
/// the first heartbeat one full period after start. A due heartbeat goes
/// first so back-to-back overdue checks cannot starve it.
pub struct JobScheduler {
    routine_check: Interval,
    heartbeat: Interval,
}

impl JobScheduler {
    pub fn new(check_every: Duration, heartbeat_every: Duration) -> Self {
        let mut routine_check = interval(check_every);
        routine_check.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut heartbeat = interval_at(Instant::now() + heartbeat_every, heartbeat_every);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self {
            routine_check,
            heartbeat,
        }
    }

    pub async fn next(&mut self) -> Job {
        tokio::select! {
            biased;

            _ = self.heartbeat.tick() => Job::Heartbeat,
            _ = self.routine_check.tick() => Job::RoutineCheck,
        }
    }
}
