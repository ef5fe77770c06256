#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    RoutineCheck,
    Heartbeat,
}
