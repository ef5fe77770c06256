pub mod job_scheduler;
pub mod types;
