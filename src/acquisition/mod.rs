// Acquisition state machine: poll cadence, fetch orchestration, dashboard snapshot

mod cycle;
mod poller;
mod snapshot;

pub use cycle::{Event, fetch_with_timeout, run_cycle};
pub use poller::{Acquisition, PollStats, PollerConfig, PollerDeps, spawn};
pub use snapshot::{CycleId, DashboardSnapshot, Status, Transition};
