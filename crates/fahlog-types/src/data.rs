use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::project::ProjectInfo;
use crate::result::WorkUnitResult;

/// One parsed frame-progress line.
///
/// `raw_done` / `raw_total` are the step counts exactly as printed by the
/// core; the GPU-only `Completed N%` form stores `N` out of an implied 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameData {
    /// Frame ID accepted by the tolerance check (typically a percentage).
    pub id: u32,
    pub raw_done: u32,
    pub raw_total: u32,
}

/// Typed payload extracted from a classified log line.
///
/// Only a subset of classifications carries a payload; the rest of the tags
/// are pure markers consumed by the assembly and aggregation passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLineData {
    /// Client start timestamp from the log-open banner. Legacy banners omit
    /// the year; those parse with year 1.
    LogOpen(NaiveDateTime),
    ClientVersion(String),
    ClientArguments(String),
    UserNameAndTeam { folding_id: String, team: u32 },
    UserId(String),
    MachineId(u32),
    /// Local queue slot the client is working on.
    QueueIndex(u32),
    /// Thread count passed to the core (`-np N`); 0 when absent.
    CoreThreads(u32),
    CoreVersion(f32),
    Project(ProjectInfo),
    Frame(FrameData),
    CoreShutdown(WorkUnitResult),
    CoreReturn(WorkUnitResult),
    /// Lifetime completed-unit counter printed by the Legacy client.
    UnitsCompleted(u32),
}
