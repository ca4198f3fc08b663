use serde::{Deserialize, Serialize};
use std::fmt;

/// Current activity of a compute slot, derived from a Legacy run's most
/// recent lines. The last matching signal wins, not the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Unknown,
    Paused,
    Running,
    Stopped,
    EuePause,
    GettingWorkPacket,
    SendingWorkPacket,
}

impl Default for SlotStatus {
    fn default() -> Self {
        SlotStatus::Unknown
    }
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Unknown => "unknown",
            SlotStatus::Paused => "paused",
            SlotStatus::Running => "running",
            SlotStatus::Stopped => "stopped",
            SlotStatus::EuePause => "EUE pause",
            SlotStatus::GettingWorkPacket => "getting work packet",
            SlotStatus::SendingWorkPacket => "sending work packet",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
