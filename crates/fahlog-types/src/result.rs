use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome string reported by a core on shutdown or return.
///
/// Terminating results close the unit run that produced them. Non-terminating
/// results (`INTERRUPTED`, `CORE_OUTDATED`, ...) leave the unit open: the
/// client retries the same queue index and later lines keep attaching to the
/// same unit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkUnitResult {
    Unknown,
    FinishedUnit,
    EarlyUnitEnd,
    UnstableMachine,
    Interrupted,
    BadWorkUnit,
    CoreOutdated,
    GpuMemtestError,
    ClientCoreError,
    UnknownEnum,
}

impl WorkUnitResult {
    /// Map the literal result token from the log to a variant.
    ///
    /// Unrecognized tokens map to `Unknown` rather than failing, so a new
    /// core binary cannot abort a scan.
    pub fn from_token(token: &str) -> WorkUnitResult {
        match token {
            "FINISHED_UNIT" => WorkUnitResult::FinishedUnit,
            "EARLY_UNIT_END" => WorkUnitResult::EarlyUnitEnd,
            "UNSTABLE_MACHINE" => WorkUnitResult::UnstableMachine,
            "INTERRUPTED" => WorkUnitResult::Interrupted,
            "BAD_WORK_UNIT" => WorkUnitResult::BadWorkUnit,
            "CORE_OUTDATED" => WorkUnitResult::CoreOutdated,
            "GPU_MEMTEST_ERROR" => WorkUnitResult::GpuMemtestError,
            "CLIENT_CORE_ERROR" => WorkUnitResult::ClientCoreError,
            "UNKNOWN_ENUM" => WorkUnitResult::UnknownEnum,
            _ => WorkUnitResult::Unknown,
        }
    }

    /// Whether this result closes the unit run that reported it.
    pub fn is_terminating(&self) -> bool {
        matches!(
            self,
            WorkUnitResult::FinishedUnit
                | WorkUnitResult::EarlyUnitEnd
                | WorkUnitResult::UnstableMachine
                | WorkUnitResult::BadWorkUnit
                | WorkUnitResult::ClientCoreError
        )
    }

    /// Whether this result counts toward a slot's failed-unit counter.
    ///
    /// The closed failure set: everything terminating except the one success
    /// result. Non-terminating results count toward neither counter.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            WorkUnitResult::EarlyUnitEnd
                | WorkUnitResult::UnstableMachine
                | WorkUnitResult::BadWorkUnit
                | WorkUnitResult::ClientCoreError
        )
    }

    pub fn as_token(&self) -> &'static str {
        match self {
            WorkUnitResult::Unknown => "UNKNOWN",
            WorkUnitResult::FinishedUnit => "FINISHED_UNIT",
            WorkUnitResult::EarlyUnitEnd => "EARLY_UNIT_END",
            WorkUnitResult::UnstableMachine => "UNSTABLE_MACHINE",
            WorkUnitResult::Interrupted => "INTERRUPTED",
            WorkUnitResult::BadWorkUnit => "BAD_WORK_UNIT",
            WorkUnitResult::CoreOutdated => "CORE_OUTDATED",
            WorkUnitResult::GpuMemtestError => "GPU_MEMTEST_ERROR",
            WorkUnitResult::ClientCoreError => "CLIENT_CORE_ERROR",
            WorkUnitResult::UnknownEnum => "UNKNOWN_ENUM",
        }
    }
}

impl fmt::Display for WorkUnitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}
