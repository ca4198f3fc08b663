use serde::{Deserialize, Serialize};

/// Classification tag assigned to every line of a client log.
///
/// `None` marks text the resolvers did not recognize. Unrecognized lines are
/// not errors; they are kept so that the run tree can reproduce its input
/// verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogLineType {
    None,

    // Run boundaries
    LogOpen,
    LogHeader,

    // Client-scoped information
    ClientVersion,
    ClientArguments,
    ClientUserNameAndTeam,
    ClientUserId,
    ClientMachineId,
    ClientSendWorkToServer,
    ClientSendStart,
    ClientSendComplete,
    ClientSendFailed,
    ClientAutosendStart,
    ClientAutosendComplete,
    ClientNumberOfUnitsCompleted,
    ClientCoreCommunicationsError,
    ClientCoreCommunicationsErrorShutdown,
    ClientEuePauseState,
    ClientShutdown,

    // Work-unit lifecycle
    WorkUnitProcessing,
    WorkUnitCoreDownload,
    WorkUnitQueueIndex,
    WorkUnitWorking,
    WorkUnitCallingCore,
    WorkUnitStart,
    WorkUnitRunning,
    WorkUnitCoreVersion,
    WorkUnitProject,
    WorkUnitFrame,
    WorkUnitPaused,
    WorkUnitPausedForBattery,
    WorkUnitResume,
    WorkUnitResumeFromBattery,
    WorkUnitShuttingDownCore,
    WorkUnitCoreShutdown,
    WorkUnitCoreReturn,
    WorkUnitCleaningUp,
}
