use crate::common;
use fahlog_types::LogLineType;

/// A full line of `#` characters opens (or continues) a run header banner.
const HEADER_LINE: &str =
    "###############################################################################";

/// Classify one Legacy log line.
///
/// The cascade is first-match-wins and the order is load-bearing: several
/// patterns are substrings of one another (`Folding@Home Client Version`
/// must be tested before `] Version`, the client shutdown banner before the
/// core shutdown would be harmless but is kept adjacent for clarity).
pub fn resolve_line_type(line: &str) -> LogLineType {
    if common::is_work_unit_running(line) {
        return LogLineType::WorkUnitRunning;
    }
    if line.contains("--- Opening Log file") {
        return LogLineType::LogOpen;
    }
    if line.contains(HEADER_LINE) {
        return LogLineType::LogHeader;
    }
    if line.contains("Folding@Home Client Version") {
        return LogLineType::ClientVersion;
    }
    if line.contains("] Sending work to server") {
        return LogLineType::ClientSendWorkToServer;
    }
    if line.contains("] - Autosending finished units") {
        return LogLineType::ClientAutosendStart;
    }
    if line.contains("] - Autosend completed") {
        return LogLineType::ClientAutosendComplete;
    }
    if line.contains("] + Attempting to send results") {
        return LogLineType::ClientSendStart;
    }
    if line.contains("] + Results successfully sent") {
        return LogLineType::ClientSendComplete;
    }
    if line.contains("] - Error: Could not transmit unit") {
        return LogLineType::ClientSendFailed;
    }
    if line.contains("] - Arguments:") {
        return LogLineType::ClientArguments;
    }
    if line.contains("] - User name:") {
        return LogLineType::ClientUserNameAndTeam;
    }
    if line.contains("] - User ID") {
        return LogLineType::ClientUserId;
    }
    if line.contains("] - Machine ID") {
        return LogLineType::ClientMachineId;
    }
    if line.contains("] + Processing work unit") {
        return LogLineType::WorkUnitProcessing;
    }
    if line.contains("] + Downloading new core") {
        return LogLineType::WorkUnitCoreDownload;
    }
    if line.contains("] Working on queue slot") {
        return LogLineType::WorkUnitQueueIndex;
    }
    if line.contains("] + Working ...") {
        return LogLineType::WorkUnitWorking;
    }
    if line.contains("] - Calling") {
        return LogLineType::WorkUnitCallingCore;
    }
    if line.contains("] *------------------------------*") {
        return LogLineType::WorkUnitStart;
    }
    if line.contains("] Version") {
        return LogLineType::WorkUnitCoreVersion;
    }
    if line.contains("] Project:") {
        return LogLineType::WorkUnitProject;
    }
    if line.contains("] Completed ") {
        return LogLineType::WorkUnitFrame;
    }
    if line.contains("] + Paused") {
        return LogLineType::WorkUnitPaused;
    }
    if line.contains("] + Running on battery power") {
        return LogLineType::WorkUnitPausedForBattery;
    }
    if line.contains("] + Off battery, restarting core") {
        return LogLineType::WorkUnitResumeFromBattery;
    }
    if line.contains("] - Shutting down core") {
        return LogLineType::WorkUnitShuttingDownCore;
    }
    if line.contains("] Folding@home Core Shutdown:") {
        return LogLineType::WorkUnitCoreShutdown;
    }
    if line.contains("] + Number of Units Completed") {
        return LogLineType::ClientNumberOfUnitsCompleted;
    }
    if line.contains("] Client-core communications error") {
        return LogLineType::ClientCoreCommunicationsError;
    }
    if line.contains("] This is a sign of more serious problems, shutting down.") {
        return LogLineType::ClientCoreCommunicationsErrorShutdown;
    }
    if line.contains("Folding@Home will go to sleep for 1 day") {
        return LogLineType::ClientEuePauseState;
    }
    if line.contains("Folding@Home Client Shutdown") {
        return LogLineType::ClientShutdown;
    }
    LogLineType::None
}

#[cfg(test)]
mod tests {
    use super::*;

    // Literal samples: the substring table is a wire contract with real
    // client binaries, so each classification is pinned against a line taken
    // from an actual log.
    #[test]
    fn classifies_literal_samples() {
        let samples = [
            ("--- Opening Log file [December 19 15:33:15 UTC]", LogLineType::LogOpen),
            (HEADER_LINE, LogLineType::LogHeader),
            ("                       Folding@Home Client Version 6.34", LogLineType::ClientVersion),
            ("[15:33:15] - Arguments: -smp -verbosity 9", LogLineType::ClientArguments),
            ("[15:33:16] - User name: harlam357 (Team 32)", LogLineType::ClientUserNameAndTeam),
            ("[15:33:16] - User ID: 1A2B3C4D5E6F7890", LogLineType::ClientUserId),
            ("[15:33:16] - Machine ID: 1", LogLineType::ClientMachineId),
            ("[15:34:59] + Processing work unit", LogLineType::WorkUnitProcessing),
            ("[15:35:01] + Downloading new core", LogLineType::WorkUnitCoreDownload),
            ("[15:35:10] Working on queue slot 01 [December 19 15:35:10 UTC]", LogLineType::WorkUnitQueueIndex),
            ("[15:35:10] + Working ...", LogLineType::WorkUnitWorking),
            ("[15:35:11] - Calling './FahCore_a4.exe -dir work/ -nice 19 -np 4'", LogLineType::WorkUnitCallingCore),
            ("[15:35:20] *------------------------------*", LogLineType::WorkUnitStart),
            ("[15:35:21] Version 2.27 (Mar 12, 2010)", LogLineType::WorkUnitCoreVersion),
            ("[15:35:23] Project: 2677 (Run 10, Clone 29, Gen 28)", LogLineType::WorkUnitProject),
            ("[15:47:38] Completed 2500 out of 250000 steps  (1%)", LogLineType::WorkUnitFrame),
            ("[16:01:52] + Paused", LogLineType::WorkUnitPaused),
            ("[16:03:47] + Running on battery power", LogLineType::WorkUnitPausedForBattery),
            ("[16:11:58] + Off battery, restarting core", LogLineType::WorkUnitResumeFromBattery),
            ("[23:12:42] - Shutting down core", LogLineType::WorkUnitShuttingDownCore),
            ("[23:12:43] Folding@home Core Shutdown: FINISHED_UNIT", LogLineType::WorkUnitCoreShutdown),
            ("[23:12:59] Sending work to server", LogLineType::ClientSendWorkToServer),
            ("[23:13:01] + Attempting to send results [December 19 23:13:01 UTC]", LogLineType::ClientSendStart),
            ("[23:13:44] + Results successfully sent", LogLineType::ClientSendComplete),
            ("[23:13:50] - Autosending finished units [December 19 23:13:50 UTC]", LogLineType::ClientAutosendStart),
            ("[23:13:55] - Autosend completed", LogLineType::ClientAutosendComplete),
            ("[23:14:01] + Number of Units Completed: 169", LogLineType::ClientNumberOfUnitsCompleted),
            ("[23:14:20] Client-core communications error: ERROR 0x1", LogLineType::ClientCoreCommunicationsError),
            ("[23:14:21] This is a sign of more serious problems, shutting down.", LogLineType::ClientCoreCommunicationsErrorShutdown),
            ("Folding@Home will go to sleep for 1 day as it could not connect to any work servers.", LogLineType::ClientEuePauseState),
            ("Folding@Home Client Shutdown.", LogLineType::ClientShutdown),
            ("[15:35:30] Preparing to commence simulation", LogLineType::WorkUnitRunning),
            ("[15:35:30] - Digital signature verified", LogLineType::WorkUnitRunning),
            ("[15:35:32] Entering M.D.", LogLineType::WorkUnitRunning),
            ("[15:36:10] Extra SSE boost OK.", LogLineType::None),
            ("", LogLineType::None),
        ];
        for (raw, expected) in samples {
            assert_eq!(resolve_line_type(raw), expected, "line: {:?}", raw);
        }
    }

    #[test]
    fn client_version_wins_over_core_version() {
        // The client banner must not be mistaken for a core `] Version` line.
        assert_eq!(
            resolve_line_type("                       Folding@Home Client Version 6.34"),
            LogLineType::ClientVersion
        );
        assert_eq!(
            resolve_line_type("[15:35:21] Version 2.27 (Mar 12, 2010)"),
            LogLineType::WorkUnitCoreVersion
        );
    }

    #[test]
    fn running_evidence_wins_over_everything() {
        // The cross-dialect pre-check runs before the dialect cascade.
        assert_eq!(
            resolve_line_type("[15:35:30] Project: 2677 - Preparing to commence simulation"),
            LogLineType::WorkUnitRunning
        );
    }
}
