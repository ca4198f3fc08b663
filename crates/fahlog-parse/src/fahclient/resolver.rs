use crate::common;
use fahlog_types::LogLineType;

/// Classify one FahClient log line. First match wins.
///
/// `:0x.. Version` must be tested before the bare ` Version: ` banner, and
/// `:Unpaused` before `:Paused` (the former contains the latter).
pub fn resolve_line_type(line: &str) -> LogLineType {
    if common::is_work_unit_running(line) {
        return LogLineType::WorkUnitRunning;
    }
    if line.contains("*********************** Log Started") {
        return LogLineType::LogOpen;
    }
    if line.contains(":Sending unit results:") {
        return LogLineType::ClientSendWorkToServer;
    }
    if line.contains(":Requesting new work unit for slot") {
        return LogLineType::WorkUnitWorking;
    }
    if line.trim_end().ends_with(":Starting") {
        return LogLineType::WorkUnitWorking;
    }
    if line.contains(":Running FahCore:") {
        return LogLineType::WorkUnitCallingCore;
    }
    if line.contains(":0x") && line.contains("Version") {
        return LogLineType::WorkUnitCoreVersion;
    }
    if line.contains(" Version: ") {
        return LogLineType::ClientVersion;
    }
    if line.contains(" Args: ") {
        return LogLineType::ClientArguments;
    }
    if line.contains(":Project:") {
        return LogLineType::WorkUnitProject;
    }
    if line.contains(":Completed ") {
        return LogLineType::WorkUnitFrame;
    }
    if line.contains(":Folding@home Core Shutdown:") {
        return LogLineType::WorkUnitCoreShutdown;
    }
    if line.contains("FahCore returned: ") {
        return LogLineType::WorkUnitCoreReturn;
    }
    if line.contains(":Cleaning up") {
        return LogLineType::WorkUnitCleaningUp;
    }
    if line.contains(":Unpaused") {
        return LogLineType::WorkUnitResume;
    }
    if line.contains(":Paused") {
        return LogLineType::WorkUnitPaused;
    }
    LogLineType::None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_literal_samples() {
        let samples = [
            (
                "*********************** Log Started 2012-01-11T03:24:22Z ***********************",
                LogLineType::LogOpen,
            ),
            ("03:24:22:        Version: 7.1.43", LogLineType::ClientVersion),
            (
                "03:24:22:           Args: --lifeline 2600 --command-port=36330",
                LogLineType::ClientArguments,
            ),
            (
                "03:25:32:WU01:FS01:Requesting new work unit for slot 01: RUNNING smp:4 from 171.64.65.104",
                LogLineType::WorkUnitWorking,
            ),
            ("03:25:36:WU01:FS01:Starting", LogLineType::WorkUnitWorking),
            (
                "03:25:36:WU01:FS01:Running FahCore: /usr/bin/FAHCoreWrapper",
                LogLineType::WorkUnitCallingCore,
            ),
            (
                "03:25:37:WU01:FS01:0xa4:Version 2.27 (Dec 7, 2011)",
                LogLineType::WorkUnitCoreVersion,
            ),
            (
                "03:25:37:WU01:FS01:0xa4:Project: 7610 (Run 630, Clone 0, Gen 59)",
                LogLineType::WorkUnitProject,
            ),
            (
                "03:25:52:WU01:FS01:0xa4:Completed 0 out of 2000000 steps  (0%)",
                LogLineType::WorkUnitFrame,
            ),
            (
                "04:21:37:WU01:FS01:0xa4:Folding@home Core Shutdown: FINISHED_UNIT",
                LogLineType::WorkUnitCoreShutdown,
            ),
            (
                "04:21:38:WU01:FS01:FahCore returned: FINISHED_UNIT (100 = 0x64)",
                LogLineType::WorkUnitCoreReturn,
            ),
            (
                "04:21:39:WU01:FS01:Sending unit results: id:01 state:SEND",
                LogLineType::ClientSendWorkToServer,
            ),
            ("04:21:52:WU01:FS01:Cleaning up", LogLineType::WorkUnitCleaningUp),
            ("05:10:02:WU00:FS00:Paused", LogLineType::WorkUnitPaused),
            ("05:14:45:WU00:FS00:Unpaused", LogLineType::WorkUnitResume),
            (
                "03:25:45:WU01:FS01:0xa4:Entering M.D.",
                LogLineType::WorkUnitRunning,
            ),
            ("03:24:22:       Website: http://folding.stanford.edu/", LogLineType::None),
            ("", LogLineType::None),
        ];
        for (raw, expected) in samples {
            assert_eq!(resolve_line_type(raw), expected, "line: {:?}", raw);
        }
    }

    #[test]
    fn unpaused_is_not_paused() {
        assert_eq!(
            resolve_line_type("05:14:45:WU00:FS00:Unpaused"),
            LogLineType::WorkUnitResume
        );
    }

    #[test]
    fn core_version_beats_client_version_banner() {
        // A core banner carries both `:0x` and `Version`; the client banner
        // carries neither routing prefix nor core id.
        assert_eq!(
            resolve_line_type("03:25:37:WU01:FS01:0xa4:Version 2.27 (Dec 7, 2011)"),
            LogLineType::WorkUnitCoreVersion
        );
        assert_eq!(
            resolve_line_type("03:24:22:        Version: 7.1.43"),
            LogLineType::ClientVersion
        );
    }
}
