use fahlog_parse::LogLine;
use fahlog_types::{LogLineData, LogLineType, WorkUnitResult};

use super::{SlotRunData, UnitRunData, observe_frame};
use crate::run::UnitRun;

/// Fold one FahClient unit's lines into its derived data.
pub(crate) fn unit_data(lines: &[LogLine]) -> UnitRunData {
    let mut data = UnitRunData::default();
    let mut paused = false;
    for line in lines {
        match line.line_type() {
            LogLineType::WorkUnitPaused => paused = true,
            LogLineType::WorkUnitResume => {
                if paused {
                    data.frames_observed = 0;
                    paused = false;
                }
            }
            LogLineType::WorkUnitWorking
            | LogLineType::WorkUnitRunning
            | LogLineType::WorkUnitFrame => {
                if paused {
                    data.frames_observed = 0;
                    paused = false;
                }
                if data.start_time.is_none() {
                    data.start_time = line.timestamp();
                }
            }
            _ => {}
        }
        let Some(Ok(payload)) = line.data() else {
            continue;
        };
        match payload {
            LogLineData::CoreVersion(ver) => {
                if data.core_version.is_none() {
                    data.core_version = Some(*ver);
                }
            }
            LogLineData::Project(project) => {
                if data.project.is_none() && data.frames.is_empty() {
                    data.project = Some(*project);
                }
            }
            LogLineData::Frame(frame) => observe_frame(&mut data, line, *frame),
            // The client's own report arrives after the core's; last wins,
            // so the two agree when both are present and the client's
            // verdict prevails when they differ.
            LogLineData::CoreShutdown(result) | LogLineData::CoreReturn(result) => {
                data.result = Some(*result);
            }
            _ => {}
        }
    }
    data
}

/// Fold one FahClient slot: counters only. v7 slot status comes from the
/// client's command socket, not its log, so the log-derived status stays
/// unknown.
pub(crate) fn slot_data(units: &[UnitRun]) -> SlotRunData {
    let mut data = SlotRunData::default();
    for unit in units {
        match unit.data().result {
            Some(WorkUnitResult::FinishedUnit) => data.completed_units += 1,
            Some(result) if result.is_failure() => data.failed_units += 1,
            _ => {}
        }
    }
    data
}
