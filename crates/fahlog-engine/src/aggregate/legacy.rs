use fahlog_parse::LogLine;
use fahlog_types::{LogLineData, LogLineType, SlotStatus, WorkUnitResult};

use super::{SlotRunData, UnitRunData, observe_frame};
use crate::run::UnitRun;

/// Fold one Legacy unit's lines into its derived data.
pub(crate) fn unit_data(lines: &[LogLine]) -> UnitRunData {
    let mut data = UnitRunData::default();
    let mut paused = false;
    for line in lines {
        match line.line_type() {
            LogLineType::WorkUnitPaused | LogLineType::WorkUnitPausedForBattery => {
                paused = true;
            }
            LogLineType::WorkUnitResume | LogLineType::WorkUnitResumeFromBattery => {
                if paused {
                    // The live frame counter restarts after a pause; the
                    // unit's start time does not.
                    data.frames_observed = 0;
                    paused = false;
                }
            }
            LogLineType::WorkUnitProcessing
            | LogLineType::WorkUnitWorking
            | LogLineType::WorkUnitStart
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
            LogLineType::ClientCoreCommunicationsError => {
                data.result = Some(WorkUnitResult::ClientCoreError);
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
            LogLineData::CoreThreads(threads) => data.threads = *threads,
            LogLineData::Project(project) => {
                // A project line after frames began belongs to the next
                // unit's chatter, not this one's identity.
                if data.project.is_none() && data.frames.is_empty() {
                    data.project = Some(*project);
                }
            }
            LogLineData::Frame(frame) => observe_frame(&mut data, line, *frame),
            LogLineData::CoreShutdown(result) => data.result = Some(*result),
            _ => {}
        }
    }
    data
}

/// Fold one Legacy slot: production counters from its units, the client's
/// lifetime counter, and a last-match-wins status scan.
pub(crate) fn slot_data(units: &[UnitRun], parent_lines: &[LogLine]) -> SlotRunData {
    let mut data = SlotRunData::default();
    for unit in units {
        match unit.data().result {
            Some(WorkUnitResult::FinishedUnit) => data.completed_units += 1,
            Some(result) if result.is_failure() => data.failed_units += 1,
            _ => {}
        }
    }

    let mut best_index = None;
    let unit_lines = units.iter().flat_map(UnitRun::log_lines);
    for line in unit_lines.chain(parent_lines) {
        if let Some(Ok(LogLineData::UnitsCompleted(n))) = line.data()
            && best_index.is_none_or(|idx| line.index() > idx)
        {
            best_index = Some(line.index());
            data.total_completed_units = Some(*n);
        }
    }

    // The run's own lines only speak for a slot that has no units yet; once
    // a unit exists, its lines are the sole status source.
    data.status = match units.last() {
        Some(unit) => status_scan(unit.log_lines()),
        None => status_scan(parent_lines),
    }
    .unwrap_or_default();
    data
}

/// The last status-bearing line wins.
fn status_scan(lines: &[LogLine]) -> Option<SlotStatus> {
    let mut status = None;
    for line in lines {
        let next = match line.line_type() {
            LogLineType::WorkUnitWorking
            | LogLineType::WorkUnitRunning
            | LogLineType::WorkUnitStart
            | LogLineType::WorkUnitFrame
            | LogLineType::WorkUnitResume
            | LogLineType::WorkUnitResumeFromBattery => SlotStatus::Running,
            LogLineType::WorkUnitPaused | LogLineType::WorkUnitPausedForBattery => {
                SlotStatus::Paused
            }
            LogLineType::ClientSendWorkToServer | LogLineType::ClientSendStart => {
                SlotStatus::SendingWorkPacket
            }
            LogLineType::WorkUnitProcessing | LogLineType::WorkUnitCoreDownload => {
                SlotStatus::GettingWorkPacket
            }
            LogLineType::ClientEuePauseState => SlotStatus::EuePause,
            LogLineType::ClientShutdown
            | LogLineType::ClientCoreCommunicationsErrorShutdown => SlotStatus::Stopped,
            _ => continue,
        };
        status = Some(next);
    }
    status
}
