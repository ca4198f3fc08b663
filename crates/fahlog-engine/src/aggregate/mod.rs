//! Derived-statistic folds over the run tree.
//!
//! Each fold walks the lines its node owns and nothing else; the caches in
//! [`crate::run`] decide when a fold reruns. Parse errors inside a line are
//! treated as absent data, never as a fold failure.

pub(crate) mod fahclient;
pub(crate) mod legacy;

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;

use fahlog_parse::LogLine;
use fahlog_types::{FrameData, LogLineData, ProjectInfo, SlotStatus, WorkUnitResult};

/// Client-wide identity facts, folded first-match-wins over the lines a
/// client run owns directly (not its units' lines).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientRunData {
    pub start_time: Option<NaiveDateTime>,
    pub client_version: Option<String>,
    pub arguments: Option<String>,
    pub folding_id: Option<String>,
    pub team: Option<u32>,
    pub user_id: Option<String>,
    pub machine_id: Option<u32>,
}

/// Per-slot production counters and current status.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlotRunData {
    pub completed_units: u32,
    pub failed_units: u32,
    /// The client's own lifetime counter, when the log reports one.
    pub total_completed_units: Option<u32>,
    pub status: SlotStatus,
}

/// One observed frame boundary within a unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameRecord {
    pub id: u32,
    pub raw_done: u32,
    pub raw_total: u32,
    pub timestamp: Option<NaiveTime>,
    /// Wall time since the previous frame, when both ends are stamped.
    pub duration: Option<Duration>,
}

/// Per-unit progress facts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnitRunData {
    pub start_time: Option<NaiveTime>,
    /// Frames seen since the unit started or last resumed from a pause.
    pub frames_observed: u32,
    pub core_version: Option<f32>,
    pub threads: u32,
    pub project: Option<ProjectInfo>,
    pub result: Option<WorkUnitResult>,
    pub frames: BTreeMap<u32, FrameRecord>,
}

impl UnitRunData {
    /// The highest frame id observed, if any frame parsed.
    pub fn last_frame(&self) -> Option<&FrameRecord> {
        self.frames.values().next_back()
    }
}

/// Fold the client identity facts. First value per field wins; later
/// restarts of the same banner do not overwrite.
pub(crate) fn client_data(lines: &[LogLine]) -> ClientRunData {
    let mut data = ClientRunData::default();
    for line in lines {
        let Some(Ok(payload)) = line.data() else {
            continue;
        };
        match payload {
            LogLineData::LogOpen(when) => {
                if data.start_time.is_none() {
                    data.start_time = Some(*when);
                }
            }
            LogLineData::ClientVersion(ver) => {
                if data.client_version.is_none() {
                    data.client_version = Some(ver.clone());
                }
            }
            LogLineData::ClientArguments(args) => {
                if data.arguments.is_none() {
                    data.arguments = Some(args.clone());
                }
            }
            LogLineData::UserNameAndTeam { folding_id, team } => {
                if data.folding_id.is_none() {
                    data.folding_id = Some(folding_id.clone());
                    data.team = Some(*team);
                }
            }
            LogLineData::UserId(id) => {
                if data.user_id.is_none() {
                    data.user_id = Some(id.clone());
                }
            }
            LogLineData::MachineId(id) => {
                if data.machine_id.is_none() {
                    data.machine_id = Some(*id);
                }
            }
            _ => {}
        }
    }
    data
}

/// Record one parsed frame: bump the live counter, stamp the record, and
/// derive its duration from the previous frame when both are stamped.
pub(crate) fn observe_frame(data: &mut UnitRunData, line: &LogLine, frame: FrameData) {
    data.frames_observed += 1;
    let timestamp = line.timestamp();
    let duration = timestamp.and_then(|now| {
        let prev = frame
            .id
            .checked_sub(1)
            .and_then(|prev_id| data.frames.get(&prev_id))?
            .timestamp?;
        let mut delta = now.signed_duration_since(prev);
        if delta < chrono::Duration::zero() {
            // Wall-clock times carry no date; a negative gap means the
            // clock rolled past midnight between frames.
            delta = delta + chrono::Duration::hours(24);
        }
        delta.to_std().ok()
    });
    data.frames.insert(
        frame.id,
        FrameRecord {
            id: frame.id,
            raw_done: frame.raw_done,
            raw_total: frame.raw_total,
            timestamp,
            duration,
        },
    );
}
