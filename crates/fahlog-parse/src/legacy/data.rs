use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::common;
use crate::line::{LineDataResult, LogLine};
use fahlog_types::{LogLineData, LogLineParseError, LogLineType};

/// Extract the typed payload for a Legacy line, if its tag carries one.
///
/// Returns `None` for tags with no payload grammar. Tags that do carry one
/// always return `Some`; a malformed body surfaces as `Err` rather than a
/// panic, so one corrupt line never takes down a whole-file parse.
pub fn parse_line_data(line: &LogLine) -> Option<LineDataResult> {
    let raw = line.raw();
    match line.line_type() {
        LogLineType::LogOpen => Some(parse_log_open(raw)),
        LogLineType::ClientVersion => Some(parse_client_version(raw)),
        LogLineType::ClientArguments => Some(parse_arguments(raw)),
        LogLineType::ClientUserNameAndTeam => Some(parse_user_name_and_team(raw)),
        LogLineType::ClientUserId => Some(parse_user_id(raw)),
        LogLineType::ClientMachineId => Some(parse_machine_id(raw)),
        LogLineType::WorkUnitQueueIndex => Some(parse_queue_index(raw)),
        LogLineType::WorkUnitCallingCore => Some(parse_core_threads(raw)),
        LogLineType::WorkUnitCoreVersion => {
            Some(common::parse_core_version(raw).map(LogLineData::CoreVersion))
        }
        LogLineType::WorkUnitProject => {
            Some(common::parse_project(raw).map(LogLineData::Project))
        }
        LogLineType::WorkUnitFrame => Some(common::parse_frame(raw).map(LogLineData::Frame)),
        LogLineType::WorkUnitCoreShutdown => {
            Some(common::parse_core_shutdown(raw).map(LogLineData::CoreShutdown))
        }
        LogLineType::ClientNumberOfUnitsCompleted => Some(parse_units_completed(raw)),
        _ => None,
    }
}

static LOG_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"--- Opening Log file \[(?P<stamp>[^\]]+)\]").unwrap());

fn parse_log_open(raw: &str) -> LineDataResult {
    let caps = LOG_OPEN_RE
        .captures(raw)
        .ok_or_else(|| LogLineParseError::new(format!("malformed log open line: {raw}")))?;
    let stamp = &caps["stamp"];
    let when: NaiveDateTime = common::parse_month_name_datetime(stamp)
        .ok_or_else(|| LogLineParseError::new(format!("unreadable log open timestamp: {stamp}")))?;
    Ok(LogLineData::LogOpen(when))
}

static CLIENT_VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Folding@Home Client Version\s+(?P<ver>\S+)").unwrap());

fn parse_client_version(raw: &str) -> LineDataResult {
    let caps = CLIENT_VERSION_RE
        .captures(raw)
        .ok_or_else(|| LogLineParseError::new(format!("malformed client version line: {raw}")))?;
    Ok(LogLineData::ClientVersion(caps["ver"].to_owned()))
}

fn parse_arguments(raw: &str) -> LineDataResult {
    let args = raw
        .split_once("- Arguments: ")
        .map(|(_, rest)| rest.trim())
        .ok_or_else(|| LogLineParseError::new(format!("malformed arguments line: {raw}")))?;
    Ok(LogLineData::ClientArguments(args.to_owned()))
}

static USER_TEAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"- User name:\s+(?P<name>\S+)\s+\(Team\s+(?P<team>\d+)\)").unwrap());

fn parse_user_name_and_team(raw: &str) -> LineDataResult {
    let caps = USER_TEAM_RE
        .captures(raw)
        .ok_or_else(|| LogLineParseError::new(format!("malformed user name line: {raw}")))?;
    let team = caps["team"]
        .parse::<u32>()
        .map_err(|err| LogLineParseError::new(format!("bad team number: {err}")))?;
    Ok(LogLineData::UserNameAndTeam {
        folding_id: caps["name"].to_owned(),
        team,
    })
}

// Covers both v6 shapes: `- User ID: X` and `- User ID = X` (the latter is
// printed when the ID was assigned on this run).
static USER_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"- User ID\s*[:=]\s*(?P<id>\S+)").unwrap());

fn parse_user_id(raw: &str) -> LineDataResult {
    let caps = USER_ID_RE
        .captures(raw)
        .ok_or_else(|| LogLineParseError::new(format!("malformed user id line: {raw}")))?;
    Ok(LogLineData::UserId(caps["id"].to_owned()))
}

static MACHINE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"- Machine ID:\s*(?P<id>\d+)").unwrap());

fn parse_machine_id(raw: &str) -> LineDataResult {
    let caps = MACHINE_ID_RE
        .captures(raw)
        .ok_or_else(|| LogLineParseError::new(format!("malformed machine id line: {raw}")))?;
    let id = caps["id"]
        .parse::<u32>()
        .map_err(|err| LogLineParseError::new(format!("bad machine id: {err}")))?;
    Ok(LogLineData::MachineId(id))
}

static QUEUE_INDEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Working on queue slot (?P<q>\d+)").unwrap());

fn parse_queue_index(raw: &str) -> LineDataResult {
    let caps = QUEUE_INDEX_RE
        .captures(raw)
        .ok_or_else(|| LogLineParseError::new(format!("malformed queue slot line: {raw}")))?;
    let q = caps["q"]
        .parse::<u32>()
        .map_err(|err| LogLineParseError::new(format!("bad queue index: {err}")))?;
    Ok(LogLineData::QueueIndex(q))
}

static CORE_THREADS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-np\s+(?P<n>\d+)").unwrap());

fn parse_core_threads(raw: &str) -> LineDataResult {
    // A calling line without `-np` is a single-threaded core, not an error.
    let threads = match CORE_THREADS_RE.captures(raw) {
        Some(caps) => caps["n"]
            .parse::<u32>()
            .map_err(|err| LogLineParseError::new(format!("bad thread count: {err}")))?,
        None => 0,
    };
    Ok(LogLineData::CoreThreads(threads))
}

static UNITS_COMPLETED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Number of Units Completed:\s*(?P<n>\d+)").unwrap());

fn parse_units_completed(raw: &str) -> LineDataResult {
    let caps = UNITS_COMPLETED_RE
        .captures(raw)
        .ok_or_else(|| LogLineParseError::new(format!("malformed units completed line: {raw}")))?;
    let n = caps["n"]
        .parse::<u32>()
        .map_err(|err| LogLineParseError::new(format!("bad completed count: {err}")))?;
    Ok(LogLineData::UnitsCompleted(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use fahlog_types::Dialect;

    fn line(raw: &str) -> LogLine {
        LogLine::parse(Dialect::Legacy, 0, raw.to_owned())
    }

    fn payload(raw: &str) -> LogLineData {
        line(raw).data().cloned().unwrap().unwrap()
    }

    #[test]
    fn log_open_carries_year_one_datetime() {
        let data = payload("--- Opening Log file [December 19 15:33:15 UTC]");
        let LogLineData::LogOpen(when) = data else {
            panic!("wrong payload");
        };
        assert_eq!(
            when.date(),
            NaiveDate::from_ymd_opt(1, 12, 19).unwrap()
        );
        assert_eq!((when.hour(), when.minute(), when.second()), (15, 33, 15));
    }

    #[test]
    fn client_version() {
        assert_eq!(
            payload("                       Folding@Home Client Version 6.34"),
            LogLineData::ClientVersion("6.34".to_owned())
        );
    }

    #[test]
    fn arguments_keep_everything_after_marker() {
        assert_eq!(
            payload("[15:33:15] - Arguments: -smp -verbosity 9"),
            LogLineData::ClientArguments("-smp -verbosity 9".to_owned())
        );
    }

    #[test]
    fn user_name_and_team() {
        assert_eq!(
            payload("[15:33:16] - User name: harlam357 (Team 32)"),
            LogLineData::UserNameAndTeam {
                folding_id: "harlam357".to_owned(),
                team: 32,
            }
        );
    }

    #[test]
    fn user_id_both_shapes() {
        assert_eq!(
            payload("[15:33:16] - User ID: 1A2B3C4D5E6F7890"),
            LogLineData::UserId("1A2B3C4D5E6F7890".to_owned())
        );
        assert_eq!(
            payload("[15:33:16] - User ID = 1A2B3C4D5E6F7890 (new)"),
            LogLineData::UserId("1A2B3C4D5E6F7890".to_owned())
        );
    }

    #[test]
    fn machine_and_queue_ids() {
        assert_eq!(payload("[15:33:16] - Machine ID: 1"), LogLineData::MachineId(1));
        assert_eq!(
            payload("[15:35:10] Working on queue slot 01 [December 19 15:35:10 UTC]"),
            LogLineData::QueueIndex(1)
        );
    }

    #[test]
    fn core_threads_default_to_zero_without_np() {
        assert_eq!(
            payload("[15:35:11] - Calling './FahCore_a4.exe -dir work/ -nice 19 -np 4'"),
            LogLineData::CoreThreads(4)
        );
        assert_eq!(
            payload("[15:35:11] - Calling './FahCore_78.exe -dir work/ -nice 19'"),
            LogLineData::CoreThreads(0)
        );
    }

    #[test]
    fn units_completed() {
        assert_eq!(
            payload("[23:14:01] + Number of Units Completed: 169"),
            LogLineData::UnitsCompleted(169)
        );
    }

    #[test]
    fn malformed_payload_is_an_error_not_a_panic() {
        let l = line("--- Opening Log file [not a date]");
        assert!(l.data().unwrap().is_err());
    }

    #[test]
    fn tags_without_payload_yield_none() {
        assert!(line("[15:35:10] + Working ...").data().is_none());
    }
}
