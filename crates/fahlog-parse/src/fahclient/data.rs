use chrono::{DateTime, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::common;
use crate::line::{LineDataResult, LogLine};
use fahlog_types::{LogLineData, LogLineParseError, LogLineType, WorkUnitResult};

/// Extract the typed payload for a FahClient line, if its tag carries one.
pub fn parse_line_data(line: &LogLine) -> Option<LineDataResult> {
    let raw = line.raw();
    match line.line_type() {
        LogLineType::LogOpen => Some(parse_log_open(raw)),
        LogLineType::ClientVersion => Some(parse_client_version(raw)),
        LogLineType::ClientArguments => Some(parse_arguments(raw)),
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
        LogLineType::WorkUnitCoreReturn => Some(parse_core_return(raw)),
        _ => None,
    }
}

static LOG_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Log Started\s+(?P<stamp>\S+)").unwrap());

fn parse_log_open(raw: &str) -> LineDataResult {
    let caps = LOG_OPEN_RE
        .captures(raw)
        .ok_or_else(|| LogLineParseError::new(format!("malformed log open line: {raw}")))?;
    let stamp = &caps["stamp"];
    // v7 writes RFC 3339 with a Z suffix; some builds drop the offset.
    let when: NaiveDateTime = match DateTime::parse_from_rfc3339(stamp) {
        Ok(dt) => dt.naive_utc(),
        Err(_) => NaiveDateTime::parse_from_str(stamp, "%Y-%m-%dT%H:%M:%S").map_err(|err| {
            LogLineParseError::new(format!("unreadable log open timestamp {stamp}: {err}"))
        })?,
    };
    Ok(LogLineData::LogOpen(when))
}

static CLIENT_VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Version:\s+(?P<ver>\S+)").unwrap());

fn parse_client_version(raw: &str) -> LineDataResult {
    let caps = CLIENT_VERSION_RE
        .captures(raw)
        .ok_or_else(|| LogLineParseError::new(format!("malformed client version line: {raw}")))?;
    Ok(LogLineData::ClientVersion(caps["ver"].to_owned()))
}

fn parse_arguments(raw: &str) -> LineDataResult {
    let args = raw
        .split_once(" Args: ")
        .map(|(_, rest)| rest.trim())
        .ok_or_else(|| LogLineParseError::new(format!("malformed args line: {raw}")))?;
    Ok(LogLineData::ClientArguments(args.to_owned()))
}

static CORE_RETURN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"FahCore returned:\s*(?P<r>\w+)").unwrap());

fn parse_core_return(raw: &str) -> LineDataResult {
    let caps = CORE_RETURN_RE
        .captures(raw)
        .ok_or_else(|| LogLineParseError::new(format!("malformed core return line: {raw}")))?;
    Ok(LogLineData::CoreReturn(WorkUnitResult::from_token(
        &caps["r"],
    )))
}
