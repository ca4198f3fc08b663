use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use fahlog_types::{FrameData, LogLineParseError, ProjectInfo, WorkUnitResult};

/// Dialect-agnostic pre-check for "unit is executing" evidence.
///
/// Every core family prints at least one of these fixed strings shortly after
/// it starts working, across both log dialects.
pub(crate) fn is_work_unit_running(line: &str) -> bool {
    line.contains("Preparing to commence simulation")
        || line.contains("Called DecompressByteArray")
        || line.contains("Digital signature verified")
        || line.contains("Digital signatures verified")
        || line.contains("Entering M.D.")
}

static FRAME_STEPS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Completed (?P<done>\d+) out of (?P<total>\d+) steps\s+\((?P<pct>[^)]+)\)")
        .expect("frame steps regex")
});

static FRAME_GPU_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Completed (?P<pct>\d+)%").expect("gpu frame regex"));

/// Percent sub-grammars: `N percent`, `N%`, or a bare integer.
fn parse_percent(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Some(stripped) = text.strip_suffix(" percent") {
        return stripped.trim().parse().ok();
    }
    if let Some(stripped) = text.strip_suffix('%') {
        return stripped.trim().parse().ok();
    }
    text.parse().ok()
}

/// Accept `percent` as the frame ID iff it agrees with the step counts to
/// within 0.1 of a point. As a secondary tolerance, also accept `percent + 1`
/// for the core family whose boundary reporting is off by one. Rounding
/// differs across core binaries; the 0.1 window absorbs exactly that and
/// nothing more.
fn accept_frame_id(done: u32, total: u32, percent: i64) -> Option<i64> {
    if total == 0 {
        return None;
    }
    let calculated = done as f64 / total as f64 * 100.0;
    if (calculated - percent as f64).abs() <= 0.1 {
        return Some(percent);
    }
    let bumped = percent + 1;
    if (calculated - bumped as f64).abs() <= 0.1 {
        return Some(bumped);
    }
    None
}

/// Parse a frame-completion line in either the stepped form
/// (`Completed D out of T steps (P%)`) or the GPU-only percent form
/// (`Completed P%`, implied total of 100).
pub(crate) fn parse_frame(raw: &str) -> Result<FrameData, LogLineParseError> {
    if let Some(caps) = FRAME_STEPS_RE.captures(raw) {
        let done: u32 = caps["done"]
            .parse()
            .map_err(|_| LogLineParseError::new(format!("unreadable step count: {}", &caps["done"])))?;
        let total: u32 = caps["total"]
            .parse()
            .map_err(|_| LogLineParseError::new(format!("unreadable step total: {}", &caps["total"])))?;
        let percent = parse_percent(&caps["pct"]).ok_or_else(|| {
            LogLineParseError::new(format!("unreadable percent token: {}", &caps["pct"]))
        })?;
        let id = accept_frame_id(done, total, percent).ok_or_else(|| {
            LogLineParseError::new(format!(
                "percent {} disagrees with {}/{} steps",
                percent, done, total
            ))
        })?;
        return Ok(FrameData {
            id: id as u32,
            raw_done: done,
            raw_total: total,
        });
    }
    if let Some(caps) = FRAME_GPU_RE.captures(raw) {
        let percent: u32 = caps["pct"]
            .parse()
            .map_err(|_| LogLineParseError::new(format!("unreadable percent: {}", &caps["pct"])))?;
        // GPU cores report whole percentages with no step counts; the total
        // is pinned at 100 regardless of the work item's true frame count.
        return Ok(FrameData {
            id: percent,
            raw_done: percent,
            raw_total: 100,
        });
    }
    Err(LogLineParseError::new(format!(
        "no frame grammar matched: {:?}",
        raw
    )))
}

static CORE_VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Version:?\s+(?P<ver>\d+\.\d+)").expect("core version regex"));

/// Core version float. The `Version:` spelling (with a colon) is the
/// secondary pattern used by the GPU core family.
pub(crate) fn parse_core_version(raw: &str) -> Result<f32, LogLineParseError> {
    let caps = CORE_VERSION_RE
        .captures(raw)
        .ok_or_else(|| LogLineParseError::new(format!("no core version in line: {:?}", raw)))?;
    caps["ver"]
        .parse()
        .map_err(|_| LogLineParseError::new(format!("unreadable core version: {}", &caps["ver"])))
}

static PROJECT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"Project:\s+(?P<project>\d+)\s+\(Run\s+(?P<run>\d+),\s+Clone\s+(?P<clone>\d+),\s+Gen\s+(?P<gen>\d+)\)",
    )
    .expect("project regex")
});

pub(crate) fn parse_project(raw: &str) -> Result<ProjectInfo, LogLineParseError> {
    let caps = PROJECT_RE
        .captures(raw)
        .ok_or_else(|| LogLineParseError::new(format!("no project identity in line: {:?}", raw)))?;
    let field = |name: &str| -> Result<u32, LogLineParseError> {
        caps[name]
            .parse()
            .map_err(|_| LogLineParseError::new(format!("unreadable project {}: {}", name, &caps[name])))
    };
    Ok(ProjectInfo {
        project: field("project")?,
        run: field("run")?,
        clone: field("clone")?,
        generation: field("gen")?,
    })
}

static CORE_SHUTDOWN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Folding@home Core Shutdown:\s*(?P<result>\S+)").expect("core shutdown regex")
});

pub(crate) fn parse_core_shutdown(raw: &str) -> Result<WorkUnitResult, LogLineParseError> {
    let caps = CORE_SHUTDOWN_RE
        .captures(raw)
        .ok_or_else(|| LogLineParseError::new(format!("no shutdown result in line: {:?}", raw)))?;
    Ok(WorkUnitResult::from_token(&caps["result"]))
}

fn month_number(name: &str) -> Option<u32> {
    match name {
        "January" => Some(1),
        "February" => Some(2),
        "March" => Some(3),
        "April" => Some(4),
        "May" => Some(5),
        "June" => Some(6),
        "July" => Some(7),
        "August" => Some(8),
        "September" => Some(9),
        "October" => Some(10),
        "November" => Some(11),
        "December" => Some(12),
        _ => None,
    }
}

/// Month-name timestamp used by Legacy open banners and the unit-info side
/// channel: `March 1 08:00:00`, optionally suffixed ` UTC`. The format has no
/// year; these parse with year 1.
pub(crate) fn parse_month_name_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim().trim_end_matches(" UTC").trim();
    let mut parts = text.split_whitespace();
    let month = month_number(parts.next()?)?;
    let day: u32 = parts.next()?.parse().ok()?;
    let time = NaiveTime::parse_from_str(parts.next()?, "%H:%M:%S").ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(NaiveDate::from_ymd_opt(1, month, day)?.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_evidence_is_cross_dialect() {
        assert!(is_work_unit_running(
            "[10:31:51] Preparing to commence simulation"
        ));
        assert!(is_work_unit_running(
            "14:15:47:WU01:FS00:0x17:Digital signatures verified"
        ));
        assert!(is_work_unit_running("[10:31:51] - Digital signature verified"));
        assert!(is_work_unit_running("[10:32:01] Entering M.D."));
        assert!(is_work_unit_running("[10:31:52] Called DecompressByteArray"));
        assert!(!is_work_unit_running("[10:31:51] + Working ..."));
    }

    #[test]
    fn frame_tolerance_accepts_matching_percent() {
        // 82499 / 250000 * 100 = 32.9996 -> within 0.1 of 33
        let frame =
            parse_frame("[11:39:31] Completed 82499 out of 250000 steps  (33%)").expect("frame");
        assert_eq!(frame.id, 33);
        assert_eq!(frame.raw_done, 82499);
        assert_eq!(frame.raw_total, 250000);
    }

    #[test]
    fn frame_tolerance_rejects_disagreeing_percent() {
        let err = parse_frame("[11:39:31] Completed 82499 out of 250000 steps  (50%)");
        assert!(err.is_err());
    }

    #[test]
    fn frame_tolerance_accepts_off_by_one_core_family() {
        // 82499 / 250000 * 100 = 32.9996; reported as 32, accepted as 33.
        let frame =
            parse_frame("[11:39:31] Completed 82499 out of 250000 steps  (32%)").expect("frame");
        assert_eq!(frame.id, 33);
    }

    #[test]
    fn frame_percent_sub_grammars() {
        let percent_word =
            parse_frame("[11:39:31] Completed 125000 out of 250000 steps  (50 percent)")
                .expect("percent word form");
        assert_eq!(percent_word.id, 50);
        let bare = parse_frame("[11:39:31] Completed 125000 out of 250000 steps  (50)")
            .expect("bare integer form");
        assert_eq!(bare.id, 50);
    }

    #[test]
    fn gpu_frame_implies_total_of_100() {
        let frame = parse_frame("[13:21:45] Completed 45%").expect("gpu frame");
        assert_eq!(frame.id, 45);
        assert_eq!(frame.raw_done, 45);
        assert_eq!(frame.raw_total, 100);
    }

    #[test]
    fn core_version_both_spellings() {
        assert_eq!(
            parse_core_version("[11:35:32] Version 2.27 (Mar 12, 2010)").expect("plain"),
            2.27
        );
        assert_eq!(
            parse_core_version("[11:35:32]   Version: 1.31").expect("gpu spelling"),
            1.31
        );
    }

    #[test]
    fn project_quadruple() {
        let project = parse_project("[11:35:33] Project: 2677 (Run 10, Clone 29, Gen 28)")
            .expect("project");
        assert_eq!(project, ProjectInfo::new(2677, 10, 29, 28));
    }

    #[test]
    fn shutdown_result_token() {
        assert_eq!(
            parse_core_shutdown("[11:55:01] Folding@home Core Shutdown: FINISHED_UNIT")
                .expect("shutdown"),
            WorkUnitResult::FinishedUnit
        );
    }

    #[test]
    fn month_name_timestamp_with_and_without_utc() {
        let stamp = parse_month_name_datetime("March 1 08:00:00").expect("stamp");
        assert_eq!(stamp.format("%m-%d %H:%M:%S").to_string(), "03-01 08:00:00");
        assert!(parse_month_name_datetime("December 19 15:33:15 UTC").is_some());
        assert!(parse_month_name_datetime("Someday 19 15:33:15").is_none());
    }
}
