use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::common;
use crate::error::Result;
use fahlog_types::ProjectInfo;

/// Contents of a v6 `unitinfo.txt` sidecar file. Every field is optional;
/// the file is rewritten in place by the client and is often mid-update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitInfo {
    pub name: Option<String>,
    pub tag: Option<String>,
    pub download_time: Option<NaiveDateTime>,
    pub due_time: Option<NaiveDateTime>,
    /// Percent complete, as the integer the client printed.
    pub progress: Option<u32>,
}

static PROJECT_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"P(?P<p>\d+)R(?P<r>\d+)C(?P<c>\d+)G(?P<g>\d+)").unwrap());

/// Decode a work unit tag like `P2677R10C29G28` into its project tuple.
pub fn project_from_tag(tag: &str) -> Option<ProjectInfo> {
    let caps = PROJECT_TAG_RE.captures(tag)?;
    Some(ProjectInfo {
        project: caps["p"].parse().ok()?,
        run: caps["r"].parse().ok()?,
        clone: caps["c"].parse().ok()?,
        generation: caps["g"].parse().ok()?,
    })
}

/// Parse `unitinfo.txt` text. Unknown keys and malformed values are
/// skipped, never fatal.
pub fn parse_unit_info(text: &str) -> UnitInfo {
    let mut info = UnitInfo::default();
    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Name" => info.name = Some(value.to_owned()),
            "Tag" => info.tag = Some(value.to_owned()),
            "Download time" => info.download_time = common::parse_month_name_datetime(value),
            "Due time" => info.due_time = common::parse_month_name_datetime(value),
            "Progress" => {
                info.progress = value
                    .split_whitespace()
                    .next()
                    .and_then(|tok| tok.trim_end_matches('%').parse().ok());
            }
            _ => {}
        }
    }
    info
}

pub fn read_unit_info(path: impl AsRef<Path>) -> Result<UnitInfo> {
    let text = fs::read_to_string(path)?;
    Ok(parse_unit_info(&text))
}
