use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde_json::json;

use fahlog_engine::RunLog;
use fahlog_types::{Dialect, WorkUnitResult};

pub fn handle(file: &Path, dialect: Dialect, json: bool) -> Result<()> {
    let log = RunLog::read_file(file, dialect)
        .with_context(|| format!("failed to read log file {}", file.display()))?;

    if json {
        return print_json(&log);
    }

    println!(
        "{}",
        format!(
            "{:<4} {:<5} {:<6} {:<28} {:<6} {:>7} {:<16} {:<12}",
            "run", "slot", "queue", "project", "core", "frames", "result", "lines"
        )
        .bold()
    );
    for (n, run) in log.client_runs().iter().enumerate() {
        for slot in run.slot_runs() {
            for unit in slot.unit_runs() {
                let data = unit.data();
                let project = data
                    .project
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "-".to_owned());
                let queue = unit
                    .queue_index()
                    .map(|q| q.to_string())
                    .unwrap_or_else(|| "-".to_owned());
                let core = data
                    .core_version
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "-".to_owned());
                let span = match unit.end_index() {
                    Some(end) => format!("{}-{}", unit.start_index() + 1, end + 1),
                    None => format!("{}-", unit.start_index() + 1),
                };
                let result = match data.result {
                    Some(WorkUnitResult::FinishedUnit) => {
                        WorkUnitResult::FinishedUnit.to_string().green().to_string()
                    }
                    Some(r) if r.is_failure() => r.to_string().red().to_string(),
                    Some(r) => r.to_string(),
                    None if unit.is_complete() => "-".to_owned(),
                    None => "in progress".dimmed().to_string(),
                };
                println!(
                    "{:<4} {:<5} {:<6} {:<28} {:<6} {:>7} {:<16} {:<12}",
                    n + 1,
                    slot.slot_id(),
                    queue,
                    project,
                    core,
                    data.frames_observed,
                    result,
                    span
                );
            }
        }
    }
    Ok(())
}

fn print_json(log: &RunLog) -> Result<()> {
    let mut units = Vec::new();
    for (n, run) in log.client_runs().iter().enumerate() {
        for slot in run.slot_runs() {
            for unit in slot.unit_runs() {
                units.push(json!({
                    "run": n + 1,
                    "slot_id": slot.slot_id(),
                    "queue_index": unit.queue_index(),
                    "start_index": unit.start_index(),
                    "end_index": unit.end_index(),
                    "is_complete": unit.is_complete(),
                    "data": unit.data(),
                }));
            }
        }
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({ "units": units }))?
    );
    Ok(())
}
