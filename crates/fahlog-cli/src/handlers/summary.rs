use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde_json::json;

use fahlog_engine::RunLog;
use fahlog_types::Dialect;

pub fn handle(file: &Path, dialect: Dialect, json: bool) -> Result<()> {
    let log = RunLog::read_file(file, dialect)
        .with_context(|| format!("failed to read log file {}", file.display()))?;

    if json {
        return print_json(&log);
    }

    if log.client_runs().is_empty() {
        println!("No client runs found in {}", file.display());
        return Ok(());
    }

    for (n, run) in log.client_runs().iter().enumerate() {
        let data = run.data();
        println!(
            "{} {}",
            format!("Run {}", n + 1).bold(),
            format!("(line {})", run.client_start_index() + 1).dimmed()
        );
        if let Some(start) = data.start_time {
            println!("  started   {}", start);
        }
        if let Some(version) = &data.client_version {
            println!("  client    v{}", version);
        }
        if let (Some(id), Some(team)) = (&data.folding_id, data.team) {
            println!("  identity  {} (team {})", id, team);
        }
        if let Some(args) = &data.arguments {
            println!("  args      {}", args.dimmed());
        }

        for slot in run.slot_runs() {
            let slot_data = run
                .slot_data(slot.slot_id())
                .unwrap_or_default();
            let mut tallies = format!(
                "{} completed, {} failed",
                slot_data.completed_units.to_string().green(),
                slot_data.failed_units.to_string().red()
            );
            if let Some(total) = slot_data.total_completed_units {
                tallies.push_str(&format!(", {} lifetime", total));
            }
            println!(
                "  slot {:02}   {} units, {} [{}]",
                slot.slot_id(),
                slot.unit_runs().len(),
                tallies,
                slot_data.status
            );
        }
        println!();
    }
    Ok(())
}

fn print_json(log: &RunLog) -> Result<()> {
    let runs: Vec<_> = log
        .client_runs()
        .iter()
        .map(|run| {
            let slots: Vec<_> = run
                .slot_runs()
                .iter()
                .map(|slot| {
                    json!({
                        "slot_id": slot.slot_id(),
                        "unit_count": slot.unit_runs().len(),
                        "data": run.slot_data(slot.slot_id()),
                    })
                })
                .collect();
            json!({
                "start_index": run.client_start_index(),
                "data": run.data(),
                "slots": slots,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&json!({ "runs": runs }))?);
    Ok(())
}
