use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use notify::{PollWatcher, RecursiveMode, Watcher};
use owo_colors::OwoColorize;

use fahlog_engine::RunLog;
use fahlog_parse::{LogLine, LogLineReader};
use fahlog_types::{Dialect, LogLineData, LogLineType, WorkUnitResult};

pub fn handle(file: &Path, dialect: Dialect) -> Result<()> {
    let mut reader = LogLineReader::open(file, dialect)
        .with_context(|| format!("failed to open log file {}", file.display()))?;
    let mut log = RunLog::new(dialect);

    // Catch up on what's already there before tailing.
    drain(&mut reader, &mut log)?;
    println!(
        "{} {} ({} lines so far)",
        "watching".bold(),
        file.display(),
        log.lines().len()
    );

    let (tx, rx) = channel();
    let config = notify::Config::default().with_poll_interval(Duration::from_millis(500));
    let mut watcher = PollWatcher::new(
        move |res: std::result::Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.send(event);
            }
        },
        config,
    )?;
    // Watch the parent directory: editors and the client itself replace the
    // file on rotation, and the directory keeps emitting events either way.
    let watch_dir = file.parent().filter(|p| !p.as_os_str().is_empty());
    watcher.watch(
        watch_dir.unwrap_or_else(|| Path::new(".")),
        RecursiveMode::NonRecursive,
    )?;

    loop {
        rx.recv().map_err(|_| anyhow!("watcher channel closed"))?;
        drain(&mut reader, &mut log)?;
    }
}

fn drain(reader: &mut LogLineReader<BufReader<File>>, log: &mut RunLog) -> Result<()> {
    while let Some(line) = reader.poll_line()? {
        report(&line);
        log.append(line);
    }
    Ok(())
}

/// One console line per interesting event; routine chatter stays quiet.
fn report(line: &LogLine) {
    match line.line_type() {
        LogLineType::LogOpen => {
            println!("{} client restarted", "==".bold());
        }
        LogLineType::WorkUnitProject => {
            if let Some(Ok(LogLineData::Project(project))) = line.data() {
                println!("{} project {}", "->".cyan(), project);
            }
        }
        LogLineType::WorkUnitFrame => {
            if let Some(Ok(LogLineData::Frame(frame))) = line.data() {
                let at = line
                    .timestamp()
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "--:--:--".to_owned());
                println!(
                    "{} frame {:>3} ({}/{}) at {}",
                    "..".dimmed(),
                    frame.id,
                    frame.raw_done,
                    frame.raw_total,
                    at
                );
            }
        }
        LogLineType::WorkUnitCoreShutdown | LogLineType::WorkUnitCoreReturn => {
            let result = match line.data() {
                Some(Ok(LogLineData::CoreShutdown(result))) => Some(*result),
                Some(Ok(LogLineData::CoreReturn(result))) => Some(*result),
                _ => None,
            };
            if let Some(result) = result {
                if result == WorkUnitResult::FinishedUnit {
                    println!("{} {}", "ok".green().bold(), result);
                } else {
                    println!("{} {}", "!!".red().bold(), result);
                }
            }
        }
        _ => {}
    }
}
