use std::io::Cursor;
use std::time::Duration;

use chrono::NaiveTime;
use fahlog_engine::RunLog;
use fahlog_parse::{LogLine, LogLineReader};
use fahlog_types::{Dialect, ProjectInfo, SlotStatus, WorkUnitResult};

const SAMPLE: &str = include_str!("fixtures/fahclient_sample.txt");

fn parse(text: &str) -> RunLog {
    let mut log = parse_unfinished(text);
    log.finish();
    log
}

fn parse_unfinished(text: &str) -> RunLog {
    let mut reader = LogLineReader::new(Cursor::new(text), Dialect::FahClient);
    let mut log = RunLog::new(Dialect::FahClient);
    log.read_from(&mut reader).unwrap();
    log
}

#[test]
fn test_round_trip_reconstructs_input() {
    let log = parse(SAMPLE);
    let lines = log.lines();
    let expected: Vec<&str> = SAMPLE.lines().collect();
    assert_eq!(lines.len(), expected.len());
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(line.index(), i as u32);
        assert_eq!(line.raw(), expected[i]);
    }
}

#[test]
fn test_client_run_identity() {
    let log = parse(SAMPLE);
    assert_eq!(log.client_runs().len(), 1);
    let data = log.client_runs()[0].data();
    assert_eq!(data.client_version.as_deref(), Some("7.1.43"));
    assert_eq!(
        data.arguments.as_deref(),
        Some("--lifeline 2600 --command-port=36330")
    );
    assert!(data.start_time.is_some());
}

#[test]
fn test_lines_route_to_their_slot_and_queue() {
    let log = parse(SAMPLE);
    let run = &log.client_runs()[0];

    // Slot 0 saw exactly one line, a stray frame from queue 0.
    let slot0 = run.slot_run(0).unwrap();
    assert_eq!(slot0.unit_runs().len(), 1);
    let stray = &slot0.unit_runs()[0];
    assert_eq!(stray.queue_index(), Some(0));
    assert_eq!(stray.data().frames_observed, 1);
    assert!(stray.data().frames.contains_key(&10));

    // Slot 1 ran queue 1 to completion, then started queue 2.
    let slot1 = run.slot_run(1).unwrap();
    assert_eq!(slot1.unit_runs()[0].queue_index(), Some(1));
    assert_eq!(
        slot1.unit_runs().last().unwrap().queue_index(),
        Some(2)
    );
}

#[test]
fn test_finished_unit_data() {
    let log = parse(SAMPLE);
    let unit = &log.client_runs()[0].slot_run(1).unwrap().unit_runs()[0];
    assert!(unit.is_complete());
    assert_eq!(unit.start_index(), 3);

    let data = unit.data();
    assert_eq!(data.start_time, NaiveTime::from_hms_opt(3, 25, 32));
    assert_eq!(
        data.project,
        Some(ProjectInfo {
            project: 7610,
            run: 630,
            clone: 0,
            generation: 59,
        })
    );
    assert_eq!(data.core_version, Some(2.27));
    assert_eq!(data.result, Some(WorkUnitResult::FinishedUnit));
    assert_eq!(data.frames_observed, 3);
    assert_eq!(data.frames[&1].duration, Some(Duration::from_secs(311)));
    assert_eq!(data.frames[&2].duration, Some(Duration::from_secs(311)));
}

#[test]
fn test_slot_counters() {
    let log = parse(SAMPLE);
    let run = &log.client_runs()[0];
    let slot1 = run.slot_data(1).unwrap();
    assert_eq!(slot1.completed_units, 1);
    assert_eq!(slot1.failed_units, 0);
    // v7 logs carry no lifetime counter and no log-derived status.
    assert_eq!(slot1.total_completed_units, None);
    assert_eq!(slot1.status, SlotStatus::Unknown);

    let slot0 = run.slot_data(0).unwrap();
    assert_eq!(slot0.completed_units, 0);
    assert_eq!(slot0.failed_units, 0);
}

#[test]
fn test_interrupted_unit_stays_open_for_retry() {
    let text = "\
*********************** Log Started 2012-01-11T03:24:22Z ***********************
03:25:32:WU01:FS01:Starting
03:25:52:WU01:FS01:0xa4:Completed 0 out of 100 steps (0%)
03:30:00:WU01:FS01:FahCore returned: INTERRUPTED (102 = 0x66)
03:31:00:WU01:FS01:Starting
03:32:00:WU01:FS01:0xa4:Completed 1 out of 100 steps (1%)
";
    let mut log = parse_unfinished(text);
    let slot = log.client_runs()[0].slot_run(1).unwrap();
    // A non-terminating result keeps the unit open: the retry lines landed
    // in the same unit, not a new one.
    assert_eq!(slot.unit_runs().len(), 1);
    let unit = slot.current_unit_run().unwrap();
    assert!(!unit.is_complete());
    assert_eq!(unit.log_lines().len(), 5);

    log.finish();
    let data = log.client_runs()[0].slot_data(1).unwrap();
    assert_eq!(data.completed_units, 0);
    assert_eq!(data.failed_units, 0);
}

#[test]
fn test_terminating_return_closes_and_next_lines_start_fresh() {
    let text = "\
*********************** Log Started 2012-01-11T03:24:22Z ***********************
03:25:32:WU01:FS01:Starting
03:30:00:WU01:FS01:FahCore returned: BAD_WORK_UNIT (114 = 0x72)
03:31:00:WU01:FS01:Starting
";
    let log = parse(text);
    let slot = log.client_runs()[0].slot_run(1).unwrap();
    assert_eq!(slot.unit_runs().len(), 2);
    assert!(slot.unit_runs()[0].is_complete());
    assert_eq!(slot.unit_runs()[0].end_index(), Some(2));
    assert_eq!(slot.unit_runs()[1].start_index(), 3);

    let data = log.client_runs()[0].slot_data(1).unwrap();
    assert_eq!(data.failed_units, 1);
    assert_eq!(data.completed_units, 0);
}

#[test]
fn test_preamble_before_banner_is_buffered_into_the_run() {
    let text = "\
03:24:21:******************************* System ********************************
*********************** Log Started 2012-01-11T03:24:22Z ***********************
03:24:22:        Version: 7.1.43
";
    let log = parse(text);
    assert_eq!(log.client_runs().len(), 1);
    let run = &log.client_runs()[0];
    let indices: Vec<u32> = run.log_lines().iter().map(|l| l.index()).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn test_bannerless_log_still_forms_a_run() {
    let text = "\
03:24:22:        Version: 7.1.43
03:25:32:WU00:FS00:Starting
";
    let log = parse(text);
    assert_eq!(log.client_runs().len(), 1);
    let run = &log.client_runs()[0];
    assert_eq!(run.client_start_index(), 0);
    assert_eq!(run.data().client_version.as_deref(), Some("7.1.43"));
    assert!(run.slot_run(0).is_some());
}

#[test]
fn test_unit_reopens_when_log_grows_past_finish() {
    let mut log = parse(SAMPLE);
    let next = SAMPLE.lines().count() as u32;
    {
        let slot = log.client_runs()[0].slot_run(1).unwrap();
        assert!(slot.current_unit_run().unwrap().is_complete());
    }

    log.append(LogLine::parse(
        Dialect::FahClient,
        next,
        "04:50:00:WU02:FS01:0xa4:Completed 0 out of 100 steps (0%)".to_owned(),
    ));

    let slot = log.client_runs()[0].slot_run(1).unwrap();
    let unit = slot.current_unit_run().unwrap();
    assert!(!unit.is_complete());
    assert_eq!(unit.queue_index(), Some(2));
    assert_eq!(unit.data().frames_observed, 1);
    assert_eq!(log.lines().len(), next as usize + 1);
}

#[test]
fn test_restart_closes_open_units_for_good() {
    let text = "\
*********************** Log Started 2012-01-11T03:24:22Z ***********************
03:25:32:WU01:FS01:Starting
*********************** Log Started 2012-01-12T08:00:00Z ***********************
08:01:00:WU01:FS01:Starting
";
    let log = parse(text);
    assert_eq!(log.client_runs().len(), 2);
    let first_unit = &log.client_runs()[0].slot_run(1).unwrap().unit_runs()[0];
    assert!(first_unit.is_complete());
    assert_eq!(first_unit.data().result, None);
    // The restarted unit belongs to the new run, not the old one.
    assert_eq!(
        log.client_runs()[1].slot_run(1).unwrap().unit_runs()[0].start_index(),
        3
    );
}
