use std::collections::HashMap;

use fahlog_parse::LogLine;
use fahlog_types::Dialect;

use crate::aggregate::{self, ClientRunData, SlotRunData, UnitRunData};
use crate::cell::DataCell;

/// One work unit's span of the log.
///
/// A unit starts uncommitted while the assembler is still deciding where it
/// begins; running evidence commits it. A complete unit normally stays
/// closed, but one closed only because the log ended reopens if more of its
/// lines arrive later.
#[derive(Debug)]
pub struct UnitRun {
    dialect: Dialect,
    queue_index: Option<u32>,
    start_index: u32,
    end_index: Option<u32>,
    is_complete: bool,
    log_lines: Vec<LogLine>,
    data: DataCell<UnitRunData>,
    pub(crate) committed: bool,
    pub(crate) closed_at_eol: bool,
}

impl UnitRun {
    pub(crate) fn new(dialect: Dialect, start_index: u32, committed: bool) -> Self {
        UnitRun {
            dialect,
            queue_index: None,
            start_index,
            end_index: None,
            is_complete: false,
            log_lines: Vec::new(),
            data: DataCell::new(),
            committed,
            closed_at_eol: false,
        }
    }

    pub fn queue_index(&self) -> Option<u32> {
        self.queue_index
    }

    pub fn start_index(&self) -> u32 {
        self.start_index
    }

    pub fn end_index(&self) -> Option<u32> {
        self.end_index
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn log_lines(&self) -> &[LogLine] {
        &self.log_lines
    }

    /// Derived progress facts, recomputed only if lines arrived since the
    /// last read.
    pub fn data(&self) -> UnitRunData {
        self.data.get_or_compute(|| match self.dialect {
            Dialect::Legacy => aggregate::legacy::unit_data(&self.log_lines),
            Dialect::FahClient => aggregate::fahclient::unit_data(&self.log_lines),
        })
    }

    pub(crate) fn push_line(&mut self, line: LogLine) {
        self.log_lines.push(line);
        self.data.mark_dirty();
    }

    pub(crate) fn last_line_index(&self) -> Option<u32> {
        self.log_lines.last().map(LogLine::index)
    }

    /// Give back the buffered lines that precede the chosen start; they
    /// belong to the enclosing run, not this unit.
    pub(crate) fn drain_lines_below(&mut self, start: u32) -> Vec<LogLine> {
        let split = self.log_lines.partition_point(|line| line.index() < start);
        self.data.mark_dirty();
        self.log_lines.drain(..split).collect()
    }

    pub(crate) fn set_start_index(&mut self, start: u32) {
        self.start_index = start;
    }

    pub(crate) fn set_queue_index(&mut self, queue: u32) {
        self.queue_index = Some(queue);
    }

    pub(crate) fn mark_committed(&mut self) {
        self.committed = true;
    }

    pub(crate) fn close_at_last_line(&mut self, at_eol: bool) {
        self.is_complete = true;
        self.closed_at_eol = at_eol;
        self.end_index = self.last_line_index().or(Some(self.start_index));
    }

    pub(crate) fn reopen(&mut self) {
        self.is_complete = false;
        self.closed_at_eol = false;
        self.end_index = None;
        self.data.mark_dirty();
    }
}

/// One compute slot's units, in the order they appeared. The last unit is
/// the one currently (or most recently) in flight.
#[derive(Debug)]
pub struct SlotRun {
    dialect: Dialect,
    slot_id: u32,
    unit_runs: Vec<UnitRun>,
    data: DataCell<SlotRunData>,
}

impl SlotRun {
    pub(crate) fn new(dialect: Dialect, slot_id: u32) -> Self {
        SlotRun {
            dialect,
            slot_id,
            unit_runs: Vec::new(),
            data: DataCell::new(),
        }
    }

    pub fn slot_id(&self) -> u32 {
        self.slot_id
    }

    pub fn unit_runs(&self) -> &[UnitRun] {
        &self.unit_runs
    }

    pub fn current_unit_run(&self) -> Option<&UnitRun> {
        self.unit_runs.last()
    }

    pub(crate) fn current_unit_run_mut(&mut self) -> Option<&mut UnitRun> {
        // Handing out a unit for mutation invalidates this slot's fold.
        self.data.mark_dirty();
        self.unit_runs.last_mut()
    }

    pub(crate) fn push_unit(&mut self, unit: UnitRun) {
        self.unit_runs.push(unit);
        self.data.mark_dirty();
    }

    pub(crate) fn mark_dirty(&self) {
        self.data.mark_dirty();
    }

    /// The unit more lines for `queue` should land in: the newest one that
    /// is still open, or one that only closed because the log ended.
    pub(crate) fn open_unit_mut(&mut self, queue: u32) -> Option<&mut UnitRun> {
        self.data.mark_dirty();
        self.unit_runs
            .iter_mut()
            .rev()
            .find(|unit| {
                unit.queue_index == Some(queue) && (!unit.is_complete || unit.closed_at_eol)
            })
    }

    /// Derived counters and status. `parent_lines` are the enclosing client
    /// run's own lines, consulted when the slot's units carry no status
    /// signal of their own.
    pub(crate) fn data_with_parent(&self, parent_lines: &[LogLine]) -> SlotRunData {
        self.data.get_or_compute(|| match self.dialect {
            Dialect::Legacy => aggregate::legacy::slot_data(&self.unit_runs, parent_lines),
            Dialect::FahClient => aggregate::fahclient::slot_data(&self.unit_runs),
        })
    }
}

/// One client session: everything from a log-open banner to the next.
#[derive(Debug)]
pub struct ClientRun {
    dialect: Dialect,
    client_start_index: u32,
    log_lines: Vec<LogLine>,
    slot_runs: HashMap<u32, SlotRun>,
    data: DataCell<ClientRunData>,
}

impl ClientRun {
    pub(crate) fn new(dialect: Dialect, client_start_index: u32) -> Self {
        ClientRun {
            dialect,
            client_start_index,
            log_lines: Vec::new(),
            slot_runs: HashMap::new(),
            data: DataCell::new(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn client_start_index(&self) -> u32 {
        self.client_start_index
    }

    /// The lines this run owns directly (its units own theirs).
    pub fn log_lines(&self) -> &[LogLine] {
        &self.log_lines
    }

    /// Slot runs ordered by slot id.
    pub fn slot_runs(&self) -> Vec<&SlotRun> {
        let mut slots: Vec<&SlotRun> = self.slot_runs.values().collect();
        slots.sort_by_key(|slot| slot.slot_id);
        slots
    }

    pub fn slot_run(&self, slot_id: u32) -> Option<&SlotRun> {
        self.slot_runs.get(&slot_id)
    }

    /// Client identity facts, memoized.
    pub fn data(&self) -> ClientRunData {
        self.data
            .get_or_compute(|| aggregate::client_data(&self.log_lines))
    }

    /// A slot's derived counters and status, memoized. Note the boundary:
    /// appending to this run does not invalidate slot caches, and slot
    /// changes do not invalidate this run's identity facts.
    pub fn slot_data(&self, slot_id: u32) -> Option<SlotRunData> {
        self.slot_runs
            .get(&slot_id)
            .map(|slot| slot.data_with_parent(&self.log_lines))
    }

    pub(crate) fn push_line(&mut self, line: LogLine) {
        self.log_lines.push(line);
        self.data.mark_dirty();
    }

    pub(crate) fn slot_run_entry(&mut self, slot_id: u32) -> &mut SlotRun {
        self.slot_runs
            .entry(slot_id)
            .or_insert_with(|| SlotRun::new(self.dialect, slot_id))
    }

    /// Take back lines a committing unit decided were never its own.
    pub(crate) fn reclaim_lines(&mut self, lines: Vec<LogLine>) {
        if lines.is_empty() {
            return;
        }
        self.log_lines.extend(lines);
        self.log_lines.sort_by_key(LogLine::index);
        self.data.mark_dirty();
    }

    pub(crate) fn close_open_units(&mut self, at_eol: bool) {
        for slot in self.slot_runs.values_mut() {
            for unit in &mut slot.unit_runs {
                if !unit.is_complete {
                    unit.close_at_last_line(at_eol);
                }
            }
            slot.data.mark_dirty();
        }
    }
}
