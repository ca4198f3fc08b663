use std::cell::RefCell;

/// Dirty-flag memo cell for derived run statistics.
///
/// Appending lines marks the owning node dirty; the next read recomputes,
/// later reads hand back the cached value. Interior mutability keeps the
/// read path `&self`, which is what lets a freshly appended tree serve
/// derived data without an explicit rebuild step. `RefCell`, not a lock:
/// the run tree is single-thread data.
#[derive(Debug)]
pub(crate) struct DataCell<T> {
    state: RefCell<State<T>>,
}

#[derive(Debug)]
struct State<T> {
    value: Option<T>,
    dirty: bool,
}

impl<T: Clone> DataCell<T> {
    pub(crate) fn new() -> Self {
        DataCell {
            state: RefCell::new(State {
                value: None,
                dirty: true,
            }),
        }
    }

    /// Invalidate the cached value. The value itself is kept until the next
    /// read overwrites it.
    pub(crate) fn mark_dirty(&self) {
        self.state.borrow_mut().dirty = true;
    }

    /// Return the cached value, recomputing through `compute` if the cell
    /// is dirty or has never been filled.
    pub(crate) fn get_or_compute(&self, compute: impl FnOnce() -> T) -> T {
        let mut state = self.state.borrow_mut();
        if state.dirty || state.value.is_none() {
            state.value = Some(compute());
            state.dirty = false;
        }
        match &state.value {
            Some(value) => value.clone(),
            None => unreachable!("cell filled above"),
        }
    }
}

impl<T: Clone> Default for DataCell<T> {
    fn default() -> Self {
        DataCell::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_once_until_marked_dirty() {
        let cell: DataCell<u32> = DataCell::new();
        let mut calls = 0;
        let mut next = || {
            calls += 1;
            calls
        };
        assert_eq!(cell.get_or_compute(&mut next), 1);
        assert_eq!(cell.get_or_compute(&mut next), 1);
        cell.mark_dirty();
        assert_eq!(cell.get_or_compute(&mut next), 2);
        assert_eq!(cell.get_or_compute(&mut next), 2);
    }
}
