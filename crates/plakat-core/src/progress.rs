// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Injected progress reporting. The pipeline never touches global state for
// progress; callers pass an observer and get a callback after each completed
// tile or page. Skipping the callbacks must not change output.

/// Observer invoked at tile/page boundaries during long operations.
///
/// Both methods default to no-ops so implementors can pick the events they
/// care about.
pub trait ProgressObserver {
    /// A tile was extracted (and, where applicable, written).
    fn tile_completed(&self, _index: u32, _total: u32) {}

    /// A document page was assembled.
    fn page_completed(&self, _page: u32, _total: u32) {}
}

/// Observer that ignores all events. Useful default and test double.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Recording observer used by pipeline tests in the downstream crates.
    struct Recorder {
        tiles: RefCell<Vec<u32>>,
    }

    impl ProgressObserver for Recorder {
        fn tile_completed(&self, index: u32, _total: u32) {
            self.tiles.borrow_mut().push(index);
        }
    }

    #[test]
    fn default_methods_are_noops() {
        // Must not panic, must not require any state.
        NoopObserver.tile_completed(1, 9);
        NoopObserver.page_completed(1, 10);
    }

    #[test]
    fn custom_observer_receives_events() {
        let rec = Recorder {
            tiles: RefCell::new(Vec::new()),
        };
        rec.tile_completed(1, 2);
        rec.tile_completed(2, 2);
        assert_eq!(*rec.tiles.borrow(), vec![1, 2]);
    }
}
