//! Counter Animation - Count an element's text up to a target
//!
//! Each animation frame adds `target / (duration_ms / 16)` and writes the
//! rounded-up value. The last frame writes the exact target, so the final
//! text never overshoots.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use spark_page::state::counter::animate_counter;
//!
//! let stop = animate_counter(page.clone(), scheduler.clone(), stat, 120.0, Duration::from_secs(2));
//! // ... later, if the element goes away:
//! stop();
//! ```

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::page::Page;
use crate::scheduler::{Scheduler, TaskId};
use crate::types::ElementId;

/// Nominal frame length the increment is derived from.
pub const FRAME_MS: f64 = 16.0;

/// Per-frame increment for counting to `target` over `duration`.
///
/// Durations shorter than a frame finish on the first frame.
pub fn increment(target: f64, duration: Duration) -> f64 {
    let frames = duration.as_secs_f64() * 1000.0 / FRAME_MS;
    if frames <= 0.0 {
        f64::INFINITY
    } else {
        target / frames
    }
}

/// Text written for `value`.
fn format_count(value: f64) -> String {
    format!("{}", value.ceil())
}

struct Run {
    page: Rc<dyn Page>,
    scheduler: Rc<dyn Scheduler>,
    element: ElementId,
    target: f64,
    step: f64,
    current: f64,
    pending: Rc<Cell<Option<TaskId>>>,
}

impl Run {
    fn frame(mut self) {
        self.pending.set(None);
        self.current += self.step;
        if self.current < self.target {
            self.page.set_text(self.element, &format_count(self.current));
            let scheduler = self.scheduler.clone();
            let pending = self.pending.clone();
            let id = scheduler.schedule_next_frame(Box::new(move || self.frame()));
            pending.set(Some(id));
        } else {
            self.page.set_text(self.element, &format_count(self.target));
            tracing::trace!(element = %self.element, target = self.target, "counter finished");
        }
    }
}

/// Animate `element`'s text from 0 to `target` over roughly `duration`.
///
/// The first frame runs immediately. Returns a stop function; stopping leaves
/// the last written value in place.
pub fn animate_counter(
    page: Rc<dyn Page>,
    scheduler: Rc<dyn Scheduler>,
    element: ElementId,
    target: f64,
    duration: Duration,
) -> Box<dyn FnOnce()> {
    let pending = Rc::new(Cell::new(None));
    let run = Run {
        page,
        scheduler: scheduler.clone(),
        element,
        target,
        step: increment(target, duration),
        current: 0.0,
        pending: pending.clone(),
    };
    run.frame();

    Box::new(move || {
        if let Some(id) = pending.take() {
            scheduler.cancel(id);
        }
    })
}

// =============================================================================
// Tests
// =============================================================================
