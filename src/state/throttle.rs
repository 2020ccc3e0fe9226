//! Event Throttle - Trailing-edge debounce and frame coalescing
//!
//! Wraps an operation so bursts of triggers collapse into one execution
//! carrying the arguments of the last trigger. The final trigger of a burst
//! is never dropped.
//!
//! - [`Timing::After`] - classic debounce: every call restarts the wait
//! - [`Timing::NextFrame`] - coalesce into the next animation frame
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use std::time::Duration;
//! use spark_page::scheduler::ManualScheduler;
//! use spark_page::state::throttle::{Debouncer, Timing};
//!
//! let scheduler = Rc::new(ManualScheduler::new());
//! let resize = Debouncer::new(scheduler.clone(), Timing::After(Duration::from_millis(250)),
//!     |width: f64| println!("rebinding for {width}"));
//!
//! resize.call(800.0);
//! resize.call(640.0);
//! scheduler.advance(Duration::from_millis(250)); // "rebinding for 640"
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::scheduler::{Scheduler, Task, TaskId};

/// When a debounced operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    /// `wait` after the most recent call.
    After(Duration),
    /// On the next animation frame after the first pending call.
    NextFrame,
}

struct Pending<A> {
    task: Option<TaskId>,
    args: Option<A>,
    op: Option<Box<dyn FnMut(A)>>,
    runs: usize,
}

/// Debounced wrapper around an operation taking `A`.
pub struct Debouncer<A: 'static> {
    state: Rc<RefCell<Pending<A>>>,
    scheduler: Rc<dyn Scheduler>,
    timing: Timing,
}

impl<A: 'static> Debouncer<A> {
    pub fn new(scheduler: Rc<dyn Scheduler>, timing: Timing, op: impl FnMut(A) + 'static) -> Self {
        Self {
            state: Rc::new(RefCell::new(Pending {
                task: None,
                args: None,
                op: Some(Box::new(op)),
                runs: 0,
            })),
            scheduler,
            timing,
        }
    }

    /// Trigger the operation. Only the latest `args` survive.
    ///
    /// No borrow is held while the scheduler runs, so a scheduler may run
    /// the task inline.
    pub fn call(&self, args: A) {
        let replaced = {
            let mut state = self.state.borrow_mut();
            state.args = Some(args);
            match self.timing {
                Timing::After(_) => state.task.take(),
                Timing::NextFrame if state.task.is_some() => return,
                Timing::NextFrame => None,
            }
        };
        if let Some(id) = replaced {
            self.scheduler.cancel(id);
        }

        let weak = Rc::downgrade(&self.state);
        let task: Task = Box::new(move || fire(&weak));
        let id = match self.timing {
            Timing::After(wait) => self.scheduler.schedule_after(wait, task),
            Timing::NextFrame => self.scheduler.schedule_next_frame(task),
        };

        // Already ran (and possibly re-triggered) if the args are gone or a
        // newer task took the slot.
        let mut state = self.state.borrow_mut();
        if state.task.is_none() && state.args.is_some() {
            state.task = Some(id);
        }
    }

    /// Run now with the pending arguments, if any.
    pub fn flush(&self) {
        let pending = self.state.borrow_mut().task.take();
        if let Some(id) = pending {
            self.scheduler.cancel(id);
            fire(&Rc::downgrade(&self.state));
        }
    }

    /// Drop the pending execution.
    pub fn cancel(&self) {
        let mut state = self.state.borrow_mut();
        if let Some(id) = state.task.take() {
            self.scheduler.cancel(id);
        }
        state.args = None;
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().task.is_some()
    }

    /// How many times the operation has executed.
    pub fn run_count(&self) -> usize {
        self.state.borrow().runs
    }
}

impl<A: 'static> Drop for Debouncer<A> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Execute the pending call. The operation is taken out of the cell while it
/// runs so it may re-trigger the debouncer.
fn fire<A>(state: &Weak<RefCell<Pending<A>>>) {
    let Some(state) = state.upgrade() else {
        return;
    };

    let (args, op) = {
        let mut s = state.borrow_mut();
        s.task = None;
        (s.args.take(), s.op.take())
    };

    let (Some(args), Some(mut op)) = (args, op) else {
        return;
    };

    op(args);

    let mut s = state.borrow_mut();
    s.op = Some(op);
    s.runs += 1;
}

// =============================================================================
// Tests
// =============================================================================
