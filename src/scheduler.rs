//! Scheduler - Deferred execution capability
//!
//! The coordinator never sleeps or reads a clock directly. It asks a
//! [`Scheduler`] to run work later, either after a delay (debounce) or on the
//! next animation frame. Tests drive a [`ManualScheduler`] on a virtual clock;
//! the browser build uses `WebScheduler` from [`crate::page::web`].
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use spark_page::scheduler::{ManualScheduler, Scheduler};
//!
//! let scheduler = ManualScheduler::new();
//! scheduler.schedule_after(Duration::from_millis(100), Box::new(|| println!("later")));
//! scheduler.advance(Duration::from_millis(100)); // prints "later"
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

/// Deferred operation.
pub type Task = Box<dyn FnOnce()>;

/// Handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

/// Deferral capability.
pub trait Scheduler {
    /// Run `task` once `delay` has elapsed.
    fn schedule_after(&self, delay: Duration, task: Task) -> TaskId;

    /// Run `task` before the next repaint.
    fn schedule_next_frame(&self, task: Task) -> TaskId;

    /// Drop a pending task. Unknown or already-run ids are ignored.
    fn cancel(&self, id: TaskId);

    /// Time since the scheduler started.
    fn now(&self) -> Duration;
}

// =============================================================================
// TASK SLOTS
// =============================================================================

/// Pending tasks by id, each owning whatever keeps its host callback alive.
///
/// A slot is released when its task runs or is cancelled, whichever comes
/// first, so cancelled callbacks never outlive their id.
#[derive(Debug)]
pub struct TaskSlots<T> {
    next_id: u64,
    slots: HashMap<TaskId, T>,
}

impl<T> Default for TaskSlots<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            slots: HashMap::new(),
        }
    }
}

impl<T> TaskSlots<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> TaskId {
        self.next_id += 1;
        TaskId(self.next_id)
    }

    pub fn insert(&mut self, id: TaskId, slot: T) {
        self.slots.insert(id, slot);
    }

    /// Remove and return the slot for `id`.
    pub fn take(&mut self, id: TaskId) -> Option<T> {
        self.slots.remove(&id)
    }

    /// Remove every slot.
    pub fn drain(&mut self) -> Vec<T> {
        self.slots.drain().map(|(_, slot)| slot).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// =============================================================================
// MANUAL SCHEDULER
// =============================================================================

struct Timed {
    id: TaskId,
    due: Duration,
    task: Task,
}

/// Deterministic scheduler on a virtual clock.
///
/// Nothing runs until [`advance`](Self::advance) or
/// [`run_frame`](Self::run_frame) is called. Timed tasks run in due order;
/// ties run in scheduling order.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    timed: RefCell<Vec<Timed>>,
    frames: RefCell<Vec<(TaskId, Task)>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> TaskId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        TaskId(id)
    }

    /// Move the clock forward by `by`, running every task that falls due.
    ///
    /// Tasks scheduled by running tasks also run if they fall due inside the
    /// window.
    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;
        loop {
            let next = {
                let mut timed = self.timed.borrow_mut();
                let due_idx = timed
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.id))
                    .map(|(i, _)| i);
                due_idx.map(|i| timed.remove(i))
            };
            let Some(task) = next else {
                break;
            };
            self.now.set(task.due.max(self.now.get()));
            (task.task)();
        }
        self.now.set(target);
    }

    /// Run every frame callback queued before this call.
    ///
    /// Callbacks queued while running wait for the following frame, like
    /// `requestAnimationFrame`.
    pub fn run_frame(&self) -> usize {
        let frame = std::mem::take(&mut *self.frames.borrow_mut());
        let count = frame.len();
        for (_, task) in frame {
            task();
        }
        count
    }

    /// Number of tasks waiting, timed and per-frame.
    pub fn pending(&self) -> usize {
        self.timed.borrow().len() + self.frames.borrow().len()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&self, delay: Duration, task: Task) -> TaskId {
        let id = self.next_id();
        self.timed.borrow_mut().push(Timed {
            id,
            due: self.now.get() + delay,
            task,
        });
        id
    }

    fn schedule_next_frame(&self, task: Task) -> TaskId {
        let id = self.next_id();
        self.frames.borrow_mut().push((id, task));
        id
    }

    fn cancel(&self, id: TaskId) {
        self.timed.borrow_mut().retain(|t| t.id != id);
        self.frames.borrow_mut().retain(|(fid, _)| *fid != id);
    }

    fn now(&self) -> Duration {
        self.now.get()
    }
}

// =============================================================================
// Tests
// =============================================================================
