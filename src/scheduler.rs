//! Wall-clock deferred callbacks
//!
//! Tasks hold a `Weak` reference to their target and check it is still
//! alive before running, so a dropped game never gets a late callback.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Slack for accumulated floating point frame times
const DUE_EPSILON: f64 = 1e-9;

struct Task<T> {
    due: f64,
    label: &'static str,
    target: Weak<RefCell<T>>,
    action: Box<dyn FnOnce(&mut T)>,
}

/// One-shot timers on their own clock, independent of simulation pause
pub struct Scheduler<T> {
    now: f64,
    tasks: Vec<Task<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            tasks: Vec::new(),
        }
    }

    /// Seconds elapsed on this scheduler's clock
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Run `action` on `target` once `delay` seconds have passed
    pub fn after(
        &mut self,
        delay: f64,
        target: &Rc<RefCell<T>>,
        label: &'static str,
        action: impl FnOnce(&mut T) + 'static,
    ) {
        self.tasks.push(Task {
            due: self.now + delay.max(0.0),
            label,
            target: Rc::downgrade(target),
            action: Box::new(action),
        });
    }

    /// Advance the clock and fire due tasks in due order. Returns how many ran.
    pub fn advance(&mut self, dt: f64) -> usize {
        self.now += dt.max(0.0);
        let deadline = self.now + DUE_EPSILON;

        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|t| t.due <= deadline);
        self.tasks = pending;
        due.sort_by(|a, b| a.due.total_cmp(&b.due));

        let mut fired = 0;
        for task in due {
            match task.target.upgrade() {
                Some(target) => {
                    log::debug!("Firing deferred '{}' at {:.3}s", task.label, self.now);
                    let mut guard = target.borrow_mut();
                    (task.action)(&mut *guard);
                    fired += 1;
                }
                None => {
                    log::debug!("Skipping deferred '{}': target dropped", task.label);
                }
            }
        }
        fired
    }
}
