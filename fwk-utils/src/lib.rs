//! Shared utility functions for FWK crates.

/// Timer scheduling capability.
///
/// The simulation core never owns a timer directly: surfaces hand it a
/// `Scheduler` and keep the returned guards alive for as long as the timer
/// should run. Dropping a guard cancels its timer, so every phase entry/exit
/// can own and release timers by scope instead of tracking raw handles.
pub mod sched {
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Cancels the associated timer when dropped.
    pub struct TimerGuard {
        cancel: Option<Box<dyn FnOnce()>>,
    }

    impl TimerGuard {
        pub fn new(cancel: Box<dyn FnOnce()>) -> Self {
            Self {
                cancel: Some(cancel),
            }
        }

        /// Cancel the timer now instead of waiting for drop.
        pub fn cancel(mut self) {
            if let Some(cancel) = self.cancel.take() {
                cancel();
            }
        }
    }

    impl Drop for TimerGuard {
        fn drop(&mut self) {
            if let Some(cancel) = self.cancel.take() {
                cancel();
            }
        }
    }

    /// Periodic and one-shot timer scheduling.
    ///
    /// Implementations are single-threaded; callbacks run on the same
    /// logical thread that armed them.
    pub trait Scheduler {
        /// Run `f` every `period_ms` milliseconds until the guard is dropped.
        fn every(&self, period_ms: u32, f: Box<dyn FnMut()>) -> TimerGuard;

        /// Run `f` once after `delay_ms` milliseconds unless the guard is
        /// dropped first.
        fn after(&self, delay_ms: u32, f: Box<dyn FnOnce()>) -> TimerGuard;
    }

    enum Entry {
        Periodic {
            period_ms: u32,
            next_due: u64,
            f: Box<dyn FnMut()>,
        },
        OneShot {
            due: u64,
            f: Option<Box<dyn FnOnce()>>,
        },
    }

    struct ManualInner {
        now_ms: u64,
        next_id: u64,
        entries: Vec<(u64, Entry)>,
    }

    /// Deterministic scheduler for tests: time only advances when told to.
    #[derive(Clone)]
    pub struct ManualScheduler {
        inner: Rc<RefCell<ManualInner>>,
    }

    impl ManualScheduler {
        pub fn new() -> Self {
            Self {
                inner: Rc::new(RefCell::new(ManualInner {
                    now_ms: 0,
                    next_id: 0,
                    entries: Vec::new(),
                })),
            }
        }

        /// Advance the virtual clock, firing due timers in order.
        pub fn advance(&self, ms: u64) {
            let target = self.inner.borrow().now_ms + ms;
            loop {
                // Find the earliest due entry at or before `target`. Borrow is
                // released before the callback runs so callbacks may arm or
                // cancel timers.
                let next = {
                    let inner = self.inner.borrow();
                    inner
                        .entries
                        .iter()
                        .filter_map(|(id, e)| {
                            let due = match e {
                                Entry::Periodic { next_due, .. } => *next_due,
                                Entry::OneShot { due, .. } => *due,
                            };
                            (due <= target).then_some((due, *id))
                        })
                        .min()
                };
                let Some((due, id)) = next else { break };

                enum Fire {
                    Periodic,
                    OneShot(Box<dyn FnOnce()>),
                }
                let fire = {
                    let mut inner = self.inner.borrow_mut();
                    inner.now_ms = due;
                    match inner.entries.iter_mut().find(|(eid, _)| *eid == id) {
                        Some((_, Entry::Periodic {
                            period_ms,
                            next_due,
                            ..
                        })) => {
                            *next_due += u64::from(*period_ms);
                            Some(Fire::Periodic)
                        }
                        Some((_, Entry::OneShot { f, .. })) => f.take().map(Fire::OneShot),
                        None => None,
                    }
                };
                match fire {
                    Some(Fire::Periodic) => {
                        // Take the callback out while it runs so the callback
                        // itself may arm or cancel timers without re-borrowing.
                        let taken = {
                            let mut inner = self.inner.borrow_mut();
                            match inner.entries.iter_mut().find(|(eid, _)| *eid == id) {
                                Some((_, Entry::Periodic { f, .. })) => {
                                    Some(std::mem::replace(f, Box::new(|| {})))
                                }
                                _ => None,
                            }
                        };
                        if let Some(mut cb) = taken {
                            cb();
                            // Put it back unless the guard was dropped mid-call.
                            let mut inner = self.inner.borrow_mut();
                            if let Some((_, Entry::Periodic { f, .. })) =
                                inner.entries.iter_mut().find(|(eid, _)| *eid == id)
                            {
                                *f = cb;
                            }
                        }
                    }
                    Some(Fire::OneShot(f)) => {
                        self.inner
                            .borrow_mut()
                            .entries
                            .retain(|(eid, _)| *eid != id);
                        f();
                    }
                    None => {
                        self.inner
                            .borrow_mut()
                            .entries
                            .retain(|(eid, _)| *eid != id);
                    }
                }
            }
            self.inner.borrow_mut().now_ms = target;
        }

        /// Number of currently armed timers (for dangling-timer assertions).
        pub fn active_timers(&self) -> usize {
            self.inner.borrow().entries.len()
        }

        fn remove(&self, id: u64) {
            self.inner.borrow_mut().entries.retain(|(eid, _)| *eid != id);
        }
    }

    impl Default for ManualScheduler {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Scheduler for ManualScheduler {
        fn every(&self, period_ms: u32, f: Box<dyn FnMut()>) -> TimerGuard {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            let next_due = inner.now_ms + u64::from(period_ms);
            inner.entries.push((
                id,
                Entry::Periodic {
                    period_ms,
                    next_due,
                    f,
                },
            ));
            drop(inner);
            let sched = self.clone();
            TimerGuard::new(Box::new(move || sched.remove(id)))
        }

        fn after(&self, delay_ms: u32, f: Box<dyn FnOnce()>) -> TimerGuard {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            let due = inner.now_ms + u64::from(delay_ms);
            inner.entries.push((id, Entry::OneShot { due, f: Some(f) }));
            drop(inner);
            let sched = self.clone();
            TimerGuard::new(Box::new(move || sched.remove(id)))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::cell::Cell;

        #[test]
        fn test_periodic_fires_on_schedule() {
            let sched = ManualScheduler::new();
            let count = Rc::new(Cell::new(0u32));
            let c = count.clone();
            let guard = sched.every(100, Box::new(move || c.set(c.get() + 1)));
            sched.advance(50);
            assert_eq!(count.get(), 0);
            sched.advance(50);
            assert_eq!(count.get(), 1);
            sched.advance(350);
            assert_eq!(count.get(), 4);
            drop(guard);
            sched.advance(1000);
            assert_eq!(count.get(), 4);
            assert_eq!(sched.active_timers(), 0);
        }

        #[test]
        fn test_one_shot_fires_once() {
            let sched = ManualScheduler::new();
            let fired = Rc::new(Cell::new(0u32));
            let f = fired.clone();
            let guard = sched.after(200, Box::new(move || f.set(f.get() + 1)));
            sched.advance(500);
            assert_eq!(fired.get(), 1);
            assert_eq!(sched.active_timers(), 0);
            drop(guard);
        }

        #[test]
        fn test_dropped_one_shot_never_fires() {
            let sched = ManualScheduler::new();
            let fired = Rc::new(Cell::new(false));
            let f = fired.clone();
            let guard = sched.after(200, Box::new(move || f.set(true)));
            drop(guard);
            sched.advance(500);
            assert!(!fired.get());
        }

        #[test]
        fn test_interleaved_timers_fire_in_due_order() {
            let sched = ManualScheduler::new();
            let order = Rc::new(RefCell::new(Vec::new()));
            let o1 = order.clone();
            let o2 = order.clone();
            let _g1 = sched.every(300, Box::new(move || o1.borrow_mut().push("slow")));
            let _g2 = sched.every(200, Box::new(move || o2.borrow_mut().push("fast")));
            sched.advance(600);
            assert_eq!(
                *order.borrow(),
                vec!["fast", "slow", "fast", "fast", "slow"]
            );
        }
    }
}

/// Numeric coercion helpers for incoming snapshot fields.
pub mod num {
    /// Clamp `v` to the inclusive range `[lo, hi]`.
    pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
        v.max(lo).min(hi)
    }

    /// Return `v` if it is finite and within `[lo, hi]`, otherwise `fallback`.
    ///
    /// Used when merging snapshots received over the transport: a malformed
    /// or partial payload keeps the previous known value field-by-field
    /// rather than propagating NaN into the render path.
    pub fn finite_in_range_or(v: f64, lo: f64, hi: f64, fallback: f64) -> f64 {
        if v.is_finite() && v >= lo && v <= hi {
            v
        } else {
            fallback
        }
    }

    /// Return `v` if finite, otherwise `fallback`.
    pub fn finite_or(v: f64, fallback: f64) -> f64 {
        if v.is_finite() {
            v
        } else {
            fallback
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_clamp() {
            assert_eq!(clamp(-3.0, 0.0, 100.0), 0.0);
            assert_eq!(clamp(105.0, 0.0, 100.0), 100.0);
            assert_eq!(clamp(55.0, 0.0, 100.0), 55.0);
        }

        #[test]
        fn test_finite_in_range_or() {
            assert_eq!(finite_in_range_or(50.0, 0.0, 100.0, 7.0), 50.0);
            assert_eq!(finite_in_range_or(f64::NAN, 0.0, 100.0, 7.0), 7.0);
            assert_eq!(finite_in_range_or(f64::INFINITY, 0.0, 100.0, 7.0), 7.0);
            assert_eq!(finite_in_range_or(-1.0, 0.0, 100.0, 7.0), 7.0);
        }

        #[test]
        fn test_finite_or() {
            assert_eq!(finite_or(1.5, 0.0), 1.5);
            assert_eq!(finite_or(f64::NAN, 0.25), 0.25);
        }
    }
}
