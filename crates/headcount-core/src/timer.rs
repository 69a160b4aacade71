//! Single-threaded timer queue driven by a virtual clock.
//!
//! Tasks live in a thread-local queue. Nothing fires on its own: the event
//! loop calls [`pump`] with the wall-clock time (or tests call [`advance`]
//! with a fixed step) and every task whose deadline falls inside the window
//! runs, in deadline order.
//!
//! No borrow of the queue is held while a task runs, so a task may schedule
//! or cancel other tasks, including itself.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use web_time::{Duration, Instant};

new_key_type! {
    /// Handle to a scheduled task. Cancelling a stale handle is a no-op.
    pub struct TimerId;
}

/// Smallest period accepted by [`schedule_repeating`].
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

struct Entry {
    deadline: Duration,
    period: Option<Duration>,
    seq: u64,
    task: Rc<dyn Fn()>,
}

#[derive(Default)]
struct TimerQueue {
    now: Duration,
    next_seq: u64,
    entries: SlotMap<TimerId, Entry>,
    last_pump: Option<Instant>,
}

impl TimerQueue {
    fn insert(&mut self, delay: Duration, period: Option<Duration>, task: Rc<dyn Fn()>) -> TimerId {
        let seq = self.bump_seq();
        self.entries.insert(Entry {
            deadline: self.now + delay,
            period,
            seq,
            task,
        })
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Pops the earliest task due at or before `limit`, re-arming it first if
    /// it repeats.
    fn take_due(&mut self, limit: Duration) -> Option<(TimerId, Rc<dyn Fn()>)> {
        let (id, deadline) = self
            .entries
            .iter()
            .filter(|(_, e)| e.deadline <= limit)
            .min_by_key(|(_, e)| (e.deadline, e.seq))
            .map(|(id, e)| (id, e.deadline))?;

        self.now = self.now.max(deadline);
        let seq = self.bump_seq();
        let entry = &mut self.entries[id];
        let task = entry.task.clone();
        if let Some(period) = entry.period {
            entry.deadline += period;
            entry.seq = seq;
        } else {
            self.entries.remove(id);
        }
        Some((id, task))
    }
}

thread_local! {
    static TIMERS: RefCell<TimerQueue> = RefCell::new(TimerQueue::default());
}

/// Runs `task` once, `delay` after the current virtual time.
pub fn schedule_once(delay: Duration, task: impl Fn() + 'static) -> TimerId {
    let id = TIMERS.with(|t| t.borrow_mut().insert(delay, None, Rc::new(task)));
    log::trace!("timer {id:?}: once in {delay:?}");
    id
}

/// Runs `task` every `period`, first after one full period.
pub fn schedule_repeating(period: Duration, task: impl Fn() + 'static) -> TimerId {
    let period = period.max(MIN_PERIOD);
    let id = TIMERS.with(|t| t.borrow_mut().insert(period, Some(period), Rc::new(task)));
    log::trace!("timer {id:?}: every {period:?}");
    id
}

/// Cancels a task. Returns `false` if it already fired (one-shot) or was
/// cancelled before.
pub fn cancel(id: TimerId) -> bool {
    let removed = TIMERS.with(|t| t.borrow_mut().entries.remove(id).is_some());
    if removed {
        log::trace!("timer {id:?}: cancelled");
    }
    removed
}

pub fn is_scheduled(id: TimerId) -> bool {
    TIMERS.with(|t| t.borrow().entries.contains_key(id))
}

/// Number of live tasks on this thread.
pub fn pending() -> usize {
    TIMERS.with(|t| t.borrow().entries.len())
}

/// Current virtual time, measured from the first use of the queue.
pub fn now() -> Duration {
    TIMERS.with(|t| t.borrow().now)
}

/// Moves the virtual clock forward by `dt`, running every task that comes
/// due on the way. Returns how many task invocations happened.
pub fn advance(dt: Duration) -> usize {
    let limit = TIMERS.with(|t| t.borrow().now + dt);
    let mut fired = 0;
    while let Some((id, task)) = TIMERS.with(|t| t.borrow_mut().take_due(limit)) {
        log::trace!("timer {id:?}: fire");
        task();
        fired += 1;
    }
    TIMERS.with(|t| {
        let mut q = t.borrow_mut();
        q.now = q.now.max(limit);
    });
    fired
}

/// Advances the virtual clock by the wall-clock time elapsed since the
/// previous pump. The first pump only records `now`.
pub fn pump(now: Instant) -> usize {
    let dt = TIMERS.with(|t| {
        let mut q = t.borrow_mut();
        let dt = q
            .last_pump
            .map(|prev| now.saturating_duration_since(prev))
            .unwrap_or_default();
        q.last_pump = Some(now);
        dt
    });
    advance(dt)
}

/// Drops every task and rewinds the clock.
pub fn reset() {
    // Take the queue out first: dropping tasks may run destructors that
    // touch the queue again.
    let old = TIMERS.with(|t| std::mem::take(&mut *t.borrow_mut()));
    drop(old);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn once_fires_at_deadline_only() {
        reset();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let id = schedule_once(ms(500), move || h.set(h.get() + 1));

        advance(ms(499));
        assert_eq!(hits.get(), 0);
        assert!(is_scheduled(id));

        advance(ms(1));
        assert_eq!(hits.get(), 1);
        assert!(!is_scheduled(id));

        advance(ms(1000));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn repeating_catches_up_in_one_advance() {
        reset();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        schedule_repeating(ms(100), move || h.set(h.get() + 1));

        assert_eq!(advance(ms(350)), 3);
        assert_eq!(hits.get(), 3);
        advance(ms(50));
        assert_eq!(hits.get(), 4);
    }

    #[test]
    fn cancel_stops_future_runs() {
        reset();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let id = schedule_repeating(ms(100), move || h.set(h.get() + 1));
        advance(ms(200));
        assert!(cancel(id));
        assert!(!cancel(id));
        advance(ms(1000));
        assert_eq!(hits.get(), 2);
        assert_eq!(pending(), 0);
    }

    #[test]
    fn task_can_schedule_relative_to_its_own_deadline() {
        reset();
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        schedule_once(ms(500), move || {
            l.borrow_mut().push(now());
            let l2 = l.clone();
            schedule_repeating(ms(100), move || l2.borrow_mut().push(now()));
        });

        advance(ms(800));
        assert_eq!(*log.borrow(), vec![ms(500), ms(600), ms(700), ms(800)]);
    }

    #[test]
    fn task_cancelling_a_later_task_prevents_it() {
        reset();
        let victim_ran = Rc::new(Cell::new(false));
        let v = victim_ran.clone();
        let victim = schedule_once(ms(20), move || v.set(true));
        schedule_once(ms(10), move || {
            cancel(victim);
        });
        advance(ms(100));
        assert!(!victim_ran.get());
    }

    #[test]
    fn pump_uses_wall_clock_deltas() {
        reset();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        schedule_once(ms(50), move || h.set(h.get() + 1));

        let t0 = Instant::now();
        assert_eq!(pump(t0), 0);
        assert_eq!(pump(t0 + ms(40)), 0);
        assert_eq!(pump(t0 + ms(60)), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(now(), ms(60));
    }
}
