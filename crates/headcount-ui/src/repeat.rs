use headcount_core::timer::{self, TimerId};
use web_time::Duration;

use crate::number_input::StepControl;

/// Hold time before a pressed control starts repeating.
pub const REPEAT_DELAY: Duration = Duration::from_millis(500);
/// Time between repeats once repeating.
pub const REPEAT_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepeatPhase {
    Idle,
    Armed(StepControl),
    Repeating(StepControl),
}

/// What a release ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
    /// Nothing was held.
    Idle,
    /// Released before the delay elapsed: counts as a click.
    Click(StepControl),
    /// Released after repeating started.
    Held(StepControl),
}

enum State {
    Idle,
    Armed { control: StepControl, delay: TimerId },
    Repeating { control: StepControl, interval: TimerId },
}

/// Press-and-hold state machine for the step controls.
///
/// Owns at most one timer at a time and cancels it on every way out:
/// [`release`](Self::release), [`cancel`](Self::cancel), and drop.
pub struct RepeatController {
    state: State,
    delay: Duration,
    interval: Duration,
}

impl Default for RepeatController {
    fn default() -> Self {
        Self::new(REPEAT_DELAY, REPEAT_INTERVAL)
    }
}

impl RepeatController {
    pub fn new(delay: Duration, interval: Duration) -> Self {
        Self {
            state: State::Idle,
            delay,
            interval,
        }
    }

    pub fn phase(&self) -> RepeatPhase {
        match self.state {
            State::Idle => RepeatPhase::Idle,
            State::Armed { control, .. } => RepeatPhase::Armed(control),
            State::Repeating { control, .. } => RepeatPhase::Repeating(control),
        }
    }

    /// Starts the hold delay for `control`; `on_elapsed` runs once it has
    /// passed. Any earlier hold is cancelled first.
    pub fn arm(&mut self, control: StepControl, on_elapsed: impl Fn() + 'static) {
        self.cancel();
        let delay = timer::schedule_once(self.delay, on_elapsed);
        self.state = State::Armed { control, delay };
    }

    /// Moves an armed hold of `control` into repeating, running `on_tick`
    /// every interval. Returns `false` (and schedules nothing) if the hold
    /// was released or retargeted in the meantime.
    pub fn start_repeating(&mut self, control: StepControl, on_tick: impl Fn() + 'static) -> bool {
        match self.state {
            State::Armed { control: armed, delay } if armed == control => {
                // normally already fired; cancel covers a manual call
                timer::cancel(delay);
                let interval = timer::schedule_repeating(self.interval, on_tick);
                self.state = State::Repeating { control, interval };
                true
            }
            _ => false,
        }
    }

    pub fn release(&mut self) -> Release {
        let released = match self.state {
            State::Idle => Release::Idle,
            State::Armed { control, .. } => Release::Click(control),
            State::Repeating { control, .. } => Release::Held(control),
        };
        self.cancel();
        released
    }

    /// Drops the current hold without reporting it. Returns whether anything
    /// was active.
    pub fn cancel(&mut self) -> bool {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => false,
            State::Armed { delay, .. } => {
                timer::cancel(delay);
                true
            }
            State::Repeating { interval, .. } => {
                timer::cancel(interval);
                true
            }
        }
    }

    /// Timers this controller currently owns (0 or 1).
    pub fn live_timers(&self) -> usize {
        match self.state {
            State::Idle => 0,
            State::Armed { delay: id, .. } | State::Repeating { interval: id, .. } => {
                usize::from(timer::is_scheduled(id))
            }
        }
    }
}

impl Drop for RepeatController {
    fn drop(&mut self) {
        self.cancel();
    }
}
