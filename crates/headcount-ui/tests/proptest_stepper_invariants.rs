//! Property-based invariant tests for the numeric stepper.
//!
//! 1. Every reported value lies inside the configured bounds, for any mix of
//!    typed edits, clicks and held repeats.
//! 2. Holding a control for `t` ms yields `floor((t - 500) / 100) + 1` steps
//!    (capped by the bound) and zero steps below the delay.
//! 3. The step controls are inert exactly at their bound.

use std::cell::RefCell;
use std::rc::Rc;

use headcount_core::timer;
use headcount_ui::{Controls, NumberInput, NumberInputProps, StepControl, StepperConfig};
use proptest::prelude::*;
use web_time::Duration;

// ── Helpers ─────────────────────────────────────────────────────────────

fn config_strategy() -> impl Strategy<Value = StepperConfig> {
    (-1000i64..1000, 0i64..2000, any::<bool>())
        .prop_flat_map(|(min, span, allow)| {
            let max_step = span.max(1);
            (Just(min), Just(min + span), 1i64..=max_step, Just(allow || min < 0))
        })
        .prop_map(|(min, max, step, allow_minus)| StepperConfig {
            min,
            max,
            step,
            allow_minus,
        })
}

#[derive(Clone, Debug)]
enum Action {
    Type(String),
    Click(StepControl),
    Hold(StepControl, u64),
}

fn control_strategy() -> impl Strategy<Value = StepControl> {
    prop_oneof![Just(StepControl::Increment), Just(StepControl::Decrement)]
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        "[-0-9a-z ]{0,8}".prop_map(Action::Type),
        control_strategy().prop_map(Action::Click),
        (control_strategy(), 0u64..2000).prop_map(|(c, ms)| Action::Hold(c, ms)),
    ]
}

/// Mounts a stepper whose owner records and pushes back every change.
fn mount(config: StepperConfig, value: i64) -> (NumberInput, Rc<RefCell<Vec<i64>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let slot: Rc<RefCell<Option<NumberInput>>> = Rc::new(RefCell::new(None));
    let (s2, slot2) = (seen.clone(), slot.clone());
    let props = NumberInputProps {
        config,
        value,
        ..Default::default()
    }
    .on_change(move |ev| {
        s2.borrow_mut().push(ev.value);
        if let Some(input) = slot2.borrow().as_ref() {
            input.set_value(ev.value);
        }
    });
    let input = NumberInput::new(props).expect("strategy only builds valid configs");
    *slot.borrow_mut() = Some(input.clone());
    (input, seen)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Clamp invariant
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reported_values_stay_in_bounds(
        config in config_strategy(),
        actions in proptest::collection::vec(action_strategy(), 1..12),
    ) {
        timer::reset();
        let (input, seen) = mount(config, config.min);
        for action in actions {
            match action {
                Action::Type(raw) => input.input_text(&raw),
                Action::Click(c) => {
                    input.click(c);
                }
                Action::Hold(c, ms) => {
                    input.pointer_down(c);
                    timer::advance(Duration::from_millis(ms));
                    input.pointer_up(c);
                }
            }
        }
        for v in seen.borrow().iter() {
            prop_assert!(
                config.min <= *v && *v <= config.max,
                "{} escaped {}..={}", v, config.min, config.max
            );
        }
        prop_assert_eq!(timer::pending(), 0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Hold timing
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn hold_step_count_matches_schedule(hold_ms in 0u64..3000, max in 1i64..40) {
        timer::reset();
        let config = StepperConfig { max, ..Default::default() };
        let (input, _) = mount(config, 0);
        input.pointer_down(StepControl::Increment);
        timer::advance(Duration::from_millis(hold_ms));
        input.pointer_up(StepControl::Increment);

        let expected = if hold_ms < 500 { 1 } else { (hold_ms - 500) / 100 + 1 };
        prop_assert_eq!(input.value(), (expected as i64).min(max));
    }
}

#[test]
fn hold_for_1200ms_gives_eight_increments() {
    timer::reset();
    let config = StepperConfig {
        max: 100,
        ..Default::default()
    };
    let (input, seen) = mount(config, 0);
    input.pointer_down(StepControl::Increment);
    timer::advance(Duration::from_millis(1200));
    input.pointer_up(StepControl::Increment);
    assert_eq!(input.value(), 8);
    assert_eq!(*seen.borrow(), (1..=8).collect::<Vec<_>>());
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Boundary inertness
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn controls_inert_exactly_at_bounds(
        config in config_strategy(),
        offset in -5i64..5,
        disabled in any::<bool>(),
    ) {
        timer::reset();
        let value = if offset < 0 { config.min + offset } else { config.max - offset };
        let (input, _) = mount(config, value);
        input.set_disabled(disabled);
        let c = input.controls();

        prop_assert_eq!(c.contains(Controls::INCREMENT), !disabled && value < config.max);
        prop_assert_eq!(c.contains(Controls::DECREMENT), !disabled && value > config.min);
        prop_assert_eq!(input.view().has_overlay(), disabled);
    }
}
