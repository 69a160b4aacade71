//! Controlled numeric stepper: a text field between `+` and `-` controls.
//!
//! The owner passes `value` and the bounds in through [`NumberInputProps`];
//! the stepper parses and clamps every edit and reports the result through
//! `on_change`. Typed edits, clicks and held repeats all land in the same
//! commit path, so the owner sees one kind of event whatever the trigger.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use bitflags::bitflags;
use headcount_core::{FocusEvent, PointerEventKind, View, effect, on_unmount};

use crate::config::{ConfigError, StepperConfig};
use crate::parse::parse_input;
use crate::repeat::{Release, RepeatController, RepeatPhase};
use crate::{Button, Overlay, Row, TextField};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepControl {
    Increment,
    Decrement,
}

impl StepControl {
    pub fn label(self) -> &'static str {
        match self {
            StepControl::Increment => "+",
            StepControl::Decrement => "-",
        }
    }

    fn flag(self) -> Controls {
        match self {
            StepControl::Increment => Controls::INCREMENT,
            StepControl::Decrement => Controls::DECREMENT,
        }
    }
}

bitflags! {
    /// Parts of the stepper that currently accept input.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Controls: u8 {
        const INCREMENT = 1 << 0;
        const DECREMENT = 1 << 1;
        const FIELD = 1 << 2;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeEvent {
    pub name: String,
    pub value: i64,
}

/// Focus left the field. `value` is the raw buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlurEvent {
    pub name: String,
    pub value: String,
}

pub type ChangeCallback = Rc<dyn Fn(ChangeEvent)>;
pub type BlurCallback = Rc<dyn Fn(BlurEvent)>;

#[derive(Clone, Default)]
pub struct NumberInputProps {
    pub config: StepperConfig,
    pub name: String,
    pub value: i64,
    pub disabled: bool,
    pub on_change: Option<ChangeCallback>,
    pub on_blur: Option<BlurCallback>,
}

impl fmt::Debug for NumberInputProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumberInputProps")
            .field("config", &self.config)
            .field("name", &self.name)
            .field("value", &self.value)
            .field("disabled", &self.disabled)
            .field("on_change", &self.on_change.as_ref().map(|_| "<callback>"))
            .field("on_blur", &self.on_blur.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl NumberInputProps {
    pub fn new(value: i64) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
    pub fn min(mut self, min: i64) -> Self {
        self.config.min = min;
        self
    }
    pub fn max(mut self, max: i64) -> Self {
        self.config.max = max;
        self
    }
    pub fn range(self, min: i64, max: i64) -> Self {
        self.min(min).max(max)
    }
    pub fn step(mut self, step: i64) -> Self {
        self.config.step = step;
        self
    }
    pub fn allow_minus(mut self, allow: bool) -> Self {
        self.config.allow_minus = allow;
        self
    }
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
    pub fn on_change(mut self, f: impl Fn(ChangeEvent) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }
    pub fn on_blur(mut self, f: impl Fn(BlurEvent) + 'static) -> Self {
        self.on_blur = Some(Rc::new(f));
        self
    }
}

struct Inner {
    props: NumberInputProps,
    text: String,
    pointer_inside: bool,
    repeat: RepeatController,
    disposed: bool,
    /// Bumped whenever something [`NumberInput::view`] shows changes.
    revision: u64,
}

impl Inner {
    fn touch(&mut self) {
        self.revision += 1;
    }

    fn controls(&self) -> Controls {
        if self.props.disabled || self.disposed {
            return Controls::empty();
        }
        let mut c = Controls::FIELD;
        if self.props.value < self.props.config.max {
            c |= Controls::INCREMENT;
        }
        if self.props.value > self.props.config.min {
            c |= Controls::DECREMENT;
        }
        c
    }

    /// The number on screen, which leads `props.value` until the owner
    /// pushes the committed value back.
    fn current(&self) -> i64 {
        self.text.parse().unwrap_or(self.props.value)
    }
}

/// Handle to a mounted stepper. Clones share the same widget.
#[derive(Clone)]
pub struct NumberInput(Rc<RefCell<Inner>>);

impl NumberInput {
    /// Validates `props` and mounts the stepper. When a scope is current, its
    /// disposal tears the stepper down.
    pub fn new(props: NumberInputProps) -> Result<Self, ConfigError> {
        props.config.validate()?;
        let text = props.value.to_string();
        let input = Self(Rc::new(RefCell::new(Inner {
            props,
            text,
            pointer_inside: false,
            repeat: RepeatController::default(),
            disposed: false,
            revision: 0,
        })));

        let weak = Rc::downgrade(&input.0);
        effect(move || {
            on_unmount(move || {
                if let Some(input) = upgrade(&weak) {
                    input.dispose();
                }
            })
        });
        Ok(input)
    }

    pub fn name(&self) -> String {
        self.0.borrow().props.name.clone()
    }
    pub fn value(&self) -> i64 {
        self.0.borrow().props.value
    }
    /// Raw field text.
    pub fn text(&self) -> String {
        self.0.borrow().text.clone()
    }
    pub fn config(&self) -> StepperConfig {
        self.0.borrow().props.config
    }
    pub fn is_disabled(&self) -> bool {
        self.0.borrow().props.disabled
    }
    pub fn pointer_inside(&self) -> bool {
        self.0.borrow().pointer_inside
    }
    pub fn controls(&self) -> Controls {
        self.0.borrow().controls()
    }
    pub fn repeat_phase(&self) -> RepeatPhase {
        self.0.borrow().repeat.phase()
    }
    pub fn live_timers(&self) -> usize {
        self.0.borrow().repeat.live_timers()
    }
    /// Changes whenever the rendered view would change, so owners can cache
    /// [`view`](Self::view) output keyed on it.
    pub fn revision(&self) -> u64 {
        self.0.borrow().revision
    }

    /// Replaces every prop. An invalid configuration is rejected as a whole
    /// and the stepper keeps its previous props.
    pub fn set_props(&self, props: NumberInputProps) -> Result<(), ConfigError> {
        if let Err(e) = props.config.validate() {
            log::warn!("stepper '{}': rejected configuration: {e}", props.name);
            return Err(e);
        }
        let disabled = props.disabled;
        {
            let mut s = self.0.borrow_mut();
            s.text = props.value.to_string();
            let was_disabled = s.props.disabled;
            s.props = NumberInputProps {
                disabled: was_disabled,
                ..props
            };
            s.touch();
        }
        self.set_disabled(disabled);
        Ok(())
    }

    pub fn set_config(&self, config: StepperConfig) -> Result<(), ConfigError> {
        if let Err(e) = config.validate() {
            log::warn!("stepper '{}': rejected configuration: {e}", self.name());
            return Err(e);
        }
        let mut s = self.0.borrow_mut();
        if s.props.config != config {
            s.props.config = config;
            s.touch();
        }
        Ok(())
    }

    pub fn set_bounds(&self, min: i64, max: i64) -> Result<(), ConfigError> {
        let config = StepperConfig {
            min,
            max,
            ..self.config()
        };
        self.set_config(config)
    }

    /// Pushes the owner's value; the field text follows it.
    pub fn set_value(&self, value: i64) {
        let mut s = self.0.borrow_mut();
        let text = value.to_string();
        if s.props.value != value || s.text != text {
            s.props.value = value;
            s.text = text;
            s.touch();
        }
    }

    /// Disabling drops any hold in progress.
    pub fn set_disabled(&self, disabled: bool) {
        let mut s = self.0.borrow_mut();
        if s.props.disabled != disabled {
            s.props.disabled = disabled;
            s.touch();
        }
        if disabled && s.repeat.cancel() {
            log::debug!("stepper '{}': disabled, hold cancelled", s.props.name);
        }
    }

    /// Replaces the whole field text, as an edit event would.
    pub fn input_text(&self, raw: &str) {
        let next = {
            let s = self.0.borrow();
            if s.props.disabled || s.disposed {
                return;
            }
            parse_input(raw, s.props.config.allow_minus)
        };
        self.commit(next);
    }

    /// Types `typed` at the end of the current text.
    pub fn type_text(&self, typed: &str) {
        let raw = format!("{}{typed}", self.0.borrow().text);
        self.input_text(&raw);
    }

    /// A click on `control`. Returns `false` if the control is inert.
    pub fn click(&self, control: StepControl) -> bool {
        if !self.controls().contains(control.flag()) {
            return false;
        }
        self.step(control);
        true
    }

    pub fn increment(&self) -> bool {
        self.click(StepControl::Increment)
    }

    pub fn decrement(&self) -> bool {
        self.click(StepControl::Decrement)
    }

    /// Presses `control`; holding it past the repeat delay starts repeating.
    /// Returns `false` if the control is inert.
    pub fn pointer_down(&self, control: StepControl) -> bool {
        let weak = Rc::downgrade(&self.0);
        let mut s = self.0.borrow_mut();
        s.pointer_inside = true;
        if !s.controls().contains(control.flag()) {
            return false;
        }
        s.repeat.arm(control, move || {
            if let Some(input) = upgrade(&weak) {
                input.begin_repeat(control);
            }
        });
        true
    }

    /// Releases `control`. A release before repeating started is a click.
    pub fn pointer_up(&self, control: StepControl) {
        let released = self.0.borrow_mut().repeat.release();
        if released == Release::Click(control) {
            self.click(control);
        }
    }

    pub fn pointer_enter(&self) {
        self.0.borrow_mut().pointer_inside = true;
    }

    /// Only tracks the pointer and drops any hold; blur is not reported here.
    pub fn pointer_leave(&self) {
        let mut s = self.0.borrow_mut();
        s.pointer_inside = false;
        s.repeat.cancel();
    }

    /// Reports `on_blur` unless the pointer is still over the widget (a
    /// press on a step control takes focus from the field). Returns whether
    /// the blur was reported.
    pub fn focus_lost(&self) -> bool {
        let (event, on_blur) = {
            let s = self.0.borrow();
            if s.pointer_inside {
                log::trace!("stepper '{}': blur deferred, pointer inside", s.props.name);
                return false;
            }
            (
                BlurEvent {
                    name: s.props.name.clone(),
                    value: s.text.clone(),
                },
                s.props.on_blur.clone(),
            )
        };
        if let Some(cb) = on_blur {
            cb(event);
        }
        true
    }

    /// Routes a pointer event. `target` is the step control under the
    /// pointer, `None` for the field or the frame.
    pub fn handle_pointer(&self, target: Option<StepControl>, kind: PointerEventKind) {
        match (kind, target) {
            (PointerEventKind::Enter, _) => self.pointer_enter(),
            (PointerEventKind::Leave, _) => self.pointer_leave(),
            (PointerEventKind::Cancel, _) => {
                self.0.borrow_mut().repeat.cancel();
            }
            (k, Some(control)) if k.is_primary_down() => {
                self.pointer_down(control);
            }
            (k, Some(control)) if k.is_primary_up() => self.pointer_up(control),
            (k, None) if k.is_primary_down() => self.pointer_enter(),
            (k, None) if k.is_primary_up() => {
                self.0.borrow_mut().repeat.cancel();
            }
            _ => {}
        }
    }

    pub fn handle_focus(&self, event: FocusEvent) {
        if event == FocusEvent::Lost {
            self.focus_lost();
        }
    }

    /// Cancels timers and ignores further input. Runs on scope disposal.
    pub fn dispose(&self) {
        let mut s = self.0.borrow_mut();
        if !s.disposed {
            s.disposed = true;
            s.touch();
        }
        s.repeat.cancel();
    }

    pub fn view(&self) -> View {
        let s = self.0.borrow();
        let name = &s.props.name;
        let controls = s.controls();
        let mut children = vec![
            Button(
                StepControl::Increment.label(),
                controls.contains(Controls::INCREMENT),
            )
            .key(format!("{name}/increment")),
            TextField(name.clone(), s.text.clone(), controls.contains(Controls::FIELD))
                .key(format!("{name}/field")),
            Button(
                StepControl::Decrement.label(),
                controls.contains(Controls::DECREMENT),
            )
            .key(format!("{name}/decrement")),
        ];
        if s.props.disabled {
            children.insert(0, Overlay());
        }
        Row().key(name.clone()).with_children(children)
    }

    fn begin_repeat(&self, control: StepControl) {
        let weak = Rc::downgrade(&self.0);
        let started = self
            .0
            .borrow_mut()
            .repeat
            .start_repeating(control, move || {
                if let Some(input) = upgrade(&weak) {
                    input.step(control);
                }
            });
        if started {
            log::debug!("stepper '{}': repeating {control:?}", self.name());
            self.step(control);
        }
    }

    fn step(&self, control: StepControl) {
        let next = {
            let s = self.0.borrow();
            if s.props.disabled || s.disposed {
                return;
            }
            s.props.config.step_from(s.current(), control)
        };
        self.commit(next);
    }

    /// The one place a new value is clamped, shown and reported.
    fn commit(&self, next: i64) {
        let (event, on_change) = {
            let mut s = self.0.borrow_mut();
            let value = s.props.config.clamp(next);
            let text = value.to_string();
            if s.text != text {
                s.text = text;
                s.touch();
            }
            (
                ChangeEvent {
                    name: s.props.name.clone(),
                    value,
                },
                s.props.on_change.clone(),
            )
        };
        log::debug!("stepper '{}': commit {}", event.name, event.value);
        if let Some(cb) = on_change {
            cb(event);
        }
    }
}

fn upgrade(weak: &Weak<RefCell<Inner>>) -> Option<NumberInput> {
    weak.upgrade().map(NumberInput)
}
