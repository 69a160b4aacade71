#![allow(non_snake_case)]
//! Widgets: the numeric stepper and the headless view builders it renders
//! with.

pub mod config;
pub mod number_input;
pub mod parse;
pub mod repeat;

use headcount_core::prelude::*;

pub use config::{ConfigError, StepperConfig};
pub use number_input::{
    BlurEvent, ChangeEvent, Controls, NumberInput, NumberInputProps, StepControl,
};
pub use parse::parse_input;
pub use repeat::{REPEAT_DELAY, REPEAT_INTERVAL, Release, RepeatController, RepeatPhase};

pub fn Row() -> View {
    View::new(ViewKind::Row)
}

pub fn Column() -> View {
    View::new(ViewKind::Column)
}

pub fn Text(text: impl Into<String>) -> View {
    View::new(ViewKind::Text { text: text.into() })
}

pub fn Button(label: impl Into<String>, enabled: bool) -> View {
    let label = label.into();
    View::new(ViewKind::Button {
        label: label.clone(),
        enabled,
    })
    .semantics(Semantics::new(Role::Button).label(label).enabled(enabled))
}

pub fn TextField(name: impl Into<String>, text: impl Into<String>, enabled: bool) -> View {
    let name = name.into();
    View::new(ViewKind::TextField {
        name: name.clone(),
        text: text.into(),
        enabled,
    })
    .semantics(Semantics::new(Role::TextField).label(name).enabled(enabled))
}

/// Blocks pointer input to its siblings.
pub fn Overlay() -> View {
    View::new(ViewKind::Overlay).semantics(Semantics::new(Role::Container).enabled(false))
}
