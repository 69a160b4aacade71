use thiserror::Error;

use crate::number_input::StepControl;

/// Rejected stepper configuration. Returned instead of applying the
/// configuration, so a stepper never runs with inconsistent bounds.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("min ({min}) must be less than or equal to max ({max})")]
    MinAboveMax { min: i64, max: i64 },
    #[error("step ({step}) must be less than or equal to max - min ({min}..={max})")]
    StepTooLarge { step: i64, min: i64, max: i64 },
    #[error("step ({step}) must be greater than 0")]
    NonPositiveStep { step: i64 },
    #[error("min ({min}) is less than 0 but allow_minus is false")]
    NegativeMinWithoutMinus { min: i64 },
}

/// Bounds and step of a stepper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepperConfig {
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub allow_minus: bool,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            min: 0,
            max: i64::MAX,
            step: 1,
            allow_minus: false,
        }
    }
}

impl StepperConfig {
    pub fn new(min: i64, max: i64, step: i64, allow_minus: bool) -> Result<Self, ConfigError> {
        let config = Self {
            min,
            max,
            step,
            allow_minus,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Self {
            min,
            max,
            step,
            allow_minus,
        } = *self;
        if min > max {
            return Err(ConfigError::MinAboveMax { min, max });
        }
        // i128 so that the full i64 range does not overflow
        let span = max as i128 - min as i128;
        if step as i128 > span && max != min {
            return Err(ConfigError::StepTooLarge { step, min, max });
        }
        if step <= 0 {
            return Err(ConfigError::NonPositiveStep { step });
        }
        if min < 0 && !allow_minus {
            return Err(ConfigError::NegativeMinWithoutMinus { min });
        }
        Ok(())
    }

    pub fn clamp(&self, v: i64) -> i64 {
        if v < self.min {
            self.min
        } else if v > self.max {
            self.max
        } else {
            v
        }
    }

    /// `current ± step`, clamped.
    pub fn step_from(&self, current: i64, control: StepControl) -> i64 {
        let next = match control {
            StepControl::Increment => current.saturating_add(self.step),
            StepControl::Decrement => current.saturating_sub(self.step),
        };
        self.clamp(next)
    }
}
