//! PWM duty output
//!
//! The motor driver input is fed from channel A of one PWM slice. The
//! counter wraps at `max_duty - 1`, so a compare value of `max_duty` keeps
//! the output permanently high.

use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use fixed::types::U12F4;
use pov_core::traits::DutyOutput;

/// Default clock divider: 125 MHz / 4 / 1024 is about 30 kHz, above hearing
pub const DEFAULT_PWM_DIVIDER: u8 = 4;

/// Motor PWM on channel A of a slice
pub struct MotorPwm<'d> {
    pwm: Pwm<'d>,
    config: PwmConfig,
    max_duty: u16,
}

impl<'d> MotorPwm<'d> {
    /// Configure the slice and start with the output low
    pub fn new(mut pwm: Pwm<'d>, max_duty: u16, divider: u8) -> Self {
        let max_duty = max_duty.max(1);

        let mut config = PwmConfig::default();
        config.top = max_duty - 1;
        config.divider = U12F4::from_num(divider.max(1));
        config.compare_a = 0;
        pwm.set_config(&config);

        Self {
            pwm,
            config,
            max_duty,
        }
    }

    /// Duty currently applied
    pub fn duty(&self) -> u16 {
        self.config.compare_a
    }
}

impl DutyOutput for MotorPwm<'_> {
    fn set_duty(&mut self, duty: u16) {
        let duty = duty.min(self.max_duty);
        if duty == self.config.compare_a {
            return;
        }
        self.config.compare_a = duty;
        self.pwm.set_config(&self.config);
    }

    fn max_duty(&self) -> u16 {
        self.max_duty
    }
}
