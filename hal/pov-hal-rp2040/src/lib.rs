//! RP2040-specific HAL for the POV clock firmware
//!
//! This crate provides RP2040 implementations of the `pov-core` traits and
//! the serial link shared by both units:
//!
//! - PWM duty output for the rotor drive motor
//! - Line-framed link reader and writer over async UART halves

#![no_std]

pub mod link;
pub mod pwm;

pub use link::{write_line, LineReader, LinkError};
pub use pwm::MotorPwm;
