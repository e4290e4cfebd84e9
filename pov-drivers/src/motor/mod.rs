//! Rotor motor drivers
//!
//! The static unit spins the rotor with a DC motor on PWM and closes the
//! loop with an encoder:
//!
//! - Encoder: edge counter read-and-reset once per control period
//! - Speed: integrating proportional controller producing the PWM duty
//! - Stall: observes zero-pulse periods without touching the controller

pub mod encoder;
pub mod speed;
pub mod stall;

pub use encoder::EncoderCounter;
pub use speed::{DutyCell, SpeedControlConfig, SpeedController};
pub use stall::{StallChange, StallDetector, DEFAULT_STALL_PERIODS};
