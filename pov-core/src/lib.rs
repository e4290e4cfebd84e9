//! Board-agnostic core logic for the POV clock firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Frame buffer shared between the link and the display loop
//! - Display phase tracking and slot scanning
//! - Clock face composition, wall clock and chime scheduling
//! - Lock tokens and the rotor-side lock state
//! - Protocol engines for both units
//! - Link health monitoring
//! - Configuration types and the embedded config parser
//! - Hardware abstraction traits

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod display;
pub mod engine;
pub mod face;
pub mod frame;
pub mod lock;
pub mod monitor;
pub mod traits;
