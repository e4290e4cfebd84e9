//! Hardware driver implementations
//!
//! This crate provides concrete implementations on top of the traits
//! defined in pov-core:
//!
//! - Rotor motor speed regulation (encoder counter, speed controller,
//!   stall detector)
//! - LED output line bank over `embedded-hal` pins

#![no_std]
#![deny(unsafe_code)]

pub mod lines;
pub mod motor;
