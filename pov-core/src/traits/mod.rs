//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod chime;
pub mod lines;
pub mod motor;

pub use chime::Chime;
pub use lines::OutputLines;
pub use motor::DutyOutput;
