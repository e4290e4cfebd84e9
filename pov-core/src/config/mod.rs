//! Configuration types and the embedded config parser

pub mod parse;
pub mod types;

pub use parse::{parse_rotor_config, parse_static_config, ConfigError};
pub use types::*;
