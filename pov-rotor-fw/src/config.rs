//! Configuration loading
//!
//! rotor.toml is embedded at build time (and checked by build.rs). It is
//! parsed once at boot; a file the parser rejects falls back to defaults.

use defmt::*;
use pov_core::config::{parse_rotor_config, RotorConfig};
use static_cell::StaticCell;

/// Embedded configuration (rotor.toml)
const EMBEDDED_CONFIG: &str = include_str!("../rotor.toml");

static CONFIG: StaticCell<RotorConfig> = StaticCell::new();

/// Parse the embedded configuration
///
/// May only be called once.
pub fn load() -> &'static RotorConfig {
    let config = match parse_rotor_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            RotorConfig::default()
        }
    };

    info!(
        "Rotor {} (peer {}), calibration slot {}, {} us per slot",
        config.address.as_str(),
        config.peer_address.as_str(),
        config.calibration_slot,
        config.slot_interval_us
    );

    CONFIG.init(config)
}
