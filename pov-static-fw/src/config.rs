//! Configuration loading
//!
//! static.toml is embedded at build time (and checked by build.rs). It is
//! parsed once at boot; a file the parser rejects falls back to defaults.

use defmt::*;
use pov_core::config::{parse_static_config, StaticConfig};
use pov_drivers::motor::SpeedControlConfig;
use static_cell::StaticCell;

/// Embedded configuration (static.toml)
const EMBEDDED_CONFIG: &str = include_str!("../static.toml");

static CONFIG: StaticCell<StaticConfig> = StaticCell::new();

/// Parse the embedded configuration
///
/// May only be called once.
pub fn load() -> &'static StaticConfig {
    let config = match parse_static_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            StaticConfig::default()
        }
    };

    info!(
        "Static unit {} (peer {}), target {} rpm, start time {}",
        config.address.as_str(),
        config.peer_address.as_str(),
        config.target_rpm,
        config.start_time.as_str()
    );

    CONFIG.init(config)
}

/// Speed controller settings taken from the unit config
pub fn speed_control(config: &StaticConfig) -> SpeedControlConfig {
    SpeedControlConfig {
        target_rpm: config.target_rpm,
        pulses_per_rev_x10: config.pulses_per_rev_x10,
        period_ms: config.sample_period_ms,
        kp_x100: config.kp_x100,
        max_duty: config.max_duty,
    }
}
