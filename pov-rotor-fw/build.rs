//! Build script for pov-rotor-fw
//!
//! - Sets up linker search paths for memory.x
//! - Validates rotor.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use pov_core::config::{parse_rotor_config, RotorConfig};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate rotor.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=rotor.toml");

    let config_path = Path::new("rotor.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: rotor.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The rotor firmware embeds rotor.toml at build time.             ║\n\
            ║  Please create one in the pov-rotor-fw directory.                ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read rotor.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // TOML syntax
    if let Err(e) = toml::from_str::<toml::Value>(&config_content) {
        fail("Invalid TOML syntax in rotor.toml", &e.to_string());
    }

    // Keys and value types, against the firmware's own config type
    let config: RotorConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => fail("Invalid rotor configuration", &e.to_string()),
    };

    // The subset parser the firmware runs at boot must accept it too
    if let Err(e) = parse_rotor_config(&config_content) {
        fail(
            "rotor.toml is not readable by the firmware parser",
            &format!("{:?}", e),
        );
    }

    let mut errors = Vec::new();
    if config.calibration_slot >= 120 {
        errors.push("calibration_slot must be 0-119".to_string());
    }
    if config.slot_interval_us == 0 {
        errors.push("slot_interval_us must be positive".to_string());
    }
    if config.link_timeout_ms == 0 {
        errors.push("link_timeout_ms must be positive".to_string());
    }
    if config.address == config.peer_address {
        errors.push("address and peer_address must differ".to_string());
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid rotor configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=rotor.toml validated successfully");
}

fn fail(title: &str, message: &str) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        ║                                                                  ║\n\
        {}\n\
        ║                                                                  ║\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        format_error_lines(message)
    );
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
