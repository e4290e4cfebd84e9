//! Build script for pov-static-fw
//!
//! - Sets up linker search paths for memory.x
//! - Validates static.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use pov_core::config::{parse_static_config, StaticConfig};
use pov_core::lock::LockToken;

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

/// Validate static.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=static.toml");

    let config_path = Path::new("static.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: static.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The static firmware embeds static.toml at build time.           ║\n\
            ║  Please create one in the pov-static-fw directory.               ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read static.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // TOML syntax
    if let Err(e) = toml::from_str::<toml::Value>(&config_content) {
        fail("Invalid TOML syntax in static.toml", &e.to_string());
    }

    // Keys and value types, against the firmware's own config type
    let config: StaticConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => fail("Invalid static configuration", &e.to_string()),
    };

    // The subset parser the firmware runs at boot must accept it too
    if let Err(e) = parse_static_config(&config_content) {
        fail(
            "static.toml is not readable by the firmware parser",
            &format!("{:?}", e),
        );
    }

    let mut errors = Vec::new();
    if LockToken::from_address(&config.address).is_err() {
        errors.push("address must be dotted numbers (it seeds the lock token)".to_string());
    }
    if config.address == config.peer_address {
        errors.push("address and peer_address must differ".to_string());
    }
    if config.max_duty == 0 {
        errors.push("max_duty must be positive".to_string());
    }
    if config.sample_period_ms == 0 || config.pulses_per_rev_x10 == 0 {
        errors.push("sample_period_ms and pulses_per_rev_x10 must be positive".to_string());
    }
    if config.target_rpm > 5000 {
        errors.push("target_rpm must be 0-5000".to_string());
    }
    if config.stall_periods == 0 {
        errors.push("stall_periods must be positive".to_string());
    }
    if config.face_refresh_ms == 0 || config.keepalive_ms == 0 {
        errors.push("face_refresh_ms and keepalive_ms must be positive".to_string());
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid static configuration                             ║\n\
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

    println!("cargo:warning=static.toml validated successfully");
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
