//! Build script for pixelwatch-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates display.toml at compile time
//! - Generates `display_config.rs` constants from it

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// PIO0 has four state machines, one per channel
const CHANNEL_COUNT: usize = 4;

/// Upper bound on pixels per channel (RAM for four frame copies)
const MAX_CHANNEL_PIXELS: i64 = 2048;

fn main() {
    setup_linker();
    let config = validate_config();
    generate_constants(&config);
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

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Values extracted from display.toml
struct DisplayToml {
    channels: Vec<i64>,
    brightness: i64,
    stutter_reduction: bool,
    check_interval_ms: i64,
    renotify_at: i64,
    restart_after: i64,
    force_unlock: bool,
    diagnostics_enabled: bool,
    acquire_timeout_ms: i64,
    drain_delay_ms: i64,
    report_interval_ms: i64,
}

/// Validate display.toml configuration at compile time
fn validate_config() -> DisplayToml {
    println!("cargo:rerun-if-changed=display.toml");

    let config_path = Path::new("display.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: display.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a display.toml configuration file.        ║\n\
            ║  Please create one in the pixelwatch-firmware directory.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read display.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in display.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    let display = validate_display(&config, &mut errors);
    let watchdog = validate_watchdog(&config, &mut errors);
    let diagnostics = validate_diagnostics(&config, &mut errors);
    let report_interval_ms = int_in(&config, "report", "interval_ms", 60_000, 0..=86_400_000, &mut errors);

    if !errors.is_empty() {
        fail("Invalid display configuration", &errors);
    }

    let (channels, brightness, stutter_reduction) = display;
    let (check_interval_ms, renotify_at, restart_after, force_unlock) = watchdog;
    let (diagnostics_enabled, acquire_timeout_ms, drain_delay_ms) = diagnostics;

    println!("cargo:warning=display.toml validated successfully");

    DisplayToml {
        channels,
        brightness,
        stutter_reduction,
        check_interval_ms,
        renotify_at,
        restart_after,
        force_unlock,
        diagnostics_enabled,
        acquire_timeout_ms,
        drain_delay_ms,
        report_interval_ms,
    }
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

/// Abort the build with a boxed list of errors
fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Optional integer `[section] key`, range checked
fn int_in(
    config: &toml::Value,
    section: &str,
    key: &str,
    default: i64,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) -> i64 {
    match config.get(section).and_then(|s| s.get(key)) {
        None => default,
        Some(toml::Value::Integer(v)) => {
            if !range.contains(v) {
                errors.push(format!(
                    "[{}] {} must be {}-{}",
                    section,
                    key,
                    range.start(),
                    range.end()
                ));
            }
            *v
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            default
        }
    }
}

/// Optional boolean `[section] key`
fn bool_or(
    config: &toml::Value,
    section: &str,
    key: &str,
    default: bool,
    errors: &mut Vec<String>,
) -> bool {
    match config.get(section).and_then(|s| s.get(key)) {
        None => default,
        Some(toml::Value::Boolean(v)) => *v,
        Some(_) => {
            errors.push(format!("[{}] {} must be true or false", section, key));
            default
        }
    }
}

/// Validate the [display] section
fn validate_display(config: &toml::Value, errors: &mut Vec<String>) -> (Vec<i64>, i64, bool) {
    let mut channels = Vec::new();

    match config.get("display").and_then(|d| d.get("channels")) {
        Some(toml::Value::Array(items)) => {
            if items.len() != CHANNEL_COUNT {
                errors.push(format!(
                    "[display] channels must list exactly {} pixel counts",
                    CHANNEL_COUNT
                ));
            }
            for (i, item) in items.iter().enumerate() {
                match item {
                    toml::Value::Integer(n) if (1..=MAX_CHANNEL_PIXELS).contains(n) => {
                        channels.push(*n)
                    }
                    toml::Value::Integer(_) => errors.push(format!(
                        "[display] channel {} must have 1-{} pixels",
                        i, MAX_CHANNEL_PIXELS
                    )),
                    _ => errors.push(format!("[display] channel {} must be an integer", i)),
                }
            }
        }
        Some(_) => errors.push("[display] channels must be an array".to_string()),
        None => errors.push("Missing [display] channels".to_string()),
    }

    let brightness = int_in(config, "display", "brightness", 255, 0..=255, errors);
    let stutter_reduction = bool_or(config, "display", "stutter_reduction", true, errors);

    (channels, brightness, stutter_reduction)
}

/// Validate the [watchdog] section
fn validate_watchdog(config: &toml::Value, errors: &mut Vec<String>) -> (i64, i64, i64, bool) {
    let check_interval_ms = int_in(config, "watchdog", "check_interval_ms", 1000, 1..=60_000, errors);
    let renotify_at = int_in(config, "watchdog", "renotify_at", 1, 0..=1000, errors);
    let restart_after = int_in(config, "watchdog", "restart_after", 15, 0..=1000, errors);
    let force_unlock = bool_or(config, "watchdog", "force_unlock", true, errors);

    if restart_after < renotify_at {
        errors.push("[watchdog] restart_after must not be below renotify_at".to_string());
    }

    (check_interval_ms, renotify_at, restart_after, force_unlock)
}

/// Validate the [diagnostics] section
fn validate_diagnostics(config: &toml::Value, errors: &mut Vec<String>) -> (bool, i64, i64) {
    let enabled = bool_or(config, "diagnostics", "enabled", true, errors);
    let acquire_timeout_ms = int_in(config, "diagnostics", "acquire_timeout_ms", 1000, 0..=60_000, errors);
    let drain_delay_ms = int_in(config, "diagnostics", "drain_delay_ms", 50, 0..=10_000, errors);

    (enabled, acquire_timeout_ms, drain_delay_ms)
}

/// Write the validated values as Rust constants
fn generate_constants(config: &DisplayToml) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("display_config.rs")).unwrap();

    writeln!(f, "// Generated by build.rs from display.toml").unwrap();
    for (i, pixels) in config.channels.iter().enumerate() {
        writeln!(f, "pub const CHANNEL_{}_PIXELS: usize = {};", i, pixels).unwrap();
    }
    writeln!(
        f,
        "pub const CHANNEL_PIXELS: [u16; {}] = [{}];",
        config.channels.len(),
        config
            .channels
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    )
    .unwrap();
    writeln!(f, "pub const BRIGHTNESS: u8 = {};", config.brightness).unwrap();
    writeln!(f, "pub const STUTTER_REDUCTION: bool = {};", config.stutter_reduction).unwrap();
    writeln!(f, "pub const CHECK_INTERVAL_MS: u64 = {};", config.check_interval_ms).unwrap();
    writeln!(f, "pub const RENOTIFY_AT: u32 = {};", config.renotify_at).unwrap();
    writeln!(f, "pub const RESTART_AFTER: u32 = {};", config.restart_after).unwrap();
    writeln!(f, "pub const FORCE_UNLOCK: bool = {};", config.force_unlock).unwrap();
    writeln!(f, "pub const DIAGNOSTICS_ENABLED: bool = {};", config.diagnostics_enabled).unwrap();
    writeln!(f, "pub const ACQUIRE_TIMEOUT_MS: u32 = {};", config.acquire_timeout_ms).unwrap();
    writeln!(f, "pub const DRAIN_DELAY_MS: u32 = {};", config.drain_delay_ms).unwrap();
    writeln!(f, "pub const REPORT_INTERVAL_MS: u64 = {};", config.report_interval_ms).unwrap();
}
