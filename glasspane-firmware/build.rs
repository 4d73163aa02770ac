//! Build script for glasspane-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates panel.toml and turns it into `panel_config.rs`

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    let panel = validate_config();
    generate_config(&panel);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Values read from panel.toml
struct Panel {
    width: i64,
    height: i64,
    rotation: i64,
    draw_buffer_divisor: i64,
    swap_bytes: bool,
    display_spi_hz: i64,
    x_min: i64,
    x_max: i64,
    y_min: i64,
    y_max: i64,
    min_pressure: i64,
    touch_spi_hz: i64,
    yield_ms: i64,
}

/// Validate panel.toml at compile time
fn validate_config() -> Panel {
    println!("cargo:rerun-if-changed=panel.toml");

    let config_path = Path::new("panel.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: panel.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a panel.toml configuration file.          ║\n\
            ║  Please create one in the glasspane-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read panel.toml                                ║\n\
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
                ║  ERROR: Invalid TOML syntax in panel.toml                        ║\n\
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
    for section in ["display", "touch", "loop"] {
        if !matches!(config.get(section), Some(toml::Value::Table(_))) {
            errors.push(format!("Missing [{}] section", section));
        }
    }
    report("Missing required sections in panel.toml", &errors);

    let mut errors = Vec::new();
    let mut int = |section: &str, key: &str, min: i64, max: i64| -> i64 {
        match config.get(section).and_then(|s| s.get(key)) {
            Some(toml::Value::Integer(v)) if (min..=max).contains(v) => *v,
            Some(toml::Value::Integer(_)) => {
                errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
                0
            }
            Some(_) => {
                errors.push(format!("[{}] {} must be an integer", section, key));
                0
            }
            None => {
                errors.push(format!("[{}] missing '{}'", section, key));
                0
            }
        }
    };

    let panel = Panel {
        width: int("display", "width", 1, 480),
        height: int("display", "height", 1, 480),
        rotation: int("display", "rotation", 0, 3),
        draw_buffer_divisor: int("display", "draw_buffer_divisor", 1, 480),
        swap_bytes: true,
        display_spi_hz: int("display", "spi_frequency_hz", 1_000_000, 62_500_000),
        x_min: int("touch", "x_min", 0, 4095),
        x_max: int("touch", "x_max", 0, 4095),
        y_min: int("touch", "y_min", 0, 4095),
        y_max: int("touch", "y_max", 0, 4095),
        min_pressure: int("touch", "min_pressure", 0, 4095),
        touch_spi_hz: int("touch", "spi_frequency_hz", 100_000, 2_500_000),
        yield_ms: int("loop", "yield_ms", 1, 1000),
    };

    let swap_bytes = match config.get("display").and_then(|d| d.get("swap_bytes")) {
        Some(toml::Value::Boolean(b)) => *b,
        Some(_) => {
            errors.push("[display] swap_bytes must be a boolean".to_string());
            true
        }
        None => true,
    };

    if panel.x_min >= panel.x_max {
        errors.push("[touch] x_min must be below x_max".to_string());
    }
    if panel.y_min >= panel.y_max {
        errors.push("[touch] y_min must be below y_max".to_string());
    }
    // The partial buffer must hold at least one full row
    if panel.draw_buffer_divisor > 0
        && panel.width * panel.height / panel.draw_buffer_divisor < panel.width
    {
        errors.push("[display] draw_buffer_divisor leaves less than one row".to_string());
    }
    report("Invalid panel configuration", &errors);

    println!("cargo:warning=panel.toml validated successfully");
    Panel {
        swap_bytes,
        ..panel
    }
}

/// Write `panel_config.rs` into OUT_DIR
fn generate_config(panel: &Panel) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let draw_buffer_pixels = panel.width * panel.height / panel.draw_buffer_divisor;

    let source = format!(
        "// Generated from panel.toml by build.rs\n\
         pub const WIDTH: u16 = {};\n\
         pub const HEIGHT: u16 = {};\n\
         pub const ROTATION: u8 = {};\n\
         pub const DRAW_BUFFER_DIVISOR: u16 = {};\n\
         pub const DRAW_BUFFER_PIXELS: usize = {};\n\
         pub const SWAP_BYTES: bool = {};\n\
         pub const DISPLAY_SPI_HZ: u32 = {};\n\
         pub const CAL_X_MIN: u16 = {};\n\
         pub const CAL_X_MAX: u16 = {};\n\
         pub const CAL_Y_MIN: u16 = {};\n\
         pub const CAL_Y_MAX: u16 = {};\n\
         pub const MIN_PRESSURE: u16 = {};\n\
         pub const TOUCH_SPI_HZ: u32 = {};\n\
         pub const YIELD_MS: u32 = {};\n",
        panel.width,
        panel.height,
        panel.rotation,
        panel.draw_buffer_divisor,
        draw_buffer_pixels,
        panel.swap_bytes,
        panel.display_spi_hz,
        panel.x_min,
        panel.x_max,
        panel.y_min,
        panel.y_max,
        panel.min_pressure,
        panel.touch_spi_hz,
        panel.yield_ms,
    );

    fs::write(out_dir.join("panel_config.rs"), source).unwrap();
}

/// Fail the build with a boxed error list
fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
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
