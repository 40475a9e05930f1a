//! DVHSTX Headless Console Runner
//!
//! Feeds bytes from stdin or a file into a text console running on the
//! simulated driver and prints the resulting grid.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use dvhstx::core::Attribute;
use dvhstx::driver::SimDriver;
use dvhstx::{DisplayConfig, TextConsole};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut input_file: Option<String> = None;
    let mut config_file: Option<PathBuf> = None;
    let mut attribute = Attribute::DEFAULT;
    let mut output_format = OutputFormat::Text;
    let mut show_cursor = false;
    let mut show_help = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-f" | "--file" => {
                i += 1;
                if i < args.len() {
                    input_file = Some(args[i].clone());
                }
            },
            "-c" | "--config" => {
                i += 1;
                if i < args.len() {
                    config_file = Some(PathBuf::from(&args[i]));
                }
            },
            "-a" | "--attr" => {
                i += 1;
                if i < args.len() {
                    match parse_attribute(&args[i]) {
                        Some(attr) => attribute = attr,
                        None => {
                            eprintln!("Invalid attribute '{}'", args[i]);
                            return ExitCode::FAILURE;
                        },
                    }
                }
            },
            "--cursor" => {
                show_cursor = true;
            },
            "-j" | "--json" => {
                output_format = OutputFormat::Json;
            },
            "-t" | "--text" => {
                output_format = OutputFormat::Text;
            },
            "-h" | "--help" => {
                show_help = true;
            },
            _ => {
                // Treat as input file if no flag
                if input_file.is_none() && !args[i].starts_with('-') {
                    input_file = Some(args[i].clone());
                }
            },
        }
        i += 1;
    }

    if show_help {
        print_help();
        return ExitCode::SUCCESS;
    }

    let config = match &config_file {
        Some(path) => match DisplayConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            },
        },
        None => DisplayConfig::default(),
    };

    let mut console = TextConsole::new(SimDriver::new(), config.pinout);
    console.set_attribute(attribute);
    if let Err(e) = console.start() {
        eprintln!("Error starting console: {}", e);
        return ExitCode::FAILURE;
    }
    if show_cursor {
        console.show_cursor();
    }

    // Read input
    let input_data = match &input_file {
        Some(path) => match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path, e);
                return ExitCode::FAILURE;
            },
        },
        None => {
            let mut data = Vec::new();
            if let Err(e) = io::stdin().read_to_end(&mut data) {
                eprintln!("Error reading stdin: {}", e);
                return ExitCode::FAILURE;
            }
            data
        },
    };

    for &b in &input_data {
        console.write_byte(b);
    }

    let Some(snapshot) = console.snapshot() else {
        eprintln!("Console stopped unexpectedly");
        return ExitCode::FAILURE;
    };

    match output_format {
        OutputFormat::Text => {
            println!("Console State ({}x{}):", snapshot.cols, snapshot.rows);
            println!("Cursor: ({}, {})", snapshot.cursor.x, snapshot.cursor.y);
            println!("---");
            print!("{}", snapshot.to_text());
            println!("---");
        },
        OutputFormat::Json => match snapshot.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing snapshot: {}", e);
                return ExitCode::FAILURE;
            },
        },
    }

    ExitCode::SUCCESS
}

#[derive(Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

/// Decimal or `0x`-prefixed hex attribute byte
fn parse_attribute(s: &str) -> Option<Attribute> {
    let bits = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok()?,
        None => s.parse().ok()?,
    };
    Some(Attribute::from_bits(bits))
}

fn print_help() {
    println!("DVHSTX Headless Console Runner");
    println!();
    println!("Usage: dvhstx-headless [OPTIONS] [INPUT_FILE]");
    println!();
    println!("Options:");
    println!("  -f, --file <PATH>    Read input from file");
    println!("  -c, --config <PATH>  Load display configuration (JSON)");
    println!("  -a, --attr <BYTE>    Initial attribute, decimal or 0x hex (default: 0x07)");
    println!("      --cursor         Show the block cursor");
    println!("  -j, --json           Output snapshot as JSON");
    println!("  -t, --text           Output snapshot as text (default)");
    println!("  -h, --help           Show this help message");
    println!();
    println!("If no input file is specified, reads from stdin.");
    println!();
    println!("Examples:");
    println!("  printf 'Hello\\r\\nWorld' | dvhstx-headless");
    println!("  dvhstx-headless -a 0x0c --json input.txt");
}
