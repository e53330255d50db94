//! vtstate dump runner
//!
//! Feeds recorded terminal output through the emulator and prints the
//! resulting state: the restore script by default, or a snapshot.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use vtstate::{Config, Terminal};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut cols: Option<usize> = None;
    let mut rows: Option<usize> = None;
    let mut scrollback: Option<usize> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut input_file: Option<String> = None;
    let mut output_file: Option<String> = None;
    let mut output_format = OutputFormat::Dump;
    let mut show_history = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--cols" => {
                i += 1;
                cols = parse_number(&args, i, "--cols");
            },
            "-r" | "--rows" => {
                i += 1;
                rows = parse_number(&args, i, "--rows");
            },
            "-s" | "--scrollback" => {
                i += 1;
                scrollback = parse_number(&args, i, "--scrollback");
            },
            "--config" => {
                i += 1;
                config_path = args.get(i).map(PathBuf::from);
            },
            "-o" | "--output" => {
                i += 1;
                output_file = args.get(i).cloned();
            },
            "-j" | "--json" => output_format = OutputFormat::Json,
            "-t" | "--text" => output_format = OutputFormat::Text,
            "--history" => show_history = true,
            "-h" | "--help" => {
                print_help();
                return ExitCode::SUCCESS;
            },
            arg => {
                if input_file.is_none() && !arg.starts_with('-') {
                    input_file = Some(arg.to_string());
                } else {
                    eprintln!("Unknown argument '{}'", arg);
                    return ExitCode::FAILURE;
                }
            },
        }
        i += 1;
    }

    let mut config = match &config_path {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            },
        },
        None => Config::load_or_default(),
    };
    if let Some(cols) = cols {
        config.cols = cols;
    }
    if let Some(rows) = rows {
        config.rows = rows;
    }
    if let Some(lines) = scrollback {
        config.scrollback_lines = lines;
    }

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

    let mut terminal = Terminal::from_config(&config);
    terminal.process(&input_data);
    tracing::info!(
        bytes = input_data.len(),
        history = terminal.scrollback().len(),
        "processed input"
    );

    let mut output = String::new();
    if show_history {
        for line in terminal.scrollback().iter() {
            output.push_str(&line.text());
            output.push('\n');
        }
    }
    match output_format {
        OutputFormat::Dump => output.push_str(&terminal.state_dump()),
        OutputFormat::Text => output.push_str(&terminal.snapshot().to_text()),
        OutputFormat::Json => match terminal.snapshot().to_json() {
            Ok(json) => {
                output.push_str(&json);
                output.push('\n');
            },
            Err(e) => {
                eprintln!("Error serializing snapshot: {}", e);
                return ExitCode::FAILURE;
            },
        },
    }

    let written = match &output_file {
        Some(path) => std::fs::write(path, output.as_bytes()),
        None => io::stdout().write_all(output.as_bytes()),
    };
    if let Err(e) = written {
        eprintln!("Error writing output: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn parse_number(args: &[String], i: usize, flag: &str) -> Option<usize> {
    let value = args.get(i)?;
    match value.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!(flag, value = %value, "ignoring invalid number");
            None
        },
    }
}

#[derive(Clone, Copy)]
enum OutputFormat {
    Dump,
    Text,
    Json,
}

fn print_help() {
    println!("vtstate dump runner");
    println!();
    println!("Usage: vtstate-dump [OPTIONS] [INPUT_FILE]");
    println!();
    println!("Options:");
    println!("  -c, --cols <N>        Set terminal width (default: 80)");
    println!("  -r, --rows <N>        Set terminal height (default: 24)");
    println!("  -s, --scrollback <N>  Scrollback lines to keep (default: 10000)");
    println!("      --config <PATH>   Read settings from a JSON config file");
    println!("  -j, --json            Output snapshot as JSON");
    println!("  -t, --text            Output screen text");
    println!("      --history         Print scrollback lines before the output");
    println!("  -o, --output <PATH>   Write to a file instead of stdout");
    println!("  -h, --help            Show this help message");
    println!();
    println!("Without --json or --text, prints the state restore script.");
    println!("If no input file is specified, reads from stdin.");
    println!();
    println!("Examples:");
    println!("  vtstate-dump session.log > restore.bin");
    println!("  vtstate-dump -c 120 -r 40 --text session.log");
}
