//! schparts CLI - interactive part field editing for legacy KiCad schematics.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use schparts::{Outcome, OutputFormat, Session, SessionOptions};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schparts")]
#[command(about = "Edit part fields of legacy KiCad schematics in place", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a KiCad 4/5 .sch file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Write saves here instead of overwriting FILE
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Add missing field slots to every component after loading
    #[arg(long)]
    normalize: bool,

    /// Output format for list and groups
    #[arg(short, long, value_enum, default_value = "human")]
    format: Format,

    /// Run these commands in order and exit instead of starting the shell
    #[arg(short = 'c', long = "command", value_name = "CMD")]
    commands: Vec<String>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, ValueEnum)]
enum Format {
    /// Human-readable output
    Human,
    /// JSON output for scripts
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match open(&cli) {
        Ok(session) if cli.commands.is_empty() => run_shell(session),
        Ok(session) => run_commands(session, &cli.commands),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    process::exit(exit_code);
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn open(cli: &Cli) -> anyhow::Result<Session> {
    let options = SessionOptions {
        output: cli.output.clone(),
        normalize_on_load: cli.normalize,
        format: match cli.format {
            Format::Human => OutputFormat::Human,
            Format::Json => OutputFormat::Json,
        },
    };
    Session::open(&cli.file, options)
        .with_context(|| format!("cannot open {}", cli.file.display()))
}

fn run_commands(mut session: Session, commands: &[String]) -> i32 {
    for command in commands {
        match session.execute(command) {
            Ok(Outcome::Output(text)) => print_output(&text),
            Ok(Outcome::Quit) => break,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    }
    0
}

fn run_shell(mut session: Session) -> i32 {
    let interactive = io::stdin().is_terminal();
    if interactive {
        println!("{}\n", session.banner());
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();
    loop {
        if interactive {
            print!("schparts> ");
            let _ = io::stdout().flush();
        }

        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error: failed to read input: {}", e);
                return 1;
            }
        }

        match session.execute(&line) {
            Ok(Outcome::Output(text)) => print_output(&text),
            Ok(Outcome::Quit) => break,
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    if session.is_dirty() {
        eprintln!("Warning: unsaved changes to {}", session.schematic().filename.display());
    }
    0
}

fn print_output(text: &str) {
    if !text.is_empty() {
        println!("{}", text.trim_end());
    }
}
