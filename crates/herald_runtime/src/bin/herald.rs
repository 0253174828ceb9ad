//! Herald CLI entry point.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use herald_command::{ActorHandle, CommandManager};
use herald_runtime::{ConsoleActor, ConsoleReporter, DemoCommands, Repl, RuntimeConfig, logging};

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    config_file: Option<PathBuf>,
    commands: Vec<String>,
    show_help: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();
    let mut args = args.into_iter().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "--config" => {
                let path = args.next().ok_or("--config requires a file")?;
                config.config_file = Some(PathBuf::from(path));
            }
            "-c" | "--command" => {
                let line = args.next().ok_or("-c requires a command line")?;
                config.commands.push(line);
            }
            other => return Err(format!("unknown argument: {other}").into()),
        }
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = parse_args(args)?;

    if cli.show_help {
        print_help();
        return Ok(ExitCode::SUCCESS);
    }

    if cli.show_version {
        println!("herald {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    let config = match &cli.config_file {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };
    logging::init(&config.log_filter)?;

    let manager = CommandManager::new()
        .with_config(config.dispatch)
        .with_reporter(ConsoleReporter);
    let report = manager.register_holder(DemoCommands::new());
    for (method, err) in &report.failed {
        eprintln!("\x1b[33mWarning: {method}: {err}\x1b[0m");
    }

    let manager = Arc::new(manager);

    if !cli.commands.is_empty() {
        let console: ActorHandle = Arc::new(ConsoleActor::new());
        let failed = cli
            .commands
            .iter()
            .filter(|line| !manager.execute(&console, line).is_executed())
            .count();
        return Ok(if failed == 0 {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let mut repl = Repl::new(manager, &config)?;
    repl.run()?;
    Ok(ExitCode::SUCCESS)
}

fn print_help() {
    println!(
        "\x1b[1mHerald\x1b[0m - Typed command dispatch

\x1b[1mUSAGE:\x1b[0m
    herald [OPTIONS]

\x1b[1mOPTIONS:\x1b[0m
    -h, --help              Print help information
    -V, --version           Print version information
    --config FILE           Load settings from a TOML file
    -c, --command LINE      Run LINE as the console and exit (repeatable)

\x1b[1mENVIRONMENT:\x1b[0m
    HERALD_LOG              Log filter, e.g. herald_command=debug

\x1b[1mEXAMPLES:\x1b[0m
    herald                                   Start interactive REPL
    herald -c 'echo hello world'             Run one command
    herald -c 'scale 2' -c 'whoami'          Run several commands
    herald --config herald.toml              Start with settings from a file"
    );
}
