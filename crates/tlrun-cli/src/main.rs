use anyhow::Context;
use clap::builder::NonEmptyStringValueParser;
use clap::{ArgAction, Parser};
use std::io::IsTerminal;
use std::path::PathBuf;
use tlrun_core::{cli_specifiers_from_values, PreloadConfig, Preloader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod engine;
mod entry;

use engine::ScriptEngine;
use entry::EntryMode;

/// tlrun - run tl scripts with preloaded modules
#[derive(Parser, Debug, Clone)]
#[command(name = "tlrun")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Module to load before the entry program (repeatable)
    #[arg(
        short = 'r',
        long = "require",
        value_name = "MODULE",
        action = ArgAction::Append,
        value_parser = NonEmptyStringValueParser::new()
    )]
    require: Vec<String>,

    /// Evaluate inline code instead of a script file
    #[arg(short, long, value_name = "CODE")]
    eval: Option<String>,

    /// Start the interactive prompt
    #[arg(short, long)]
    interactive: bool,

    /// Print the computed preload plan as JSON and exit without loading
    #[arg(long)]
    print_preload_plan: bool,

    /// Script to run
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Arguments for the script
    #[arg(last = true, value_name = "ARGS")]
    args: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so module and script output own stdout
    // Set RUST_LOG=debug to trace the preload pipeline
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = PreloadConfig::from_env().context("failed to read the process environment")?;
    debug!("preload configuration: {:?}", config);

    let preloader = Preloader::new(config);
    let plan = preloader.plan_specifiers(cli_specifiers_from_values(cli.require))?;

    if cli.print_preload_plan {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let mut engine = ScriptEngine::new(preloader.file_system().clone(), std::io::stdout());
    preloader.execute(&plan, &mut engine)?;

    if !cli.args.is_empty() {
        debug!("script arguments: {:?}", cli.args);
    }

    let stdin = std::io::stdin();
    let mode = EntryMode::select(cli.eval, cli.interactive, cli.script, stdin.is_terminal());
    mode.run(&mut engine, stdin.lock())
}
