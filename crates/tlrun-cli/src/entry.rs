//! Entry modes: what the host runs once preloading has completed.

use crate::engine::ScriptEngine;
use anyhow::Context;
use std::io::{BufRead, Read, Write};
use std::path::PathBuf;
use tracing::debug;

pub const PROMPT: &str = "> ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryMode {
    File(PathBuf),
    Eval(String),
    Stdin,
    Interactive,
}

impl EntryMode {
    /// `--eval` wins over `--interactive`, which wins over a script file.
    /// With none of them the host reads a piped script from stdin, or
    /// prompts when stdin is a terminal.
    pub fn select(
        eval: Option<String>,
        interactive: bool,
        script: Option<PathBuf>,
        stdin_is_terminal: bool,
    ) -> Self {
        match (eval, interactive, script) {
            (Some(code), _, _) => EntryMode::Eval(code),
            (None, true, _) => EntryMode::Interactive,
            (None, false, Some(path)) => EntryMode::File(path),
            (None, false, None) if stdin_is_terminal => EntryMode::Interactive,
            (None, false, None) => EntryMode::Stdin,
        }
    }

    pub fn run<W: Write, R: BufRead>(
        &self,
        engine: &mut ScriptEngine<W>,
        mut input: R,
    ) -> anyhow::Result<()> {
        debug!("entry mode: {:?}", self);
        match self {
            EntryMode::File(path) => engine.run_file(path),
            EntryMode::Eval(code) => engine.run_source(code, "[eval]"),
            EntryMode::Stdin => {
                let mut source = String::new();
                input
                    .read_to_string(&mut source)
                    .context("failed to read script from stdin")?;
                engine.run_source(&source, "[stdin]")
            }
            EntryMode::Interactive => repl(engine, input),
        }
    }
}

/// Prompt loop; evaluation errors are reported and the loop continues.
/// `.exit` or end of input ends the session.
fn repl<W: Write, R: BufRead>(engine: &mut ScriptEngine<W>, mut input: R) -> anyhow::Result<()> {
    loop {
        write!(engine.output(), "{}", PROMPT)?;
        engine.output().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line == ".exit" {
            break;
        }

        match engine.exec_line(line) {
            Ok(Some(value)) => writeln!(engine.output(), "'{}'", value)?,
            Ok(None) => {}
            Err(e) => eprintln!("Uncaught {:#}", e),
        }
    }
    Ok(())
}
