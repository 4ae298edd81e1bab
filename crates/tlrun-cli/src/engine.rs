//! Minimal line-oriented script evaluator.
//!
//! One statement per line:
//!
//! ```text
//! -- comment
//! greeting = "hello"     define a global
//! print greeting         write a value followed by a newline
//! error "boom"           raise an error
//! greeting               expression (its value is echoed at the prompt)
//! ```
//!
//! Expressions are string literals (`"..."` or `'...'`) or global names.
//! Preloaded modules and the entry program share one set of globals.

use anyhow::{anyhow, bail, Context};
use rustc_hash::FxHashMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tlrun_core::fs::FileSystem;
use tlrun_core::{ModuleEvaluator, ResolvedModule};

pub struct ScriptEngine<W: Write> {
    globals: FxHashMap<String, String>,
    file_system: Arc<dyn FileSystem>,
    out: W,
}

impl<W: Write> ScriptEngine<W> {
    pub fn new(file_system: Arc<dyn FileSystem>, out: W) -> Self {
        Self {
            globals: FxHashMap::default(),
            file_system,
            out,
        }
    }

    #[cfg(test)]
    pub fn global(&self, name: &str) -> Option<&str> {
        self.globals.get(name).map(String::as_str)
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.out
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    /// Read and run a script file
    pub fn run_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let source = self
            .file_system
            .read_file(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        self.run_source(&source, &path.display().to_string())
    }

    /// Run every line of `source`; `origin` labels errors
    pub fn run_source(&mut self, source: &str, origin: &str) -> anyhow::Result<()> {
        for (index, line) in source.lines().enumerate() {
            self.exec_line(line)
                .with_context(|| format!("{}:{}", origin, index + 1))?;
        }
        Ok(())
    }

    /// Execute one statement. Returns the value of a bare expression.
    pub fn exec_line(&mut self, line: &str) -> anyhow::Result<Option<String>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with("--") {
            return Ok(None);
        }

        if let Some(rest) = keyword_argument(line, "print") {
            let value = match rest {
                "" => String::new(),
                expr => self.eval(expr)?,
            };
            writeln!(self.out, "{}", value)?;
            self.out.flush()?;
            return Ok(None);
        }

        if let Some(rest) = keyword_argument(line, "error") {
            let message = if rest.is_empty() {
                "error".to_string()
            } else {
                self.eval(rest)?
            };
            return Err(anyhow!(message));
        }

        if let Some((name, expr)) = line.split_once('=') {
            let name = name.trim();
            if is_identifier(name) {
                let value = self.eval(expr.trim())?;
                self.globals.insert(name.to_string(), value);
                return Ok(None);
            }
        }

        self.eval(line).map(Some)
    }

    fn eval(&self, expr: &str) -> anyhow::Result<String> {
        if let Some(text) = string_literal(expr) {
            return Ok(text.to_string());
        }
        if is_identifier(expr) {
            return self
                .globals
                .get(expr)
                .cloned()
                .ok_or_else(|| anyhow!("{} is not defined", expr));
        }
        bail!("invalid expression: {}", expr)
    }
}

impl<W: Write> ModuleEvaluator for ScriptEngine<W> {
    fn evaluate(&mut self, module: &ResolvedModule) -> anyhow::Result<()> {
        self.run_file(module.path())
    }
}

/// `print x` -> `Some("x")`, `print` -> `Some("")`, `printer` -> `None`
fn keyword_argument<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if rest.is_empty() {
        Some("")
    } else if rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

fn string_literal(expr: &str) -> Option<&str> {
    ['"', '\''].into_iter().find_map(|quote| {
        expr.strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
    })
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
