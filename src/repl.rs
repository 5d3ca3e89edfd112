//! Interactive read-evaluate-print loop.
//!
//! Line input sits behind [`LineReader`] so the loop runs the same over a
//! rustyline editor or a scripted sequence of lines.

use crate::calculator::{Binding, CalcError, Calculator, Environment, Number};
use anyhow::Context;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, Write};
use tracing::warn;

pub const PROMPT: &str = ">>> ";

/// One attempt to read a line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    Eof,
    Interrupted,
}

pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<ReadOutcome>;

    /// Record an evaluated line in the session history.
    fn remember(&mut self, _line: &str) {}
}

impl LineReader for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<ReadOutcome> {
        match self.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(err) => Err(err.into()),
        }
    }

    fn remember(&mut self, line: &str) {
        if let Err(err) = self.add_history_entry(line) {
            warn!("Failed to add history entry: {}", err);
        }
    }
}

/// What the loop does with one line of input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Quit,
    Skip,
    Print(String),
}

/// Render an evaluation for a terminal: the value, or `Error: <message>`.
pub fn render_result(result: &Result<Number, CalcError>, grouped: bool) -> String {
    match result {
        Ok(value) if grouped => value.format_grouped(),
        Ok(value) => value.to_string(),
        Err(err) => format!("Error: {}", err),
    }
}

pub fn interpret(calculator: &Calculator, line: &str, grouped: bool) -> Step {
    let input = line.trim();
    if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
        return Step::Quit;
    }
    if input.is_empty() {
        return Step::Skip;
    }
    if input == "help" {
        return Step::Print(describe(calculator.environment()));
    }
    Step::Print(render_result(&calculator.evaluate(input), grouped))
}

/// List the constants, and the functions with how many arguments each takes.
fn describe(env: &Environment) -> String {
    if env.is_empty() {
        return "No names are available.".to_string();
    }

    let mut constants = Vec::new();
    let mut functions = Vec::new();
    for name in env.names() {
        match env.get(name) {
            Some(Binding::Constant(_)) => constants.push(name.to_string()),
            Some(Binding::Function(function)) => {
                functions.push(format!("{}/{}", function.name(), function.arity()))
            }
            None => {}
        }
    }
    format!(
        "{} names available.\nConstants: {}\nFunctions: {}",
        env.len(),
        constants.join(", "),
        functions.join(", ")
    )
}

/// Run the loop until `quit`, `exit`, end of input or an interrupt.
pub fn drive<R, W>(
    calculator: &Calculator,
    reader: &mut R,
    out: &mut W,
    grouped: bool,
) -> anyhow::Result<()>
where
    R: LineReader,
    W: Write,
{
    writeln!(out, "Simple CLI Calculator: type 'quit' or 'exit' to leave.")?;
    writeln!(
        out,
        "You can use math functions like sin(0.5), sqrt(2), pow(2,3), pi, e, etc."
    )?;
    writeln!(out, "Type 'help' to list every available name.")?;

    loop {
        let line = match reader.read_line(PROMPT) {
            Ok(ReadOutcome::Line(line)) => line,
            Ok(ReadOutcome::Eof | ReadOutcome::Interrupted) => {
                writeln!(out)?;
                break;
            }
            Err(err) => {
                warn!("Failed to read input: {:#}", err);
                break;
            }
        };

        match interpret(calculator, &line, grouped) {
            Step::Quit => break,
            Step::Skip => continue,
            Step::Print(text) => {
                reader.remember(line.trim());
                writeln!(out, "{}", text)?;
            }
        }
    }
    Ok(())
}

/// Run the loop on the terminal.
pub fn run(calculator: &Calculator, grouped: bool) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new().context("Failed to initialise line editor")?;
    drive(calculator, &mut editor, &mut io::stdout(), grouped)
}
