//! Console collaborator for the interactive confirmation loop.
//!
//! The orchestrator only talks to the [`Console`] trait, so silent mode and
//! tests can swap the real terminal for a scripted input source. I/O errors
//! from the real console are fatal to the whole run and propagate as errors.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

/// Yes/no answer parsing: empty input and `y`/`yes` (any case) accept.
fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    answer.is_empty() || answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

pub trait Console {
    /// Print a prompt and read a yes/no answer.
    fn prompt_yes_no(&mut self, prompt: &str) -> Result<bool>;

    /// Print a prompt and read one line, trimmed.
    fn prompt_line(&mut self, prompt: &str) -> Result<String>;

    /// Display a block of text (context renderings, separators).
    fn show(&mut self, text: &str);
}

/// Real terminal console over stdin/stdout.
#[derive(Debug, Default)]
pub struct StdConsole;

impl StdConsole {
    pub fn new() -> Self {
        Self
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush().context("console write failed")?;
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("console read failed")?;
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }
}

impl Console for StdConsole {
    fn prompt_yes_no(&mut self, prompt: &str) -> Result<bool> {
        Ok(is_yes(&self.read_line(prompt)?))
    }

    fn prompt_line(&mut self, prompt: &str) -> Result<String> {
        Ok(self.read_line(prompt)?.trim().to_string())
    }

    fn show(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// Scripted console: answers come from a queue, output is collected.
///
/// Used by tests and anywhere a non-interactive driver needs deterministic
/// answers. Running out of scripted answers yields empty input, which reads
/// as "accept".
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    pub transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    fn next_answer(&mut self) -> String {
        self.answers.pop_front().unwrap_or_default()
    }
}

impl Console for ScriptedConsole {
    fn prompt_yes_no(&mut self, prompt: &str) -> Result<bool> {
        self.transcript.push(prompt.to_string());
        Ok(is_yes(&self.next_answer()))
    }

    fn prompt_line(&mut self, prompt: &str) -> Result<String> {
        self.transcript.push(prompt.to_string());
        Ok(self.next_answer().trim().to_string())
    }

    fn show(&mut self, text: &str) {
        self.transcript.push(text.to_string());
    }
}
