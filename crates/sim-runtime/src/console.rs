//! Line-oriented conversation with the ruler.

use std::io::{BufRead, Write};

use thiserror::Error;
use tracing::warn;

/// The input stream ended while waiting for an answer.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("input ended")]
pub struct InputClosed;

/// Prompts and report sink used by the reign loop.
pub trait Console {
    /// Show `prompt` and read one answer with surrounding whitespace removed.
    fn read_line(&mut self, prompt: &str) -> Result<String, InputClosed>;

    /// Show one line of text.
    fn say(&mut self, line: &str);

    /// Ask until the answer is an integer >= 0.
    fn ask_count(&mut self, prompt: &str) -> Result<i64, InputClosed> {
        loop {
            let answer = self.read_line(prompt)?;
            match answer.parse::<i64>() {
                Ok(n) if n >= 0 => return Ok(n),
                _ => self.say("Please enter an integer >= 0."),
            }
        }
    }

    /// Ask until the answer starts with `y` or `n`, in either case.
    fn ask_yes_no(&mut self, prompt: &str) -> Result<bool, InputClosed> {
        loop {
            let answer = self.read_line(prompt)?;
            match answer.chars().next().map(|c| c.to_ascii_lowercase()) {
                Some('y') => return Ok(true),
                Some('n') => return Ok(false),
                Some(_) => self.say("Please enter Y/N."),
                None => {}
            }
        }
    }
}

/// Console over any buffered reader and writer, such as stdin and stdout.
#[derive(Debug)]
pub struct LineConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the writer, e.g. to inspect a transcript.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<String, InputClosed> {
        if let Err(e) = write!(self.output, "{prompt}").and_then(|()| self.output.flush()) {
            warn!(error = %e, "console write failed");
        }
        // Bytes that are not UTF-8 still make a line; they just never parse.
        let mut line = Vec::new();
        match self.input.read_until(b'\n', &mut line) {
            Ok(0) => Err(InputClosed),
            Ok(_) => Ok(String::from_utf8_lossy(&line).trim().to_string()),
            Err(e) => {
                warn!(error = %e, "console read failed");
                Err(InputClosed)
            }
        }
    }

    fn say(&mut self, line: &str) {
        if let Err(e) = writeln!(self.output, "{line}") {
            warn!(error = %e, "console write failed");
        }
    }
}
