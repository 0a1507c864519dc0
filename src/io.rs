//! Input and output collaborators for the evaluator.
//!
//! Enum dispatch instead of trait objects: there are exactly three
//! destinations for output and three sources of input, and the interpreter
//! writes on a hot path.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Destination for print statements and read prompts.
pub enum OutputSink {
    /// Writes through to stdout (default).
    Stdout,
    /// Captures everything for assertions.
    Buffer(String),
    /// Discards all output.
    Silent,
}

impl OutputSink {
    pub fn stdout() -> Self {
        OutputSink::Stdout
    }

    pub fn buffer() -> Self {
        OutputSink::Buffer(String::new())
    }

    pub fn silent() -> Self {
        OutputSink::Silent
    }

    /// Write without a newline. Stdout is flushed so that prompts are
    /// visible before a blocking read.
    pub fn print(&mut self, msg: &str) {
        match self {
            OutputSink::Stdout => {
                print!("{msg}");
                io::stdout().flush().ok();
            }
            OutputSink::Buffer(buf) => buf.push_str(msg),
            OutputSink::Silent => {}
        }
    }

    /// Write one line.
    pub fn println(&mut self, msg: &str) {
        match self {
            OutputSink::Stdout => println!("{msg}"),
            OutputSink::Buffer(buf) => {
                buf.push_str(msg);
                buf.push('\n');
            }
            OutputSink::Silent => {}
        }
    }

    /// Captured output; empty for sinks that do not capture.
    pub fn captured(&self) -> &str {
        match self {
            OutputSink::Buffer(buf) => buf,
            OutputSink::Stdout | OutputSink::Silent => "",
        }
    }
}

/// Line-oriented source for read statements.
pub enum InputSource {
    /// Blocking reads from stdin (default).
    Stdin,
    /// Scripted lines, consumed front to back.
    Script(VecDeque<String>),
    /// Always exhausted.
    Empty,
}

impl InputSource {
    pub fn stdin() -> Self {
        InputSource::Stdin
    }

    pub fn script<I>(lines: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        InputSource::Script(lines.into_iter().map(Into::into).collect())
    }

    pub fn empty() -> Self {
        InputSource::Empty
    }

    /// One line with the trailing newline removed. Returns an empty string
    /// once the source is exhausted or unreadable; empty text then fails
    /// integer parsing at the call site.
    pub fn read_line(&mut self) -> String {
        match self {
            InputSource::Stdin => {
                let mut line = String::new();
                if io::stdin().lock().read_line(&mut line).is_err() {
                    return String::new();
                }
                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }
                line
            }
            InputSource::Script(lines) => lines.pop_front().unwrap_or_default(),
            InputSource::Empty => String::new(),
        }
    }
}
