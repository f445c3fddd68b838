//! CLI adapter: turns parse outcomes into printed output and exit codes.
//!
//! [`ArgParser::parse`] only decides. The `run*` methods here perform the
//! effects through a [`Reporter`], which defaults to stdout plus
//! `std::process::exit` and can be swapped out to observe them instead.

use std::io::Write;

use crate::error::{InputError, ParseResult};
use crate::help;
use crate::matches::ArgMatches;
use crate::parser::{ArgParser, ParseOutcome};

/// What `run*` does with an [`InputError`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorMode {
    /// Hand the error back to the caller untouched.
    Return,
    /// Print the message and usage line, then exit with status 1.
    #[default]
    Exit,
}

/// Side effects requested by the adapter.
pub trait Reporter {
    fn print(&mut self, text: &str);
    fn exit(&mut self, code: i32);
}

/// Writes to stdout and terminates the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessReporter;

impl Reporter for ProcessReporter {
    fn print(&mut self, text: &str) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(text.as_bytes());
        if !text.ends_with('\n') {
            let _ = out.write_all(b"\n");
        }
        let _ = out.flush();
    }

    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}

/// Records output and the requested exit code instead of acting on them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferReporter {
    pub output: String,
    pub exit_code: Option<i32>,
}

impl Reporter for BufferReporter {
    fn print(&mut self, text: &str) {
        self.output.push_str(text);
        if !text.ends_with('\n') {
            self.output.push('\n');
        }
    }

    fn exit(&mut self, code: i32) {
        self.exit_code.get_or_insert(code);
    }
}

fn error_report(parser: &ArgParser, err: &InputError) -> String {
    format!("error: {err}\n\n{}\n", help::usage_line(parser))
}

impl ArgParser {
    /// Parse `tokens`, printing help/version and (in [`ErrorMode::Exit`])
    /// errors through `reporter`.
    ///
    /// Returns `Ok(None)` when help or version was shown. Errors are returned
    /// in both modes; with [`ProcessReporter`] in exit mode they never are.
    pub fn run_with<S, R>(
        &self,
        tokens: &[S],
        reporter: &mut R,
    ) -> ParseResult<Option<ArgMatches>>
    where
        S: AsRef<str>,
        R: Reporter,
    {
        match self.parse(tokens) {
            Ok(ParseOutcome::Matches(m)) => Ok(Some(m)),
            Ok(ParseOutcome::Help(text) | ParseOutcome::Version(text)) => {
                reporter.print(&text);
                reporter.exit(0);
                Ok(None)
            }
            Err(err) => {
                if self.error_mode() == ErrorMode::Exit {
                    reporter.print(&error_report(self, &err));
                    reporter.exit(1);
                }
                Err(err)
            }
        }
    }

    /// [`ArgParser::run_with`] using the [`ProcessReporter`].
    pub fn run<S: AsRef<str>>(&self, tokens: &[S]) -> ParseResult<Option<ArgMatches>> {
        self.run_with(tokens, &mut ProcessReporter)
    }

    /// [`ArgParser::run`] on the process arguments, minus the program name.
    pub fn run_env(&self) -> ParseResult<Option<ArgMatches>> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        self.run(&args)
    }
}
