use indexmap::IndexMap;

use crate::error::{ParseResult, SchemaError, SchemaResult};
use crate::matcher::{self, Matched, Reserved};
use crate::matches::ArgMatches;
use crate::report::ErrorMode;
use crate::spec::ArgSpec;
use crate::table::ArgTable;
use crate::token;
use crate::{help, validate};

/// Result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Matches(ArgMatches),
    /// `-h`/`--help` was given; carries the rendered usage text.
    Help(String),
    /// `-V`/`--version` was given; carries the version line.
    Version(String),
}

/// A compiled argument schema.
///
/// The table is immutable after construction and every parse works on fresh
/// state, so one parser can serve any number of (even concurrent) parses.
#[derive(Debug, Clone)]
pub struct ArgParser {
    name: String,
    about: String,
    version: Option<String>,
    error_mode: ErrorMode,
    table: ArgTable,
}

impl ArgParser {
    /// Compile `specs`, keyed by argument key in authoring order.
    pub fn new(name: impl Into<String>, specs: IndexMap<String, ArgSpec>) -> SchemaResult<Self> {
        Ok(Self {
            name: name.into(),
            about: String::new(),
            version: None,
            error_mode: ErrorMode::default(),
            table: ArgTable::normalize(specs)?,
        })
    }

    pub fn builder(name: impl Into<String>) -> ArgParserBuilder {
        ArgParserBuilder {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn about(&self) -> &str {
        &self.about
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn error_mode(&self) -> ErrorMode {
        self.error_mode
    }

    pub fn table(&self) -> &ArgTable {
        &self.table
    }

    pub(crate) fn reserved(&self) -> Reserved {
        Reserved::for_table(&self.table, self.version.is_some())
    }

    /// Render the usage text.
    pub fn help(&self) -> String {
        help::render(self)
    }

    pub fn version_text(&self) -> String {
        match self.version.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => format!("{} {}\n", self.name, v),
            _ => format!("{}\n", self.name),
        }
    }

    /// Parse `tokens` (without the program name).
    ///
    /// Never prints or exits; see [`ArgParser::run`] for the CLI adapter.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> ParseResult<ParseOutcome> {
        let canonical = token::canonicalize(tokens, &self.table);
        let outcome = match matcher::match_tokens(canonical, &self.table, self.reserved()) {
            Ok(Matched::Args(mut states)) => {
                validate::validate(&self.table, &mut states).map(|()| {
                    ParseOutcome::Matches(ArgMatches::build(&self.table, states))
                })
            }
            Ok(Matched::Help) => Ok(ParseOutcome::Help(self.help())),
            Ok(Matched::Version) => Ok(ParseOutcome::Version(self.version_text())),
            Err(err) => Err(err),
        };

        match &outcome {
            Ok(ParseOutcome::Matches(m)) => tracing::debug!(args = m.len(), "parsed arguments"),
            Ok(_) => tracing::debug!("help or version requested"),
            Err(err) => tracing::debug!(error = %err, "failed to parse arguments"),
        }
        outcome
    }
}

/// Incremental construction of an [`ArgParser`].
#[derive(Debug, Clone, Default)]
pub struct ArgParserBuilder {
    name: String,
    about: String,
    version: Option<String>,
    error_mode: ErrorMode,
    args: Vec<(String, ArgSpec)>,
}

impl ArgParserBuilder {
    pub fn about(mut self, text: impl Into<String>) -> Self {
        self.about = text.into();
        self
    }

    /// Enable `-V`/`--version`.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    pub fn arg(mut self, key: impl Into<String>, spec: ArgSpec) -> Self {
        self.args.push((key.into(), spec));
        self
    }

    pub fn build(self) -> SchemaResult<ArgParser> {
        let mut specs: IndexMap<String, ArgSpec> = IndexMap::with_capacity(self.args.len());
        for (key, spec) in self.args {
            if specs.contains_key(&key) {
                return Err(SchemaError::DuplicateKey { key });
            }
            specs.insert(key, spec);
        }

        let mut parser = ArgParser::new(self.name, specs)?;
        parser.about = self.about;
        parser.version = self.version;
        parser.error_mode = self.error_mode;
        Ok(parser)
    }
}
