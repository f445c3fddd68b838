//! Declarative JSON model for argsmith parsers.
//!
//! A [`CommandSchema`] describes a command and its arguments in kebab-case
//! JSON. Argument order in the `args` object is authoring order, which decides
//! positional assignment and help layout:
//!
//! ```json
//! {
//!   "name": "bump",
//!   "args": {
//!     "bump": { "flags": ["b", "bump"], "possible": ["major", "minor", "patch"], "ignore-case": true, "required": true },
//!     "ver": { "required": true, "pattern": "^\\d+\\.\\d+\\.\\d+$" }
//!   }
//! }
//! ```
//!
//! Custom validation closures cannot be expressed in JSON; `pattern` covers
//! the common case with a regular expression.

use std::fs;
use std::path::Path;

use argsmith::{ArgParser, ArgSpec, ErrorMode, SchemaError, Validator};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaFileError {
    #[error("failed to read schema file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid pattern for '{key}': {source}")]
    Pattern {
        key: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

pub type Result<T> = std::result::Result<T, SchemaFileError>;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ArgSchema {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
    #[serde(default)]
    pub takes_value: bool,
    #[serde(default)]
    pub multi: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub possible: Vec<String>,
    #[serde(default)]
    pub ignore_case: bool,
    /// Regular expression every value must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct CommandSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub about: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub args: IndexMap<String, ArgSchema>,
}

fn pattern_validator(key: &str, pattern: &str) -> Result<Validator> {
    let re = Regex::new(pattern).map_err(|source| SchemaFileError::Pattern {
        key: key.to_string(),
        source,
    })?;
    Ok(Validator::custom(move |value: &str| {
        if re.is_match(value) {
            Ok(())
        } else {
            Err(format!("value does not match /{}/", re.as_str()))
        }
    }))
}

impl ArgSchema {
    /// Convert into a builder spec. Fails only on an invalid `pattern`.
    pub fn to_spec(&self, key: &str) -> Result<ArgSpec> {
        let mut spec = ArgSpec::new()
            .flags(self.flags.iter().cloned())
            .takes_value(self.takes_value)
            .multi(self.multi)
            .required(self.required)
            .ignore_case(self.ignore_case)
            .help(self.help.clone());
        if let Some(default_value) = &self.default {
            spec = spec.default_value(default_value.clone());
        }
        if !self.possible.is_empty() {
            spec = spec.possible(self.possible.iter().cloned());
        }
        if let Some(pattern) = &self.pattern {
            spec = spec.validator(pattern_validator(key, pattern)?);
        }
        for other in &self.conflicts {
            spec = spec.conflicts_with(other.clone());
        }
        for other in &self.requires {
            spec = spec.requires(other.clone());
        }
        Ok(spec)
    }
}

impl CommandSchema {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| SchemaFileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let schema = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), args = schema.args.len(), "loaded schema file");
        Ok(schema)
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Compile into a parser using `mode` for the `run*` adapter.
    pub fn build(&self, mode: ErrorMode) -> Result<ArgParser> {
        let mut builder = ArgParser::builder(self.name.clone())
            .about(self.about.clone())
            .error_mode(mode);
        if !self.version.trim().is_empty() {
            builder = builder.version(self.version.clone());
        }
        for (key, arg) in &self.args {
            builder = builder.arg(key.clone(), arg.to_spec(key)?);
        }
        Ok(builder.build()?)
    }
}
