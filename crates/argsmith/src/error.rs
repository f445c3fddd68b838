//! Error types for schema construction and argument parsing.
//!
//! [`SchemaError`] is a bug in the calling program (a malformed argument
//! table) and is reported when the parser is built. [`InputError`] is a user
//! mistake on the command line and is reported per parse.

use std::fmt;

use thiserror::Error;

/// Cross-argument relation named in schema errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Conflicts,
    Requires,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflicts => f.write_str("conflicts"),
            Self::Requires => f.write_str("requires"),
        }
    }
}

/// Malformed argument table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("schema error: '{key}' declares an empty flag alias")]
    EmptyAlias { key: String },

    #[error("schema error: argument '{key}' is declared more than once")]
    DuplicateKey { key: String },

    #[error("schema error: flag '{alias}' maps to both '{first}' and '{second}'")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },

    #[error("schema error: '{key}' {relation} itself")]
    SelfReference { key: String, relation: Relation },

    #[error("schema error: '{key}' {relation} unknown argument '{target}'")]
    UnknownReference {
        key: String,
        relation: Relation,
        target: String,
    },

    #[error(
        "schema error: multi-value positional '{key}' must be the last positional, but '{next}' follows it"
    )]
    MultiPositionalNotLast { key: String, next: String },
}

/// Invalid command-line input.
///
/// Names embedded in the messages are display names (e.g. `-b --bump <bump>`),
/// not schema keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown option `{0}`\nhint: to pass `{0}` as a value, use `-- {0}`")]
    UnknownOption(String),

    #[error("unexpected value {0}")]
    UnexpectedValue(String),

    #[error("the argument {0} requires a value but none was supplied")]
    MissingValue(String),

    #[error("{0} can be specified only once")]
    SpecifiedMoreThanOnce(String),

    #[error("missing required value for {0}")]
    MissingRequired(String),

    #[error("{name} cannot be used together with {other}")]
    Conflict { name: String, other: String },

    #[error("using {name} requires {other} to be present")]
    MissingRequirement { name: String, other: String },

    #[error("failed to validate the '{value}' value of {name}: {message}")]
    InvalidValue {
        value: String,
        name: String,
        message: String,
    },
}

pub type SchemaResult<T> = Result<T, SchemaError>;
pub type ParseResult<T> = Result<T, InputError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_error_messages_follow_wording() {
        let err = InputError::UnknownOption("--nope".to_string());
        let msg = err.to_string();
        assert!(msg.starts_with("unknown option `--nope`"));
        assert!(msg.contains("-- --nope"));

        assert_eq!(
            InputError::MissingValue("-o --out <out>".to_string()).to_string(),
            "the argument -o --out <out> requires a value but none was supplied"
        );
        assert_eq!(
            InputError::MissingRequirement {
                name: "-a".to_string(),
                other: "-b <b>".to_string(),
            }
            .to_string(),
            "using -a requires -b <b> to be present"
        );
        assert_eq!(
            InputError::InvalidValue {
                value: "x".to_string(),
                name: "<ver>".to_string(),
                message: "bad".to_string(),
            }
            .to_string(),
            "failed to validate the 'x' value of <ver>: bad"
        );
    }

    #[test]
    fn schema_error_names_relation() {
        let err = SchemaError::UnknownReference {
            key: "a".to_string(),
            relation: Relation::Requires,
            target: "zz".to_string(),
        };
        assert_eq!(err.to_string(), "schema error: 'a' requires unknown argument 'zz'");
    }
}
