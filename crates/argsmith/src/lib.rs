//! Declarative command-line argument parsing.
//!
//! A schema of named arguments ([`ArgSpec`], keyed by argument key) is
//! compiled once into an [`ArgParser`]. Each parse then runs in three steps:
//! - canonicalize the raw tokens (split `--key=value`, `-abc`, `-ovalue`)
//! - match tokens to arguments by alias or position
//! - validate conflicts, requirements, cardinality, required values, defaults
//!   and per-value checks, failing on the first violation
//!
//! ```
//! use argsmith::{ArgParser, ArgSpec, ArgValue, ParseOutcome};
//!
//! let parser = ArgParser::builder("snake")
//!     .arg("sep", ArgSpec::new().flags(["s", "sep"]).default_value("-"))
//!     .arg("words", ArgSpec::new().multi(true).required(true))
//!     .build()
//!     .unwrap();
//!
//! let ParseOutcome::Matches(m) = parser.parse(&["-s_", "snake", "case"]).unwrap() else {
//!     panic!("expected matches");
//! };
//! assert_eq!(m.get("sep"), Some(&ArgValue::One("_".to_string())));
//! assert_eq!(m.values("words"), ["snake", "case"]);
//! ```
//!
//! [`ArgParser::parse`] never prints or exits. The `run*` methods add the
//! CLI behavior (help on stdout with status 0, errors on stdout with status 1)
//! through a [`Reporter`].

pub mod error;
pub mod help;
mod matcher;
mod matches;
mod parser;
mod report;
mod spec;
pub mod table;
mod token;
mod validate;

pub use error::{InputError, ParseResult, Relation, SchemaError, SchemaResult};
pub use matches::{ArgMatches, ArgValue};
pub use parser::{ArgParser, ArgParserBuilder, ParseOutcome};
pub use report::{BufferReporter, ErrorMode, ProcessReporter, Reporter};
pub use spec::{ArgSpec, Validator};
pub use table::{ArgInfo, ArgTable};
pub use token::canonicalize;
