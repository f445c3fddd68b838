use std::fmt;
use std::sync::Arc;

type CheckFn = dyn Fn(&str) -> Result<(), String> + Send + Sync;

/// Per-value check run after matching.
///
/// `OneOf` is generated from [`ArgSpec::possible`] and supersedes any custom
/// check on the same argument.
#[derive(Clone)]
pub enum Validator {
    OneOf {
        values: Vec<String>,
        ignore_case: bool,
    },
    Custom(Arc<CheckFn>),
}

impl Validator {
    /// Wrap a caller-supplied check. `Err` carries the message shown to the user.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<(), String> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    pub fn check(&self, value: &str) -> Result<(), String> {
        match self {
            Self::OneOf {
                values,
                ignore_case,
            } => {
                let found = if *ignore_case {
                    let folded = value.to_lowercase();
                    values.iter().any(|v| v.to_lowercase() == folded)
                } else {
                    values.iter().any(|v| v == value)
                };
                if found {
                    Ok(())
                } else {
                    Err(format!("value must be one of [{}]", values.join(", ")))
                }
            }
            Self::Custom(f) => f(value),
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneOf {
                values,
                ignore_case,
            } => f
                .debug_struct("OneOf")
                .field("values", values)
                .field("ignore_case", ignore_case)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Declaration of one argument, as authored by the caller.
///
/// An argument with no flag aliases is positional. Several settings imply
/// that the argument takes a value regardless of [`ArgSpec::takes_value`]:
/// being positional, `possible`, `validate` and `default_value`.
#[derive(Debug, Clone, Default)]
pub struct ArgSpec {
    pub(crate) flags: Vec<String>,
    pub(crate) takes_value: bool,
    pub(crate) multi: bool,
    pub(crate) required: bool,
    pub(crate) default_value: Option<String>,
    pub(crate) possible: Vec<String>,
    pub(crate) ignore_case: bool,
    pub(crate) validate: Option<Validator>,
    pub(crate) conflicts: Vec<String>,
    pub(crate) requires: Vec<String>,
    pub(crate) help: String,
}

impl ArgSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flag alias. Leading hyphens are optional: `--bump`, `bump` and
    /// `-b`, `b` are equivalent pairs.
    pub fn flag(mut self, alias: impl Into<String>) -> Self {
        self.flags.push(alias.into());
        self
    }

    pub fn flags<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn takes_value(mut self, yes: bool) -> Self {
        self.takes_value = yes;
        self
    }

    /// Allow the argument to occur more than once.
    pub fn multi(mut self, yes: bool) -> Self {
        self.multi = yes;
        self
    }

    /// Only meaningful for value-taking arguments.
    pub fn required(mut self, yes: bool) -> Self {
        self.required = yes;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn possible<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.possible = values.into_iter().map(Into::into).collect();
        self
    }

    /// Fold case when checking against [`ArgSpec::possible`].
    pub fn ignore_case(mut self, yes: bool) -> Self {
        self.ignore_case = yes;
        self
    }

    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validate = Some(Validator::custom(f));
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validate = Some(validator);
        self
    }

    /// Reject input that supplies both this argument and `key`.
    pub fn conflicts_with(mut self, key: impl Into<String>) -> Self {
        self.conflicts.push(key.into());
        self
    }

    /// Require `key` to be present whenever this argument is.
    pub fn requires(mut self, key: impl Into<String>) -> Self {
        self.requires.push(key.into());
        self
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = text.into();
        self
    }
}
