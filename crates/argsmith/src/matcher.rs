//! Token matching.
//!
//! Walks the canonical token stream and assigns each token to an argument
//! slot, either by alias or by position, accumulating occurrence counts and
//! raw values. Per-parse state lives in [`ArgState`] and is rebuilt for every
//! parse, so the table itself is never mutated.

use std::borrow::Cow;

use crate::error::{InputError, ParseResult};
use crate::table::{ArgInfo, ArgTable};

/// Mutable per-argument state for one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ArgState<'a> {
    pub(crate) occurrences: usize,
    pub(crate) values: Vec<Cow<'a, str>>,
}

/// Built-in aliases that are live because no schema argument claims them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Reserved {
    pub(crate) help_short: bool,
    pub(crate) help_long: bool,
    pub(crate) version_short: bool,
    pub(crate) version_long: bool,
}

impl Reserved {
    pub(crate) fn for_table(table: &ArgTable, has_version: bool) -> Self {
        Self {
            help_short: table.short("h").is_none(),
            help_long: table.long("help").is_none(),
            version_short: has_version && table.short("V").is_none(),
            version_long: has_version && table.long("version").is_none(),
        }
    }

    pub(crate) fn help(&self) -> bool {
        self.help_short || self.help_long
    }

    pub(crate) fn version(&self) -> bool {
        self.version_short || self.version_long
    }
}

#[derive(Debug)]
pub(crate) enum Matched<'a> {
    Args(Vec<ArgState<'a>>),
    Help,
    Version,
}

enum Resolution {
    Flag(usize),
    Positional,
    Help,
    Version,
    Unknown,
}

fn resolve(token: &str, table: &ArgTable, reserved: Reserved) -> Resolution {
    if let Some(name) = token.strip_prefix("--").filter(|n| !n.is_empty()) {
        return match table.long(name) {
            Some(idx) => Resolution::Flag(idx),
            None if reserved.help_long && name == "help" => Resolution::Help,
            None if reserved.version_long && name == "version" => Resolution::Version,
            None => Resolution::Unknown,
        };
    }

    if let Some(name) = token.strip_prefix('-').filter(|n| !n.is_empty()) {
        return match table.short(name) {
            Some(idx) => Resolution::Flag(idx),
            None if reserved.help_short && name == "h" => Resolution::Help,
            None if reserved.version_short && name == "V" => Resolution::Version,
            None => Resolution::Unknown,
        };
    }

    Resolution::Positional
}

/// First positional with no occurrences yet; once all are filled, the last
/// positional keeps accepting values only if it is `multi`.
fn next_positional(table: &ArgTable, states: &[ArgState<'_>]) -> Option<usize> {
    let mut last = None;
    for (idx, info) in table.iter().enumerate() {
        if !info.is_positional() {
            continue;
        }
        if states[idx].occurrences == 0 {
            return Some(idx);
        }
        last = Some(idx);
    }
    last.filter(|&idx| table.get_index(idx).is_some_and(ArgInfo::multi))
}

fn push_positional<'a>(
    table: &ArgTable,
    states: &mut [ArgState<'a>],
    token: Cow<'a, str>,
) -> ParseResult<()> {
    let Some(idx) = next_positional(table, states) else {
        return Err(InputError::UnexpectedValue(token.into_owned()));
    };
    tracing::trace!(token = %token, arg = table.get_index(idx).map(ArgInfo::key), "matched positional");
    let state = &mut states[idx];
    state.occurrences += 1;
    state.values.push(token);
    Ok(())
}

/// Match canonical `tokens` against `table`.
///
/// Fails on the first token that cannot be placed. `-h`/`--help` (and
/// `-V`/`--version` when enabled) short-circuit the walk.
pub(crate) fn match_tokens<'a>(
    tokens: Vec<Cow<'a, str>>,
    table: &ArgTable,
    reserved: Reserved,
) -> ParseResult<Matched<'a>> {
    let mut states: Vec<ArgState<'a>> = vec![ArgState::default(); table.len()];
    let mut tokens = tokens.into_iter();
    let mut positional_only = false;

    while let Some(token) = tokens.next() {
        if positional_only {
            push_positional(table, &mut states, token)?;
            continue;
        }
        if token == "--" {
            positional_only = true;
            continue;
        }

        match resolve(&token, table, reserved) {
            Resolution::Flag(idx) => {
                let Some(info) = table.get_index(idx) else {
                    return Err(InputError::UnknownOption(token.into_owned()));
                };
                tracing::trace!(token = %token, arg = info.key(), "matched flag");
                let state = &mut states[idx];
                state.occurrences += 1;
                if info.takes_value() {
                    let Some(value) = tokens.next() else {
                        return Err(InputError::MissingValue(info.display_name().to_string()));
                    };
                    state.values.push(value);
                }
            }
            Resolution::Positional => push_positional(table, &mut states, token)?,
            Resolution::Help => return Ok(Matched::Help),
            Resolution::Version => return Ok(Matched::Version),
            Resolution::Unknown => return Err(InputError::UnknownOption(token.into_owned())),
        }
    }

    Ok(Matched::Args(states))
}
