//! Post-match validation.
//!
//! For each argument in table order: conflicts, requirements, cardinality,
//! then (value-taking arguments only) requiredness, default substitution and
//! per-value validation. The first violation ends the parse.

use std::borrow::Cow;

use crate::error::{InputError, ParseResult};
use crate::matcher::ArgState;
use crate::table::{ArgInfo, ArgTable};

fn display(table: &ArgTable, idx: usize) -> String {
    table
        .get_index(idx)
        .map(|info| info.display_name().to_string())
        .unwrap_or_default()
}

fn check_relations(
    table: &ArgTable,
    info: &ArgInfo,
    states: &[ArgState<'_>],
) -> ParseResult<()> {
    for other in info.conflicts() {
        let Some(o) = table.index_of(other) else {
            continue;
        };
        if states[o].occurrences > 0 {
            return Err(InputError::Conflict {
                name: info.display_name().to_string(),
                other: display(table, o),
            });
        }
    }

    for other in info.requires() {
        let Some(o) = table.index_of(other) else {
            continue;
        };
        let defaulted = table
            .get_index(o)
            .is_some_and(|target| target.default_value().is_some());
        if states[o].occurrences == 0 && !defaulted {
            return Err(InputError::MissingRequirement {
                name: info.display_name().to_string(),
                other: display(table, o),
            });
        }
    }
    Ok(())
}

pub(crate) fn validate(table: &ArgTable, states: &mut [ArgState<'_>]) -> ParseResult<()> {
    for (idx, info) in table.iter().enumerate() {
        let occurrences = states[idx].occurrences;

        if occurrences > 0 {
            check_relations(table, info, states)?;
        }

        if !info.multi() && occurrences > 1 {
            return Err(InputError::SpecifiedMoreThanOnce(
                info.display_name().to_string(),
            ));
        }

        if !info.takes_value() {
            continue;
        }

        if info.required() && occurrences == 0 {
            return Err(InputError::MissingRequired(info.display_name().to_string()));
        }

        let state = &mut states[idx];
        if occurrences == 0 {
            if let Some(default_value) = info.default_value() {
                state.values = vec![Cow::Owned(default_value.to_string())];
            }
        }

        if let Some(validator) = info.validator() {
            for value in &state.values {
                if let Err(message) = validator.check(value) {
                    return Err(InputError::InvalidValue {
                        value: value.to_string(),
                        name: info.display_name().to_string(),
                        message,
                    });
                }
            }
        }
    }
    Ok(())
}
