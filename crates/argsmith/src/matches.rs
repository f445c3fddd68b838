use indexmap::IndexMap;
use serde::Serialize;

use crate::matcher::ArgState;
use crate::table::ArgTable;

/// Final value of one argument.
///
/// Serialized untagged: a number, `null`, a string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// Occurrence count of a flag that takes no value.
    Count(usize),
    /// Value-taking, single-valued argument that was not supplied and has no default.
    Absent,
    One(String),
    Many(Vec<String>),
}

impl ArgValue {
    pub fn as_count(&self) -> Option<usize> {
        match self {
            Self::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::One(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> Option<&[String]> {
        match self {
            Self::Many(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Parsed arguments, keyed by schema key in authoring order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArgMatches {
    values: IndexMap<String, ArgValue>,
}

impl ArgMatches {
    /// Project per-argument parse state into final values.
    pub(crate) fn build(table: &ArgTable, states: Vec<ArgState<'_>>) -> Self {
        let values = table
            .iter()
            .zip(states)
            .map(|(info, state)| {
                let value = if !info.takes_value() {
                    ArgValue::Count(state.occurrences)
                } else if info.multi() {
                    ArgValue::Many(state.values.into_iter().map(|v| v.into_owned()).collect())
                } else {
                    state
                        .values
                        .into_iter()
                        .next()
                        .map_or(ArgValue::Absent, |v| ArgValue::One(v.into_owned()))
                };
                (info.key().to_string(), value)
            })
            .collect();
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.values.get(key)
    }

    /// Occurrence count for flags, number of values otherwise.
    pub fn count(&self, key: &str) -> usize {
        match self.values.get(key) {
            Some(ArgValue::Count(n)) => *n,
            Some(ArgValue::One(_)) => 1,
            Some(ArgValue::Many(v)) => v.len(),
            Some(ArgValue::Absent) | None => 0,
        }
    }

    /// Single value, or the first of several.
    pub fn value(&self, key: &str) -> Option<&str> {
        match self.values.get(key)? {
            ArgValue::One(v) => Some(v.as_str()),
            ArgValue::Many(v) => v.first().map(String::as_str),
            ArgValue::Count(_) | ArgValue::Absent => None,
        }
    }

    pub fn values(&self, key: &str) -> &[String] {
        match self.values.get(key) {
            Some(ArgValue::One(v)) => std::slice::from_ref(v),
            Some(ArgValue::Many(v)) => v.as_slice(),
            _ => &[],
        }
    }

    /// Whether the argument was supplied or has a default value.
    pub fn is_present(&self, key: &str) -> bool {
        self.count(key) > 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl IntoIterator for ArgMatches {
    type Item = (String, ArgValue);
    type IntoIter = indexmap::map::IntoIter<String, ArgValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl FromIterator<(String, ArgValue)> for ArgMatches {
    fn from_iter<I: IntoIterator<Item = (String, ArgValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
