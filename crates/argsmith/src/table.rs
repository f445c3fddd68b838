//! Schema normalization.
//!
//! Turns the caller's [`ArgSpec`] declarations into an immutable [`ArgTable`]:
//! aliases are de-hyphenated and split into short/long groups, implied
//! `takes_value`/`required` settings are applied, `possible` is turned into a
//! membership [`Validator`], and cross-references plus positional ordering are
//! checked. Any inconsistency is a [`SchemaError`].

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::{Relation, SchemaError, SchemaResult};
use crate::spec::{ArgSpec, Validator};

/// Normalized view of one argument.
#[derive(Debug, Clone)]
pub struct ArgInfo {
    key: String,
    short: Vec<String>,
    long: Vec<String>,
    is_positional: bool,
    takes_value: bool,
    multi: bool,
    required: bool,
    default_value: Option<String>,
    possible: Vec<String>,
    validator: Option<Validator>,
    conflicts: Vec<String>,
    requires: Vec<String>,
    display_name: String,
    help: String,
}

impl ArgInfo {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Short aliases without the leading hyphen.
    pub fn short(&self) -> &[String] {
        &self.short
    }

    /// Long aliases without the leading hyphens.
    pub fn long(&self) -> &[String] {
        &self.long
    }

    pub fn is_positional(&self) -> bool {
        self.is_positional
    }

    pub fn takes_value(&self) -> bool {
        self.takes_value
    }

    pub fn multi(&self) -> bool {
        self.multi
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn possible(&self) -> &[String] {
        &self.possible
    }

    pub fn validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    pub fn conflicts(&self) -> &[String] {
        &self.conflicts
    }

    pub fn requires(&self) -> &[String] {
        &self.requires
    }

    /// Name used in usage text and error messages, e.g. `-b --bump <bump>`.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn help(&self) -> &str {
        &self.help
    }
}

/// Ordered argument table. Order is authoring order and decides positional
/// assignment as well as help rendering.
#[derive(Debug, Clone, Default)]
pub struct ArgTable {
    args: IndexMap<String, ArgInfo>,
    short_map: HashMap<String, usize>,
    long_map: HashMap<String, usize>,
}

fn strip_alias(key: &str, raw: &str) -> SchemaResult<String> {
    let alias = raw.trim().trim_start_matches('-');
    if alias.is_empty() {
        return Err(SchemaError::EmptyAlias {
            key: key.to_string(),
        });
    }
    Ok(alias.to_string())
}

fn format_display_name(
    key: &str,
    short: &[String],
    long: &[String],
    takes_value: bool,
    multi: bool,
) -> String {
    let value = if multi {
        format!("<{key}...>")
    } else {
        format!("<{key}>")
    };
    if short.is_empty() && long.is_empty() {
        return value;
    }

    let mut names: Vec<String> = Vec::new();
    if let Some(s) = short.first() {
        names.push(format!("-{s}"));
    }
    if let Some(l) = long.first() {
        names.push(format!("--{l}"));
    }
    let mut out = names.join(" ");
    if takes_value {
        out.push(' ');
        out.push_str(&value);
    }
    out
}

fn register_alias(
    map: &mut HashMap<String, usize>,
    alias: &str,
    shown: String,
    idx: usize,
    keys: &[String],
) -> SchemaResult<()> {
    if let Some(&prev) = map.get(alias) {
        if prev != idx {
            return Err(SchemaError::DuplicateAlias {
                alias: shown,
                first: keys[prev].clone(),
                second: keys[idx].clone(),
            });
        }
        return Ok(());
    }
    map.insert(alias.to_string(), idx);
    Ok(())
}

fn check_relation(
    args: &IndexMap<String, ArgInfo>,
    key: &str,
    relation: Relation,
    targets: &[String],
) -> SchemaResult<()> {
    for target in targets {
        if target == key {
            return Err(SchemaError::SelfReference {
                key: key.to_string(),
                relation,
            });
        }
        if !args.contains_key(target) {
            return Err(SchemaError::UnknownReference {
                key: key.to_string(),
                relation,
                target: target.clone(),
            });
        }
    }
    Ok(())
}

impl ArgTable {
    /// Normalize `specs` into a table, failing fast on the first schema error.
    pub fn normalize(specs: IndexMap<String, ArgSpec>) -> SchemaResult<Self> {
        let keys: Vec<String> = specs.keys().cloned().collect();
        let mut args: IndexMap<String, ArgInfo> = IndexMap::with_capacity(specs.len());
        let mut short_map: HashMap<String, usize> = HashMap::new();
        let mut long_map: HashMap<String, usize> = HashMap::new();
        let mut multi_positional: Option<String> = None;

        for (idx, (key, spec)) in specs.into_iter().enumerate() {
            let mut short: Vec<String> = Vec::new();
            let mut long: Vec<String> = Vec::new();
            for raw in &spec.flags {
                let alias = strip_alias(&key, raw)?;
                if alias.chars().count() == 1 {
                    register_alias(&mut short_map, &alias, format!("-{alias}"), idx, &keys)?;
                    if !short.contains(&alias) {
                        short.push(alias);
                    }
                } else {
                    register_alias(&mut long_map, &alias, format!("--{alias}"), idx, &keys)?;
                    if !long.contains(&alias) {
                        long.push(alias);
                    }
                }
            }

            let mut takes_value = spec.takes_value;
            let mut required = spec.required;

            let validator = if !spec.possible.is_empty() {
                takes_value = true;
                Some(Validator::OneOf {
                    values: spec.possible.clone(),
                    ignore_case: spec.ignore_case,
                })
            } else {
                if spec.validate.is_some() {
                    takes_value = true;
                }
                spec.validate
            };

            if spec.default_value.is_some() {
                takes_value = true;
                required = false;
            }

            let is_positional = short.is_empty() && long.is_empty();
            if is_positional {
                takes_value = true;
                if let Some(prev) = &multi_positional {
                    return Err(SchemaError::MultiPositionalNotLast {
                        key: prev.clone(),
                        next: key,
                    });
                }
                if spec.multi {
                    multi_positional = Some(key.clone());
                }
            }

            let display_name = format_display_name(&key, &short, &long, takes_value, spec.multi);
            args.insert(
                key.clone(),
                ArgInfo {
                    key,
                    short,
                    long,
                    is_positional,
                    takes_value,
                    multi: spec.multi,
                    required,
                    default_value: spec.default_value,
                    possible: spec.possible,
                    validator,
                    conflicts: spec.conflicts,
                    requires: spec.requires,
                    display_name,
                    help: spec.help,
                },
            );
        }

        for (key, info) in &args {
            check_relation(&args, key, Relation::Conflicts, &info.conflicts)?;
            check_relation(&args, key, Relation::Requires, &info.requires)?;
        }

        tracing::trace!(args = args.len(), "normalized argument table");
        Ok(Self {
            args,
            short_map,
            long_map,
        })
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ArgInfo> {
        self.args.get(key)
    }

    pub fn get_index(&self, idx: usize) -> Option<&ArgInfo> {
        self.args.get_index(idx).map(|(_, info)| info)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.args.get_index_of(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArgInfo> {
        self.args.values()
    }

    /// Look up a short alias (without the hyphen).
    pub fn short(&self, alias: &str) -> Option<usize> {
        self.short_map.get(alias).copied()
    }

    /// Look up a long alias (without the hyphens).
    pub fn long(&self, alias: &str) -> Option<usize> {
        self.long_map.get(alias).copied()
    }

    pub fn short_takes_value(&self, alias: &str) -> bool {
        self.short(alias)
            .and_then(|idx| self.get_index(idx))
            .is_some_and(ArgInfo::takes_value)
    }

    pub fn long_takes_value(&self, alias: &str) -> bool {
        self.long(alias)
            .and_then(|idx| self.get_index(idx))
            .is_some_and(ArgInfo::takes_value)
    }

    pub fn has_positionals(&self) -> bool {
        self.iter().any(ArgInfo::is_positional)
    }

    pub fn has_flags(&self) -> bool {
        self.iter().any(|a| !a.is_positional())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(specs: Vec<(&str, ArgSpec)>) -> SchemaResult<ArgTable> {
        ArgTable::normalize(
            specs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn aliases_are_dehyphenated_and_classified() {
        let t = table(vec![(
            "bump",
            ArgSpec::new().flags(["--bump", "-b", "bump", "B"]),
        )])
        .unwrap();
        let info = t.get("bump").unwrap();
        assert_eq!(info.short(), ["b", "B"]);
        assert_eq!(info.long(), ["bump"]);
        assert_eq!(t.short("b"), Some(0));
        assert_eq!(t.long("bump"), Some(0));
        assert!(!info.is_positional());
    }

    #[test]
    fn empty_alias_is_rejected() {
        let err = table(vec![("x", ArgSpec::new().flag("--"))]).unwrap_err();
        assert_eq!(err, SchemaError::EmptyAlias { key: "x".to_string() });
    }

    #[test]
    fn implied_takes_value() {
        let t = table(vec![
            ("p", ArgSpec::new().flag("p").possible(["a", "b"])),
            ("v", ArgSpec::new().flag("v").validate(|_| Ok(()))),
            ("d", ArgSpec::new().flag("d").default_value("x").required(true)),
            ("pos", ArgSpec::new().takes_value(false)),
            ("f", ArgSpec::new().flag("f")),
        ])
        .unwrap();
        assert!(t.get("p").unwrap().takes_value());
        assert!(matches!(
            t.get("p").unwrap().validator(),
            Some(Validator::OneOf { .. })
        ));
        assert!(t.get("v").unwrap().takes_value());
        let d = t.get("d").unwrap();
        assert!(d.takes_value());
        assert!(!d.required());
        let pos = t.get("pos").unwrap();
        assert!(pos.is_positional());
        assert!(pos.takes_value());
        assert!(!t.get("f").unwrap().takes_value());
    }

    #[test]
    fn possible_supersedes_custom_validator() {
        let t = table(vec![(
            "p",
            ArgSpec::new()
                .flag("p")
                .validate(|_| Err("never".to_string()))
                .possible(["a"]),
        )])
        .unwrap();
        let v = t.get("p").unwrap().validator().unwrap();
        assert!(v.check("a").is_ok());
    }

    #[test]
    fn display_names() {
        let t = table(vec![
            ("bump", ArgSpec::new().flags(["b", "bump"]).possible(["x"])),
            ("sep", ArgSpec::new().flag("sep").default_value("-")),
            ("all", ArgSpec::new().flags(["a", "all", "A"])),
            ("inc", ArgSpec::new().flag("I").takes_value(true).multi(true)),
            ("ver", ArgSpec::new()),
            ("words", ArgSpec::new().multi(true)),
        ])
        .unwrap();
        assert_eq!(t.get("bump").unwrap().display_name(), "-b --bump <bump>");
        assert_eq!(t.get("sep").unwrap().display_name(), "--sep <sep>");
        assert_eq!(t.get("all").unwrap().display_name(), "-a --all");
        assert_eq!(t.get("inc").unwrap().display_name(), "-I <inc...>");
        assert_eq!(t.get("ver").unwrap().display_name(), "<ver>");
        assert_eq!(t.get("words").unwrap().display_name(), "<words...>");
    }

    #[test]
    fn self_reference_is_rejected() {
        let err = table(vec![("a", ArgSpec::new().flag("a").conflicts_with("a"))]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::SelfReference {
                key: "a".to_string(),
                relation: Relation::Conflicts,
            }
        );
    }

    #[test]
    fn unknown_reference_is_rejected() {
        let err = table(vec![
            ("a", ArgSpec::new().flag("a").requires("b")),
            ("c", ArgSpec::new().flag("c")),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownReference {
                key: "a".to_string(),
                relation: Relation::Requires,
                target: "b".to_string(),
            }
        );
    }

    #[test]
    fn forward_references_are_allowed() {
        table(vec![
            ("a", ArgSpec::new().flag("a").requires("b")),
            ("b", ArgSpec::new().flag("b").conflicts_with("a")),
        ])
        .unwrap();
    }

    #[test]
    fn multi_positional_must_be_last() {
        let err = table(vec![
            ("files", ArgSpec::new().multi(true)),
            ("flag", ArgSpec::new().flag("f")),
            ("out", ArgSpec::new()),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::MultiPositionalNotLast {
                key: "files".to_string(),
                next: "out".to_string(),
            }
        );

        table(vec![
            ("out", ArgSpec::new()),
            ("files", ArgSpec::new().multi(true)),
            ("flag", ArgSpec::new().flag("f")),
        ])
        .unwrap();
    }

    #[test]
    fn duplicate_alias_across_args_is_rejected() {
        let err = table(vec![
            ("a", ArgSpec::new().flags(["o", "out"])),
            ("b", ArgSpec::new().flag("--out")),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateAlias {
                alias: "--out".to_string(),
                first: "a".to_string(),
                second: "b".to_string(),
            }
        );
    }

    #[test]
    fn takes_value_lookups() {
        let t = table(vec![
            ("o", ArgSpec::new().flags(["o", "out"]).takes_value(true)),
            ("v", ArgSpec::new().flags(["v", "verbose"])),
        ])
        .unwrap();
        assert!(t.short_takes_value("o"));
        assert!(t.long_takes_value("out"));
        assert!(!t.short_takes_value("v"));
        assert!(!t.long_takes_value("verbose"));
        assert!(!t.short_takes_value("z"));
    }
}
