//! Input preprocessing.
//!
//! Rewrites raw argv into a canonical stream where every flag and its value
//! are separate tokens:
//! - `--key=value` becomes `--key`, `value`
//! - `-abc` becomes `-a`, `-b`, `-c` (stopping at the first value-taking flag,
//!   whose value is the rest of the cluster, `-o=value` and `-ovalue` alike)
//! - a value-taking flag without an attached value pulls the next token
//!
//! Everything after a literal `--` is copied through untouched.

use std::borrow::Cow;

use crate::table::ArgTable;

fn push_short_cluster<'a, I>(
    out: &mut Vec<Cow<'a, str>>,
    arg: &'a str,
    rest: &mut I,
    table: &ArgTable,
) where
    I: Iterator<Item = &'a str>,
{
    let body = &arg[1..];
    for (pos, c) in body.char_indices() {
        let end = pos + c.len_utf8();
        let alias = &body[pos..end];
        if alias.len() == body.len() {
            out.push(Cow::Borrowed(arg));
        } else {
            out.push(Cow::Owned(format!("-{alias}")));
        }

        if !table.short_takes_value(alias) {
            continue;
        }

        let remainder = &body[end..];
        if remainder.is_empty() {
            if let Some(value) = rest.next() {
                out.push(Cow::Borrowed(value));
            }
        } else if let Some(value) = remainder.strip_prefix('=') {
            out.push(Cow::Borrowed(value));
        } else {
            out.push(Cow::Borrowed(remainder));
        }
        break;
    }
}

/// Canonicalize `input` against the alias lookups of `table`.
pub fn canonicalize<'a, S: AsRef<str>>(input: &'a [S], table: &ArgTable) -> Vec<Cow<'a, str>> {
    let mut out: Vec<Cow<'a, str>> = Vec::with_capacity(input.len());
    let mut rest = input.iter().map(|s| s.as_ref());

    while let Some(arg) = rest.next() {
        if arg == "--" {
            out.push(Cow::Borrowed(arg));
            out.extend(rest.by_ref().map(Cow::Borrowed));
            break;
        }

        if let Some(name) = arg.strip_prefix("--") {
            // --key=value
            if let Some((key, value)) = name.split_once('=') {
                if !key.is_empty() {
                    out.push(Cow::Borrowed(&arg[..key.len() + 2]));
                    out.push(Cow::Borrowed(value));
                    continue;
                }
            }

            out.push(Cow::Borrowed(arg));
            if table.long_takes_value(name) {
                if let Some(value) = rest.next() {
                    out.push(Cow::Borrowed(value));
                }
            }
            continue;
        }

        if arg.len() > 1 && arg.starts_with('-') {
            push_short_cluster(&mut out, arg, &mut rest, table);
            continue;
        }

        out.push(Cow::Borrowed(arg));
    }

    tracing::debug!(tokens = ?out, "canonicalized input");
    out
}
