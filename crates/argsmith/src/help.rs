//! Usage text rendering. A pure function of the parser's table.

use crate::parser::ArgParser;
use crate::table::ArgInfo;

fn positional_usage(info: &ArgInfo) -> String {
    if info.required() {
        info.display_name().to_string()
    } else {
        format!("[{}]", info.display_name())
    }
}

/// One-line usage summary, e.g. `Usage: bump [options] <ver>`.
pub fn usage_line(parser: &ArgParser) -> String {
    let table = parser.table();
    let mut parts: Vec<String> = vec![parser.name().to_string()];
    let reserved = parser.reserved();
    if table.has_flags() || reserved.help() || reserved.version() {
        parts.push("[options]".to_string());
    }
    parts.extend(
        table
            .iter()
            .filter(|a| a.is_positional())
            .map(positional_usage),
    );
    format!("Usage: {}", parts.join(" "))
}

fn format_arg_help(info: &ArgInfo) -> String {
    let mut notes: Vec<String> = Vec::new();
    let help = info.help().trim();
    if !help.is_empty() {
        notes.push(help.to_string());
    }
    if info.takes_value() && info.required() {
        notes.push("(required)".to_string());
    }
    if let Some(default_value) = info.default_value() {
        notes.push(format!("[default: {default_value}]"));
    }
    if !info.possible().is_empty() {
        notes.push(format!("[possible: {}]", info.possible().join(", ")));
    }
    notes.join(" ")
}

fn builtin_row(short: bool, long: bool, s: &str, l: &str, help: &str) -> Option<(String, String)> {
    let left = match (short, long) {
        (true, true) => format!("-{s} --{l}"),
        (true, false) => format!("-{s}"),
        (false, true) => format!("--{l}"),
        (false, false) => return None,
    };
    Some((left, help.to_string()))
}

fn push_section(out: &mut String, title: &str, rows: &[(String, String)]) {
    if rows.is_empty() {
        return;
    }
    out.push_str(&format!("\n{title}:\n"));
    let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (left, help) in rows {
        if help.is_empty() {
            out.push_str(&format!("  {left}\n"));
        } else {
            out.push_str(&format!("  {left:width$}  {help}\n"));
        }
    }
}

/// Render the full help message.
pub fn render(parser: &ArgParser) -> String {
    let table = parser.table();
    let reserved = parser.reserved();

    let mut out = String::new();
    if parser.about().trim().is_empty() {
        out.push_str(parser.name());
        out.push('\n');
    } else {
        out.push_str(&format!("{} - {}\n", parser.name(), parser.about().trim()));
    }
    out.push_str(&format!("\n{}\n", usage_line(parser)));

    let mut positionals: Vec<(String, String)> = Vec::new();
    let mut options: Vec<(String, String)> = Vec::new();
    for info in table.iter() {
        let row = (info.display_name().to_string(), format_arg_help(info));
        if info.is_positional() {
            positionals.push(row);
        } else {
            options.push(row);
        }
    }
    options.extend(builtin_row(
        reserved.help_short,
        reserved.help_long,
        "h",
        "help",
        "Show help information",
    ));
    options.extend(builtin_row(
        reserved.version_short,
        reserved.version_long,
        "V",
        "version",
        "Show version information",
    ));

    push_section(&mut out, "Arguments", &positionals);
    push_section(&mut out, "Options", &options);
    out
}
