use anyhow::{Context, Result, bail};
use argsmith::{ArgParser, ErrorMode};
use argsmith_schema::CommandSchema;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "argsmith")]
#[command(version, about = "Declarative argument schemas, from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse tokens against a schema and print the matches as JSON
    Parse(ParseArgs),

    /// Print the help text generated for a schema
    Usage(SchemaArgs),

    /// Validate a schema without parsing anything
    Check(SchemaArgs),
}

#[derive(Parser)]
struct ParseArgs {
    /// Path to the JSON schema
    #[arg(value_name = "SCHEMA")]
    schema: PathBuf,

    /// Tokens to parse (put them after `--`)
    #[arg(value_name = "TOKENS", trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

#[derive(Parser)]
struct SchemaArgs {
    /// Path to the JSON schema
    #[arg(value_name = "SCHEMA")]
    schema: PathBuf,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse(args) => parse(args),
        Commands::Usage(args) => usage(args),
        Commands::Check(args) => check(args),
    }
}

fn load_parser(path: &Path) -> Result<ArgParser> {
    let schema = CommandSchema::from_file(path)?;
    if schema.name.trim().is_empty() {
        bail!("schema {} has no command name", path.display());
    }
    schema
        .build(ErrorMode::Exit)
        .with_context(|| format!("failed to build parser from {}", path.display()))
}

fn parse(args: ParseArgs) -> Result<()> {
    let parser = load_parser(&args.schema)?;
    tracing::debug!(tokens = ?args.tokens, "parsing");

    // Help, version and input errors are printed and exit the process here.
    let Some(matches) = parser.run(&args.tokens)? else {
        return Ok(());
    };
    println!("{}", serde_json::to_string_pretty(&matches)?);
    Ok(())
}

fn usage(args: SchemaArgs) -> Result<()> {
    let parser = load_parser(&args.schema)?;
    print!("{}", parser.help());
    Ok(())
}

fn check(args: SchemaArgs) -> Result<()> {
    let parser = load_parser(&args.schema)?;
    println!("OK: {} arguments", parser.table().len());
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
