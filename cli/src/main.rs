//! Sqlmacro CLI
//!
//! Expands SQL macro templates from the command line.
//!
//! # Usage
//!
//! ```bash
//! sqlmacro --help
//! sqlmacro macros
//! sqlmacro expand "SELECT * FROM t WHERE \$__timeFilter(ts)" --from now-1h
//! sqlmacro expand --file query.sql --from 1700000000000 --to 1700003600000 --context
//! ```

#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use engine::{MacroEngine, QueryContext, TimeRange};
use std::io::{self, Read, Write};
use std::path::PathBuf;

/// Sqlmacro CLI - SQL macro expansion for MySQL dashboards
#[derive(Parser)]
#[command(name = "sqlmacro")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand the macros in a SQL template
    Expand(ExpandArgs),
    /// List the available macros
    Macros,
}

#[derive(Args)]
struct ExpandArgs {
    /// SQL template (read from --file or stdin when omitted)
    sql: Option<String>,

    /// Read the SQL template from a file
    #[arg(short, long, conflicts_with = "sql")]
    file: Option<PathBuf>,

    /// Start of the time range: now, now-<duration>, epoch millis or RFC 3339
    #[arg(long, env = "SQLMACRO_FROM", default_value = "now-6h")]
    from: String,

    /// End of the time range
    #[arg(long, env = "SQLMACRO_TO", default_value = "now")]
    to: String,

    /// Also print the resulting query context as JSON
    #[arg(short, long)]
    context: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the expanded SQL
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let engine = MacroEngine::new();
    let mut stdout = io::stdout().lock();

    match cli.command {
        Some(Commands::Expand(args)) => {
            let template = read_template(&args)?;
            expand(&engine, &args, &template, &mut stdout)?;
        }
        Some(Commands::Macros) => list_macros(&engine, &mut stdout)?,
        None => {
            writeln!(stdout, "Sqlmacro CLI v{}", env!("CARGO_PKG_VERSION"))?;
            writeln!(stdout, "Use --help for usage information")?;
        }
    }

    Ok(())
}

/// Reads the template from the argument, the file, or stdin, in that order.
fn read_template(args: &ExpandArgs) -> Result<String> {
    if let Some(sql) = &args.sql {
        return Ok(sql.clone());
    }
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read template from {}", path.display()));
    }

    let mut template = String::new();
    io::stdin()
        .read_to_string(&mut template)
        .context("failed to read template from stdin")?;
    Ok(template)
}

fn expand(
    engine: &MacroEngine,
    args: &ExpandArgs,
    template: &str,
    out: &mut impl Write,
) -> Result<()> {
    let range = TimeRange::parse(&args.from, &args.to).context("invalid time range")?;
    tracing::debug!(from = %range.from, to = %range.to, "Resolved time range");

    let mut context = QueryContext::new();
    let sql = engine.interpolate(template, &range, &mut context)?;

    out.write_all(sql.as_bytes())?;
    if !sql.ends_with('\n') {
        writeln!(out)?;
    }
    if args.context {
        writeln!(out, "{}", serde_json::to_string_pretty(&context)?)?;
    }
    Ok(())
}

fn list_macros(engine: &MacroEngine, out: &mut impl Write) -> Result<()> {
    for name in engine.registry().names() {
        writeln!(out, "${name}")?;
    }
    Ok(())
}
