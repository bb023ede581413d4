//! # gqlopt CLI
//!
//! Renders GraphQL operations from query options and decodes failed
//! response bodies.
//!
//! Usage:
//!   gqlopt render <SELECTION> [--name <NAME>] [--directive <D>]... [--var <NAME:TYPE>]...
//!   gqlopt decode <FILE> [--status <CODE>]
//!
//! Examples:
//!   gqlopt render '{user(id:$id){name}}' --name GetUser --var id:ID!
//!   gqlopt render '{feed{id}}' --kind subscription --directive @live --json
//!   gqlopt decode response.json --status 400

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gqlopt_query::{
    decode_graphql_errors, operation_name, OperationKind, OptionType, QueryBuilder, QueryOption,
    ReadSeek, ResponseMeta, StatusCode,
};
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "gqlopt")]
#[command(author, version, about = "gqlopt - GraphQL query options from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter, e.g. "debug" or "gqlopt_query=trace"
    #[arg(long, global = true, env = "GQLOPT_LOG", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an operation from a selection set and options
    Render(RenderArgs),
    /// Decode a failed response body with the built-in decoder
    Decode {
        /// File holding the response body
        file: PathBuf,

        /// HTTP status the body was returned with
        #[arg(short, long, default_value_t = 500)]
        status: u16,
    },
}

#[derive(Args)]
struct RenderArgs {
    /// Selection set, e.g. '{user{id}}'
    selection: String,

    /// Operation kind: query, mutation or subscription
    #[arg(short, long, default_value = "query")]
    kind: OperationKind,

    /// Operation name
    #[arg(short, long)]
    name: Option<String>,

    /// Operation directive, e.g. '@cached(ttl: 60)'; repeatable
    #[arg(short, long = "directive")]
    directives: Vec<Directive>,

    /// Variable declaration as NAME:TYPE; repeatable
    #[arg(long = "var")]
    variables: Vec<VariableDecl>,

    /// Variable values as a JSON object, used with --json
    #[arg(long, env = "GQLOPT_VARIABLES")]
    values: Option<String>,

    /// Print the JSON request payload instead of the query text
    #[arg(long)]
    json: bool,
}

/// `NAME:TYPE`, as in `id:ID!`
#[derive(Debug, Clone, PartialEq, Eq)]
struct VariableDecl {
    name: String,
    graphql_type: String,
}

impl FromStr for VariableDecl {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (name, graphql_type) = s
            .split_once(':')
            .ok_or_else(|| format!("expected NAME:TYPE, got '{}'", s))?;
        let (name, graphql_type) = (name.trim(), graphql_type.trim());
        if name.is_empty() || graphql_type.is_empty() {
            return Err(format!("expected NAME:TYPE, got '{}'", s));
        }
        Ok(Self {
            name: name.to_string(),
            graphql_type: graphql_type.to_string(),
        })
    }
}

/// A directive given on the command line
#[derive(Debug, Clone)]
struct Directive(String);

impl FromStr for Directive {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let text = s.trim();
        let name = text.strip_prefix('@').unwrap_or(text);
        if name.trim().is_empty() {
            return Err(format!("directive needs a name, got '{}'", s));
        }
        Ok(Self(format!("@{}", name)))
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl QueryOption for Directive {
    fn option_type(&self) -> OptionType {
        OptionType::OperationDirective
    }
}

fn render(args: &RenderArgs) -> Result<String> {
    let mut builder = QueryBuilder::new(args.kind, args.selection.as_str());
    for var in &args.variables {
        builder = builder.variable(&var.name, var.graphql_type.as_str());
    }
    if let Some(name) = &args.name {
        builder = builder.option(operation_name(name.as_str()));
    }
    for directive in &args.directives {
        builder = builder.option(directive.clone());
    }

    let built = builder.build()?;
    if !args.json {
        return Ok(built.query().to_string());
    }

    let values = args
        .values
        .as_deref()
        .map(serde_json::from_str::<serde_json::Value>)
        .transpose()
        .context("--values is not valid JSON")?;
    Ok(serde_json::to_string_pretty(&built.request(values))?)
}

fn decode(path: &Path, status: u16) -> Result<Vec<String>> {
    let status = StatusCode::from_u16(status).with_context(|| format!("invalid HTTP status {}", status))?;
    let body = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    debug!(path = %path.display(), bytes = body.len(), "decoding response body");

    let mut cursor = Cursor::new(body);
    let reader: &mut dyn ReadSeek = &mut cursor;
    let errors = decode_graphql_errors(&ResponseMeta::new(status), reader)?;
    Ok(errors.iter().map(|e| e.to_string()).collect())
}

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Render(args) => {
            println!("{}", render(&args)?);
        }
        Commands::Decode { file, status } => {
            for line in decode(&file, status)? {
                println!("- {}", line);
            }
        }
    }
    Ok(())
}
