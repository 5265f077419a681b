//! CLI binary for ecmalens: extract exports, functions, variables and test
//! cases from JavaScript and TypeScript sources.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ecmalens_analysis::{
    ExtractedExport, ExtractedFunction, ExtractedVariable, TestCase, extract_exports,
    extract_functions, extract_tests, extract_variables,
};
use ecmalens_core::config::LensConfig;
use ecmalens_core::input::{DirectoryInput, DirectoryWithConfigInput, FileInput};
use ecmalens_core::{AstParser, Node, ParseOptions, ParsedSource};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ecmalens", about = "JavaScript/TypeScript structure extractor")]
struct Cli {
    /// Project root holding `.ecmalens/config.toml` (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Accept JSX syntax
    #[arg(long, global = true)]
    jsx: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Target {
    /// Source file, or a directory of candidate files
    path: PathBuf,

    /// File stem read first from a directory (defaults to the directory name)
    #[arg(long)]
    slug: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List exported bindings
    Exports(Target),

    /// List function definitions
    Functions(Target),

    /// List variable bindings
    Variables(Target),

    /// List test cases and their expectations
    Tests(Target),

    /// Dump the syntax tree as JSON
    Ast {
        #[command(flatten)]
        target: Target,

        /// Drop positions so equivalent programs print identically
        #[arg(long)]
        representer: bool,

        /// Include comments
        #[arg(long)]
        comments: bool,
    },
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let project_root = get_project_root(&cli)?;
    let mut config = LensConfig::load(&project_root)
        .with_context(|| format!("failed to load config under {}", project_root.display()))?;
    if cli.jsx {
        config.parse.jsx = true;
    }

    let output = match &cli.command {
        Commands::Exports(target) => cmd_extract(&config, target, |parsed, _| {
            Ok(extract_exports(&parsed.program).iter().map(export_json).collect())
        }),
        Commands::Functions(target) => cmd_extract(&config, target, |parsed, _| {
            Ok(extract_functions(&parsed.program)
                .iter()
                .map(function_json)
                .collect())
        }),
        Commands::Variables(target) => cmd_extract(&config, target, |parsed, _| {
            Ok(extract_variables(&parsed.program)
                .iter()
                .map(variable_json)
                .collect())
        }),
        Commands::Tests(target) => cmd_extract(&config, target, |parsed, config| {
            extract_tests(&parsed.program)
                .iter()
                .map(|case| test_json(case, &parsed.source, &config.tests.name_separator))
                .collect()
        }),
        Commands::Ast {
            target,
            representer,
            comments,
        } => cmd_ast(&config, target, *representer, *comments),
    }?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Files to analyze: the file itself, the solution files named by the
/// directory's `.meta/config.json`, or the directory's candidates.
fn resolve_files(config: &LensConfig, target: &Target) -> Result<Vec<PathBuf>> {
    if !target.path.is_dir() {
        return Ok(vec![target.path.clone()]);
    }
    if DirectoryWithConfigInput::is_configured(&target.path) {
        let input = DirectoryWithConfigInput::new(&target.path)?;
        tracing::debug!(
            "using solution files from {}",
            DirectoryWithConfigInput::config_path(&target.path).display()
        );
        return Ok(input.files(config.input.max_sources));
    }
    let slug = match &target.slug {
        Some(slug) => slug.clone(),
        None => target
            .path
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_default(),
    };
    let files = DirectoryInput::new(&target.path, slug)
        .with_preferred_extension(config.input.preferred_extension.clone())
        .with_patterns(config.file_patterns()?)
        .candidates(config.input.max_sources)?;
    if files.is_empty() {
        anyhow::bail!(
            "no candidate source files in {}",
            target.path.display()
        );
    }
    Ok(files)
}

fn parse_file(config: &LensConfig, path: &Path, base: ParseOptions) -> Result<ParsedSource> {
    let mut options = config.parse_options(base);
    // `.jsx`/`.tsx` files always need the JSX grammar.
    if path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.ends_with('x'))
    {
        options = options.with_jsx(true);
    }
    let input = FileInput::with_patterns(path, config.file_patterns()?);
    if !input.has_expected_extension() {
        tracing::warn!("{} does not have a recognized extension", path.display());
    }
    AstParser::new(options, 1)
        .parse(&input)?
        .into_iter()
        .next()
        .with_context(|| format!("nothing parsed from {}", path.display()))
}

fn cmd_extract(
    config: &LensConfig,
    target: &Target,
    extract: impl Fn(&ParsedSource, &LensConfig) -> Result<Vec<Value>>,
) -> Result<Value> {
    let mut results = Vec::new();
    for path in resolve_files(config, target)? {
        let parsed = parse_file(config, &path, ParseOptions::ANALYZER)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        let items = extract(&parsed, config)?;
        tracing::debug!("{}: {} item(s)", path.display(), items.len());
        results.push(json!({
            "file": path.display().to_string(),
            "items": items,
        }));
    }
    Ok(Value::Array(results))
}

fn cmd_ast(config: &LensConfig, target: &Target, representer: bool, comments: bool) -> Result<Value> {
    let mut base = if representer {
        ParseOptions::REPRESENTER
    } else {
        ParseOptions::ANALYZER
    };
    if comments {
        base = base.with_comments();
    }
    let mut results = Vec::new();
    for path in resolve_files(config, target)? {
        let parsed = parse_file(config, &path, base)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        results.push(json!({
            "file": path.display().to_string(),
            "program": parsed.program,
            "comments": parsed.comments,
        }));
    }
    Ok(Value::Array(results))
}

fn line(node: &Node) -> Option<usize> {
    node.loc.map(|loc| loc.start.line)
}

fn export_json(export: &ExtractedExport<'_>) -> Value {
    json!({
        "local": export.local,
        "exported": export.exported,
        "exportKind": export.export_kind.as_str(),
        "kind": export.kind.as_str(),
        "line": line(export.node),
    })
}

fn function_json(function: &ExtractedFunction<'_>) -> Value {
    let metadata = &function.metadata;
    json!({
        "name": function.name,
        "kind": function.kind.as_str(),
        "async": function.is_async(),
        "generator": function.is_generator(),
        "expression": metadata.is_expression,
        "static": metadata.is_static,
        "accessibility": metadata.accessibility,
        "class": metadata.klass,
        "params": function.params().len(),
        "line": line(function.node),
    })
}

fn variable_json(variable: &ExtractedVariable<'_>) -> Value {
    json!({
        "name": variable.name(),
        "kind": variable.kind.as_str(),
        "initialized": variable.initialized(),
        "line": line(variable.binding),
    })
}

fn test_json(case: &TestCase<'_>, source: &str, separator: &str) -> Result<Value> {
    let expectations = case
        .expectations
        .iter()
        .map(|expectation| {
            Ok(json!({
                "statement": expectation.statement_code(source)?,
                "expect": expectation.expect_code(source)?,
                "actual": expectation.actual_code(source)?,
            }))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(json!({
        "name": case.name(separator),
        "description": case.description,
        "test": case.test,
        "code": case.test_code(source)?,
        "expectations": expectations,
        "line": line(case.test_node),
    }))
}
