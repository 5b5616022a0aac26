use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use diffreport_diff::{compare, DiffContext, DiffKind, DiffRecord};
use diffreport_types::{parse_json_slice, Value};
use tracing::{debug, warn};

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(format) = cli.format {
        config.format = format;
    }
    match cli.command {
        Command::Compare(args) => cmd_compare(args, config),
        Command::Kinds(args) => cmd_kinds(args),
    }
}

fn cmd_compare(args: CompareArgs, mut config: CliConfig) -> anyhow::Result<()> {
    if let Some(category) = args.category {
        config.category = category;
    }
    if let Some(key) = args.key {
        config.key = key;
    }
    config.allow_missing |= args.allow_missing;

    let past = load_snapshot(&args.past, config.allow_missing)?;
    let current = load_snapshot(&args.current, config.allow_missing)?;

    let mut ctx = DiffContext::new();
    let result = compare(&mut ctx, &config.category, &config.key, &past, &current);
    if result.is_err() && !ctx.is_empty() {
        warn!(records = ctx.len(), "diff stopped early, report is incomplete");
    }

    match config.format {
        OutputFormat::Text => print!("{}", render_text(&ctx)),
        OutputFormat::Json => println!("{}", render_json(ctx.records())?),
    }
    result.context("comparing snapshots")?;
    Ok(())
}

fn cmd_kinds(args: KindsArgs) -> anyhow::Result<()> {
    let value = load_snapshot(&args.file, false)?;
    for (key, kind) in top_level_kinds(&value) {
        println!("{:<24} {}", key.as_str().bold(), kind.as_str().cyan());
    }
    Ok(())
}

/// Read and parse a JSON snapshot. A missing file is a null snapshot when
/// `allow_missing` is set.
pub fn load_snapshot(path: &Path, allow_missing: bool) -> anyhow::Result<Value> {
    if allow_missing && !path.exists() {
        debug!(path = %path.display(), "snapshot missing, treating as null");
        return Ok(Value::Null);
    }
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    parse_json_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

/// `(key, kind)` for every top-level property, or `("<root>", kind)` for a
/// non-object snapshot.
pub fn top_level_kinds(value: &Value) -> Vec<(String, String)> {
    match value.as_object() {
        Some(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), v.kind().to_string()))
            .collect(),
        None => vec![("<root>".to_string(), value.kind().to_string())],
    }
}

pub fn render_text(ctx: &DiffContext) -> String {
    if ctx.is_empty() {
        return "No changes.\n".to_string();
    }
    let mut out = String::new();
    for r in ctx.records() {
        out.push_str(&render_record(r));
        out.push('\n');
    }
    out.push_str(&format!(
        "\n{} new, {} deleted, {} updated, {} type changes\n",
        ctx.additions(),
        ctx.removals(),
        ctx.updates(),
        ctx.type_changes()
    ));
    out
}

fn render_record(r: &DiffRecord) -> String {
    let tag = match r.kind {
        DiffKind::New => "+ New".green(),
        DiffKind::Delete => "- Delete".red(),
        DiffKind::Update => "~ Update".yellow(),
        DiffKind::ChangeType => "! ChangeType".magenta(),
    };
    let change = match r.kind {
        DiffKind::New => r.to.clone(),
        DiffKind::Delete => r.from.clone(),
        DiffKind::Update | DiffKind::ChangeType => format!("{} -> {}", r.from, r.to),
    };
    format!("{} {} {}  {}", tag.bold(), r.key.as_str().bold(), r.path.to_string().dimmed(), change)
}

pub fn render_json(records: &[DiffRecord]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
