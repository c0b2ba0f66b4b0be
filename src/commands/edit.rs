//! Edit command: apply list and field edits to a working copy

use anyhow::{anyhow, Context, Result};
use backtest_form::{Config, FieldPath, FormEditor, StrategyDraft, SuperStrategyDraft};
use std::path::PathBuf;
use tracing::info;

use super::{emit, read_draft};

/// Edits requested on the command line
#[derive(Debug, Default)]
pub struct EditArgs {
    pub input: Option<PathBuf>,
    pub sets: Vec<String>,
    pub add_super_strategy: u8,
    pub add_strategy: Vec<usize>,
    pub remove_super_strategy: Vec<usize>,
    pub remove_strategy: Vec<String>,
    pub output: Option<PathBuf>,
}

/// Parse `path=value`
fn parse_assignment(s: &str) -> Result<(FieldPath, String)> {
    let (path, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected path=value, got '{}'", s))?;
    let path: FieldPath = path.trim().parse()?;
    Ok((path, value.to_string()))
}

/// Parse `<super>.<index>`
fn parse_strategy_position(s: &str) -> Result<(usize, usize)> {
    let (sup, idx) = s
        .split_once('.')
        .ok_or_else(|| anyhow!("Expected <super>.<index>, got '{}'", s))?;
    let sup = sup.trim().parse().with_context(|| format!("Bad super strategy index in '{}'", s))?;
    let idx = idx.trim().parse().with_context(|| format!("Bad strategy index in '{}'", s))?;
    Ok((sup, idx))
}

/// Appends first, then field sets, then removals, each in the order given.
/// Removals shift later positions, so each index is read against the list as
/// it stands after the previous removal.
pub fn run(config: &Config, args: EditArgs) -> Result<()> {
    let draft = match &args.input {
        Some(path) => read_draft(path)?,
        None => config.defaults.to_draft(),
    };
    let mut editor = FormEditor::new(draft);

    for _ in 0..args.add_super_strategy {
        editor.append_super_strategy(SuperStrategyDraft::with_blank_strategy());
    }
    for super_index in &args.add_strategy {
        editor.append_strategy(*super_index, StrategyDraft::default())?;
    }
    for assignment in &args.sets {
        let (path, value) = parse_assignment(assignment)?;
        editor.set_field(&path, &value)?;
    }
    for index in &args.remove_super_strategy {
        editor.remove_super_strategy(*index)?;
    }
    for position in &args.remove_strategy {
        let (super_index, index) = parse_strategy_position(position)?;
        editor.remove_strategy(super_index, index)?;
    }

    info!(
        "Working copy has {} super strateg(ies)",
        editor.super_strategy_count()
    );
    emit(
        &serde_json::to_string_pretty(editor.draft())?,
        args.output.as_deref(),
    )
}
