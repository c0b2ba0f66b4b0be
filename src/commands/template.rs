//! Template command: print a fresh working copy

use anyhow::Result;
use backtest_form::Config;
use std::path::PathBuf;
use tracing::info;

use super::emit;

pub fn run(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let draft = config.defaults.to_draft();
    info!(
        "Generated template with {} blank super strateg(ies)",
        draft.super_strategies.len()
    );
    emit(&serde_json::to_string_pretty(&draft)?, output.as_deref())
}
