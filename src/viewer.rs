//! Read-only rendering of the stored snapshot

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::config::ViewerConfig;
use crate::types::BacktestingForm;

/// Pretty-print the snapshot as JSON, or `None` when nothing has been stored
pub fn render(form_data: Option<&BacktestingForm>, config: &ViewerConfig) -> Result<Option<String>> {
    let Some(form) = form_data else {
        return Ok(None);
    };

    let indent = " ".repeat(config.indent);
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    form.serialize(&mut serializer)
        .context("Failed to serialize snapshot")?;

    let text = String::from_utf8(buf).context("Snapshot JSON is not UTF-8")?;
    Ok(Some(text))
}
