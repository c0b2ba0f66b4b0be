//! Subcommand implementations

pub mod edit;
pub mod submit;
pub mod template;
pub mod validate;

use anyhow::{Context, Result};
use backtest_form::FormDraft;
use std::fs;
use std::path::Path;
use tracing::info;

/// Read a working copy from a JSON file
pub fn read_draft(path: &Path) -> Result<FormDraft> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read form file: {}", path.display()))?;
    let draft = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse form JSON: {}", path.display()))?;
    Ok(draft)
}

/// Write to `output` when given, otherwise print to stdout
pub fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, format!("{}\n", text))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;

    pub const EXAMPLE_FORM: &str = r#"{
        "generalSettings": { "strategyName": "X", "startDate": "2024-01-01", "endDate": "2024-01-02" },
        "dataSettings": { "assetSelection": "BTC", "dataFrequency": "Daily" },
        "superStrategies": [ { "name": "A", "strategies": [ { "type": "RSI", "parameters": "14" } ] } ],
        "executionSettings": { "orderType": "Limit", "positionSize": "1", "stopLoss": "0.9", "takeProfit": "1.1" }
    }"#;

    /// Write `contents` to a per-test file under the temp dir
    pub fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "backtest_form_{}_{}.json",
            name,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }
}
