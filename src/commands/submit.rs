//! Submit command: validate, store and show the snapshot

use anyhow::{bail, Result};
use backtest_form::{submit, viewer, Config, FormEditor, FormStore};
use std::path::PathBuf;
use tracing::info;

use super::{emit, read_draft};

pub fn run(config: &Config, input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let editor = FormEditor::new(read_draft(&input)?);
    let mut store = FormStore::new();

    if let Err(errors) = submit(&editor, &mut store) {
        for error in &errors {
            println!("{}", error);
        }
        bail!("Submission rejected: {} invalid field(s)", errors.len());
    }

    let Some(rendered) = viewer::render(store.form_data(), &config.viewer)? else {
        bail!("No snapshot stored after submission");
    };

    if let Some(execution) = store.form_data().map(|f| &f.execution_settings) {
        if execution.position_size_value().is_none() {
            info!(
                "Position size '{}' is not numeric; stored as entered",
                execution.position_size
            );
        }
    }

    emit(&rendered, output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{write_temp, EXAMPLE_FORM};
    use backtest_form::BacktestingForm;

    #[test]
    fn test_valid_form_written_unchanged() {
        let input = write_temp("submit_ok_in", EXAMPLE_FORM);
        let output = write_temp("submit_ok_out", "");
        let result = run(&Config::default(), input.clone(), Some(output.clone()));
        let written = std::fs::read_to_string(&output).unwrap();
        std::fs::remove_file(&input).ok();
        std::fs::remove_file(&output).ok();

        assert!(result.is_ok());
        let stored: serde_json::Value = serde_json::from_str(&written).unwrap();
        let expected: serde_json::Value = serde_json::from_str(EXAMPLE_FORM).unwrap();
        assert_eq!(stored, expected);
        assert!(serde_json::from_str::<BacktestingForm>(&written).is_ok());
    }

    #[test]
    fn test_rejected_form_fails() {
        let input = write_temp(
            "submit_bad",
            &EXAMPLE_FORM.replace("\"endDate\": \"2024-01-02\"", "\"endDate\": \"2024-01-01\""),
        );
        let result = run(&Config::default(), input.clone(), None);
        std::fs::remove_file(&input).ok();
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Submission rejected: 2 invalid field(s)"));
    }
}
