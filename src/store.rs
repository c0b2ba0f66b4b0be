//! Snapshot store and form submission
//!
//! The store holds at most one validated form. `submit` is its only writer in
//! normal use: it validates the working copy and, when accepted, replaces the
//! snapshot wholesale. Readers borrow the latest value.

use tracing::{debug, info};

use crate::editor::FormEditor;
use crate::error::ValidationErrors;
use crate::schema;
use crate::types::BacktestingForm;

#[derive(Debug, Clone, Default)]
pub struct FormStore {
    form_data: Option<BacktestingForm>,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest accepted snapshot, if any
    pub fn form_data(&self) -> Option<&BacktestingForm> {
        self.form_data.as_ref()
    }

    /// Replace the snapshot (last write wins)
    pub fn set_form_data(&mut self, data: BacktestingForm) -> &BacktestingForm {
        if self.form_data.is_some() {
            debug!("Replacing stored snapshot");
        }
        self.form_data.insert(data)
    }
}

/// Validate the editor's working copy and store it on success
///
/// On rejection the store is left untouched and the field errors are returned
/// for display next to their inputs.
pub fn submit<'s>(
    editor: &FormEditor,
    store: &'s mut FormStore,
) -> Result<&'s BacktestingForm, ValidationErrors> {
    match schema::validate(editor.draft()) {
        Ok(form) => {
            info!(
                "Accepted backtest '{}' with {} super strategies",
                form.general_settings.strategy_name,
                form.super_strategies.len()
            );
            Ok(store.set_form_data(form))
        }
        Err(errors) => {
            debug!("Submission rejected: {}", errors);
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FormDraft, StrategyDraft, SuperStrategyDraft};

    fn filled_editor(name: &str) -> FormEditor {
        let mut editor = FormEditor::new(FormDraft::with_defaults());
        let sets = [
            ("generalSettings.strategyName", name),
            ("generalSettings.startDate", "2024-01-01"),
            ("generalSettings.endDate", "2024-06-30"),
            ("dataSettings.assetSelection", "ETH"),
            ("executionSettings.positionSize", "2"),
            ("executionSettings.stopLoss", "0.95"),
            ("executionSettings.takeProfit", "1.2"),
        ];
        for (path, value) in sets {
            editor.set_field(&path.parse().unwrap(), value).unwrap();
        }
        let index = editor.super_strategy_count();
        editor.append_super_strategy(SuperStrategyDraft::with_blank_strategy());
        editor
            .set_field(&format!("superStrategies.{}.name", index).parse().unwrap(), "Entry")
            .unwrap();
        editor
            .set_field(
                &format!("superStrategies.{}.strategies.0.type", index).parse().unwrap(),
                "RSI",
            )
            .unwrap();
        editor
            .set_field(
                &format!("superStrategies.{}.strategies.0.parameters", index).parse().unwrap(),
                "14",
            )
            .unwrap();
        editor
    }

    #[test]
    fn test_store_starts_empty() {
        assert!(FormStore::new().form_data().is_none());
    }

    #[test]
    fn test_submit_accepts_and_stores() {
        let editor = filled_editor("First");
        let mut store = FormStore::new();

        let stored = submit(&editor, &mut store).unwrap();
        assert_eq!(stored.general_settings.strategy_name, "First");
        assert_eq!(
            store.form_data().map(|f| f.data_settings.asset_selection.as_str()),
            Some("ETH")
        );
    }

    #[test]
    fn test_rejected_submit_keeps_previous_snapshot() {
        let mut store = FormStore::new();
        submit(&filled_editor("First"), &mut store).unwrap();

        let mut editor = filled_editor("Second");
        editor.append_super_strategy(SuperStrategyDraft {
            name: "Exit".to_string(),
            ..Default::default()
        });
        let errors = submit(&editor, &mut store).unwrap_err();

        assert_eq!(errors.paths(), vec!["superStrategies.1.strategies".to_string()]);
        assert_eq!(
            store.form_data().unwrap().general_settings.strategy_name,
            "First"
        );
    }

    #[test]
    fn test_accepted_submit_replaces_snapshot() {
        let mut store = FormStore::new();
        submit(&filled_editor("First"), &mut store).unwrap();

        let mut editor = filled_editor("Second");
        editor.append_super_strategy(SuperStrategyDraft::default());
        editor.append_strategy(1, StrategyDraft::new("MA", "50")).unwrap();
        editor
            .set_field(&"superStrategies.1.name".parse().unwrap(), "Exit")
            .unwrap();
        submit(&editor, &mut store).unwrap();

        let snapshot = store.form_data().unwrap();
        assert_eq!(snapshot.general_settings.strategy_name, "Second");
        assert_eq!(snapshot.super_strategies.len(), 2);
    }

    #[test]
    fn test_set_form_data_last_write_wins() {
        let mut store = FormStore::new();
        let mut store_b = FormStore::new();
        submit(&filled_editor("A"), &mut store).unwrap();
        submit(&filled_editor("B"), &mut store_b).unwrap();

        let b = store_b.form_data().cloned().unwrap();
        store.set_form_data(b.clone());
        assert_eq!(store.form_data(), Some(&b));
    }
}
