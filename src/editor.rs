//! Working copy editing
//!
//! `FormEditor` owns the `FormDraft` the user is filling in. Repeated groups are
//! edited by current position; after a removal every later position shifts down
//! by one, so callers holding an index must re-resolve it (or hold the
//! [`EntryKey`] and look the position up again).

use tracing::debug;

use crate::error::{EditError, FieldPath, PathSegment};
use crate::keyed::{EntryKey, KeyedList};
use crate::types::{FormDraft, StrategyDraft, SuperStrategyDraft};

#[derive(Debug, Clone, Default)]
pub struct FormEditor {
    draft: FormDraft,
}

impl FormEditor {
    /// Start from an existing working copy (defaults from config, a file, a snapshot)
    pub fn new(draft: FormDraft) -> Self {
        FormEditor { draft }
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn into_draft(self) -> FormDraft {
        self.draft
    }

    /// Discard all edits and start again from `draft`
    pub fn reset(&mut self, draft: FormDraft) {
        self.draft = draft;
    }

    pub fn super_strategy_count(&self) -> usize {
        self.draft.super_strategies.len()
    }

    pub fn strategy_count(&self, super_index: usize) -> Result<usize, EditError> {
        Ok(self.super_strategy(super_index)?.strategies.len())
    }

    /// Current position of a super strategy by key
    pub fn super_strategy_position(&self, key: EntryKey) -> Option<usize> {
        self.draft.super_strategies.position(key)
    }

    pub fn append_super_strategy(&mut self, value: SuperStrategyDraft) -> EntryKey {
        let key = self.draft.super_strategies.append(value);
        debug!(
            "Appended super strategy {} at index {}",
            key,
            self.draft.super_strategies.len() - 1
        );
        key
    }

    pub fn remove_super_strategy(&mut self, index: usize) -> Result<SuperStrategyDraft, EditError> {
        let len = self.draft.super_strategies.len();
        let removed = self
            .draft
            .super_strategies
            .remove(index)
            .ok_or_else(|| EditError::IndexOutOfRange {
                path: super_strategies_path(),
                index,
                len,
            })?;
        debug!("Removed super strategy at index {} ({} left)", index, len - 1);
        Ok(removed)
    }

    pub fn append_strategy(
        &mut self,
        super_index: usize,
        value: StrategyDraft,
    ) -> Result<EntryKey, EditError> {
        let strategies = &mut self.super_strategy_mut(super_index)?.strategies;
        let key = strategies.append(value);
        debug!(
            "Appended strategy {} to super strategy {} at index {}",
            key,
            super_index,
            strategies.len() - 1
        );
        Ok(key)
    }

    pub fn remove_strategy(
        &mut self,
        super_index: usize,
        index: usize,
    ) -> Result<StrategyDraft, EditError> {
        let strategies = &mut self.super_strategy_mut(super_index)?.strategies;
        let len = strategies.len();
        let removed = strategies
            .remove(index)
            .ok_or_else(|| EditError::IndexOutOfRange {
                path: super_strategies_path().index(super_index).field("strategies"),
                index,
                len,
            })?;
        debug!(
            "Removed strategy {} from super strategy {} ({} left)",
            index,
            super_index,
            len - 1
        );
        Ok(removed)
    }

    /// Set one scalar field addressed by a dotted path
    ///
    /// Accepts every leaf the form has, e.g. `generalSettings.startDate`,
    /// `superStrategies.1.name`, `superStrategies.0.strategies.2.parameters`.
    pub fn set_field(&mut self, path: &FieldPath, value: &str) -> Result<(), EditError> {
        let slot = self.field_slot(path)?;
        match slot {
            Slot::Text(target) => *target = value.to_string(),
            Slot::Optional(target) => *target = Some(value.to_string()),
        }
        debug!("Set {} = {:?}", path, value);
        Ok(())
    }

    /// Clear an optional field (description or a date) back to unset
    pub fn clear_field(&mut self, path: &FieldPath) -> Result<(), EditError> {
        match self.field_slot(path)? {
            Slot::Text(target) => target.clear(),
            Slot::Optional(target) => *target = None,
        }
        debug!("Cleared {}", path);
        Ok(())
    }

    fn super_strategy(&self, index: usize) -> Result<&SuperStrategyDraft, EditError> {
        let list = &self.draft.super_strategies;
        list.get(index).ok_or_else(|| EditError::IndexOutOfRange {
            path: super_strategies_path(),
            index,
            len: list.len(),
        })
    }

    fn super_strategy_mut(&mut self, index: usize) -> Result<&mut SuperStrategyDraft, EditError> {
        let list = &mut self.draft.super_strategies;
        let len = list.len();
        list.get_mut(index).ok_or_else(|| EditError::IndexOutOfRange {
            path: super_strategies_path(),
            index,
            len,
        })
    }

    fn field_slot(&mut self, path: &FieldPath) -> Result<Slot<'_>, EditError> {
        let unknown = || EditError::UnknownField(path.clone());
        let draft = &mut self.draft;

        let segments: Vec<Segment<'_>> = path.segments().iter().map(Segment::from).collect();
        match segments.as_slice() {
            [Segment::Name("generalSettings"), Segment::Name(field)] => {
                let general = &mut draft.general_settings;
                match *field {
                    "strategyName" => Ok(Slot::Text(&mut general.strategy_name)),
                    "description" => Ok(Slot::Optional(&mut general.description)),
                    "startDate" => Ok(Slot::Optional(&mut general.start_date)),
                    "endDate" => Ok(Slot::Optional(&mut general.end_date)),
                    _ => Err(unknown()),
                }
            }
            [Segment::Name("dataSettings"), Segment::Name(field)] => {
                let data = &mut draft.data_settings;
                match *field {
                    "assetSelection" => Ok(Slot::Text(&mut data.asset_selection)),
                    "dataFrequency" => Ok(Slot::Text(&mut data.data_frequency)),
                    _ => Err(unknown()),
                }
            }
            [Segment::Name("executionSettings"), Segment::Name(field)] => {
                let execution = &mut draft.execution_settings;
                match *field {
                    "orderType" => Ok(Slot::Text(&mut execution.order_type)),
                    "positionSize" => Ok(Slot::Text(&mut execution.position_size)),
                    "stopLoss" => Ok(Slot::Text(&mut execution.stop_loss)),
                    "takeProfit" => Ok(Slot::Text(&mut execution.take_profit)),
                    _ => Err(unknown()),
                }
            }
            [Segment::Name("superStrategies"), Segment::Index(i), Segment::Name("name")] => {
                let sup = entry_mut(&mut draft.super_strategies, *i, super_strategies_path())?;
                Ok(Slot::Text(&mut sup.name))
            }
            [Segment::Name("superStrategies"), Segment::Index(i), Segment::Name("strategies"), Segment::Index(j), Segment::Name(field)] =>
            {
                let sup = entry_mut(&mut draft.super_strategies, *i, super_strategies_path())?;
                let strategies_path = super_strategies_path().index(*i).field("strategies");
                let strategy = entry_mut(&mut sup.strategies, *j, strategies_path)?;
                match *field {
                    "type" => Ok(Slot::Text(&mut strategy.strategy_type)),
                    "parameters" => Ok(Slot::Text(&mut strategy.parameters)),
                    _ => Err(unknown()),
                }
            }
            _ => Err(unknown()),
        }
    }
}

/// Borrowed view of a path segment, for slice pattern matching
enum Segment<'a> {
    Name(&'a str),
    Index(usize),
}

impl<'a> From<&'a PathSegment> for Segment<'a> {
    fn from(segment: &'a PathSegment) -> Self {
        match segment {
            PathSegment::Field(name) => Segment::Name(name.as_str()),
            PathSegment::Index(index) => Segment::Index(*index),
        }
    }
}

enum Slot<'a> {
    Text(&'a mut String),
    Optional(&'a mut Option<String>),
}

fn super_strategies_path() -> FieldPath {
    FieldPath::root().field("superStrategies")
}

fn entry_mut<T>(list: &mut KeyedList<T>, index: usize, path: FieldPath) -> Result<&mut T, EditError> {
    let len = list.len();
    list.get_mut(index)
        .ok_or(EditError::IndexOutOfRange { path, index, len })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> FieldPath {
        s.parse().unwrap()
    }

    fn editor_with_three_supers() -> FormEditor {
        let mut editor = FormEditor::new(FormDraft::with_defaults());
        for name in ["A", "B", "C"] {
            let mut sup = SuperStrategyDraft::with_blank_strategy();
            sup.name = name.to_string();
            editor.append_super_strategy(sup);
        }
        editor
    }

    #[test]
    fn test_set_top_level_fields() {
        let mut editor = FormEditor::default();
        editor.set_field(&path("generalSettings.strategyName"), "Trend").unwrap();
        editor.set_field(&path("generalSettings.startDate"), "2024-01-01").unwrap();
        editor.set_field(&path("dataSettings.dataFrequency"), "Weekly").unwrap();
        editor.set_field(&path("executionSettings.stopLoss"), "0.9").unwrap();

        let draft = editor.draft();
        assert_eq!(draft.general_settings.strategy_name, "Trend");
        assert_eq!(draft.general_settings.start_date.as_deref(), Some("2024-01-01"));
        assert_eq!(draft.data_settings.data_frequency, "Weekly");
        assert_eq!(draft.execution_settings.stop_loss, "0.9");
    }

    #[test]
    fn test_set_nested_fields() {
        let mut editor = editor_with_three_supers();
        editor.set_field(&path("superStrategies.1.name"), "Entry").unwrap();
        editor
            .set_field(&path("superStrategies.1.strategies.0.type"), "RSI")
            .unwrap();
        editor
            .set_field(&path("superStrategies.1.strategies.0.parameters"), "14")
            .unwrap();

        let sup = editor.draft().super_strategies.get(1).unwrap();
        assert_eq!(sup.name, "Entry");
        assert_eq!(sup.strategies.get(0), Some(&StrategyDraft::new("RSI", "14")));
    }

    #[test]
    fn test_set_unknown_field() {
        let mut editor = FormEditor::default();
        assert_eq!(
            editor.set_field(&path("generalSettings.author"), "me"),
            Err(EditError::UnknownField(path("generalSettings.author")))
        );
        assert!(editor.set_field(&path("superStrategies"), "x").is_err());
    }

    #[test]
    fn test_set_out_of_range_index() {
        let mut editor = editor_with_three_supers();
        let err = editor
            .set_field(&path("superStrategies.0.strategies.4.type"), "RSI")
            .unwrap_err();
        assert_eq!(
            err,
            EditError::IndexOutOfRange {
                path: path("superStrategies.0.strategies"),
                index: 4,
                len: 1,
            }
        );
    }

    #[test]
    fn test_clear_optional_field() {
        let mut editor = FormEditor::default();
        let description = path("generalSettings.description");
        editor.set_field(&description, "notes").unwrap();
        editor.clear_field(&description).unwrap();
        assert_eq!(editor.draft().general_settings.description, None);
    }

    #[test]
    fn test_remove_super_strategy_shifts_indices() {
        let mut editor = editor_with_three_supers();
        let key_a = editor.draft().super_strategies.key_at(0).unwrap();
        let key_b = editor.draft().super_strategies.key_at(1).unwrap();
        let key_c = editor.draft().super_strategies.key_at(2).unwrap();

        let removed = editor.remove_super_strategy(1).unwrap();
        assert_eq!(removed.name, "B");
        assert_eq!(editor.super_strategy_count(), 2);
        assert_eq!(editor.super_strategy_position(key_a), Some(0));
        assert_eq!(editor.super_strategy_position(key_b), None);
        assert_eq!(editor.super_strategy_position(key_c), Some(1));

        // Index 1 now addresses what used to be index 2
        editor.set_field(&path("superStrategies.1.name"), "C2").unwrap();
        assert_eq!(editor.draft().super_strategies.get(1).unwrap().name, "C2");
    }

    #[test]
    fn test_remove_super_strategy_out_of_range() {
        let mut editor = editor_with_three_supers();
        assert_eq!(
            editor.remove_super_strategy(3).unwrap_err(),
            EditError::IndexOutOfRange {
                path: path("superStrategies"),
                index: 3,
                len: 3,
            }
        );
        assert_eq!(editor.super_strategy_count(), 3);
    }

    #[test]
    fn test_append_and_remove_strategies() {
        let mut editor = editor_with_three_supers();
        editor.append_strategy(0, StrategyDraft::new("MA", "20")).unwrap();
        editor.append_strategy(0, StrategyDraft::new("MACD", "12,26,9")).unwrap();
        assert_eq!(editor.strategy_count(0).unwrap(), 3);

        let removed = editor.remove_strategy(0, 1).unwrap();
        assert_eq!(removed, StrategyDraft::new("MA", "20"));

        let strategies = &editor.draft().super_strategies.get(0).unwrap().strategies;
        assert_eq!(strategies.len(), 2);
        assert_eq!(strategies.get(1), Some(&StrategyDraft::new("MACD", "12,26,9")));

        // Other groups untouched
        assert_eq!(editor.strategy_count(1).unwrap(), 1);
    }

    #[test]
    fn test_strategy_ops_on_missing_super_strategy() {
        let mut editor = FormEditor::default();
        assert!(editor.append_strategy(0, StrategyDraft::default()).is_err());
        assert!(editor.remove_strategy(0, 0).is_err());
        assert!(editor.strategy_count(0).is_err());
    }
}
