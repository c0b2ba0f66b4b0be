//! Core form types
//!
//! Two shapes of the same document:
//! - `FormDraft` and children: the working copy the user edits. Every scalar
//!   is kept as the raw string the user typed, so any input can be represented.
//! - `BacktestingForm` and children: a validated value, produced only by
//!   [`crate::schema::validate`].
//!
//! Both serialize with camelCase field names.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::keyed::KeyedList;

// =============================================================================
// Choices
// =============================================================================

/// Bar frequency of the market data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl DataFrequency {
    pub const ALL: [DataFrequency; 3] = [
        DataFrequency::Daily,
        DataFrequency::Weekly,
        DataFrequency::Monthly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataFrequency::Daily => "Daily",
            DataFrequency::Weekly => "Weekly",
            DataFrequency::Monthly => "Monthly",
        }
    }

    /// Exact, case-sensitive match on the variant name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == name)
    }
}

impl fmt::Display for DataFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type used when the backtest enters a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    /// Fill at the next available price
    Market,
    /// Fill at the limit price or better
    Limit,
    /// Becomes a market order once the stop price trades
    Stop,
}

impl OrderType {
    pub const ALL: [OrderType; 3] = [OrderType::Market, OrderType::Limit, OrderType::Stop];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "Market",
            OrderType::Limit => "Limit",
            OrderType::Stop => "Stop",
        }
    }

    /// Exact, case-sensitive match on the variant name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == name)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Validated form
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralSettings {
    pub strategy_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSettings {
    pub asset_selection: String,
    pub data_frequency: DataFrequency,
}

/// A single rule instance: a type name plus free-form parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    #[serde(rename = "type")]
    pub strategy_type: String,
    pub parameters: String,
}

/// Named group of one or more strategies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperStrategy {
    pub name: String,
    pub strategies: Vec<Strategy>,
}

/// Order and sizing settings
///
/// Sizing fields keep the text the user entered; the `*_value` accessors give
/// a decimal view when the text is numeric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionSettings {
    pub order_type: OrderType,
    pub position_size: String,
    pub stop_loss: String,
    pub take_profit: String,
}

impl ExecutionSettings {
    pub fn position_size_value(&self) -> Option<Decimal> {
        parse_decimal(&self.position_size)
    }

    pub fn stop_loss_value(&self) -> Option<Decimal> {
        parse_decimal(&self.stop_loss)
    }

    pub fn take_profit_value(&self) -> Option<Decimal> {
        parse_decimal(&self.take_profit)
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text.trim()).ok()
}

/// Root of a validated backtest configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestingForm {
    pub general_settings: GeneralSettings,
    pub data_settings: DataSettings,
    pub super_strategies: Vec<SuperStrategy>,
    pub execution_settings: ExecutionSettings,
}

// =============================================================================
// Working copy
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralSettingsDraft {
    pub strategy_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataSettingsDraft {
    pub asset_selection: String,
    pub data_frequency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyDraft {
    #[serde(rename = "type")]
    pub strategy_type: String,
    pub parameters: String,
}

impl StrategyDraft {
    pub fn new(strategy_type: impl Into<String>, parameters: impl Into<String>) -> Self {
        StrategyDraft {
            strategy_type: strategy_type.into(),
            parameters: parameters.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuperStrategyDraft {
    pub name: String,
    pub strategies: KeyedList<StrategyDraft>,
}

impl SuperStrategyDraft {
    /// Empty name with one blank strategy, the value "add super strategy" inserts
    pub fn with_blank_strategy() -> Self {
        let mut strategies = KeyedList::new();
        strategies.append(StrategyDraft::default());
        SuperStrategyDraft {
            name: String::new(),
            strategies,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecutionSettingsDraft {
    pub order_type: String,
    pub position_size: String,
    pub stop_loss: String,
    pub take_profit: String,
}

/// Unvalidated working copy of the whole form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormDraft {
    pub general_settings: GeneralSettingsDraft,
    pub data_settings: DataSettingsDraft,
    pub super_strategies: KeyedList<SuperStrategyDraft>,
    pub execution_settings: ExecutionSettingsDraft,
}

impl FormDraft {
    /// Blank form with the select inputs preset (Daily bars, Limit orders)
    pub fn with_defaults() -> Self {
        FormDraft {
            data_settings: DataSettingsDraft {
                asset_selection: String::new(),
                data_frequency: DataFrequency::Daily.to_string(),
            },
            execution_settings: ExecutionSettingsDraft {
                order_type: OrderType::Limit.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Load a stored snapshot back into an editable working copy
impl From<&BacktestingForm> for FormDraft {
    fn from(form: &BacktestingForm) -> Self {
        let general = &form.general_settings;
        let execution = &form.execution_settings;
        FormDraft {
            general_settings: GeneralSettingsDraft {
                strategy_name: general.strategy_name.clone(),
                description: general.description.clone(),
                start_date: Some(general.start_date.to_string()),
                end_date: Some(general.end_date.to_string()),
            },
            data_settings: DataSettingsDraft {
                asset_selection: form.data_settings.asset_selection.clone(),
                data_frequency: form.data_settings.data_frequency.to_string(),
            },
            super_strategies: form
                .super_strategies
                .iter()
                .map(|s| SuperStrategyDraft {
                    name: s.name.clone(),
                    strategies: s
                        .strategies
                        .iter()
                        .map(|st| StrategyDraft::new(st.strategy_type.clone(), st.parameters.clone()))
                        .collect(),
                })
                .collect(),
            execution_settings: ExecutionSettingsDraft {
                order_type: execution.order_type.to_string(),
                position_size: execution.position_size.clone(),
                stop_loss: execution.stop_loss.clone(),
                take_profit: execution.take_profit.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_choice_names_are_exact() {
        assert_eq!(DataFrequency::from_name("Weekly"), Some(DataFrequency::Weekly));
        assert_eq!(DataFrequency::from_name("weekly"), None);
        assert_eq!(DataFrequency::from_name(""), None);
        assert_eq!(OrderType::from_name("Stop"), Some(OrderType::Stop));
        assert_eq!(OrderType::from_name("StopLimit"), None);
    }

    #[test]
    fn test_draft_missing_fields_default() {
        let draft: FormDraft = serde_json::from_str(r#"{"generalSettings":{"strategyName":"X"}}"#).unwrap();
        assert_eq!(draft.general_settings.strategy_name, "X");
        assert_eq!(draft.general_settings.start_date, None);
        assert_eq!(draft.data_settings.data_frequency, "");
        assert!(draft.super_strategies.is_empty());
    }

    #[test]
    fn test_draft_strategy_type_field_name() {
        let draft: StrategyDraft = serde_json::from_str(r#"{"type":"RSI","parameters":"14"}"#).unwrap();
        assert_eq!(draft, StrategyDraft::new("RSI", "14"));
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            serde_json::json!({"type": "RSI", "parameters": "14"})
        );
    }

    #[test]
    fn test_with_defaults_presets_choices() {
        let draft = FormDraft::with_defaults();
        assert_eq!(draft.data_settings.data_frequency, "Daily");
        assert_eq!(draft.execution_settings.order_type, "Limit");
        assert!(draft.general_settings.strategy_name.is_empty());
    }

    #[test]
    fn test_blank_super_strategy_has_one_strategy() {
        let s = SuperStrategyDraft::with_blank_strategy();
        assert!(s.name.is_empty());
        assert_eq!(s.strategies.len(), 1);
        assert_eq!(s.strategies.get(0), Some(&StrategyDraft::default()));
    }

    #[test]
    fn test_execution_decimal_views() {
        let execution = ExecutionSettings {
            order_type: OrderType::Market,
            position_size: "1.5".to_string(),
            stop_loss: " 0.95 ".to_string(),
            take_profit: "10%".to_string(),
        };
        assert_eq!(execution.position_size_value(), Some(dec!(1.5)));
        assert_eq!(execution.stop_loss_value(), Some(dec!(0.95)));
        assert_eq!(execution.take_profit_value(), None);
    }
}
