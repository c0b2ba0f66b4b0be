//! Form validation
//!
//! One pure function per section plus the root validator. Each function walks
//! every field, collecting all messages rather than stopping at the first one,
//! and only builds the typed value when its section is clean.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{FieldPath, ValidationErrors};
use crate::keyed::KeyedList;
use crate::types::{
    BacktestingForm, DataFrequency, DataSettings, DataSettingsDraft, ExecutionSettings,
    ExecutionSettingsDraft, FormDraft, GeneralSettings, GeneralSettingsDraft, OrderType,
    Strategy, StrategyDraft, SuperStrategy, SuperStrategyDraft,
};

pub const STRATEGY_NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;

const REQUIRED: &str = "Required";
const INVALID_DATE: &str = "Invalid date";

/// Validate the whole working copy
pub fn validate(draft: &FormDraft) -> Result<BacktestingForm, ValidationErrors> {
    let root = FieldPath::root();
    let mut errors = ValidationErrors::new();

    let general = validate_general_settings(&draft.general_settings, &root.field("generalSettings"));
    let data = validate_data_settings(&draft.data_settings, &root.field("dataSettings"));
    let supers = validate_super_strategies(&draft.super_strategies, &root.field("superStrategies"));
    let execution =
        validate_execution_settings(&draft.execution_settings, &root.field("executionSettings"));

    let general = general.map_err(|e| errors.extend(e)).ok();
    let data = data.map_err(|e| errors.extend(e)).ok();
    let supers = supers.map_err(|e| errors.extend(e)).ok();
    let execution = execution.map_err(|e| errors.extend(e)).ok();

    match (general, data, supers, execution) {
        (Some(general_settings), Some(data_settings), Some(super_strategies), Some(execution_settings))
            if errors.is_empty() =>
        {
            Ok(BacktestingForm {
                general_settings,
                data_settings,
                super_strategies,
                execution_settings,
            })
        }
        _ => {
            debug!("Form rejected with {} field error(s)", errors.len());
            Err(errors)
        }
    }
}

pub fn validate_general_settings(
    draft: &GeneralSettingsDraft,
    path: &FieldPath,
) -> Result<GeneralSettings, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name_path = path.field("strategyName");
    if draft.strategy_name.is_empty() {
        errors.push(name_path, "Strategy Name is required");
    } else if char_len(&draft.strategy_name) > STRATEGY_NAME_MAX_LEN {
        errors.push(name_path, "Strategy Name is too long");
    }

    if let Some(description) = &draft.description {
        if char_len(description) > DESCRIPTION_MAX_LEN {
            errors.push(path.field("description"), "Description is too long");
        }
    }

    let start_path = path.field("startDate");
    let end_path = path.field("endDate");
    let start = check_date(draft.start_date.as_deref(), &start_path, &mut errors);
    let end = check_date(draft.end_date.as_deref(), &end_path, &mut errors);

    // Cross-field rule only once both dates are individually valid
    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            errors.push(start_path, "Start Date must be before End Date");
            errors.push(end_path, "End Date must be after Start Date");
        }
    }

    match (start, end) {
        (Some(start_date), Some(end_date)) if errors.is_empty() => Ok(GeneralSettings {
            strategy_name: draft.strategy_name.clone(),
            description: draft.description.clone(),
            start_date,
            end_date,
        }),
        _ => Err(errors),
    }
}

pub fn validate_data_settings(
    draft: &DataSettingsDraft,
    path: &FieldPath,
) -> Result<DataSettings, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    require(
        &draft.asset_selection,
        path.field("assetSelection"),
        "Asset Selection is required",
        &mut errors,
    );

    let frequency = check_choice(
        &draft.data_frequency,
        &path.field("dataFrequency"),
        &DataFrequency::ALL.map(|v| v.as_str()),
        DataFrequency::from_name,
        &mut errors,
    );

    match frequency {
        Some(data_frequency) if errors.is_empty() => Ok(DataSettings {
            asset_selection: draft.asset_selection.clone(),
            data_frequency,
        }),
        _ => Err(errors),
    }
}

pub fn validate_strategy(
    draft: &StrategyDraft,
    path: &FieldPath,
) -> Result<Strategy, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    require(&draft.strategy_type, path.field("type"), "Strategy Type is required", &mut errors);
    require(&draft.parameters, path.field("parameters"), "Parameters are required", &mut errors);

    errors.into_result(Strategy {
        strategy_type: draft.strategy_type.clone(),
        parameters: draft.parameters.clone(),
    })
}

pub fn validate_super_strategy(
    draft: &SuperStrategyDraft,
    path: &FieldPath,
) -> Result<SuperStrategy, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    require(&draft.name, path.field("name"), "Super Strategy Name is required", &mut errors);

    let strategies_path = path.field("strategies");
    if draft.strategies.is_empty() {
        errors.push(strategies_path.clone(), "At least one strategy is required");
    }

    let mut strategies = Vec::with_capacity(draft.strategies.len());
    for (index, strategy) in draft.strategies.iter().enumerate() {
        match validate_strategy(strategy, &strategies_path.index(index)) {
            Ok(valid) => strategies.push(valid),
            Err(e) => errors.extend(e),
        }
    }

    errors.into_result(SuperStrategy {
        name: draft.name.clone(),
        strategies,
    })
}

pub fn validate_super_strategies(
    drafts: &KeyedList<SuperStrategyDraft>,
    path: &FieldPath,
) -> Result<Vec<SuperStrategy>, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if drafts.is_empty() {
        errors.push(path.clone(), "At least one super strategy is required");
    }

    let mut supers = Vec::with_capacity(drafts.len());
    for (index, draft) in drafts.iter().enumerate() {
        match validate_super_strategy(draft, &path.index(index)) {
            Ok(valid) => supers.push(valid),
            Err(e) => errors.extend(e),
        }
    }

    errors.into_result(supers)
}

pub fn validate_execution_settings(
    draft: &ExecutionSettingsDraft,
    path: &FieldPath,
) -> Result<ExecutionSettings, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let order_type = check_choice(
        &draft.order_type,
        &path.field("orderType"),
        &OrderType::ALL.map(|v| v.as_str()),
        OrderType::from_name,
        &mut errors,
    );
    require(&draft.position_size, path.field("positionSize"), "Position Size is required", &mut errors);
    require(&draft.stop_loss, path.field("stopLoss"), "Stop Loss is required", &mut errors);
    require(&draft.take_profit, path.field("takeProfit"), "Take Profit is required", &mut errors);

    match order_type {
        Some(order_type) if errors.is_empty() => Ok(ExecutionSettings {
            order_type,
            position_size: draft.position_size.clone(),
            stop_loss: draft.stop_loss.clone(),
            take_profit: draft.take_profit.clone(),
        }),
        _ => Err(errors),
    }
}

/// Parse a calendar date in `YYYY-MM-DD` form
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

// =============================================================================
// Field checks
// =============================================================================

/// Length in UTF-16 code units, so astral characters count twice
fn char_len(text: &str) -> usize {
    text.encode_utf16().count()
}

fn require(value: &str, path: FieldPath, message: &str, errors: &mut ValidationErrors) {
    if value.is_empty() {
        errors.push(path, message);
    }
}

fn check_date(
    value: Option<&str>,
    path: &FieldPath,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    match value {
        None | Some("") => {
            errors.push(path.clone(), REQUIRED);
            None
        }
        Some(text) => {
            let parsed = parse_date(text);
            if parsed.is_none() {
                errors.push(path.clone(), INVALID_DATE);
            }
            parsed
        }
    }
}

fn check_choice<T>(
    value: &str,
    path: &FieldPath,
    allowed: &[&str],
    from_name: impl Fn(&str) -> Option<T>,
    errors: &mut ValidationErrors,
) -> Option<T> {
    if value.is_empty() {
        errors.push(path.clone(), REQUIRED);
        return None;
    }
    let parsed = from_name(value);
    if parsed.is_none() {
        let expected = allowed
            .iter()
            .map(|v| format!("'{}'", v))
            .collect::<Vec<_>>()
            .join(" | ");
        errors.push(
            path.clone(),
            format!("Invalid enum value. Expected {}, received '{}'", expected, value),
        );
    }
    parsed
}
