//! Validate command: check a working copy without storing it

use anyhow::{bail, Result};
use backtest_form::schema;
use std::path::PathBuf;
use tracing::info;

use super::read_draft;

pub fn run(input: PathBuf, json: bool) -> Result<()> {
    let draft = read_draft(&input)?;
    info!("Validating {}", input.display());

    match schema::validate(&draft) {
        Ok(form) => {
            info!(
                "Form '{}' is valid",
                form.general_settings.strategy_name
            );
            if json {
                println!("{{}}");
            } else {
                println!("valid");
            }
            Ok(())
        }
        Err(errors) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&errors)?);
            } else {
                for error in &errors {
                    println!("{}", error);
                }
            }
            bail!("{} invalid field(s) in {}", errors.len(), input.display())
        }
    }
}
