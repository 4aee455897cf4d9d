//! # Design Distill
//!
//! `design-distill` turns raw design documents (whole files or node subsets)
//! into a compact tree whose repeated styling lives in a shared variable table.
//!
//! The work is split across the workspace:
//! - `distill-data`: serde model of the raw input.
//! - `distill-core`: tree walker, variable store, vector grouping and pruning.
//! - `distill-cli`: the `distill` command.
//!
//! This crate re-exports both libraries.

pub use distill_core::*;
pub use distill_data::model;

use serde_json::Value;

/// Parses raw JSON text of any nesting depth and simplifies it.
pub fn simplify_str(raw: &str, options: &SimplifyOptions) -> Result<SimplifiedDesign, SimplifyError> {
    let response = model::DesignResponse::from_json_str(raw)?;
    simplify_design(&response, options)
}

/// Parses an already-decoded response and simplifies it in one step.
pub fn simplify_value(raw: Value, options: &SimplifyOptions) -> Result<SimplifiedDesign, SimplifyError> {
    let response: model::DesignResponse = serde_json::from_value(raw)?;
    simplify_design(&response, options)
}
