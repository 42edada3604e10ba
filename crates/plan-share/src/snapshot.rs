//! Field names of the application state snapshot known to the pipeline.
//!
//! Only these fields are ever inspected; everything else in a snapshot is
//! carried through untouched.

use plan_share_util::graph::{Document, Value};

pub const PLAN_NAME: &str = "name";
pub const BASELINE_ASSETS: &str = "baselineAssets";
pub const SCENARIOS: &str = "scenarios";
pub const SELECTED_SCENARIO_IDS: &str = "selectedScenarioIds";
pub const SCENARIO_ID: &str = "id";

pub fn plan_name(doc: &Document) -> Option<&str> {
    doc.get(PLAN_NAME)?.as_str()
}

pub fn scenarios(doc: &Document) -> &[Value] {
    doc.get(SCENARIOS)
        .and_then(|list| doc.graph.as_array(list))
        .unwrap_or(&[])
}

pub fn selected_scenario_ids(doc: &Document) -> &[Value] {
    doc.get(SELECTED_SCENARIO_IDS)
        .and_then(|list| doc.graph.as_array(list))
        .unwrap_or(&[])
}

/// The `id` of the first scenario, unless missing or null.
pub fn first_scenario_id(doc: &Document) -> Option<&Value> {
    let id = doc.graph.get(scenarios(doc).first()?, SCENARIO_ID)?;
    (!matches!(id, Value::Undefined | Value::Null)).then_some(id)
}
