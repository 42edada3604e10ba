//! Repairs for snapshots written by older versions.

use plan_share_util::graph::{Document, Value};

use crate::snapshot::{first_scenario_id, SELECTED_SCENARIO_IDS};

/// Applies every repair to a freshly loaded snapshot. Returns whether anything
/// changed.
pub fn repair(doc: &mut Document) -> bool {
    default_selected_scenarios(doc)
}

/// Snapshots predating scenario selection lack `selectedScenarioIds`. It
/// defaults to the first scenario's id, or to an empty list.
fn default_selected_scenarios(doc: &mut Document) -> bool {
    let Some(object) = doc.graph.as_object(&doc.root) else {
        return false;
    };
    if !matches!(
        object.get(SELECTED_SCENARIO_IDS),
        None | Some(Value::Undefined | Value::Null)
    ) {
        return false;
    }
    let selected: Vec<Value> = first_scenario_id(doc).cloned().into_iter().collect();
    tracing::debug!(
        selected = selected.len(),
        "Defaulted missing selected scenarios in loaded plan"
    );
    let list = doc.graph.array(selected);
    let root = doc.root.clone();
    doc.graph.set(&root, SELECTED_SCENARIO_IDS, list)
}
