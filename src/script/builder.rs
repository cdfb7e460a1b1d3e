//! Turns a [`RawDialogScript`] into linked [`DialogNode`]s.

use std::sync::{Arc, Weak};

use bevy::log::{info, warn};
use indexmap::IndexMap;

use crate::prelude::{
    Callback, Choice, DialogNode, NodeId, RawChoice, RawDialogNode, RawDialogScript,
    ScriptError, SelectCallback, Successor,
};

use super::{DialogScript, NodeTable};

/// Builds a [`DialogScript`] from a [`RawDialogScript`].
///
/// This function performs two passes over the raw script: a validation pass and a link pass.
/// In the validation pass, it checks that the script is not empty, that every node has text,
/// that every `next` field points to an existing node and that the start node exists.
/// In the link pass, it creates one [`DialogNode`] per raw node, in order, and links each
/// choice to the node named by its `next` field.
///
/// Links are looked up through a weak reference to the node table when a choice is
/// committed, so scripts may loop back on themselves without keeping themselves alive.
///
/// # Errors
///
/// Returns a [`ScriptError`] describing the first problem found by the validation pass.
pub(crate) fn build(
    raw: &RawDialogScript,
    on_select: Option<SelectCallback>,
) -> Result<DialogScript, ScriptError> {
    // # Validation Pass
    if raw.nodes.is_empty() {
        return Err(ScriptError::EmptyScript);
    }
    validate_texts(&raw.nodes)?;
    validate_all_nexts(&raw.nodes)?;
    let start_id = resolve_start(raw)?;

    // # Link Pass
    let nodes: Arc<NodeTable> = Arc::new_cyclic(|table| {
        raw.nodes
            .iter()
            .map(|(id, node)| {
                let linked = link_node(node, table, on_select.as_ref());
                (id.clone(), Arc::new(linked))
            })
            .collect::<IndexMap<_, _>>()
    });

    let start = nodes
        .get(&start_id)
        .cloned()
        .ok_or_else(|| ScriptError::InvalidStart(start_id.clone()))?;

    info!(
        "Built dialog script with {} nodes starting at {}",
        nodes.len(),
        start_id
    );

    Ok(DialogScript {
        nodes,
        start_id,
        start,
    })
}

/// Every node must have text.
fn validate_texts(nodes: &IndexMap<NodeId, RawDialogNode>) -> Result<(), ScriptError> {
    match nodes.iter().find(|(_, node)| node.text.is_none()) {
        Some((id, _)) => Err(ScriptError::MissingText(id.clone())),
        None => Ok(()),
    }
}

/// Every `next` must point to an existing node.
fn validate_all_nexts(nodes: &IndexMap<NodeId, RawDialogNode>) -> Result<(), ScriptError> {
    for (id, node) in nodes {
        for next in node.choices.iter().filter_map(|choice| choice.next.as_ref()) {
            if !nodes.contains_key(next) {
                return Err(ScriptError::InvalidNext(id.clone(), next.clone()));
            }
        }
    }
    Ok(())
}

/// The id of the start node: the declared one if it exists, the first node otherwise.
fn resolve_start(raw: &RawDialogScript) -> Result<NodeId, ScriptError> {
    match &raw.start {
        Some(start) if raw.nodes.contains_key(start) => Ok(start.clone()),
        Some(start) => Err(ScriptError::InvalidStart(start.clone())),
        None => raw
            .nodes
            .keys()
            .next()
            .cloned()
            .ok_or(ScriptError::EmptyScript),
    }
}

/// Creates the [`DialogNode`] for a raw node.
fn link_node(
    raw: &RawDialogNode,
    table: &Weak<NodeTable>,
    on_select: Option<&SelectCallback>,
) -> DialogNode {
    DialogNode {
        text: raw.text.clone().unwrap_or_default(),
        name: raw.name.clone(),
        key: raw.key.clone(),
        choices: raw
            .choices
            .iter()
            .map(|choice| link_choice(choice, table, on_select))
            .collect(),
    }
}

/// Creates the [`Choice`] for a raw choice, resolving `next` lazily through `table`.
fn link_choice(
    raw: &RawChoice,
    table: &Weak<NodeTable>,
    on_select: Option<&SelectCallback>,
) -> Choice {
    let successor = match &raw.next {
        Some(next) => {
            let table = Weak::clone(table);
            let next = next.clone();
            Successor::Dynamic(Callback(Arc::new(move || follow_link(&table, &next))))
        }
        None => Successor::End,
    };

    Choice {
        text: raw.text.clone(),
        key: raw.key.clone(),
        value: raw.value.clone(),
        successor,
        on_select: on_select.cloned(),
    }
}

/// The node `next` in `table`, or `None` when the script was dropped.
fn follow_link(table: &Weak<NodeTable>, next: &str) -> Option<Arc<DialogNode>> {
    let Some(nodes) = table.upgrade() else {
        warn!(
            "Choice leads to {} but its dialog script was dropped, closing the dialog",
            next
        );
        return None;
    };
    nodes.get(next).cloned()
}
