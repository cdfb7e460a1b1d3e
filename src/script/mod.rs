//! Dialog scripts: dialog trees written as data.
//!
//! A [`RawDialogScript`] is what a `.dialog.ron` file contains. [`DialogScript::build`]
//! validates it and links its nodes into [`DialogNode`]s a
//! [`DialogBox`](crate::prelude::DialogBox) can show.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::prelude::{Callback, ChoiceValue, DialogNode, ScriptError};

pub mod builder;
pub mod loader;
pub mod raw;

pub use raw::{NodeId, RawChoice, RawDialogNode, RawDialogScript};

/// The linked nodes of a script, by id.
pub(crate) type NodeTable = IndexMap<NodeId, Arc<DialogNode>>;

/// A validated dialog script with its nodes linked together.
///
/// Choices find their successor through the script when they are committed, so the
/// script has to outlive the dialogs using it. [`DialogBox::start_script`] takes
/// care of that; nodes taken out of a dropped script end the dialog instead of
/// moving on.
///
/// [`DialogBox::start_script`]: crate::prelude::DialogBox::start_script
///
/// # Examples
///
/// ```
/// use bevy_dialog_box::prelude::*;
///
/// let raw = RawDialogScript::from_ron(r#"
///     #![enable(implicit_some)]
///     (nodes: {
///         "ask": (text: "Again?", choices: [(text: "Yes", next: "ask"), (text: "No")]),
///     })
/// "#).unwrap();
/// let script = DialogScript::build(&raw).unwrap();
///
/// let mut dialog = DialogBox::default();
/// dialog.start_script(&script);
/// dialog.skip_reveal();
/// dialog.on_key(DialogKey::Confirm);
/// assert_eq!(dialog.visible_text(), "");
/// assert_eq!(dialog.current_node().unwrap().text, "Again?");
/// ```
#[derive(Debug, Clone)]
pub struct DialogScript {
    /// Every node, in declaration order.
    pub(crate) nodes: Arc<NodeTable>,
    /// The id of the start node.
    pub(crate) start_id: NodeId,
    /// The start node.
    pub(crate) start: Arc<DialogNode>,
}

impl DialogScript {
    /// Validates and links a raw script. See [`builder::build`] for the checks made.
    pub fn build(raw: &RawDialogScript) -> Result<DialogScript, ScriptError> {
        builder::build(raw, None)
    }

    /// Same as [`DialogScript::build`], additionally calling `on_select` with the key and
    /// value of every choice committed in this script.
    pub fn build_with_select(
        raw: &RawDialogScript,
        on_select: impl Fn(Option<&str>, Option<&ChoiceValue>) + Send + Sync + 'static,
    ) -> Result<DialogScript, ScriptError> {
        builder::build(raw, Some(Callback(Arc::new(on_select))))
    }

    /// The node the script starts at.
    pub fn start_node(&self) -> Arc<DialogNode> {
        Arc::clone(&self.start)
    }

    /// The id of the node the script starts at.
    pub fn start_id(&self) -> &str {
        &self.start_id
    }

    /// The node with the given id.
    pub fn node(&self, id: &str) -> Option<Arc<DialogNode>> {
        self.nodes.get(id).cloned()
    }

    /// Every node with its id, in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = (&NodeId, &Arc<DialogNode>)> {
        self.nodes.iter()
    }
}
