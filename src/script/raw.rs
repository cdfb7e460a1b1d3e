//! The serialized form of a dialog script.

use bevy::{asset::Asset, reflect::TypePath};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::prelude::ChoiceValue;

/// The identifier of a node in a dialog script.
pub type NodeId = String;

/// A dialog script as written in a `.dialog.ron` file.
///
/// Nodes are listed by id and keep the order they are written in. The script starts
/// at `start`, or at the first node when `start` is omitted.
///
/// ```ron
/// #![enable(implicit_some)]
/// (
///     start: "greet",
///     nodes: {
///         "greet": (
///             name: "Bev",
///             text: "Need anything?",
///             choices: [
///                 (text: "Tell me again", next: "greet"),
///                 (text: "No thanks"),
///             ],
///         ),
///     },
/// )
/// ```
#[derive(Asset, TypePath, Debug, Default, Clone, Deserialize)]
pub struct RawDialogScript {
    /// The id of the first node shown.
    #[serde(default)]
    pub start: Option<NodeId>,
    /// The nodes of the script, by id.
    pub nodes: IndexMap<NodeId, RawDialogNode>,
}

impl RawDialogScript {
    /// Reads a script from a RON string.
    pub fn from_ron(source: &str) -> Result<Self, serde_ron::error::SpannedError> {
        serde_ron::from_str(source)
    }
}

/// A node in a [`RawDialogScript`].
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawDialogNode {
    /// The text of the node. Required, a script with a node missing it fails to build.
    #[serde(default)]
    pub text: Option<String>,
    /// The name of who is speaking.
    #[serde(default)]
    pub name: Option<String>,
    /// An identifier for the game to recognize the node by.
    #[serde(default)]
    pub key: Option<String>,
    /// The choices of the node.
    #[serde(default)]
    pub choices: Vec<RawChoice>,
}

/// A choice in a [`RawDialogNode`].
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawChoice {
    /// The text of the choice.
    pub text: String,
    /// An identifier handed to the selection callback and events.
    #[serde(default)]
    pub key: Option<String>,
    /// A payload handed to the selection callback and events.
    #[serde(default)]
    pub value: Option<ChoiceValue>,
    /// The id of the node the choice leads to. The dialog closes when omitted.
    #[serde(default)]
    pub next: Option<NodeId>,
}
