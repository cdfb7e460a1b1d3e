//! Errors that can happen when using `bevy_dialog_box`.

use thiserror::Error;

use crate::prelude::NodeId;

/// Errors when driving a [`DialogBox`](crate::prelude::DialogBox).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DialogError {
    /// `DialogBox::select_choice(index)` was called with an index
    /// that does not match any of the choices on screen.
    #[error("choice {index} is out of range, the current node has {count} choices")]
    InvalidChoice {
        /// The 1-based index that was requested.
        index: usize,
        /// How many choices the current node has.
        count: usize,
    },
}

/// Errors when building a [`DialogScript`](crate::prelude::DialogScript)
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScriptError {
    /// The script has no nodes
    #[error("the dialog script is empty")]
    EmptyScript,
    /// A node was declared without text
    #[error("the node {0} has no text")]
    MissingText(NodeId),
    /// A choice has the next field pointing to a non-existent node
    #[error("a choice in node {0} is pointing to {1} which was not found")]
    InvalidNext(NodeId, NodeId),
    /// The start field points to a non-existent node
    #[error("the start node {0} was not found")]
    InvalidStart(NodeId),
}
