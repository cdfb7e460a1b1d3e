//! Dialog nodes and the choices that link them together.
//!
//! A [`DialogNode`] is one screen worth of dialog: the text to reveal, an optional
//! speaker name and the choices offered once the text is fully shown.
//! Nodes are authored by the game and shared as [`Arc<DialogNode>`]; the dialog box
//! never mutates them, it only copies what it needs to present the node.

use std::{fmt, sync::Arc};

/// The payload a [`Choice`] can carry and hand over to its selection callback.
pub type ChoiceValue = serde_ron::Value;

/// A shared function value stored inside dialog data or configuration.
///
/// It is a thin wrapper around an [`Arc`] so that nodes, choices and configs stay
/// cheap to clone and printable with [`Debug`](fmt::Debug).
pub struct Callback<F: ?Sized>(pub(crate) Arc<F>);

impl<F: ?Sized> Clone for Callback<F> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<F: ?Sized> fmt::Debug for Callback<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// Called with the key and value of a choice when the player commits it.
pub type SelectCallback = Callback<dyn Fn(Option<&str>, Option<&ChoiceValue>) + Send + Sync>;

/// Produces the node that follows a choice at the moment the choice is committed.
pub type SuccessorFn = Callback<dyn Fn() -> Option<Arc<DialogNode>> + Send + Sync>;

/// One screen of dialog.
///
/// # Examples
///
/// ```
/// use bevy_dialog_box::prelude::*;
///
/// let bye = DialogNode::new("See you around.");
/// let node = DialogNode::new("Hello there!")
///     .with_name("Bev")
///     .with_choice(Choice::new("Bye").leads_to(bye));
///
/// assert_eq!(node.choices.len(), 1);
/// assert_eq!(node.name.as_deref(), Some("Bev"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DialogNode {
    /// The text revealed letter by letter.
    pub text: String,
    /// The name of who is speaking, if anyone.
    pub name: Option<String>,
    /// An identifier chosen by the author.
    pub key: Option<String>,
    /// The choices offered once the text is fully revealed.
    pub choices: Vec<Choice>,
}

impl DialogNode {
    /// Creates a node with the given text and nothing else.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Sets the speaker name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the author key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Appends a choice.
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Appends several choices, keeping their order.
    pub fn with_choices(mut self, choices: impl IntoIterator<Item = Choice>) -> Self {
        self.choices.extend(choices);
        self
    }
}

/// Where a [`Choice`] leads.
#[derive(Debug, Clone, Default)]
pub enum Successor {
    /// The dialog closes after the choice.
    #[default]
    End,
    /// A fixed node.
    Node(Arc<DialogNode>),
    /// A node computed when the choice is committed. Returning `None` closes the dialog.
    Dynamic(SuccessorFn),
}

impl Successor {
    /// Resolves the node to show next, running the producer if there is one.
    pub fn resolve(&self) -> Option<Arc<DialogNode>> {
        match self {
            Successor::End => None,
            Successor::Node(node) => Some(Arc::clone(node)),
            Successor::Dynamic(producer) => (producer.0)(),
        }
    }
}

/// An option the player can pick on a [`DialogNode`].
#[derive(Debug, Clone, Default)]
pub struct Choice {
    /// The text shown in the choice box.
    pub text: String,
    /// An identifier handed to the selection callback.
    pub key: Option<String>,
    /// A payload handed to the selection callback.
    pub value: Option<ChoiceValue>,
    /// Where the choice leads.
    pub successor: Successor,
    /// Called once when the choice is committed, before the successor is resolved.
    pub on_select: Option<SelectCallback>,
}

impl Choice {
    /// Creates a choice that closes the dialog when picked.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Sets the key passed to the selection callback.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the value passed to the selection callback.
    pub fn with_value(mut self, value: ChoiceValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Makes the choice continue with `node`.
    pub fn leads_to(mut self, node: impl Into<Arc<DialogNode>>) -> Self {
        self.successor = Successor::Node(node.into());
        self
    }

    /// Makes the choice continue with whatever `producer` returns when the choice is committed.
    ///
    /// This is how cycles are written: the producer can hand back a node that is
    /// already on the path, and it will be shown again from the start.
    pub fn leads_to_with(
        mut self,
        producer: impl Fn() -> Option<Arc<DialogNode>> + Send + Sync + 'static,
    ) -> Self {
        self.successor = Successor::Dynamic(Callback(Arc::new(producer)));
        self
    }

    /// Sets the callback run when the choice is committed.
    pub fn on_select(
        mut self,
        callback: impl Fn(Option<&str>, Option<&ChoiceValue>) + Send + Sync + 'static,
    ) -> Self {
        self.on_select = Some(Callback(Arc::new(callback)));
        self
    }

    /// Runs the selection callback, if any.
    pub(crate) fn notify_selected(&self) {
        if let Some(callback) = &self.on_select {
            (callback.0)(self.key.as_deref(), self.value.as_ref());
        }
    }
}
