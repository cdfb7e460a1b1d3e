//! Prelude for the `bevy_dialog_box` crate.
pub use super::{DialogBoxPlugin, DialogBoxSet};
pub use super::{
    config::*,
    dialog_box::{CloseCallback, DialogBox, DialogState},
    errors::*,
    events::{DialogChoiceEvent, DialogEndEvent},
    input::{DialogKey, DialogKeyBindings},
    node::*,
    render::{layout, FontHandle, FontProvider, ImageHandle, Renderer},
    reveal::*,
    script::{
        loader::{DialogScriptLoader, ScriptLoaderError},
        DialogScript, NodeId, RawChoice, RawDialogNode, RawDialogScript,
    },
};
