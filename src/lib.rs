#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]
#![forbid(unsafe_code)]
#![warn(clippy::doc_markdown)]
// Often exceeded by queries
#![allow(clippy::type_complexity)]
// Unhelpful for systems
#![allow(clippy::too_many_arguments)]

//! [`bevy_dialog_box`] is a Bevy plugin that provides a dialog box
//! for games: text revealed letter by letter, the name of who is speaking
//! and branching choices.
//!
//! The [`DialogBox`](prelude::DialogBox) component does the work and can be used
//! on its own. The [`DialogBoxPlugin`] drives every `DialogBox` entity from Bevy
//! time and input and reports what happened with events. Drawing is left to the
//! game through the [`Renderer`](prelude::Renderer) trait.

use bevy::{
    input::{keyboard::KeyCode, mouse::MouseButton, Input},
    prelude::*,
    window::CursorMoved,
};
use prelude::{DialogChoiceEvent, DialogEndEvent, DialogKeyBindings, DialogScriptLoader, RawDialogScript};

pub mod config;
pub mod dialog_box;
pub mod errors;
pub mod events;
pub mod input;
pub mod node;
pub mod prelude;
pub mod render;
pub mod reveal;
pub mod script;

/// The plugin that drives dialog boxes from Bevy time and input.
pub struct DialogBoxPlugin;

/// The systems of the [`DialogBoxPlugin`], run in [`Update`].
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DialogBoxSet;

impl Plugin for DialogBoxPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogKeyBindings>()
            .init_resource::<Input<KeyCode>>()
            .init_resource::<Input<MouseButton>>()
            .add_event::<CursorMoved>()
            .add_event::<DialogEndEvent>()
            .add_event::<DialogChoiceEvent>()
            .init_asset::<RawDialogScript>()
            .init_asset_loader::<DialogScriptLoader>()
            .add_systems(
                Update,
                (
                    input::tick_dialog_boxes,
                    input::forward_keyboard,
                    input::forward_pointer,
                    events::emit_dialog_events,
                )
                    .chain()
                    .in_set(DialogBoxSet),
            );
        info!("Registered dialog box systems");
    }
}
