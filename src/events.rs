//! Events the plugin emits.
use bevy::prelude::*;

use crate::prelude::{ChoiceValue, DialogBox};

/// Sent when the dialog of a dialog box ends.
/// Contains the entity holding the [`DialogBox`].
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct DialogEndEvent(pub Entity);

/// Sent when the player commits a choice.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DialogChoiceEvent {
    /// The entity holding the [`DialogBox`].
    pub dialog: Entity,
    /// The 1-based index of the choice.
    pub index: usize,
    /// The key of the choice.
    pub key: Option<String>,
    /// The value of the choice.
    pub value: Option<ChoiceValue>,
}

/// Turns what happened in the dialog boxes this frame into events.
pub(crate) fn emit_dialog_events(
    mut boxes: Query<(Entity, &mut DialogBox)>,
    mut choices: EventWriter<DialogChoiceEvent>,
    mut ends: EventWriter<DialogEndEvent>,
) {
    for (entity, mut dialog) in &mut boxes {
        if !dialog.has_news() {
            continue;
        }
        for committed in dialog.take_committed() {
            choices.send(DialogChoiceEvent {
                dialog: entity,
                index: committed.index,
                key: committed.key,
                value: committed.value,
            });
        }
        for _ in 0..dialog.take_ended() {
            ends.send(DialogEndEvent(entity));
        }
    }
}
