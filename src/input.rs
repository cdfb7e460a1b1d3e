//! Player input understood by dialog boxes, and the systems feeding it from Bevy.

use bevy::{
    input::{keyboard::KeyCode, mouse::MouseButton, Input},
    math::Vec2,
    prelude::*,
    window::CursorMoved,
};

use crate::prelude::DialogBox;

/// The keys a dialog box reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogKey {
    /// Reveal the whole text, commit the highlighted choice or dismiss.
    Confirm,
    /// Highlight the previous choice.
    Up,
    /// Highlight the next choice.
    Down,
    /// Close the dialog.
    Cancel,
}

/// Which keyboard keys map to which [`DialogKey`].
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct DialogKeyBindings {
    /// Keys that confirm.
    pub confirm: Vec<KeyCode>,
    /// Keys that move the highlight up.
    pub up: Vec<KeyCode>,
    /// Keys that move the highlight down.
    pub down: Vec<KeyCode>,
    /// Keys that close the dialog.
    pub cancel: Vec<KeyCode>,
}

impl Default for DialogKeyBindings {
    fn default() -> Self {
        Self {
            confirm: vec![KeyCode::Return, KeyCode::Space],
            up: vec![KeyCode::Up],
            down: vec![KeyCode::Down],
            cancel: vec![KeyCode::Escape],
        }
    }
}

impl DialogKeyBindings {
    /// The dialog key bound to `key`, if any.
    pub fn resolve(&self, key: KeyCode) -> Option<DialogKey> {
        [
            (&self.confirm, DialogKey::Confirm),
            (&self.up, DialogKey::Up),
            (&self.down, DialogKey::Down),
            (&self.cancel, DialogKey::Cancel),
        ]
        .into_iter()
        .find(|(keys, _)| keys.contains(&key))
        .map(|(_, dialog_key)| dialog_key)
    }
}

/// Advances the reveal of every active dialog box.
pub(crate) fn tick_dialog_boxes(time: Res<Time>, mut boxes: Query<&mut DialogBox>) {
    let delta = time.delta_seconds();
    for mut dialog in &mut boxes {
        if dialog.is_active() {
            dialog.update(delta);
        }
    }
}

/// Sends the keys pressed this frame to every active dialog box.
pub(crate) fn forward_keyboard(
    keys: Res<Input<KeyCode>>,
    bindings: Res<DialogKeyBindings>,
    mut boxes: Query<&mut DialogBox>,
) {
    for key in keys.get_just_pressed() {
        let Some(dialog_key) = bindings.resolve(*key) else {
            continue;
        };
        for mut dialog in &mut boxes {
            if dialog.is_active() {
                dialog.on_key(dialog_key);
            }
        }
    }
}

/// Sends cursor moves and the mouse buttons pressed this frame to every active dialog box.
///
/// Clicks before the first cursor move carry no position and can't pick a choice.
pub(crate) fn forward_pointer(
    mut moves: EventReader<CursorMoved>,
    buttons: Res<Input<MouseButton>>,
    mut cursor: Local<Option<Vec2>>,
    mut boxes: Query<&mut DialogBox>,
) {
    for moved in moves.read() {
        *cursor = Some(moved.position);
        for mut dialog in &mut boxes {
            if dialog.is_active() {
                dialog.on_pointer_move(moved.position);
            }
        }
    }

    for button in buttons.get_just_pressed() {
        for mut dialog in &mut boxes {
            if dialog.is_active() {
                dialog.click(*cursor, *button);
            }
        }
    }
}
