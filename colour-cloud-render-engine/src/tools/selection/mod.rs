//! Interactive lasso/box selection over the live point store.
//!
//! The reactive `SelectionState` record is the single source of truth:
//! input systems call its typed setters, each setter synchronously notifies
//! the registered observers, and the chained effect system turns the
//! recorded changes into scene updates (outline, highlight layer, image
//! mask, control affordances) within the same frame.

/// Gesture containment tests in NDC space and same-colour expansion.
pub mod geometry;

/// Keyboard, pointer, and UI-button input driving the state machine.
pub mod input;

/// Mask compositing over the source image.
pub mod mask;

/// Live-camera world/screen to NDC projection helpers.
pub mod projector;

/// The reactive selection record, gestures, and observer contract.
pub mod state;

/// Change journal and the systems applying view effects.
pub mod view_sync;

use bevy::prelude::*;

use state::{GestureKind, SelectionState};
use view_sync::ChangeJournal;

/// The selection tool: reactive state plus the gesture shape the next
/// pointer-down starts.
#[derive(Resource)]
pub struct SelectionTool {
    pub state: SelectionState,
    pub kind: GestureKind,
}

pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        let journal = ChangeJournal::default();
        let mut state = SelectionState::default();
        state.observe(Box::new(journal.clone()));

        app.insert_resource(SelectionTool {
            state,
            kind: GestureKind::default(),
        })
        .insert_resource(journal)
        .add_systems(Startup, view_sync::spawn_selection_ui)
        .add_systems(
            Update,
            (
                input::mode_button_system,
                input::selection_input_system,
                view_sync::apply_selection_effects,
            )
                .chain(),
        );
    }
}
