use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::SelectionTool;
use super::geometry::{expand_same_colour, select};
use super::projector;
use super::state::{GestureKind, SelectionExpand, SelectionMode};
use super::view_sync::ModeButton;
use crate::engine::assets::point_store::{PointStore, PointStoreReplaced};
use crate::engine::camera::orbit_camera::OrbitCamera;

/// Mode buttons in the UI row. The button for the active mode is effectively
/// disabled: pressing it is ignored.
pub fn mode_button_system(
    mut tool: ResMut<SelectionTool>,
    interactions: Query<(&Interaction, &ModeButton), Changed<Interaction>>,
) {
    for (interaction, button) in interactions.iter() {
        if *interaction == Interaction::Pressed && tool.state.fields().mode != button.0 {
            tool.state.set_mode(button.0);
        }
    }
}

/// Keyboard and pointer input driving the selection state machine.
///
/// Hold Shift to enter selection mode (orbit controls lock), drag with the
/// left mouse button to draw a gesture, release the button or Shift to
/// finalize it. Escape leaves selection mode, or clears the selection when
/// already idle. Enter resets the camera framing without touching the
/// selection. Digits 1/2/3 pick replace/add/subtract, B toggles box/lasso,
/// E toggles same-colour expansion, M toggles multiply blending.
pub fn selection_input_system(
    mut tool: ResMut<SelectionTool>,
    mut orbit: ResMut<OrbitCamera>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut cursor_moved: EventReader<CursorMoved>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    store: Res<PointStore>,
    mut replaced: EventReader<PointStoreReplaced>,
) {
    // A store swap invalidates point identities; any selection goes with it.
    if !replaced.is_empty() {
        replaced.clear();
        tool.state.clear_selected();
    }

    let Ok(window) = windows.single() else {
        return;
    };

    if keyboard.just_pressed(KeyCode::ShiftLeft) || keyboard.just_pressed(KeyCode::ShiftRight) {
        tool.state.set_enabled(true);
    }

    for (key, mode) in [
        (KeyCode::Digit1, SelectionMode::Replace),
        (KeyCode::Digit2, SelectionMode::Add),
        (KeyCode::Digit3, SelectionMode::Subtract),
    ] {
        if keyboard.just_pressed(key) {
            tool.state.set_mode(mode);
        }
    }

    if keyboard.just_pressed(KeyCode::KeyB) {
        tool.kind = match tool.kind {
            GestureKind::Box => GestureKind::Lasso,
            GestureKind::Lasso => GestureKind::Box,
        };
        info!("Gesture kind: {:?}", tool.kind);
    }

    if keyboard.just_pressed(KeyCode::KeyE) {
        let next = match tool.state.fields().expand {
            SelectionExpand::None => SelectionExpand::SameColour,
            SelectionExpand::SameColour => SelectionExpand::None,
        };
        tool.state.set_expand(next);
        info!("Selection expand: {:?}", next);
    }

    if keyboard.just_pressed(KeyCode::KeyM) {
        let next = !tool.state.fields().blend_multiply;
        tool.state.set_blend_multiply(next);
    }

    if keyboard.just_pressed(KeyCode::Enter) {
        orbit.reset();
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        if tool.state.fields().enabled {
            tool.state.set_enabled(false);
        } else {
            tool.state.clear_selected();
        }
    }

    if tool.state.fields().enabled {
        if mouse_button.just_pressed(MouseButton::Left) {
            if let Some(cursor) = window.cursor_position() {
                let kind = tool.kind;
                tool.state.begin_gesture(kind, cursor);
            }
        }

        for moved in cursor_moved.read() {
            tool.state.extend_gesture(moved.position);
        }

        if mouse_button.just_released(MouseButton::Left) {
            finalize_gesture(&mut tool, window, &cameras, &store);
        }
    } else {
        cursor_moved.clear();
    }

    // Releasing Shift finalizes any gesture still in flight, then leaves
    // selection mode.
    if keyboard.just_released(KeyCode::ShiftLeft) || keyboard.just_released(KeyCode::ShiftRight) {
        finalize_gesture(&mut tool, window, &cameras, &store);
        tool.state.set_enabled(false);
    }
}

/// Run the geometry over the live camera and store, combine per the active
/// mode, then drop the gesture. Runs synchronously to completion; the whole
/// scan happens within this input handler.
fn finalize_gesture(
    tool: &mut SelectionTool,
    window: &Window,
    cameras: &Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    store: &PointStore,
) {
    let Some(gesture) = tool.state.fields().gesture.clone() else {
        return;
    };
    let Ok((camera_transform, camera)) = cameras.single() else {
        return;
    };

    let viewport = Vec2::new(window.width(), window.height());
    let clip_from_world = projector::clip_from_world(camera, camera_transform);

    let mut candidates = select(&gesture, viewport, &clip_from_world, store.points());
    if tool.state.fields().expand == SelectionExpand::SameColour {
        candidates = expand_same_colour(candidates, store.points());
    }

    tool.state.apply_candidates(candidates);
    tool.state.clear_gesture();
}
