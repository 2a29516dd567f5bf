use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::view::NoFrustumCulling;
use bevy::window::PrimaryWindow;
use constants::render_settings::{LARGE_POINT, SELECTED_COLOUR};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use super::SelectionTool;
use super::mask::{BlendMode, composite_selection_mask};
use super::projector::screen_to_overlay;
use super::state::{SelectionFields, SelectionMode, SelectionObserver, StateChange};
use crate::engine::assets::source_image::SourceImage;
use crate::engine::camera::orbit_camera::OrbitCamera;
use crate::engine::mesh::point_index_mesh::create_point_index_mesh;
use crate::engine::scene::image_panel::panel_texture;
use crate::engine::scene::point_cloud::pack_point_textures;
use crate::engine::shaders::ColourPointsShader;

/// Observer that records state changes for the effect system. Shared between
/// the state machine (producer) and `apply_selection_effects` (consumer);
/// observers fire synchronously on every write, the recorded effects are
/// applied later in the same frame by the chained effect system.
#[derive(Resource, Clone, Default)]
pub struct ChangeJournal(Arc<Mutex<Vec<StateChange>>>);

impl ChangeJournal {
    pub fn drain(&self) -> Vec<StateChange> {
        self.0
            .lock()
            .map(|mut changes| std::mem::take(&mut *changes))
            .unwrap_or_default()
    }
}

impl SelectionObserver for ChangeJournal {
    fn on_change(&mut self, change: StateChange, _fields: &SelectionFields) {
        if let Ok(mut changes) = self.0.lock() {
            changes.push(change);
        }
    }
}

/// Marker for the on-screen gesture outline entity.
#[derive(Component)]
pub struct SelectionOutline;

/// Marker for the 3D highlight layer built from the selected set.
#[derive(Component)]
pub struct HighlightLayer;

/// Mode carried by a UI button in the selection control row.
#[derive(Component)]
pub struct ModeButton(pub SelectionMode);

const BUTTON_IDLE: Color = Color::srgb(0.22, 0.22, 0.22);
const BUTTON_ACTIVE: Color = Color::srgb(0.45, 0.45, 0.12);

fn button_colour(active: bool) -> Color {
    if active { BUTTON_ACTIVE } else { BUTTON_IDLE }
}

/// Spawn the selection control row and key hints.
pub fn spawn_selection_ui(mut commands: Commands) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(6.0),
            ..default()
        })
        .with_children(|parent| {
            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    column_gap: Val::Px(6.0),
                    ..default()
                })
                .with_children(|row| {
                    for (mode, label) in [
                        (SelectionMode::Replace, "replace"),
                        (SelectionMode::Add, "add"),
                        (SelectionMode::Subtract, "subtract"),
                    ] {
                        row.spawn((
                            Button,
                            ModeButton(mode),
                            BackgroundColor(button_colour(mode == SelectionMode::default())),
                            Node {
                                padding: UiRect::axes(Val::Px(8.0), Val::Px(4.0)),
                                ..default()
                            },
                        ))
                        .with_children(|button| {
                            button.spawn((
                                Text::new(label),
                                TextFont {
                                    font_size: 14.0,
                                    ..default()
                                },
                                TextColor(Color::WHITE),
                            ));
                        });
                    }
                });

            parent.spawn((
                Text::new(
                    "shift+drag: select | 1/2/3: mode | B: box/lasso | E: expand | M: blend | esc: clear",
                ),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(Color::srgb(0.7, 0.7, 0.7)),
            ));
        });
}

/// Apply the view effects recorded since the last frame: outline redraw,
/// camera lock, control affordances, highlight layer, and image mask.
pub fn apply_selection_effects(
    mut commands: Commands,
    journal: Res<ChangeJournal>,
    tool: Res<SelectionTool>,
    mut orbit: ResMut<OrbitCamera>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut colour_materials: ResMut<Assets<ColorMaterial>>,
    mut point_materials: ResMut<Assets<ColourPointsShader>>,
    mut images: ResMut<Assets<Image>>,
    source: Res<SourceImage>,
    outlines: Query<Entity, With<SelectionOutline>>,
    highlights: Query<Entity, With<HighlightLayer>>,
    mut mode_buttons: Query<(&ModeButton, &mut BackgroundColor)>,
) {
    let changes = journal.drain();
    if changes.is_empty() {
        return;
    }

    let fields = tool.state.fields();

    let mut gesture_changed = false;
    let mut mode_changed = false;
    let mut selection_changed = false;
    let mut mask_changed = false;
    for change in changes {
        match change {
            // Selection owns the pointer while enabled; the orbit camera
            // must not fight it for drag input.
            StateChange::Enabled => orbit.enabled = !fields.enabled,
            StateChange::Gesture => gesture_changed = true,
            StateChange::Mode | StateChange::Expand => mode_changed = true,
            StateChange::Selected => {
                selection_changed = true;
                mask_changed = true;
            }
            StateChange::BlendMultiply => mask_changed = true,
        }
    }

    if gesture_changed {
        redraw_outline(
            &mut commands,
            fields,
            &windows,
            &mut meshes,
            &mut colour_materials,
            &outlines,
        );
    }

    if mode_changed {
        for (button, mut background) in mode_buttons.iter_mut() {
            *background = BackgroundColor(button_colour(button.0 == fields.mode));
        }
    }

    if selection_changed {
        rebuild_highlight(
            &mut commands,
            fields,
            &mut meshes,
            &mut point_materials,
            &mut images,
            &highlights,
        );
    }

    if mask_changed && source.is_loaded() {
        let selected: HashSet<(u32, u32)> =
            fields.selected.iter().map(|p| (p.xy.x, p.xy.y)).collect();
        let bytes = composite_selection_mask(
            &source.rgba,
            source.width,
            source.height,
            &selected,
            BlendMode::from_multiply_flag(fields.blend_multiply),
        );
        images.insert(
            &source.handle,
            panel_texture(source.width, source.height, bytes),
        );
    }
}

/// Replace the screen-space outline with one drawn from the current gesture,
/// or clear it when no gesture exists.
fn redraw_outline(
    commands: &mut Commands,
    fields: &SelectionFields,
    windows: &Query<&Window, With<PrimaryWindow>>,
    meshes: &mut ResMut<Assets<Mesh>>,
    colour_materials: &mut ResMut<Assets<ColorMaterial>>,
    outlines: &Query<Entity, With<SelectionOutline>>,
) {
    for entity in outlines.iter() {
        commands.entity(entity).despawn();
    }

    let Some(gesture) = &fields.gesture else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };

    let vertices = gesture.outline();
    if vertices.len() < 2 {
        return;
    }

    let viewport = Vec2::new(window.width(), window.height());
    let mut positions: Vec<[f32; 3]> = vertices
        .iter()
        .map(|v| {
            let overlay = screen_to_overlay(viewport, *v);
            [overlay.x, overlay.y, 0.0]
        })
        .collect();
    positions.push(positions[0]); // close the loop

    let mut mesh = Mesh::new(PrimitiveTopology::LineStrip, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);

    commands.spawn((
        Mesh2d(meshes.add(mesh)),
        MeshMaterial2d(colour_materials.add(ColorMaterial::from(Color::WHITE))),
        Transform::IDENTITY,
        SelectionOutline,
    ));
}

/// Replace the highlight layer with a large white cloud of the selected
/// points' derived positions, or clear it when nothing is selected.
fn rebuild_highlight(
    commands: &mut Commands,
    fields: &SelectionFields,
    meshes: &mut ResMut<Assets<Mesh>>,
    point_materials: &mut ResMut<Assets<ColourPointsShader>>,
    images: &mut ResMut<Assets<Image>>,
    highlights: &Query<Entity, With<HighlightLayer>>,
) {
    for entity in highlights.iter() {
        commands.entity(entity).despawn();
    }

    if fields.selected.is_empty() {
        return;
    }

    let Some(packed) = pack_point_textures(&fields.selected, images) else {
        return;
    };

    let material = ColourPointsShader {
        position_texture: packed.position,
        colour_texture: packed.colour,
        params: ColourPointsShader::params(
            packed.texture_size,
            packed.count,
            LARGE_POINT,
            Some(SELECTED_COLOUR),
        ),
    };

    commands.spawn((
        Mesh3d(meshes.add(create_point_index_mesh(packed.count))),
        MeshMaterial3d(point_materials.add(material)),
        Transform::IDENTITY,
        NoFrustumCulling,
        HighlightLayer,
    ));
}
