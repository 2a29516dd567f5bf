use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use constants::render_settings::IMAGE_WIDTH;

use crate::engine::assets::source_image::SourceImage;

/// Half-scale display width of the panel, in logical pixels.
const PANEL_WIDTH: f32 = IMAGE_WIDTH as f32 * 0.5;

#[derive(Component)]
pub struct ImagePanel;

/// Spawn the (initially hidden) source-image panel in the lower-left corner
/// and allocate the texture it displays.
pub fn spawn_image_panel(
    commands: &mut Commands,
    images: &mut ResMut<Assets<Image>>,
    source: &mut ResMut<SourceImage>,
) {
    let handle = images.add(blank_panel_texture());
    source.handle = handle.clone();

    commands.spawn((
        ImageNode::new(handle),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            bottom: Val::Px(12.0),
            width: Val::Px(PANEL_WIDTH),
            ..default()
        },
        Visibility::Hidden,
        ImagePanel,
    ));
}

/// Reveal and resize the panel once an image has been relayed in.
pub fn show_image_panel(
    source: Res<SourceImage>,
    mut panels: Query<(&mut Node, &mut Visibility), With<ImagePanel>>,
) {
    if !source.is_changed() || !source.is_loaded() {
        return;
    }

    for (mut node, mut visibility) in panels.iter_mut() {
        node.width = Val::Px(PANEL_WIDTH);
        node.height = Val::Px(PANEL_WIDTH * source.height as f32 / source.width as f32);
        *visibility = Visibility::Visible;
    }
}

/// Build the panel texture for the given RGBA8 bytes.
pub fn panel_texture(width: u32, height: u32, rgba: Vec<u8>) -> Image {
    Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        rgba,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

fn blank_panel_texture() -> Image {
    panel_texture(1, 1, vec![0, 0, 0, 0])
}
