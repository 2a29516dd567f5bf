use bevy::asset::RenderAssetUsages;
use bevy::image::ImageSampler;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::render::view::NoFrustumCulling;
use constants::render_settings::SMALL_POINT;

use crate::engine::assets::point_store::{ColourPoint, PointStore, PointStoreReplaced};
use crate::engine::mesh::point_index_mesh::create_point_index_mesh;
use crate::engine::shaders::ColourPointsShader;

/// Marker for the base cloud entity, replaced wholesale on store swaps.
#[derive(Component)]
pub struct BaseCloud;

/// Position and colour data textures for one set of points, plus the layout
/// the shader needs to index them.
pub struct PackedPointTextures {
    pub position: Handle<Image>,
    pub colour: Handle<Image>,
    pub texture_size: u32,
    pub count: usize,
}

/// Pack derived positions and colours into square RGBA32F textures.
/// Returns `None` for an empty set; callers spawn nothing in that case.
pub fn pack_point_textures(
    points: &[ColourPoint],
    images: &mut Assets<Image>,
) -> Option<PackedPointTextures> {
    if points.is_empty() {
        return None;
    }

    let texture_size = (points.len() as f32).sqrt().ceil() as u32;
    let capacity = (texture_size * texture_size) as usize;

    let mut positions: Vec<[f32; 4]> = Vec::with_capacity(capacity);
    let mut colours: Vec<[f32; 4]> = Vec::with_capacity(capacity);
    for point in points {
        let p = point.position();
        positions.push([p.x, p.y, p.z, 1.0]);
        colours.push([point.rgb.x, point.rgb.y, point.rgb.z, 1.0]);
    }
    positions.resize(capacity, [0.0; 4]);
    colours.resize(capacity, [0.0; 4]);

    Some(PackedPointTextures {
        position: images.add(data_texture(positions, texture_size)),
        colour: images.add(data_texture(colours, texture_size)),
        texture_size,
        count: points.len(),
    })
}

fn data_texture(texels: Vec<[f32; 4]>, size: u32) -> Image {
    let mut image = Image::new(
        Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        bytemuck::cast_slice(&texels).to_vec(),
        TextureFormat::Rgba32Float,
        RenderAssetUsages::RENDER_WORLD,
    );
    image.sampler = ImageSampler::nearest();
    image
}

/// Rebuild the GPU cloud whenever the store contents are swapped.
/// The previous cloud entity is removed first; the cloud is never mutated
/// in place.
pub fn rebuild_point_cloud(
    mut commands: Commands,
    mut replaced: EventReader<PointStoreReplaced>,
    store: Res<PointStore>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColourPointsShader>>,
    mut images: ResMut<Assets<Image>>,
    existing: Query<Entity, With<BaseCloud>>,
) {
    if replaced.is_empty() {
        return;
    }
    replaced.clear();

    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    let Some(packed) = pack_point_textures(store.points(), &mut images) else {
        return;
    };

    let material = ColourPointsShader {
        position_texture: packed.position,
        colour_texture: packed.colour,
        params: ColourPointsShader::params(packed.texture_size, packed.count, SMALL_POINT, None),
    };

    commands.spawn((
        Mesh3d(meshes.add(create_point_index_mesh(packed.count))),
        MeshMaterial3d(materials.add(material)),
        Transform::IDENTITY,
        NoFrustumCulling,
        BaseCloud,
    ));

    info!("Point cloud rebuilt with {} points", packed.count);
}
