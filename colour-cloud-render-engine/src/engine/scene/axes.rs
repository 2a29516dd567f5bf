use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use constants::render_settings::CUBE_SIDE;

/// The twelve edges of the unit cube, in normalized corner coordinates.
/// Vertex colours equal the corner coordinates, so each axis fades through
/// the colours it spans.
const CUBE_EDGES: [([f32; 3], [f32; 3]); 12] = [
    ([0., 0., 0.], [1., 0., 0.]),
    ([0., 0., 0.], [0., 1., 0.]),
    ([0., 0., 0.], [0., 0., 1.]),
    ([1., 1., 1.], [0., 1., 1.]),
    ([1., 1., 1.], [1., 0., 1.]),
    ([1., 1., 1.], [1., 1., 0.]),
    ([0., 0., 1.], [1., 0., 1.]),
    ([1., 0., 1.], [1., 0., 0.]),
    ([1., 0., 0.], [1., 1., 0.]),
    ([1., 1., 0.], [0., 1., 0.]),
    ([0., 1., 0.], [0., 1., 1.]),
    ([0., 1., 1.], [0., 0., 1.]),
];

#[derive(Component)]
pub struct CubeAxes;

/// Spawn the cube wireframe as a single vertex-coloured line-list mesh.
pub fn spawn_axes(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
) {
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(CUBE_EDGES.len() * 2);
    let mut colours: Vec<[f32; 4]> = Vec::with_capacity(CUBE_EDGES.len() * 2);

    for (from, to) in CUBE_EDGES {
        for corner in [from, to] {
            positions.push([
                corner[0] * CUBE_SIDE - CUBE_SIDE / 2.0,
                corner[1] * CUBE_SIDE - CUBE_SIDE / 2.0,
                corner[2] * CUBE_SIDE - CUBE_SIDE / 2.0,
            ]);
            colours.push([corner[0], corner[1], corner[2], 1.0]);
        }
    }

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colours);

    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            unlit: true,
            ..default()
        })),
        Transform::IDENTITY,
        CubeAxes,
    ));
}
