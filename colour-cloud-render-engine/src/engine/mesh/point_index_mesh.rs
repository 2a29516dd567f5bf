use bevy::prelude::*;
use bevy::{render::mesh::PrimitiveTopology, render::render_asset::RenderAssetUsages};

/// Create an index mesh for GPU-side vertex expansion.
/// Six vertices per point form two triangles; the vertex shader derives the
/// point index and quad corner from the vertex index and fetches position
/// and colour from the data textures.
pub fn create_point_index_mesh(point_count: usize) -> Mesh {
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );

    let vertex_count = point_count * 6;
    let indices: Vec<[f32; 3]> = (0..vertex_count).map(|i| [i as f32, 0.0, 0.0]).collect();

    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, indices);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_vertices_per_point() {
        let mesh = create_point_index_mesh(42);
        assert_eq!(mesh.count_vertices(), 42 * 6);
    }
}
