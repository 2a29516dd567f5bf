/// Index mesh feeding the GPU point expansion pipeline.
pub mod point_index_mesh;
