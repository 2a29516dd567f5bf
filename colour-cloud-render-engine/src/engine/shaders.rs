use bevy::{
    prelude::*,
    reflect::TypePath,
    render::render_resource::{AsBindGroup, ShaderRef},
};

/// Material for colour-cube point clouds. Positions and colours are fetched
/// from square RGBA32F data textures by point index; the vertex shader
/// expands each point into a screen-aligned quad.
///
/// `params[0]` packs (texture_size, point_count, point_size_px,
/// colour_override_flag); `params[1].xyz` is the override colour used by the
/// highlight layer.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct ColourPointsShader {
    #[texture(0, sample_type = "float", filterable = false)]
    #[sampler(1, sampler_type = "non_filtering")]
    pub position_texture: Handle<Image>,

    #[texture(2, sample_type = "float", filterable = false)]
    #[sampler(3, sampler_type = "non_filtering")]
    pub colour_texture: Handle<Image>,

    #[uniform(4)]
    pub params: [Vec4; 2],
}

impl ColourPointsShader {
    pub fn params(
        texture_size: u32,
        point_count: usize,
        point_size: f32,
        colour_override: Option<[f32; 3]>,
    ) -> [Vec4; 2] {
        let override_colour = colour_override.unwrap_or([0.0, 0.0, 0.0]);
        [
            Vec4::new(
                texture_size as f32,
                point_count as f32,
                point_size,
                if colour_override.is_some() { 1.0 } else { 0.0 },
            ),
            Vec4::new(
                override_colour[0],
                override_colour[1],
                override_colour[2],
                0.0,
            ),
        ]
    }
}

impl Material for ColourPointsShader {
    fn vertex_shader() -> ShaderRef {
        "shaders/colour_points.wgsl".into()
    }

    fn fragment_shader() -> ShaderRef {
        "shaders/colour_points.wgsl".into()
    }
}
