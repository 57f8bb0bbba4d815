//! GPU data layouts for the particle background (must match particles.wgsl)

use bytemuck::{Pod, Zeroable};

use crate::background::{BackgroundScene, ParticleField};

/// One point of the cloud, drawn as an instanced billboard
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PointInstance {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl PointInstance {
    pub fn from_field(field: &ParticleField) -> Vec<Self> {
        field
            .positions
            .iter()
            .zip(&field.colors)
            .map(|(p, c)| Self {
                position: p.to_array(),
                color: c.to_array(),
            })
            .collect()
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Per-frame scene uniforms
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    pub proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// xyz = position, w = range
    pub light_pos: [f32; 4],
    /// rgb = color, w = intensity
    pub light_color: [f32; 4],
    /// rgb = color, w = intensity
    pub ambient: [f32; 4],
    /// rgb = color, w = density
    pub fog: [f32; 4],
    /// x = point size, y = opacity
    pub params: [f32; 4],
}

impl SceneUniforms {
    pub fn from_scene(scene: &BackgroundScene) -> Self {
        let p = &scene.params;
        Self {
            proj: scene.projection().to_cols_array_2d(),
            view: scene.view().to_cols_array_2d(),
            model: scene.model().to_cols_array_2d(),
            light_pos: scene.light.extend(p.light_range).to_array(),
            light_color: p.light_color.extend(p.light_intensity).to_array(),
            ambient: p.ambient_color.extend(p.ambient_intensity).to_array(),
            fog: p.fog_color.extend(p.fog_density).to_array(),
            params: [p.point_size, p.opacity, 0.0, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_sizes() {
        assert_eq!(std::mem::size_of::<PointInstance>(), 24);
        // 3 matrices + 5 vec4s, 16-byte aligned for WGSL
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 272);
    }

    #[test]
    fn test_instances_from_field() {
        let field = ParticleField::generate(10, 3);
        let instances = PointInstance::from_field(&field);
        assert_eq!(instances.len(), 10);
        assert_eq!(instances[4].position, field.positions[4].to_array());
        assert_eq!(instances[4].color, field.colors[4].to_array());
    }

    #[test]
    fn test_uniforms_pack_scene() {
        let mut scene = BackgroundScene::default();
        scene.update(1.0);
        let u = SceneUniforms::from_scene(&scene);
        assert_eq!(u.light_pos[3], 40.0);
        assert_eq!(u.fog[3], 0.08);
        assert_eq!(u.params[0], 0.06);
        assert_eq!(u.params[1], 0.9);
        assert_eq!(u.light_pos[0], scene.light.x);
    }
}
