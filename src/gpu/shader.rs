use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::group::GroupKind;
use crate::scene::InstanceRecord;

pub const TREE_SHADER: &str = include_str!("tree.wgsl");

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub time: f32,
}

/// Per-instance vertex data.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    /// rgb = base color, a = emissive strength.
    pub color: [f32; 4],
}

impl InstanceRaw {
    pub fn from_record(record: &InstanceRecord) -> Self {
        Self {
            model: record.transform.to_cols_array_2d(),
            color: record.color.extend(emissive(record.group)).to_array(),
        }
    }

    pub fn model(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

/// How strongly each group glows on its own.
pub fn emissive(kind: GroupKind) -> f32 {
    match kind {
        GroupKind::Foliage => 0.6,
        GroupKind::Ribbon => 0.9,
        GroupKind::Cubes | GroupKind::Polyhedra => 0.15,
        GroupKind::Centerpiece => 1.0,
    }
}

pub const MESH_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

pub const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    2 => Float32x4,
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
    6 => Float32x4,
];

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_tree_shader_validates() {
        validate_wgsl(TREE_SHADER).unwrap();
    }

    #[test]
    fn test_layout_sizes() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 24);
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 80);
        // Uniform buffers need 16-byte multiples.
        assert_eq!(std::mem::size_of::<Uniforms>() % 16, 0);
    }

    #[test]
    fn test_instance_from_record() {
        let transform = Mat4::from_scale_rotation_translation(
            Vec3::splat(0.2),
            Quat::from_rotation_y(0.3),
            Vec3::new(1.0, 2.0, 3.0),
        );
        let record = InstanceRecord {
            group: GroupKind::Centerpiece,
            index: 0,
            transform,
            color: Vec3::new(1.0, 0.5, 0.0),
        };
        let raw = InstanceRaw::from_record(&record);
        assert_eq!(raw.model(), transform);
        assert_eq!(raw.color, [1.0, 0.5, 0.0, 1.0]);
    }
}
