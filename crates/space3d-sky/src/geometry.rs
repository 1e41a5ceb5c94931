//! Static geometry shared by every render of a generator.
//!
//! Built once: the point-star field (100 000 outward-facing quads on a sphere
//! of radius 128), a unit box drawn around the camera for nebulae and the
//! sun, and a billboard quad for bright stars.

use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};
use space3d_render::{BufferAllocator, VertexPosition, VertexPositionColor};

use crate::rng::SeededRandom;
use crate::seed::point_star_field_stream;

/// Stars in the point-star field.
pub const POINT_STAR_COUNT: usize = 100_000;
/// Half-size of each point-star quad.
pub const POINT_STAR_SIZE: f32 = 0.05;
/// Distance of the point-star field from the origin.
pub const POINT_STAR_DISTANCE: f32 = 128.0;

/// Corner of the bright-star billboard in `[-1, 1]²`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BillboardCorner {
    pub corner: [f32; 2],
}

impl BillboardCorner {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<BillboardCorner>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x2,
            offset: 0,
            shader_location: 0,
        }],
    };
}

/// Two triangles covering `[-1, 1]²`.
pub const BILLBOARD: [BillboardCorner; 6] = [
    BillboardCorner { corner: [-1.0, -1.0] },
    BillboardCorner { corner: [1.0, -1.0] },
    BillboardCorner { corner: [1.0, 1.0] },
    BillboardCorner { corner: [-1.0, -1.0] },
    BillboardCorner { corner: [1.0, 1.0] },
    BillboardCorner { corner: [-1.0, 1.0] },
];

/// Triangle list of the `[-1, 1]³` box. Winding is irrelevant: it is drawn unculled.
pub fn unit_box() -> Vec<VertexPosition> {
    let mut vertices = Vec::with_capacity(36);
    for axis in 0..3 {
        for sign in [-1.0f32, 1.0] {
            let corner = |u: f32, v: f32| {
                let mut p = [0.0f32; 3];
                p[axis] = sign;
                p[(axis + 1) % 3] = u;
                p[(axis + 2) % 3] = v;
                VertexPosition { position: p }
            };
            vertices.extend([
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, 1.0),
            ]);
        }
    }
    vertices
}

/// Uniform point on the unit sphere: azimuth then height, two draws.
fn random_unit_vector(rng: &mut SeededRandom) -> Vec3 {
    let azimuth = rng.next_angle();
    let z = rng.next_f32() * 2.0 - 1.0;
    let ring = (1.0 - z * z).sqrt();
    Vec3::new(azimuth.cos() * ring, azimuth.sin() * ring, z)
}

/// Six vertices per star: a quad facing the origin, tinted by `u⁴`.
pub fn point_star_field(count: usize, rng: &mut SeededRandom) -> Vec<VertexPositionColor> {
    const QUAD: [[f32; 2]; 6] = [
        [-1.0, -1.0],
        [1.0, -1.0],
        [1.0, 1.0],
        [-1.0, -1.0],
        [1.0, 1.0],
        [-1.0, 1.0],
    ];

    let mut vertices = Vec::with_capacity(count * 6);
    for _ in 0..count {
        let direction = random_unit_vector(rng);
        let brightness = rng.next_f32().powi(4);
        let facing = Quat::from_rotation_arc(Vec3::NEG_Z, direction);
        let centre = direction * POINT_STAR_DISTANCE;
        let color = [brightness; 3];
        for [x, y] in QUAD {
            let local = Vec3::new(x * POINT_STAR_SIZE, y * POINT_STAR_SIZE, 0.0);
            vertices.push(VertexPositionColor {
                position: (facing * local + centre).to_array(),
                color,
            });
        }
    }
    vertices
}

/// GPU buffers for all static sky geometry.
pub struct SkyGeometry {
    pub point_stars: wgpu::Buffer,
    pub point_star_vertices: u32,
    pub unit_box: wgpu::Buffer,
    pub box_vertices: u32,
    pub billboard: wgpu::Buffer,
}

impl SkyGeometry {
    pub fn new(device: &wgpu::Device) -> Self {
        let allocator = BufferAllocator::new(device);

        let field = point_star_field(POINT_STAR_COUNT, &mut point_star_field_stream());
        let cube = unit_box();

        log::info!(
            "Built point-star field ({POINT_STAR_COUNT} stars, {} vertices)",
            field.len()
        );

        Self {
            point_stars: allocator.create_vertex_buffer("point-star-field", &field),
            point_star_vertices: field.len() as u32,
            unit_box: allocator.create_vertex_buffer("unit-box", &cube),
            box_vertices: cube.len() as u32,
            billboard: allocator.create_vertex_buffer("star-billboard", &BILLBOARD),
        }
    }
}
