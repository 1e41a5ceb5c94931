//! The six cube faces and their fixed cameras.

use glam::{Mat4, Vec3};

/// Near plane of the face projection.
pub const FACE_NEAR: f32 = 0.1;
/// Far plane of the face projection.
pub const FACE_FAR: f32 = 256.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CubeFace {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl CubeFace {
    /// Render order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Front,
        CubeFace::Back,
        CubeFace::Left,
        CubeFace::Right,
        CubeFace::Top,
        CubeFace::Bottom,
    ];

    /// Position in [`CubeFace::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            CubeFace::Front => "front",
            CubeFace::Back => "back",
            CubeFace::Left => "left",
            CubeFace::Right => "right",
            CubeFace::Top => "top",
            CubeFace::Bottom => "bottom",
        }
    }

    /// Look direction from the cube centre.
    pub const fn direction(self) -> Vec3 {
        match self {
            CubeFace::Front => Vec3::NEG_Z,
            CubeFace::Back => Vec3::Z,
            CubeFace::Left => Vec3::NEG_X,
            CubeFace::Right => Vec3::X,
            CubeFace::Top => Vec3::Y,
            CubeFace::Bottom => Vec3::NEG_Y,
        }
    }

    /// Camera up vector. The poles use ±Z so it is never parallel to the look direction.
    pub const fn up(self) -> Vec3 {
        match self {
            CubeFace::Top => Vec3::Z,
            CubeFace::Bottom => Vec3::NEG_Z,
            _ => Vec3::Y,
        }
    }

    pub fn view(self) -> Mat4 {
        Mat4::look_at_rh(Vec3::ZERO, self.direction(), self.up())
    }
}

/// 90° square projection shared by all faces, so the six frusta tile the sphere.
pub fn face_projection() -> Mat4 {
    Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, FACE_NEAR, FACE_FAR)
}
