//! Per-render parameter synthesis.
//!
//! Each feature family draws from its own [`Stream`], so disabling one family
//! never shifts the values of another. Lists are grown with a stopping rule:
//! after each instance one more value is drawn and the list ends when it falls
//! below the family's threshold. The rule has no upper bound; the expected
//! lengths are 5 point-star passes, 100 stars and 2 nebulae.

use glam::{Mat4, Vec3};

use crate::request::GenerationRequest;
use crate::rng::SeededRandom;
use crate::seed::{Stream, seed_hash};

/// Stop threshold for point-star orientation passes.
pub const POINT_STAR_STOP: f32 = 0.2;
/// Stop threshold for bright stars.
pub const STAR_STOP: f32 = 0.01;
/// Stop threshold for nebula clouds.
pub const NEBULA_STOP: f32 = 0.5;

const STAR_FALLOFF_BASE: f32 = 1_048_576.0; // 2^20

/// One extra rotation of the point-star field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointStarOrientation {
    pub rotation: Mat4,
}

/// A bright star glow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarParams {
    /// Unit direction.
    pub position: Vec3,
    pub color: Vec3,
    /// Core disc size; 0 leaves only the glow.
    pub size: f32,
    pub falloff: f32,
}

/// A noise cloud.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NebulaParams {
    pub scale: f32,
    pub color: Vec3,
    pub intensity: f32,
    pub falloff: f32,
    /// Shift of the noise domain; varies the cloud shape.
    pub offset: Vec3,
}

/// The sun glow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunParams {
    pub position: Vec3,
    pub color: Vec3,
    pub size: f32,
    pub falloff: f32,
}

/// Everything drawn for one request, in draw order per family.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkyParameters {
    pub point_stars: Vec<PointStarOrientation>,
    pub stars: Vec<StarParams>,
    pub nebulae: Vec<NebulaParams>,
    pub sun: Option<SunParams>,
}

impl SkyParameters {
    /// Derive all parameters for `request`. Disabled families are left empty
    /// and their streams are never opened.
    pub fn synthesize(request: &GenerationRequest) -> Self {
        let hash = seed_hash(&request.seed);

        let point_stars = if request.point_stars {
            let mut rng = Stream::PointStars.open(hash);
            collect_until(&mut rng, POINT_STAR_STOP, |rng| PointStarOrientation {
                rotation: random_rotation(rng),
            })
        } else {
            Vec::new()
        };

        let stars = if request.stars {
            let mut rng = Stream::Stars.open(hash);
            collect_until(&mut rng, STAR_STOP, |rng| StarParams {
                position: random_direction(rng),
                color: Vec3::ONE,
                size: 0.0,
                falloff: rng.next_f32() * STAR_FALLOFF_BASE + STAR_FALLOFF_BASE,
            })
        } else {
            Vec::new()
        };

        let nebulae = if request.nebulae {
            let mut rng = Stream::Nebulae.open(hash);
            collect_until(&mut rng, NEBULA_STOP, |rng| NebulaParams {
                scale: rng.next_f32() * 0.5 + 0.25,
                color: random_color(rng),
                intensity: rng.next_f32() * 0.2 + 0.9,
                falloff: rng.next_f32() * 3.0 + 3.0,
                offset: Vec3::new(
                    rng.next_f32() * 2000.0 - 1000.0,
                    rng.next_f32() * 2000.0 - 1000.0,
                    rng.next_f32() * 2000.0 - 1000.0,
                ),
            })
        } else {
            Vec::new()
        };

        let sun = request.sun.then(|| {
            let mut rng = Stream::Sun.open(hash);
            SunParams {
                position: random_direction(&mut rng),
                color: random_color(&mut rng),
                size: rng.next_f32() * 0.0001 + 0.0001,
                falloff: rng.next_f32() * 16.0 + 8.0,
            }
        });

        Self {
            point_stars,
            stars,
            nebulae,
            sun,
        }
    }

    /// Model matrix of each point-star pass. Rotations accumulate: pass `j`
    /// draws with `R_j * ... * R_1`, so the order of the list matters.
    pub fn point_star_models(&self) -> Vec<Mat4> {
        self.point_stars
            .iter()
            .scan(Mat4::IDENTITY, |model, orientation| {
                *model = orientation.rotation * *model;
                Some(*model)
            })
            .collect()
    }
}

/// Generate instances until a stop draw falls below `stop`. Always yields at least one.
fn collect_until<T>(
    rng: &mut SeededRandom,
    stop: f32,
    mut make: impl FnMut(&mut SeededRandom) -> T,
) -> Vec<T> {
    let mut items = Vec::new();
    loop {
        items.push(make(rng));
        if rng.next_f32() < stop {
            return items;
        }
    }
}

/// `Rx(a) * Ry(b) * Rz(c)` with the three angles drawn in that order.
pub fn random_rotation(rng: &mut SeededRandom) -> Mat4 {
    let x = rng.next_angle();
    let y = rng.next_angle();
    let z = rng.next_angle();
    Mat4::from_rotation_x(x) * Mat4::from_rotation_y(y) * Mat4::from_rotation_z(z)
}

/// `+Z` carried through a [`random_rotation`].
pub fn random_direction(rng: &mut SeededRandom) -> Vec3 {
    random_rotation(rng).transform_vector3(Vec3::Z).normalize()
}

fn random_color(rng: &mut SeededRandom) -> Vec3 {
    let r = rng.next_f32();
    let g = rng.next_f32();
    let b = rng.next_f32();
    Vec3::new(r, g, b)
}
