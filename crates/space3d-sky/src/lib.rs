//! Procedural deep-space skyboxes: seeded parameter synthesis, six-face
//! offscreen rendering, cubemap assembly and a textured-cube viewer.

pub mod cubemap;
pub mod error;
pub mod face;
pub mod generator;
pub mod geometry;
pub mod params;
pub mod renderer;
pub mod request;
pub mod rng;
pub mod seed;
pub mod shaders;
pub mod skybox;

pub use cubemap::{CubemapLayout, RenderedCubemap};
pub use error::SkyError;
pub use face::{CubeFace, face_projection};
pub use generator::SpaceGenerator;
pub use geometry::SkyGeometry;
pub use params::{NebulaParams, PointStarOrientation, SkyParameters, StarParams, SunParams};
pub use renderer::{FaceRenderer, SkyInstances};
pub use request::{GenerationRequest, Resolution, random_seed};
pub use rng::SeededRandom;
pub use seed::{Stream, seed_hash};
pub use skybox::{OrbitCamera, SkyboxViewer};
