//! Seed string hashing and the per-family random stream offsets.
//!
//! The hash is a plain positional checksum, not a cryptographic hash. It is
//! compatibility-sensitive: every generated sky depends on its exact value.

use crate::rng::SeededRandom;

/// Fixed seed string of the static point-star field.
pub const POINT_STAR_FIELD_SEED: &str = "best seed ever";

/// `seed_hash(POINT_STAR_FIELD_SEED)`.
pub const POINT_STAR_FIELD_HASH: u64 = 10130;

/// `Σ (i + 1) * code_unit[i]` over the UTF-16 code units of `seed`.
pub fn seed_hash(seed: &str) -> u64 {
    seed.encode_utf16()
        .enumerate()
        .fold(0u64, |hash, (i, unit)| {
            hash.wrapping_add((i as u64 + 1).wrapping_mul(u64::from(unit)))
        })
}

/// Independent random streams, one per procedural family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stream {
    /// Orientations of the point-star field.
    PointStars,
    Nebulae,
    Stars,
    Sun,
    /// Geometry of the point-star field. Always hashed from [`POINT_STAR_FIELD_SEED`].
    PointStarField,
}

impl Stream {
    /// Constant added to the seed hash for this family.
    pub const fn offset(self) -> u64 {
        match self {
            Stream::PointStars => 1000,
            Stream::Nebulae => 2000,
            Stream::Stars => 3000,
            Stream::Sun => 4000,
            Stream::PointStarField => 5000,
        }
    }

    /// Open this family's stream for a hashed seed.
    pub fn open(self, hash: u64) -> SeededRandom {
        SeededRandom::new(hash.wrapping_add(self.offset()))
    }
}

/// The point-star field stream, independent of any request.
pub fn point_star_field_stream() -> SeededRandom {
    Stream::PointStarField.open(POINT_STAR_FIELD_HASH)
}
