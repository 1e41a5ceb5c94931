//! Generation inputs: seed, face resolution and feature toggles.

use rand::Rng;

/// Supported face sizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Resolution {
    R256,
    R512,
    #[default]
    R1024,
    R2048,
    R4096,
}

impl Resolution {
    pub const ALL: [Resolution; 5] = [
        Resolution::R256,
        Resolution::R512,
        Resolution::R1024,
        Resolution::R2048,
        Resolution::R4096,
    ];

    /// Side length in pixels.
    pub const fn pixels(self) -> u32 {
        match self {
            Resolution::R256 => 256,
            Resolution::R512 => 512,
            Resolution::R1024 => 1024,
            Resolution::R2048 => 2048,
            Resolution::R4096 => 4096,
        }
    }

    /// Exact match on a supported size.
    pub fn try_from_pixels(pixels: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.pixels() == pixels)
    }

    /// The largest supported size not above `limit`, or the smallest one.
    pub fn clamp_to(self, limit: u32) -> Self {
        if self.pixels() <= limit {
            return self;
        }
        Self::ALL
            .into_iter()
            .rev()
            .find(|r| r.pixels() <= limit)
            .unwrap_or(Resolution::R256)
    }

    /// Any unsupported size falls back to the default instead of failing.
    pub fn from_pixels(pixels: u32) -> Self {
        Self::try_from_pixels(pixels).unwrap_or_else(|| {
            let fallback = Self::default();
            log::warn!(
                "Unsupported resolution {pixels}, using {}",
                fallback.pixels()
            );
            fallback
        })
    }
}

/// One generation call's inputs. Every combination of toggles is valid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    pub seed: String,
    pub resolution: Resolution,
    pub point_stars: bool,
    pub stars: bool,
    pub sun: bool,
    pub nebulae: bool,
}

impl GenerationRequest {
    /// A request with every feature enabled.
    ///
    /// A blank seed is replaced by [`random_seed`], so the request always
    /// names the seed it will be rendered with.
    pub fn new(seed: &str, resolution: Resolution) -> Self {
        let seed = if seed.trim().is_empty() {
            let generated = random_seed();
            log::info!("No seed given, using random seed '{generated}'");
            generated
        } else {
            seed.to_string()
        };
        Self {
            seed,
            resolution,
            point_stars: true,
            stars: true,
            sun: true,
            nebulae: true,
        }
    }

    /// Face side length in pixels.
    pub fn pixels(&self) -> u32 {
        self.resolution.pixels()
    }
}

/// A fresh base-36 token below 10^18, from a non-deterministic source.
pub fn random_seed() -> String {
    let value = rand::rng().random_range(0..1_000_000_000_000_000_000u64);
    to_base36(value)
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::with_capacity(13);
    while value > 0 {
        digits.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.iter().rev().map(|&d| d as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_resolutions_round_trip() {
        for r in Resolution::ALL {
            assert_eq!(Resolution::from_pixels(r.pixels()), r);
        }
    }

    #[test]
    fn test_unsupported_resolution_snaps_to_default() {
        assert_eq!(Resolution::from_pixels(0), Resolution::R1024);
        assert_eq!(Resolution::from_pixels(1000), Resolution::R1024);
        assert_eq!(Resolution::from_pixels(8192), Resolution::R1024);
        assert_eq!(Resolution::try_from_pixels(300), None);
    }

    #[test]
    fn test_clamp_to_device_limit() {
        assert_eq!(Resolution::R4096.clamp_to(16384), Resolution::R4096);
        assert_eq!(Resolution::R4096.clamp_to(2048), Resolution::R2048);
        assert_eq!(Resolution::R2048.clamp_to(3000), Resolution::R2048);
        assert_eq!(Resolution::R1024.clamp_to(1000), Resolution::R512);
        assert_eq!(Resolution::R512.clamp_to(100), Resolution::R256);
    }

    #[test]
    fn test_new_request_enables_everything() {
        let request = GenerationRequest::new("abc", Resolution::R256);
        assert_eq!(request.seed, "abc");
        assert_eq!(request.pixels(), 256);
        assert!(request.point_stars && request.stars && request.sun && request.nebulae);
    }

    #[test]
    fn test_blank_seed_is_replaced() {
        let request = GenerationRequest::new("   ", Resolution::default());
        assert!(!request.seed.trim().is_empty());
        assert!(request.seed.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_seed_whitespace_is_kept_when_not_blank() {
        let request = GenerationRequest::new(" a b ", Resolution::default());
        assert_eq!(request.seed, " a b ");
    }

    #[test]
    fn test_base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_295), "zz");
    }

    #[test]
    fn test_random_seeds_are_short_tokens() {
        let a = random_seed();
        let b = random_seed();
        assert!(a.len() <= 12, "10^18 fits in 12 base-36 digits, got {a}");
        assert_ne!(a, b);
    }
}
