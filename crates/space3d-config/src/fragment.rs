//! URL-fragment (`#key=value&...`) encoding of the shareable sky state.
//!
//! The key names and the lenient parse rules are part of the link format:
//! links produced by older builds must keep decoding to the same sky.

use std::fmt::Write as _;

use crate::Config;

const DEFAULT_FOV: u32 = 80;
const DEFAULT_RESOLUTION: u32 = 1024;
const DEFAULT_ANIMATION_SPEED: f32 = 1.0;

/// Sky state as carried in a URL fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentState {
    /// `None` when the fragment carries no seed; callers pick a random one.
    pub seed: Option<String>,
    pub fov: u32,
    pub point_stars: bool,
    pub stars: bool,
    pub sun: bool,
    pub nebulae: bool,
    pub resolution: u32,
    pub animation_speed: f32,
}

impl Default for FragmentState {
    fn default() -> Self {
        Self {
            seed: None,
            fov: DEFAULT_FOV,
            point_stars: true,
            stars: true,
            sun: true,
            nebulae: true,
            resolution: DEFAULT_RESOLUTION,
            animation_speed: DEFAULT_ANIMATION_SPEED,
        }
    }
}

impl FragmentState {
    /// Parse a fragment such as `#seed=abc&sun=false`. A leading `#` or `?` is optional.
    ///
    /// Missing booleans are `true`; a present boolean is `true` only for the
    /// literal `true`. Unparseable or zero `fov`/`resolution` fall back to defaults.
    pub fn parse(fragment: &str) -> Self {
        let mut state = Self::default();
        let body = fragment.trim_start_matches(['#', '?']);

        for pair in body.split('&').filter(|p| !p.is_empty()) {
            let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = percent_decode(raw_key);
            let value = percent_decode(raw_value);
            match key.as_str() {
                "seed" => state.seed = Some(value),
                "fov" => state.fov = parse_leading_int(&value).unwrap_or(DEFAULT_FOV),
                "pointStars" => state.point_stars = value == "true",
                "stars" => state.stars = value == "true",
                "sun" => state.sun = value == "true",
                "nebulae" => state.nebulae = value == "true",
                "resolution" => {
                    state.resolution = parse_leading_int(&value).unwrap_or(DEFAULT_RESOLUTION)
                }
                "animationSpeed" => {
                    state.animation_speed = value
                        .trim()
                        .parse::<f32>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .unwrap_or(DEFAULT_ANIMATION_SPEED)
                }
                other => log::debug!("Ignoring unknown fragment key '{other}'"),
            }
        }
        state
    }

    /// Encode as a fragment body (without the leading `#`), keys in sorted order.
    pub fn encode(&self) -> String {
        let mut pairs: Vec<(&str, String)> = vec![
            ("animationSpeed", self.animation_speed.to_string()),
            ("fov", self.fov.to_string()),
            ("nebulae", self.nebulae.to_string()),
            ("pointStars", self.point_stars.to_string()),
            ("resolution", self.resolution.to_string()),
            ("stars", self.stars.to_string()),
            ("sun", self.sun.to_string()),
        ];
        if let Some(seed) = &self.seed {
            pairs.push(("seed", seed.clone()));
        }
        pairs.sort_by(|a, b| a.0.cmp(b.0));

        let mut out = String::new();
        for (i, (key, value)) in pairs.iter().enumerate() {
            if i > 0 {
                out.push('&');
            }
            out.push_str(key);
            out.push('=');
            out.push_str(&percent_encode(value));
        }
        out
    }

    /// Capture the shareable part of a config.
    pub fn from_config(config: &Config) -> Self {
        let generation = &config.generation;
        Self {
            seed: (!generation.seed.is_empty()).then(|| generation.seed.clone()),
            fov: config.viewer.fov.round().max(0.0) as u32,
            point_stars: generation.point_stars,
            stars: generation.stars,
            sun: generation.sun,
            nebulae: generation.nebulae,
            resolution: generation.resolution,
            animation_speed: config.viewer.animation_speed,
        }
    }
}

impl Config {
    /// Copy a decoded fragment into this config. A fragment without a seed leaves the seed alone.
    pub fn apply_fragment(&mut self, state: &FragmentState) {
        if let Some(seed) = &state.seed {
            self.generation.seed = seed.clone();
        }
        self.generation.point_stars = state.point_stars;
        self.generation.stars = state.stars;
        self.generation.sun = state.sun;
        self.generation.nebulae = state.nebulae;
        self.generation.resolution = state.resolution;
        self.viewer.fov = state.fov as f32;
        self.viewer.animation_speed = state.animation_speed;
    }
}

/// Integer prefix parse, treating zero as absent (`"90.5"` -> 90, `"0"` -> None).
fn parse_leading_int(value: &str) -> Option<u32> {
    let digits: String = value
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<u32>().ok().filter(|v| *v != 0)
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}

/// Decode `%XX` escapes and `+` as space. Malformed escapes are kept verbatim.
fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                    (Some(high), Some(low)) => {
                        out.push(high << 4 | low);
                        i += 3;
                        continue;
                    }
                    _ => out.push(b'%'),
                }
            }
            other => out.push(other),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}
