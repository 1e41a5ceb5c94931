//! WGSL sources for the face layers.
//!
//! Every layer reads the same `FaceUniforms` block at group 0 and takes its
//! per-draw parameters as instance attributes.

/// Point-star field: tinted quads transformed by a per-pass model matrix.
pub const POINT_STARS_SHADER_SOURCE: &str = r#"
struct FaceUniforms {
    view_proj: mat4x4<f32>,
    // x: angular size of one texel at the face centre
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> face: FaceUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
};

@vertex
fn vs_point_stars(in: VertexInput) -> VertexOutput {
    let model = mat4x4<f32>(in.model_0, in.model_1, in.model_2, in.model_3);
    var out: VertexOutput;
    out.clip_position = face.view_proj * model * vec4<f32>(in.position, 1.0);
    out.color = in.color;
    return out;
}

@fragment
fn fs_point_stars(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color, 1.0);
}
"#;

/// Bright stars and the sun: a white-hot core with a `d^falloff` halo.
///
/// Stars are billboards sized to where the halo fades below 1/1024; the sun
/// is the camera box because its halo spans most of the sky.
pub const GLOW_SHADER_SOURCE: &str = r#"
struct FaceUniforms {
    view_proj: mat4x4<f32>,
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> face: FaceUniforms;

struct GlowInstance {
    @location(1) position: vec3<f32>,
    @location(2) size: f32,
    @location(3) color: vec3<f32>,
    @location(4) falloff: f32,
};

struct GlowOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world: vec3<f32>,
    @location(1) @interpolate(flat) centre: vec3<f32>,
    @location(2) @interpolate(flat) color: vec3<f32>,
    @location(3) @interpolate(flat) size: f32,
    @location(4) @interpolate(flat) falloff: f32,
};

// 2 * ln(1024): 0.5 * exp(-falloff * a^2 / 2) < 1/1024 beyond this.
const HALO_CUTOFF: f32 = 13.862944;
const MAX_EXTENT: f32 = 1.4;

fn glow_output(world: vec3<f32>, inst: GlowInstance) -> GlowOutput {
    var out: GlowOutput;
    out.clip_position = face.view_proj * vec4<f32>(world, 1.0);
    out.world = world;
    out.centre = normalize(inst.position);
    out.color = inst.color;
    out.size = inst.size;
    out.falloff = inst.falloff;
    return out;
}

// Angular radius, in radians, outside of which a glow is invisible.
fn glow_extent(size: f32, falloff: f32, texel: f32) -> f32 {
    let halo = sqrt(HALO_CUTOFF / max(falloff, 1e-6));
    let core = acos(clamp(1.0 - 32.0 * size, -1.0, 1.0));
    return min(max(max(halo, core), 2.0 * texel), MAX_EXTENT);
}

@vertex
fn vs_star(@location(0) corner: vec2<f32>, inst: GlowInstance) -> GlowOutput {
    let centre = normalize(inst.position);
    var helper = vec3<f32>(0.0, 1.0, 0.0);
    if abs(centre.y) > 0.99 {
        helper = vec3<f32>(1.0, 0.0, 0.0);
    }
    let right = normalize(cross(helper, centre));
    let up = cross(centre, right);
    let half_size = tan(glow_extent(inst.size, inst.falloff, face.params.x));
    let world = centre + (corner.x * right + corner.y * up) * half_size;
    return glow_output(world, inst);
}

@vertex
fn vs_sun(@location(0) position: vec3<f32>, inst: GlowInstance) -> GlowOutput {
    return glow_output(position, inst);
}

@fragment
fn fs_glow(in: GlowOutput) -> @location(0) vec4<f32> {
    let d = clamp(dot(normalize(in.world), in.centre), 0.0, 1.0);
    var c = 0.0;
    if in.size > 0.0 {
        c = smoothstep(1.0 - 32.0 * in.size, 1.0 - in.size, d);
    }
    if d > 0.0 {
        c += pow(d, in.falloff) * 0.5;
    }
    c = min(c, 1.0);
    let color = mix(in.color, vec3<f32>(1.0), c);
    return vec4<f32>(color, c);
}
"#;

/// Nebula clouds: domain-warped fractal Perlin noise on the view direction.
pub const NEBULA_SHADER_SOURCE: &str = r#"
struct FaceUniforms {
    view_proj: mat4x4<f32>,
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> face: FaceUniforms;

struct NebulaInstance {
    @location(1) color: vec3<f32>,
    @location(2) scale: f32,
    @location(3) offset: vec3<f32>,
    @location(4) intensity: f32,
    @location(5) falloff: f32,
};

struct NebulaOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world: vec3<f32>,
    @location(1) @interpolate(flat) color: vec3<f32>,
    @location(2) @interpolate(flat) offset: vec3<f32>,
    // x: scale, y: intensity, z: falloff
    @location(3) @interpolate(flat) shape: vec3<f32>,
};

fn pcg(v: u32) -> u32 {
    let state = v * 747796405u + 2891336453u;
    let word = ((state >> ((state >> 28u) + 4u)) ^ state) * 277803737u;
    return (word >> 22u) ^ word;
}

fn lattice_hash(cell: vec3<i32>) -> u32 {
    let c = bitcast<vec3<u32>>(cell);
    return pcg(c.x ^ pcg(c.y ^ pcg(c.z)));
}

// Perlin's twelve cube-edge gradients, padded to sixteen.
fn gradient(hash: u32, p: vec3<f32>) -> f32 {
    let h = hash & 15u;
    let u = select(p.y, p.x, h < 8u);
    var v = p.z;
    if h < 4u {
        v = p.y;
    } else if h == 12u || h == 14u {
        v = p.x;
    }
    return select(-u, u, (h & 1u) == 0u) + select(-v, v, (h & 2u) == 0u);
}

fn fade(t: vec3<f32>) -> vec3<f32> {
    return t * t * t * (t * (t * 6.0 - 15.0) + 10.0);
}

// Classic gradient noise in roughly [-1, 1].
fn perlin(p: vec3<f32>) -> f32 {
    let floor_p = floor(p);
    let cell = vec3<i32>(floor_p);
    let f = p - floor_p;
    let w = fade(f);

    let n000 = gradient(lattice_hash(cell), f);
    let n100 = gradient(lattice_hash(cell + vec3<i32>(1, 0, 0)), f - vec3<f32>(1.0, 0.0, 0.0));
    let n010 = gradient(lattice_hash(cell + vec3<i32>(0, 1, 0)), f - vec3<f32>(0.0, 1.0, 0.0));
    let n110 = gradient(lattice_hash(cell + vec3<i32>(1, 1, 0)), f - vec3<f32>(1.0, 1.0, 0.0));
    let n001 = gradient(lattice_hash(cell + vec3<i32>(0, 0, 1)), f - vec3<f32>(0.0, 0.0, 1.0));
    let n101 = gradient(lattice_hash(cell + vec3<i32>(1, 0, 1)), f - vec3<f32>(1.0, 0.0, 1.0));
    let n011 = gradient(lattice_hash(cell + vec3<i32>(0, 1, 1)), f - vec3<f32>(0.0, 1.0, 1.0));
    let n111 = gradient(lattice_hash(cell + vec3<i32>(1, 1, 1)), f - vec3<f32>(1.0, 1.0, 1.0));

    let x00 = mix(n000, n100, w.x);
    let x10 = mix(n010, n110, w.x);
    let x01 = mix(n001, n101, w.x);
    let x11 = mix(n011, n111, w.x);
    return mix(mix(x00, x10, w.y), mix(x01, x11, w.y), w.z);
}

fn noise01(p: vec3<f32>) -> f32 {
    return 0.5 * perlin(p) + 0.5;
}

const OCTAVES: i32 = 6;

fn nebula_density(p: vec3<f32>) -> f32 {
    var scale = 64.0; // 2^OCTAVES
    var displace = vec3<f32>(0.0);
    for (var i = 0; i < OCTAVES; i++) {
        displace = vec3<f32>(
            noise01(p * scale + displace),
            noise01(p.yzx * scale + displace),
            noise01(p.zxy * scale + displace),
        );
        scale *= 0.5;
    }
    return noise01(p * scale + displace);
}

@vertex
fn vs_nebula(@location(0) position: vec3<f32>, inst: NebulaInstance) -> NebulaOutput {
    var out: NebulaOutput;
    out.clip_position = face.view_proj * vec4<f32>(position, 1.0);
    out.world = position;
    out.color = inst.color;
    out.offset = inst.offset;
    out.shape = vec3<f32>(inst.scale, inst.intensity, inst.falloff);
    return out;
}

@fragment
fn fs_nebula(in: NebulaOutput) -> @location(0) vec4<f32> {
    let p = normalize(in.world) * in.shape.x;
    let density = clamp(nebula_density(p + in.offset) * in.shape.y, 0.0, 1.0);
    let c = pow(density, in.shape.z);
    return vec4<f32>(in.color, c);
}
"#;
