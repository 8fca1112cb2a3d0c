//! xorshift32 - tiny deterministic RNG, one state word per particle

/// Advance the state and return the next value. A zero state is remapped so it never sticks.
#[inline]
pub fn xorshift32(state: &mut u32) -> u32 {
    let mut x = if *state == 0 { 0x9E37_79B9 } else { *state };
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// Uniform float in `[0, 1)`
#[inline]
pub fn next_unit(state: &mut u32) -> f32 {
    (xorshift32(state) >> 8) as f32 / (1u32 << 24) as f32
}

/// Uniform float in `[min, max)`
#[inline]
pub fn next_range(state: &mut u32, min: f32, max: f32) -> f32 {
    min + (max - min) * next_unit(state)
}

/// Uniform float in `[-half, half)`
#[inline]
pub fn next_signed(state: &mut u32, half: f32) -> f32 {
    (next_unit(state) - 0.5) * 2.0 * half
}

/// Derive an independent stream for item `index` from a base seed (splitmix-style mix)
pub fn derive_seed(seed: u32, index: u32) -> u32 {
    let mut z = seed.wrapping_add(index.wrapping_mul(0x9E37_79B9));
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^= z >> 16;
    if z == 0 { 1 } else { z }
}
