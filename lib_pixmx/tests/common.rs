#![allow(dead_code)]

/// 2x2 RGB scan exercising the fuzzy-match boundary: (9,9,9) differs from
/// (10,10,10) by 1/9.5 ~ 10.5% per channel, just outside the 10% tolerance.
pub const BOUNDARY_PIXELS: [u8; 12] = [10, 10, 10, 10, 10, 10, 200, 50, 50, 9, 9, 9];

pub fn solid_rgba(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    color.repeat((width * height) as usize)
}

/// Interleaved RGB buffer of `count` mutually distinct colors, spaced far
/// beyond the fuzz tolerance.
pub fn distinct_rgb(count: usize) -> Vec<u8> {
    const STEPS: [u8; 4] = [0, 64, 128, 192];
    assert!(count <= STEPS.len().pow(3));

    let mut pixels = Vec::with_capacity(count * 3);
    for i in 0..count {
        pixels.push(STEPS[i % 4]);
        pixels.push(STEPS[(i / 4) % 4]);
        pixels.push(STEPS[(i / 16) % 4]);
    }
    pixels
}
