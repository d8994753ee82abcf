//! Nearest-neighbor resampling over flat interleaved channel buffers.

/// Output width preserving the source aspect ratio at `desired_height`.
pub fn aspect_width(source_width: u32, source_height: u32, desired_height: u32) -> u32 {
    let ratio = f64::from(source_width) / f64::from(source_height);
    (ratio * f64::from(desired_height)).round() as u32
}

/// Nearest-neighbor resize of an interleaved channel buffer.
///
/// Destination pixel (x, y) copies every channel of source pixel
/// (⌊x/dW·sW⌋, ⌊y/dH·sH⌋). No interpolation, deterministic and pure.
pub fn resize_nearest(
    source: &[u8],
    source_width: u32,
    source_height: u32,
    channels: usize,
    dest_width: u32,
    dest_height: u32,
) -> Vec<u8> {
    debug_assert_eq!(
        source.len(),
        source_width as usize * source_height as usize * channels
    );

    let mut dest = vec![0u8; dest_width as usize * dest_height as usize * channels];

    for y in 0..dest_height {
        for x in 0..dest_width {
            let u = f64::from(x) / f64::from(dest_width);
            let v = f64::from(y) / f64::from(dest_height);

            let src_x = (u * f64::from(source_width)) as usize;
            let src_y = (v * f64::from(source_height)) as usize;

            let src_offset = (src_y * source_width as usize + src_x) * channels;
            let dst_offset = (y as usize * dest_width as usize + x as usize) * channels;

            dest[dst_offset..dst_offset + channels]
                .copy_from_slice(&source[src_offset..src_offset + channels]);
        }
    }

    dest
}
