use log::{debug, error, info};
use thiserror::Error;

use super::format::{PaletteImage, COLOR_SIZE, MAX_PALETTE_COLORS, MAX_PIXEL_POSITIONS};
use crate::bytes::ByteWriter;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("palette has {0} colors, exceeding the {1}-color format limit")]
    PaletteTooLarge(usize, usize),
    #[error("pixel position {0} does not fit in a 3-byte offset")]
    PositionOutOfRange(u32),
}

/// Serializes a palette-indexed image into the fixed little-endian layout:
/// header, palette bytes, then one 5-byte record per pixel.
pub fn encode(image: &PaletteImage) -> Result<Vec<u8>, EncodeError> {
    if image.palette.len() > MAX_PALETTE_COLORS {
        error!(
            "palette size {} exceeds the {}-color format limit",
            image.palette.len(),
            MAX_PALETTE_COLORS
        );
        return Err(EncodeError::PaletteTooLarge(
            image.palette.len(),
            MAX_PALETTE_COLORS,
        ));
    }
    if let Some(record) = image
        .records
        .iter()
        .find(|record| record.position >= MAX_PIXEL_POSITIONS)
    {
        error!("pixel position {} overflows a 3-byte offset", record.position);
        return Err(EncodeError::PositionOutOfRange(record.position));
    }

    let color_data_size = (image.palette.len() * COLOR_SIZE) as u32;
    let mut writer = ByteWriter::with_capacity(image.encoded_size());

    writer.write_u32_le(image.width);
    writer.write_u32_le(image.height);
    writer.write_u32_le(color_data_size);
    debug!(
        "header written: width={} height={} color_data_size={}",
        image.width, image.height, color_data_size
    );

    for color in &image.palette {
        writer.write_bytes(color);
    }
    debug!("palette written with {} colors", image.palette.len());

    for record in &image.records {
        writer.write_u24_le(record.position);
        writer.write_u16_le(record.palette_index);
    }
    debug!("{} index records written", image.records.len());

    info!(
        "encoded {}x{} image into {} bytes",
        image.width,
        image.height,
        writer.len()
    );
    Ok(writer.into_bytes())
}
