use log::{debug, error};
use thiserror::Error;

use super::format::{PaletteImage, COLOR_SIZE, INDEX_RECORD_SIZE};
use crate::bytes::{ByteReadError, ByteReader};
use crate::quantize::IndexRecord;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("data ends before the blob is complete: {0}")]
    Truncated(#[from] ByteReadError),
    #[error("color data size {0} is not a multiple of {1} bytes")]
    InvalidColorDataSize(u32, usize),
    #[error("index data size {0} is not a multiple of {1} bytes")]
    InvalidIndexDataSize(usize, usize),
}

/// Parses a binary image blob back into its palette and index records.
pub fn decode(data: &[u8]) -> Result<PaletteImage, DecodeError> {
    let mut reader = ByteReader::new(data);

    let width = reader.read_u32_le()?;
    let height = reader.read_u32_le()?;
    let color_data_size = reader.read_u32_le()?;
    debug!(
        "header read: width={} height={} color_data_size={}",
        width, height, color_data_size
    );

    if color_data_size as usize % COLOR_SIZE != 0 {
        error!("color data size {} is not divisible by {}", color_data_size, COLOR_SIZE);
        return Err(DecodeError::InvalidColorDataSize(color_data_size, COLOR_SIZE));
    }

    let color_count = color_data_size as usize / COLOR_SIZE;
    let mut palette = Vec::with_capacity(color_count.min(reader.remaining() / COLOR_SIZE));
    for _ in 0..color_count {
        let bytes = reader.read_bytes(COLOR_SIZE)?;
        palette.push([bytes[0], bytes[1], bytes[2]]);
    }

    let index_data_size = reader.remaining();
    if index_data_size % INDEX_RECORD_SIZE != 0 {
        error!(
            "index data size {} is not divisible by {}",
            index_data_size, INDEX_RECORD_SIZE
        );
        return Err(DecodeError::InvalidIndexDataSize(
            index_data_size,
            INDEX_RECORD_SIZE,
        ));
    }

    let record_count = index_data_size / INDEX_RECORD_SIZE;
    let mut records = Vec::with_capacity(record_count);
    for _ in 0..record_count {
        let position = reader.read_u24_le()?;
        let palette_index = reader.read_u16_le()?;
        records.push(IndexRecord {
            position,
            palette_index,
        });
    }

    debug!(
        "decoded {} colors and {} index records",
        palette.len(),
        records.len()
    );
    Ok(PaletteImage::new(width, height, palette, records))
}
