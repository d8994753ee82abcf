use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ByteReadError {
    #[error("unexpected end of data: needed {needed} more bytes at offset {offset}")]
    UnexpectedEof { offset: usize, needed: usize },
}

/// Growable byte buffer with fixed-width little-endian write operations.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16_le(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes the low three bytes of `value`; the high byte is masked off.
    pub fn write_u24_le(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes()[..3]);
    }

    pub fn write_u32_le(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Forward-only cursor over a byte slice with fixed-width little-endian reads.
#[derive(Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    cursor: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, cursor: 0 }
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], ByteReadError> {
        if self.remaining() < count {
            return Err(ByteReadError::UnexpectedEof {
                offset: self.cursor,
                needed: count - self.remaining(),
            });
        }
        let bytes = &self.data[self.cursor..self.cursor + count];
        self.cursor += count;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, ByteReadError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, ByteReadError> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u24_le(&mut self) -> Result<u32, ByteReadError> {
        let bytes = self.take(3)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0]))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, ByteReadError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], ByteReadError> {
        self.take(count)
    }
}
