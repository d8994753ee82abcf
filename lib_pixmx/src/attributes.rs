//! Self-describing binary table of named byte blobs, base64-wrapped for
//! embedding in text containers.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::debug;
use thiserror::Error;

use crate::bytes::{ByteReadError, ByteReader, ByteWriter};

/// Type tag marking an attribute payload as a binary string.
pub const TYPE_TAG_BINARY_STRING: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub data: Vec<u8>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

#[derive(Error, Debug)]
pub enum AttributeError {
    #[error("{0} attributes exceed the u32 count field")]
    TooManyAttributes(usize),
    #[error("attribute name {0:?} is {1} bytes, exceeding the u32 length field")]
    NameTooLong(String, usize),
    #[error("attribute {0:?} holds {1} bytes of data, exceeding the u32 length field")]
    DataTooLarge(String, usize),
}

#[derive(Error, Debug)]
pub enum AttributeDecodeError {
    #[error("data ends before the attribute table is complete: {0}")]
    Truncated(#[from] ByteReadError),
    #[error("attribute name is not valid UTF-8")]
    InvalidName(#[from] std::string::FromUtf8Error),
    #[error("unsupported attribute type tag {0}")]
    UnsupportedTypeTag(u8),
}

/// Encodes an ordered attribute list as `count:u32` followed per entry by
/// `nameLength:u32, nameBytes, typeTag:u8, dataLength:u32, dataBytes`, all
/// little-endian with no padding.
pub fn encode_attributes(attributes: &[Attribute]) -> Result<Vec<u8>, AttributeError> {
    let count = u32::try_from(attributes.len())
        .map_err(|_| AttributeError::TooManyAttributes(attributes.len()))?;

    let mut writer = ByteWriter::new();
    writer.write_u32_le(count);

    for attribute in attributes {
        let name = attribute.name.as_bytes();
        let name_len = u32::try_from(name.len())
            .map_err(|_| AttributeError::NameTooLong(attribute.name.clone(), name.len()))?;
        let data_len = u32::try_from(attribute.data.len()).map_err(|_| {
            AttributeError::DataTooLarge(attribute.name.clone(), attribute.data.len())
        })?;

        writer.write_u32_le(name_len);
        writer.write_bytes(name);
        writer.write_u8(TYPE_TAG_BINARY_STRING);
        writer.write_u32_le(data_len);
        writer.write_bytes(&attribute.data);
    }

    debug!(
        "attribute table encoded: {} entries, {} bytes",
        attributes.len(),
        writer.len()
    );
    Ok(writer.into_bytes())
}

/// Encodes the attribute table and wraps it in standard padded base64 with no
/// line wrapping.
pub fn encode_attributes_base64(attributes: &[Attribute]) -> Result<String, AttributeError> {
    Ok(STANDARD.encode(encode_attributes(attributes)?))
}

/// Parses an attribute table produced by [`encode_attributes`].
pub fn decode_attributes(data: &[u8]) -> Result<Vec<Attribute>, AttributeDecodeError> {
    let mut reader = ByteReader::new(data);
    let count = reader.read_u32_le()? as usize;

    let mut attributes = Vec::with_capacity(count.min(reader.remaining()));
    for _ in 0..count {
        let name_len = reader.read_u32_le()? as usize;
        let name = String::from_utf8(reader.read_bytes(name_len)?.to_vec())?;

        let tag = reader.read_u8()?;
        if tag != TYPE_TAG_BINARY_STRING {
            return Err(AttributeDecodeError::UnsupportedTypeTag(tag));
        }

        let data_len = reader.read_u32_le()? as usize;
        let data = reader.read_bytes(data_len)?.to_vec();
        attributes.push(Attribute { name, data });
    }

    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_entry_layout() {
        let encoded =
            encode_attributes(&[Attribute::new("RawData", vec![0xAA, 0xBB])]).unwrap();

        #[rustfmt::skip]
        let expected = [
            1, 0, 0, 0,                         // count
            7, 0, 0, 0,                         // name length
            b'R', b'a', b'w', b'D', b'a', b't', b'a',
            2,                                  // type tag
            2, 0, 0, 0,                         // data length
            0xAA, 0xBB,
        ];
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_empty_table() {
        let encoded = encode_attributes(&[]).unwrap();
        assert_eq!(encoded, [0, 0, 0, 0]);

        assert_eq!(decode_attributes(&encoded).unwrap(), vec![]);
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let attributes = vec![
            Attribute::new("First", vec![1, 2, 3]),
            Attribute::new("Second", vec![]),
            Attribute::new("Third", vec![0; 300]),
        ];

        let encoded = encode_attributes(&attributes).unwrap();
        assert_eq!(decode_attributes(&encoded).unwrap(), attributes);
    }

    #[test]
    fn test_base64_uses_standard_alphabet_with_padding() {
        let encoded = encode_attributes_base64(&[]).unwrap();
        // Four zero bytes
        assert_eq!(encoded, "AAAAAA==");
    }

    #[test]
    fn test_decode_rejects_unknown_type_tag() {
        let mut encoded = encode_attributes(&[Attribute::new("X", vec![1])]).unwrap();
        // name length 1, so the tag sits at offset 4 + 4 + 1
        encoded[9] = 3;

        let err = decode_attributes(&encoded).unwrap_err();
        assert!(matches!(err, AttributeDecodeError::UnsupportedTypeTag(3)));
    }

    #[test]
    fn test_decode_rejects_truncated_table() {
        let encoded = encode_attributes(&[Attribute::new("RawData", vec![1, 2, 3])]).unwrap();
        let err = decode_attributes(&encoded[..encoded.len() - 1]).unwrap_err();
        assert!(matches!(err, AttributeDecodeError::Truncated(_)));
    }
}
