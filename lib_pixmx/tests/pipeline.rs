mod common;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use common::{solid_rgba, BOUNDARY_PIXELS};
use lib_pixmx::attributes::{
    decode_attributes, encode_attributes, encode_attributes_base64, Attribute,
};
use lib_pixmx::constants::RAW_DATA_ATTRIBUTE;
use lib_pixmx::quantize::{quantize, QuantizerConfig};
use lib_pixmx::resample::resize_nearest;
use lib_pixmx::template::{render, TokenValues};
use lib_pixmx::{decode, encode, PaletteImage};

#[test]
fn test_container_contract_round_trips() {
    let quantized = quantize(&BOUNDARY_PIXELS, 2, 2, 3, &QuantizerConfig::default()).unwrap();
    let image = PaletteImage::new(2, 2, quantized.palette, quantized.records);
    let blob = encode(&image).unwrap();

    let attributes =
        encode_attributes_base64(&[Attribute::new(RAW_DATA_ATTRIBUTE, blob.clone())]).unwrap();
    let values = TokenValues {
        attributes,
        image_width: 2,
        image_height: 2,
    };

    let template = b"<Item>`attributes`</Item><w>`image_width`</w><h>`image_height`</h>`junk`";
    let mut out = Vec::new();
    render(template, &values, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("<w>2</w>"));
    assert!(text.contains("<h>2</h>"));
    // the unknown token contributes nothing
    assert!(text.ends_with("</h>"));

    let region = text
        .strip_prefix("<Item>")
        .unwrap()
        .split("</Item>")
        .next()
        .unwrap();

    let table = STANDARD.decode(region).unwrap();
    let decoded_attributes = decode_attributes(&table).unwrap();
    assert_eq!(decoded_attributes.len(), 1);
    assert_eq!(decoded_attributes[0].name, RAW_DATA_ATTRIBUTE);
    assert_eq!(decoded_attributes[0].data, blob);

    let decoded = decode(&decoded_attributes[0].data).unwrap();
    assert_eq!(decoded, image);
}

#[test]
fn test_attribute_region_header_fields() {
    let blob = vec![9u8; 17];
    let table = encode_attributes(&[Attribute::new(RAW_DATA_ATTRIBUTE, blob.clone())]).unwrap();

    assert_eq!(&table[0..4], [1, 0, 0, 0]);
    assert_eq!(&table[4..8], [7, 0, 0, 0]);
    assert_eq!(&table[8..15], b"RawData");
    assert_eq!(table[15], 2);
    assert_eq!(&table[16..20], [17, 0, 0, 0]);
    assert_eq!(&table[20..], &blob[..]);
}

#[test]
fn test_resample_then_quantize_counts() {
    let source = solid_rgba(4, 4, [1, 2, 3, 255]);
    let resized = resize_nearest(&source, 4, 4, 4, 2, 2);

    let result = quantize(&resized, 2, 2, 4, &QuantizerConfig::default()).unwrap();
    assert_eq!(result.records.len(), 4);
    assert_eq!(result.palette, vec![[1, 2, 3]]);
}

#[test]
fn test_rendering_is_deterministic() {
    let quantized = quantize(&BOUNDARY_PIXELS, 2, 2, 3, &QuantizerConfig::default()).unwrap();
    let image = PaletteImage::new(2, 2, quantized.palette, quantized.records);
    let attributes =
        encode_attributes_base64(&[Attribute::new(RAW_DATA_ATTRIBUTE, encode(&image).unwrap())])
            .unwrap();
    let values = TokenValues {
        attributes,
        image_width: 2,
        image_height: 2,
    };

    let template = b"data=`attributes` size=`image_width`x`image_height`";
    let mut first = Vec::new();
    render(template, &values, &mut first).unwrap();
    let mut second = Vec::new();
    render(template, &values, &mut second).unwrap();

    assert_eq!(first, second);
}
