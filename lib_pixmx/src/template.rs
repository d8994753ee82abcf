//! Minimal single-pass macro substitution for text container templates.

use std::io::{self, Write};

/// Delimiter opening and closing a substitution token.
pub const TOKEN_DELIMITER: u8 = b'`';

/// Values substituted for recognized template tokens.
#[derive(Debug, Clone)]
pub struct TokenValues {
    pub attributes: String,
    pub image_width: u32,
    pub image_height: u32,
}

/// Streams `template` to `out`, copying bytes verbatim outside token regions.
///
/// Between two backticks, bytes accumulate into a token name instead; on the
/// closing backtick the name dispatches: `attributes`, `image_width` and
/// `image_height` expand to the matching [`TokenValues`] field, any other
/// name is consumed without output. A token still open at the end of the
/// template is discarded, never flushed as literal text. No nesting, no
/// escaping of the delimiter.
pub fn render<W: Write>(template: &[u8], values: &TokenValues, out: &mut W) -> io::Result<()> {
    let mut token: Option<Vec<u8>> = None;

    for &byte in template {
        if byte == TOKEN_DELIMITER {
            match token.take() {
                Some(name) => substitute(&name, values, out)?,
                None => token = Some(Vec::new()),
            }
        } else {
            match &mut token {
                Some(name) => name.push(byte),
                None => out.write_all(&[byte])?,
            }
        }
    }

    Ok(())
}

fn substitute<W: Write>(name: &[u8], values: &TokenValues, out: &mut W) -> io::Result<()> {
    match name {
        b"attributes" => out.write_all(values.attributes.as_bytes()),
        b"image_width" => write!(out, "{}", values.image_width),
        b"image_height" => write!(out, "{}", values.image_height),
        _ => Ok(()),
    }
}
