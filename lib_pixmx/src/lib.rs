pub mod attributes;
pub mod bytes;
pub mod codec;
pub mod constants;
pub mod quantize;
pub mod resample;
pub mod template;

use std::io::Write;

pub use crate::codec::format::PaletteImage;
pub use crate::codec::{decode, encode};
pub use crate::quantize::{quantize, Quantization, QuantizerConfig};

pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}
