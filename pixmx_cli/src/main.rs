use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use thiserror::Error;

use lib_pixmx::attributes::{encode_attributes_base64, Attribute, AttributeError};
use lib_pixmx::codec::encoder::EncodeError;
use lib_pixmx::constants::{FILE_EXT, RAW_DATA_ATTRIBUTE, TEMPLATE_PATH};
use lib_pixmx::quantize::QuantizeError;
use lib_pixmx::resample::{aspect_width, resize_nearest};
use lib_pixmx::template::{render, TokenValues};
use lib_pixmx::{PaletteImage, QuantizerConfig};

/// Channels in the normalized pixel buffer (RGBA8).
const CHANNELS: usize = 4;

#[derive(Parser, Debug)]
#[command(
    name = "pixmx",
    version,
    about = "Convert an image into a palette-indexed Roblox model container"
)]
struct Args {
    /// Output image height in pixels; width follows the source aspect ratio
    height: u32,
    /// Source image path
    image: PathBuf,
    /// Container template path
    #[arg(long, default_value = TEMPLATE_PATH)]
    template: PathBuf,
}

#[derive(Error, Debug)]
enum AppError {
    #[error("invalid image height: {0}")]
    InvalidHeight(u32),
    #[error("failed to load image {}: {}", .path.display(), .source)]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("failed to read template {}: {}", .path.display(), .source)]
    TemplateRead { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {}", .path.display(), .source)]
    OutputWrite { path: PathBuf, source: io::Error },
    #[error("quantization failed: {0}")]
    Quantize(#[from] QuantizeError),
    #[error("image encoding failed: {0}")]
    Encode(#[from] EncodeError),
    #[error("attribute encoding failed: {0}")]
    Attributes(#[from] AttributeError),
}

fn main() -> ExitCode {
    lib_pixmx::init_logging();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&args) {
        Ok(output) => {
            info!("wrote image to {}", output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<PathBuf, AppError> {
    if args.height == 0 {
        return Err(AppError::InvalidHeight(args.height));
    }

    let source = image::open(&args.image)
        .map_err(|source| AppError::ImageLoad {
            path: args.image.clone(),
            source,
        })?
        .to_rgba8();
    let (source_width, source_height) = source.dimensions();

    let desired_width = aspect_width(source_width, source_height, args.height);
    let resized = resize_nearest(
        source.as_raw(),
        source_width,
        source_height,
        CHANNELS,
        desired_width,
        args.height,
    );
    info!("resized image to {}x{}", desired_width, args.height);

    let quantized = lib_pixmx::quantize(
        &resized,
        desired_width,
        args.height,
        CHANNELS,
        &QuantizerConfig::default(),
    )?;
    info!(
        "{} colors, {} index records",
        quantized.palette.len(),
        quantized.records.len()
    );

    let image = PaletteImage::new(
        desired_width,
        args.height,
        quantized.palette,
        quantized.records,
    );
    let blob = lib_pixmx::encode(&image)?;

    // The template must be readable before the output file is created.
    let template = fs::read(&args.template).map_err(|source| AppError::TemplateRead {
        path: args.template.clone(),
        source,
    })?;

    let attributes = encode_attributes_base64(&[Attribute::new(RAW_DATA_ATTRIBUTE, blob)])?;
    let values = TokenValues {
        attributes,
        image_width: desired_width,
        image_height: args.height,
    };

    let output = args.image.with_extension(FILE_EXT);
    let file = File::create(&output).map_err(|source| AppError::OutputWrite {
        path: output.clone(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    render(&template, &values, &mut writer)
        .and_then(|()| writer.flush())
        .map_err(|source| AppError::OutputWrite {
            path: output.clone(),
            source,
        })?;

    Ok(output)
}
