//! Pipeline-wide configuration constants.

/// Extension given to generated container files.
pub const FILE_EXT: &str = "rbxmx";

/// Default relative path of the container template.
pub const TEMPLATE_PATH: &str = "raw-data.txt";

/// Attribute under which the encoded image blob is stored in the container.
pub const RAW_DATA_ATTRIBUTE: &str = "RawData";

/// Relative per-channel tolerance used by fuzzy color matching.
pub const COLOR_FUZZ: f32 = 0.1;
