pub mod logger;

pub mod batch;
pub mod cli;
pub mod commands;
pub mod constants;
pub mod encode;
pub mod error;
pub mod info;
pub mod inspect;
pub mod menu;
pub mod normalize;
pub mod policy;
pub mod raster;
pub mod recompress;
pub mod utils;
pub mod validation;
pub mod variants;

pub use batch::{recompress_all, BatchConfig, BatchSummary, CancelToken, FileOutcome, ImageWalker};
pub use error::{BatchError, CompressionError, InputValidationError, InspectionError, Result};
pub use inspect::{inspect, ImageAsset};
pub use normalize::{normalize, NormalizedImage};
pub use policy::{CompressionPolicy, EncodeMode, Preset};
pub use raster::{ColorMode, SourceRaster};
pub use recompress::{recompress, try_recompress, RecompressReport};
pub use variants::{generate, plan_variants, VariantSpec};
