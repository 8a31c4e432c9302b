use std::path::PathBuf;
use thiserror::Error;

/// The file could not be opened or decoded. The file is skipped.
#[derive(Debug, Error)]
pub enum InspectionError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("PNG decode error: {0}")]
    Png(#[from] png::DecodingError),

    #[error("Unsupported palette layout: {0}")]
    UnsupportedPalette(String),
}

/// Decode, encode or write failure while producing an output file.
#[derive(Debug, Error)]
pub enum CompressionError {
    #[error(transparent)]
    Inspection(#[from] InspectionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("WebP encode error: {0}")]
    WebPEncode(String),

    #[error("Invalid output dimensions: {0}x{1}. WebP allows 1 to 16383 pixels per side")]
    InvalidDimensions(u32, u32),

    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An interactive or command-line choice was rejected before any file was touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputValidationError {
    #[error("Invalid choice: {0:?}")]
    InvalidChoice(String),

    #[error("Generating responsive sizes for all images is not supported. Please specify an individual image.")]
    BulkVariantsRejected,

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid width list: {0:?}")]
    InvalidWidths(String),
}

/// Environment-level failures. These are the only errors that end a run.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Root directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Root is not a directory: {0}")]
    RootNotDirectory(PathBuf),

    #[error("Cannot read root directory {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, CompressionError>;
