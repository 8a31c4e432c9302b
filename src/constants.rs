pub const PHOTOS_QUALITY: u8 = 85;
pub const GRAPHICS_QUALITY: u8 = 90;
pub const THUMBNAILS_QUALITY: u8 = 75;
/// Quality used for opaque images when the lossless preset is selected.
pub const LOSSLESS_OPAQUE_QUALITY: u8 = 90;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// Responsive variants ignore the recompression policy.
pub const VARIANT_QUALITY: u8 = 85;
pub const DEFAULT_VARIANT_WIDTHS: [u32; 4] = [400, 800, 1200, 1600];

/// libwebp `method`: 0 = fast, 6 = slowest / smallest output.
pub const WEBP_METHOD: i32 = 6;

pub const TARGET_EXTENSION: &str = "webp";
pub const EXCLUDED_DIRS: [&str; 5] = [".git", "node_modules", "__pycache__", ".venv", "venv"];

/// Largest width or height a WebP bitstream can carry.
pub const WEBP_MAX_DIMENSION: u32 = 16383;

pub const ANALYZE_LIMIT: usize = 50;
pub const LARGE_IMAGE_KB: f64 = 200.0;
pub const VERY_LARGE_IMAGE_KB: f64 = 500.0;
pub const VERY_LARGE_REPORT_LIMIT: usize = 5;

pub const PROGRESS_REPORT_INTERVAL: usize = 50;
pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
pub const PROGRESS_BAR_TEMPLATE: &str = "{spinner:.green} {pos} files {msg}";

/// Memory headroom assumed per worker: one decoded 16k x 4k RGBA frame.
pub const WORKER_MEMORY_BUDGET_MIB: u64 = 256;
pub const MIN_AVAILABLE_MEMORY_MIB: u64 = 512;

pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
pub const ERROR_PREFIX: &str = "❌";
pub const VERBOSE_PREFIX: &str = "🔍";
