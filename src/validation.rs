use crate::constants::DEFAULT_VARIANT_WIDTHS;
use crate::error::InputValidationError;
use std::path::{Path, PathBuf};

/// Resolves the single-file target of a responsive-variant request.
///
/// "all" is refused outright: variants for a whole tree multiply output
/// without bound.
pub fn validate_variant_target(input: &str) -> Result<PathBuf, InputValidationError> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("all") {
        return Err(InputValidationError::BulkVariantsRejected);
    }

    let path = Path::new(trimmed);
    if trimmed.is_empty() || !path.is_file() {
        return Err(InputValidationError::FileNotFound(path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}

/// Parses a comma separated width list such as `400,800,1200`.
///
/// An empty string selects the default breakpoints.
pub fn parse_widths(input: &str) -> Result<Vec<u32>, InputValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_VARIANT_WIDTHS.to_vec());
    }

    trimmed
        .split(',')
        .map(|part| match part.trim().parse::<u32>() {
            Ok(w) if w > 0 => Ok(w),
            _ => Err(InputValidationError::InvalidWidths(input.to_string())),
        })
        .collect()
}

/// Only an explicit "yes" unlocks a destructive run.
pub fn is_confirmation(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("yes")
}
