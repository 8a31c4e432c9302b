//! Interactive front end: collects choices from a reader and hands fully
//! resolved policies to [`crate::commands`].

use crate::batch::{BatchConfig, CancelToken};
use crate::commands::{count_candidates, run_analyze, run_recompress, run_responsive};
use crate::constants::DEFAULT_VARIANT_WIDTHS;
use crate::error::InputValidationError;
use crate::policy::Preset;
use crate::validation::{is_confirmation, validate_variant_target};
use anyhow::Result;
use std::io::{BufRead, Write};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Analyze,
    Recompress,
    Responsive,
    Exit,
}

impl FromStr for MenuAction {
    type Err = InputValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MenuAction::Analyze),
            "2" => Ok(MenuAction::Recompress),
            "3" => Ok(MenuAction::Responsive),
            "4" => Ok(MenuAction::Exit),
            other => Err(InputValidationError::InvalidChoice(other.to_string())),
        }
    }
}

/// How a single menu round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    Completed,
    /// Input was rejected before anything was written.
    Rejected,
    /// The user declined the confirmation.
    Declined,
    Exited,
}

pub struct Menu<R, W> {
    input: R,
    output: W,
    config: BatchConfig,
    cancel: CancelToken,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W, config: BatchConfig) -> Self {
        Self {
            input,
            output,
            config,
            cancel: CancelToken::new(),
        }
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Shows the menu once and performs the chosen action.
    pub fn run(&mut self) -> Result<MenuOutcome> {
        writeln!(self.output, "{}", "=".repeat(60))?;
        writeln!(self.output, "Image Optimization Tool")?;
        writeln!(self.output, "{}", "=".repeat(60))?;
        writeln!(self.output, "\nOptions:")?;
        writeln!(self.output, "1. Analyze images and show recommendations")?;
        writeln!(self.output, "2. Re-compress WebP images with optimal quality")?;
        writeln!(self.output, "3. Generate responsive image sizes")?;
        writeln!(self.output, "4. Exit")?;

        let choice = self.prompt("\nSelect option (1-4): ")?;
        match choice.parse::<MenuAction>() {
            Ok(MenuAction::Analyze) => {
                run_analyze(&self.config)?;
                Ok(MenuOutcome::Completed)
            }
            Ok(MenuAction::Recompress) => self.recompress(),
            Ok(MenuAction::Responsive) => self.responsive(),
            Ok(MenuAction::Exit) => {
                writeln!(self.output, "Exiting...")?;
                Ok(MenuOutcome::Exited)
            }
            Err(e) => self.reject(e),
        }
    }

    fn recompress(&mut self) -> Result<MenuOutcome> {
        writeln!(self.output, "\nRe-compression Options:")?;
        for (i, preset) in Preset::ALL.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, preset.menu_label())?;
        }

        let preset = match self.prompt("\nSelect quality (1-4): ")?.parse::<Preset>() {
            Ok(preset) => preset,
            Err(e) => return self.reject(e),
        };

        let found = count_candidates(&self.config)?;
        writeln!(self.output, "\nFound {} WebP images", found)?;
        let answer = self.prompt("Proceed with re-compression? (yes/no): ")?;
        if !is_confirmation(&answer) {
            writeln!(self.output, "Cancelled")?;
            return Ok(MenuOutcome::Declined);
        }

        run_recompress(&self.config, &preset.policy(), &self.cancel)?;
        Ok(MenuOutcome::Completed)
    }

    fn responsive(&mut self) -> Result<MenuOutcome> {
        writeln!(
            self.output,
            "\nThis will create multiple sizes of images for srcset."
        )?;
        writeln!(
            self.output,
            "Example: product.webp -> product-400w.webp, product-800w.webp, etc."
        )?;

        let answer = self.prompt("\nEnter image path (or 'all' for all images): ")?;
        let path = match validate_variant_target(&answer) {
            Ok(path) => path,
            Err(e) => return self.reject(e),
        };

        run_responsive(&path, &DEFAULT_VARIANT_WIDTHS);
        Ok(MenuOutcome::Completed)
    }

    fn reject(&mut self, e: InputValidationError) -> Result<MenuOutcome> {
        writeln!(self.output, "{}", e)?;
        Ok(MenuOutcome::Rejected)
    }

    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}
