//! The load → decode → extract → encode pipeline and its run guard.
//!
//! Each file selection starts a new run. [`RunGuard`] hands out generation
//! tickets so that a run finishing after a newer one has started can be
//! recognized and its result dropped: the last *selected* file wins, not the
//! last one to finish.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::css::{encode_box_shadow, shadow_count, EncodeOptions};
use crate::decode::{decode_url, DecodeError};
use crate::load::{read_bytes, read_path, Encoding, FileContents, LoadError};
use crate::pixels::{extract_pixels, GridError, PixelGrid};
use crate::scale::ScaleConfig;

/// Pixel buffers larger than this many bytes need user confirmation.
pub const DEFAULT_CONFIRM_THRESHOLD_BYTES: usize = 1_000_000;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Grid(#[from] GridError),

    /// The user declined to convert a large image.
    #[error("Conversion of a {bytes}-byte pixel buffer was declined")]
    Declined { bytes: usize },

    /// A newer run started before this one finished.
    #[error("Run {ticket} was superseded by run {current}")]
    Superseded { ticket: u64, current: u64 },
}

impl PipelineError {
    /// Returns true for outcomes that should not be reported to the user.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            PipelineError::Declined { .. } | PipelineError::Superseded { .. }
        )
    }
}

/// Message shown to the user when a run fails.
pub fn failure_message(err: &PipelineError) -> String {
    format!("oh no: {}", err)
}

/// Pipeline settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Pixel buffer size (bytes) above which confirmation is requested
    pub confirm_threshold_bytes: usize,
    pub encode: EncodeOptions,
    pub scale: ScaleConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            confirm_threshold_bytes: DEFAULT_CONFIRM_THRESHOLD_BYTES,
            encode: EncodeOptions::default(),
            scale: ScaleConfig::default(),
        }
    }
}

/// Identifies one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTicket(u64);

impl RunTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Generation counter for at-most-one-live pipeline run.
#[derive(Debug, Default)]
pub struct RunGuard {
    current: u64,
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run, superseding every earlier ticket.
    pub fn begin(&mut self) -> RunTicket {
        self.current += 1;
        RunTicket(self.current)
    }

    pub fn is_current(&self, ticket: RunTicket) -> bool {
        ticket.0 == self.current
    }

    /// # Errors
    ///
    /// Returns `PipelineError::Superseded` if a newer run has started.
    pub fn check(&self, ticket: RunTicket) -> Result<(), PipelineError> {
        if self.is_current(ticket) {
            Ok(())
        } else {
            Err(PipelineError::Superseded {
                ticket: ticket.0,
                current: self.current,
            })
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub width: u32,
    pub height: u32,
    /// Number of shadow entries in `box_shadow`
    pub shadow_count: usize,
    pub box_shadow: String,
}

/// Synchronous pipeline over in-memory bytes or files on disk.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Returns true if encoding this grid needs user confirmation first.
    pub fn needs_confirmation(&self, grid: &PixelGrid) -> bool {
        grid.byte_len() > self.config.confirm_threshold_bytes
    }

    /// Run the full pipeline over file bytes.
    ///
    /// `confirm` is called with the pixel buffer size only when it exceeds
    /// the configured threshold; returning `false` aborts the run.
    pub fn run_bytes(
        &self,
        bytes: &[u8],
        mime: &str,
        confirm: impl FnOnce(usize) -> bool,
    ) -> Result<PipelineOutput, PipelineError> {
        let contents = read_bytes(bytes, mime, Encoding::DataUrl);
        self.run_contents(&contents, confirm)
    }

    /// Run the full pipeline over a file on disk.
    pub fn run_path(
        &self,
        path: impl AsRef<Path>,
        confirm: impl FnOnce(usize) -> bool,
    ) -> Result<PipelineOutput, PipelineError> {
        let contents = read_path(path, Encoding::DataUrl)?;
        self.run_contents(&contents, confirm)
    }

    fn run_contents(
        &self,
        contents: &FileContents,
        confirm: impl FnOnce(usize) -> bool,
    ) -> Result<PipelineOutput, PipelineError> {
        let url = match contents {
            FileContents::DataUrl(url) => url,
            other => {
                return Err(LoadError::InvalidArgument(other.encoding().to_string()).into());
            }
        };

        let image = decode_url(url)?;
        let grid = extract_pixels(&image);
        self.encode_grid(&grid, confirm)
    }

    /// Confirmation and encoding, the tail shared with the browser pipeline.
    pub fn encode_grid(
        &self,
        grid: &PixelGrid,
        confirm: impl FnOnce(usize) -> bool,
    ) -> Result<PipelineOutput, PipelineError> {
        if self.needs_confirmation(grid) && !confirm(grid.byte_len()) {
            log::info!("conversion of {} bytes declined", grid.byte_len());
            return Err(PipelineError::Declined {
                bytes: grid.byte_len(),
            });
        }

        let box_shadow = encode_box_shadow(grid, &self.config.encode);
        let count = shadow_count(grid, self.config.encode.transparency);
        log::debug!(
            "encoded {}x{} grid into {} shadows ({} bytes of CSS)",
            grid.width(),
            grid.height(),
            count,
            box_shadow.len()
        );

        Ok(PipelineOutput {
            width: grid.width(),
            height: grid.height(),
            shadow_count: count,
            box_shadow,
        })
    }
}
