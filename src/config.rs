//! Configuration accepted by [`crate::ops::create`].

use crate::error::{PictDbError, Result};
use crate::layout::{MAX_MAX_FILES, MAX_SMALL_RES, MAX_THUMB_RES};

/// Default table capacity used when `create` is invoked without an explicit
/// `max_files`.
pub const DEFAULT_MAX_FILES: u32 = 10;
/// Default thumbnail dimensions.
pub const DEFAULT_THUMB_RES: (u16, u16) = (64, 64);
/// Default small-resolution dimensions.
pub const DEFAULT_SMALL_RES: (u16, u16) = (256, 256);

/// Parameters for creating a new database.
#[derive(Debug, Clone, Copy)]
pub struct DbConfig {
    /// Metadata table capacity.
    pub max_files: u32,
    /// Thumbnail `(width, height)` cap.
    pub thumb_res: (u16, u16),
    /// Small-resolution `(width, height)` cap.
    pub small_res: (u16, u16),
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            thumb_res: DEFAULT_THUMB_RES,
            small_res: DEFAULT_SMALL_RES,
        }
    }
}

impl DbConfig {
    /// Validates bounds per `spec.md` §3: `1 <= max_files <= 100_000`, and
    /// every resized dimension between `1` and its per-kind cap.
    pub fn validate(&self) -> Result<()> {
        if self.max_files == 0 || self.max_files > MAX_MAX_FILES {
            return Err(PictDbError::MaxFiles);
        }

        let (tw, th) = self.thumb_res;
        let (sw, sh) = self.small_res;
        let in_bounds = |v: u16, cap: u16| v >= 1 && v <= cap;

        if !in_bounds(tw, MAX_THUMB_RES)
            || !in_bounds(th, MAX_THUMB_RES)
            || !in_bounds(sw, MAX_SMALL_RES)
            || !in_bounds(sh, MAX_SMALL_RES)
        {
            return Err(PictDbError::Resolutions);
        }

        Ok(())
    }

    /// Packs the four resized dimensions into header field order:
    /// `(thumb_width, thumb_height, small_width, small_height)`.
    pub const fn res_resized(&self) -> [u16; 4] {
        [
            self.thumb_res.0,
            self.thumb_res.1,
            self.small_res.0,
            self.small_res.1,
        ]
    }
}
