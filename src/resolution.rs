//! Resolution tag used by `read` and lazy resize.

use crate::error::{PictDbError, Result};
use crate::layout::{RES_ORIG, RES_SMALL, RES_THUMB};

/// One of the three resolutions a slot can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The smallest, eagerly-materialised-on-read thumbnail.
    Thumb,
    /// The mid-size resolution.
    Small,
    /// The bytes exactly as inserted.
    Orig,
}

impl Resolution {
    /// Parses a resolution tag as accepted on the CLI and in HTTP query
    /// strings: `thumb`/`thumbnail`, `small`, `orig`/`original`.
    pub fn parse(tag: &str) -> Result<Self> {
        match tag {
            "thumb" | "thumbnail" => Ok(Self::Thumb),
            "small" => Ok(Self::Small),
            "orig" | "original" => Ok(Self::Orig),
            _ => Err(PictDbError::Resolutions),
        }
    }

    /// The slot-table index (`size`/`offset`) this resolution uses.
    pub const fn index(self) -> usize {
        match self {
            Self::Thumb => RES_THUMB,
            Self::Small => RES_SMALL,
            Self::Orig => RES_ORIG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check as assert;

    #[test]
    fn parses_all_known_tags() {
        assert!(Resolution::parse("thumb").unwrap() == Resolution::Thumb);
        assert!(Resolution::parse("thumbnail").unwrap() == Resolution::Thumb);
        assert!(Resolution::parse("small").unwrap() == Resolution::Small);
        assert!(Resolution::parse("orig").unwrap() == Resolution::Orig);
        assert!(Resolution::parse("original").unwrap() == Resolution::Orig);
    }

    #[test]
    fn rejects_unknown_tag() {
        assert!(Resolution::parse("huge").is_err());
    }

    #[test]
    fn index_matches_layout_constants() {
        assert!(Resolution::Thumb.index() == RES_THUMB);
        assert!(Resolution::Small.index() == RES_SMALL);
        assert!(Resolution::Orig.index() == RES_ORIG);
    }
}
