//! pictDB
//!
//! A single-file image store that keeps one "original" picture together
//! with on-demand derived resolutions (a thumbnail and a small variant),
//! deduplicates both by identifier collision and by content hash, and
//! reclaims space on request.
//!
//! The on-disk format is a fixed header, followed by exactly `max_files`
//! metadata slots, followed by appended JPEG blobs addressed only through
//! slot offsets. See [`layout`] for the exact byte layout.
//!
//! # Examples
//!
//! ```no_run
//! use pictdb::{ops, DbConfig, Resolution};
//!
//! let mut db = ops::create(std::path::Path::new("gallery.pictdb"), DbConfig::default())?;
//! ops::insert(&mut db, "cover", &std::fs::read("cover.jpg")?)?;
//! let thumb = ops::read(&mut db, "cover", Resolution::Thumb)?;
//! # Ok::<(), pictdb::PictDbError>(())
//! ```

pub mod cli;
pub mod config;
pub mod db;
pub mod dedup;
pub mod error;
pub mod gc;
pub mod http;
pub mod image_adapter;
pub mod layout;
pub mod ops;
pub mod prelude;
pub mod resize;
pub mod resolution;

pub use config::DbConfig;
pub use db::{Db, OpenMode};
pub use error::{PictDbError, Result};
pub use resolution::Resolution;
