//! `pictdbm create`

use std::path::Path;

use miette::{Context, IntoDiagnostic};

use crate::config::DbConfig;
use crate::ops;

pub fn execute(
    db_file: &Path,
    max_files: u32,
    thumb_res: (u16, u16),
    small_res: (u16, u16),
) -> miette::Result<()> {
    let config = DbConfig {
        max_files,
        thumb_res,
        small_res,
    };
    let db = ops::create(db_file, config)
        .into_diagnostic()
        .with_context(|| format!("creating {}", db_file.display()))?;

    println!("{} files, max {} files", db.header().num_files, db.header().max_files);
    Ok(())
}
