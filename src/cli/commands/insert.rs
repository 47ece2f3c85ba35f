//! `pictdbm insert`

use std::path::Path;

use miette::{Context, IntoDiagnostic};

use crate::db::{Db, OpenMode};
use crate::ops;

pub fn execute(db_file: &Path, pict_id: &str, image_file: &Path) -> miette::Result<()> {
    let bytes = std::fs::read(image_file)
        .into_diagnostic()
        .with_context(|| format!("reading {}", image_file.display()))?;

    let mut db = Db::open(db_file, OpenMode::ReadWrite)
        .into_diagnostic()
        .with_context(|| format!("opening {}", db_file.display()))?;

    ops::insert(&mut db, pict_id, &bytes)
        .into_diagnostic()
        .with_context(|| format!("inserting `{pict_id}`"))?;

    println!("Insert");
    Ok(())
}
