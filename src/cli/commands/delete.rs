//! `pictdbm delete`

use std::path::Path;

use miette::{Context, IntoDiagnostic};

use crate::db::{Db, OpenMode};
use crate::ops;

pub fn execute(db_file: &Path, pict_id: &str) -> miette::Result<()> {
    let mut db = Db::open(db_file, OpenMode::ReadWrite)
        .into_diagnostic()
        .with_context(|| format!("opening {}", db_file.display()))?;

    ops::delete(&mut db, pict_id)
        .into_diagnostic()
        .with_context(|| format!("deleting `{pict_id}`"))?;

    println!("Delete");
    Ok(())
}
