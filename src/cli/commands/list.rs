//! `pictdbm list`

use std::path::Path;

use miette::{Context, IntoDiagnostic};

use crate::db::{Db, OpenMode};
use crate::ops::{self, ListMode};

pub fn execute(db_file: &Path) -> miette::Result<()> {
    let db = Db::open(db_file, OpenMode::ReadOnly)
        .into_diagnostic()
        .with_context(|| format!("opening {}", db_file.display()))?;
    ops::list(&db, ListMode::Stdout).into_diagnostic()?;
    Ok(())
}
