//! `pictdbm gc`

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use miette::{Context, IntoDiagnostic};

use crate::db::{Db, OpenMode};
use crate::gc;

pub fn execute(db_file: &Path) -> miette::Result<()> {
    let mut db = Db::open(db_file, OpenMode::ReadWrite)
        .into_diagnostic()
        .with_context(|| format!("opening {}", db_file.display()))?;

    let dir = db_file.parent().unwrap_or_else(|| Path::new("."));
    let temp = tempfile::Builder::new()
        .prefix(".pictdb-gc-")
        .tempfile_in(dir)
        .into_diagnostic()?
        .into_temp_path();
    let temp_path = temp.to_path_buf();
    // release the handle so gc::collect can create/rename over the same path
    temp.close().into_diagnostic()?;

    let pb = ProgressBar::new_spinner().with_message("Reclaiming space");
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .into_diagnostic()?,
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = gc::collect(&mut db, &temp_path);
    pb.finish_and_clear();

    result
        .into_diagnostic()
        .with_context(|| format!("collecting garbage in {}", db_file.display()))?;

    println!("{} files remain", db.header().num_files);
    Ok(())
}
