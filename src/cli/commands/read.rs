//! `pictdbm read`

use std::path::Path;

use miette::{Context, IntoDiagnostic};

use crate::db::{Db, OpenMode};
use crate::ops;
use crate::resolution::Resolution;

pub fn execute(db_file: &Path, pict_id: &str, resolution: &str) -> miette::Result<()> {
    let resolution = Resolution::parse(resolution).into_diagnostic()?;

    let mut db = Db::open(db_file, OpenMode::ReadWrite)
        .into_diagnostic()
        .with_context(|| format!("opening {}", db_file.display()))?;

    let bytes = ops::read(&mut db, pict_id, resolution)
        .into_diagnostic()
        .with_context(|| format!("reading `{pict_id}`"))?;

    let out_name = format!("{pict_id}_{}.jpg", suffix(resolution));
    std::fs::write(&out_name, &bytes)
        .into_diagnostic()
        .with_context(|| format!("writing {out_name}"))?;

    println!("Read");
    Ok(())
}

const fn suffix(resolution: Resolution) -> &'static str {
    match resolution {
        Resolution::Thumb => "thumb",
        Resolution::Small => "small",
        Resolution::Orig => "orig",
    }
}
