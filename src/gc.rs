//! Garbage collector (component C8): rebuild-and-swap compaction.
//!
//! Deleted slots never free disk space; `collect` is the only way to
//! reclaim it. The rebuild recomputes every non-original resolution rather
//! than copying it, which keeps invariant 5 (content-sharing) trivially
//! true in the freshly built file.

use std::path::Path;

use crate::config::DbConfig;
use crate::db::{Db, OpenMode};
use crate::error::Result;
use crate::layout::{RES_ORIG, RES_SMALL, RES_THUMB};
use crate::ops;
use crate::resize;
use crate::resolution::Resolution;

/// Rebuilds `db` into `temp_path`, keeping only valid entries, then swaps
/// `temp_path` into `db`'s original location. On success, `db` is reopened
/// against the rebuilt file so the handle remains usable. On any failure,
/// `temp_path` is removed and the original file is left untouched.
pub fn collect(db: &mut Db, temp_path: &Path) -> Result<()> {
    let current_path = db.path().to_path_buf();
    let mode = db.mode();

    match rebuild(db, temp_path) {
        Ok(()) => {
            std::fs::remove_file(&current_path)?;
            std::fs::rename(temp_path, &current_path)?;
            *db = Db::open(&current_path, mode)?;
            Ok(())
        }
        Err(err) => {
            let _ = std::fs::remove_file(temp_path);
            Err(err)
        }
    }
}

fn rebuild(db: &mut Db, temp_path: &Path) -> Result<()> {
    let old_header = db.header().clone();
    let config = DbConfig {
        max_files: old_header.max_files,
        thumb_res: (old_header.res_resized[0], old_header.res_resized[1]),
        small_res: (old_header.res_resized[2], old_header.res_resized[3]),
    };

    let mut new_db = ops::create(temp_path, config)?;

    let survivors: Vec<_> = db
        .slots()
        .iter()
        .filter(|s| s.is_non_empty())
        .cloned()
        .collect();

    for old_slot in &survivors {
        let bytes = db.read_blob(old_slot.offset[RES_ORIG], old_slot.size[RES_ORIG])?;
        ops::insert(&mut new_db, &old_slot.pict_id, &bytes)?;
        let new_index = new_db
            .find_by_id(&old_slot.pict_id)
            .ok_or(crate::error::PictDbError::InvalidArgument)?;

        if old_slot.size[RES_THUMB] != 0 {
            resize::materialize(&mut new_db, new_index, Resolution::Thumb)?;
        }
        if old_slot.size[RES_SMALL] != 0 {
            resize::materialize(&mut new_db, new_index, Resolution::Small)?;
        }
    }

    new_db.header_mut().version = old_header.version;
    new_db.header_mut().db_name = old_header.db_name;
    new_db.write_header()?;
    new_db.close()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PictDbError;
    use crate::ops::{self, ListMode};
    use assert2::check as assert;
    use image::ImageFormat;
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    fn make_jpeg(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(w, h, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 0])
        });
        let mut out = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)
            .unwrap();
        out
    }

    #[test]
    fn gc_preserves_surviving_entries_and_drops_deleted() {
        let path = NamedTempFile::new().unwrap().into_temp_path().to_path_buf();
        let mut db = ops::create(
            &path,
            DbConfig {
                max_files: 5,
                ..Default::default()
            },
        )
        .unwrap();

        ops::insert(&mut db, "a", &make_jpeg(10, 10)).unwrap();
        ops::insert(&mut db, "b", &make_jpeg(11, 11)).unwrap();
        ops::insert(&mut db, "c", &make_jpeg(12, 12)).unwrap();
        ops::delete(&mut db, "b").unwrap();

        let version_before = db.header().version;
        let temp = NamedTempFile::new().unwrap().into_temp_path().to_path_buf();
        collect(&mut db, &temp).unwrap();

        assert!(db.header().version == version_before);
        assert!(db.header().num_files == 2);
        assert!(db.find_by_id("a").is_some());
        assert!(db.find_by_id("c").is_some());
        assert!(db.find_by_id("b").is_none());

        let json = ops::list(&db, ListMode::Json).unwrap().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["Pictures"].as_array().unwrap().len() == 2);
    }

    #[test]
    fn gc_preserves_already_materialised_resolutions() {
        let path = NamedTempFile::new().unwrap().into_temp_path().to_path_buf();
        let mut db = ops::create(
            &path,
            DbConfig {
                max_files: 2,
                ..Default::default()
            },
        )
        .unwrap();

        ops::insert(&mut db, "cat", &make_jpeg(300, 200)).unwrap();
        ops::read(&mut db, "cat", Resolution::Thumb).unwrap();

        let temp = NamedTempFile::new().unwrap().into_temp_path().to_path_buf();
        collect(&mut db, &temp).unwrap();

        let idx = db.find_by_id("cat").unwrap();
        assert!(db.slots()[idx].size[Resolution::Thumb.index()] > 0);
    }

    #[test]
    fn gc_failure_leaves_original_file_untouched() {
        let path = NamedTempFile::new().unwrap().into_temp_path().to_path_buf();
        let mut db = ops::create(
            &path,
            DbConfig {
                max_files: 1,
                ..Default::default()
            },
        )
        .unwrap();
        ops::insert(&mut db, "cat", &make_jpeg(10, 10)).unwrap();

        // point temp_path at a directory that cannot be created to force a failure
        let bad_temp = path.join("not/a/real/dir/temp.db");
        let result = collect(&mut db, &bad_temp);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), PictDbError::Io(_)));

        // original db is still readable
        assert!(db.find_by_id("cat").is_some());
    }
}
