//! Lazy resize (component C7).
//!
//! Produces and persists resolution `r` for slot `index` the first time it
//! is requested. Calling this twice in succession for the same slot and
//! resolution is a no-op the second time.

use crate::db::Db;
use crate::error::{PictDbError, Result};
use crate::image_adapter;
use crate::layout::RES_ORIG;
use crate::resolution::Resolution;

fn target_dims(db: &Db, resolution: Resolution) -> (u32, u32) {
    let res = db.header().res_resized;
    match resolution {
        Resolution::Thumb => (res[0] as u32, res[1] as u32),
        Resolution::Small => (res[2] as u32, res[3] as u32),
        Resolution::Orig => unreachable!("orig has no target dimensions"),
    }
}

/// Materialises `resolution` for the slot at `index` if it is missing.
pub fn materialize(db: &mut Db, index: usize, resolution: Resolution) -> Result<()> {
    if resolution == Resolution::Orig {
        return Ok(());
    }

    let slot = db
        .slots()
        .get(index)
        .ok_or(PictDbError::InvalidArgument)?;
    if !slot.is_non_empty() {
        return Err(PictDbError::InvalidArgument);
    }

    let r = resolution.index();
    if slot.size[r] != 0 {
        // already materialised
        return Ok(());
    }

    let orig_offset = slot.offset[RES_ORIG];
    let orig_size = slot.size[RES_ORIG];
    let sha = slot.sha;

    let original = db.read_blob(orig_offset, orig_size)?;
    let (max_w, max_h) = target_dims(db, resolution);
    let resized = image_adapter::resize_to_fit(&original, max_w, max_h)?;
    let new_size = resized.len() as u32;
    let new_off = db.append_blob(&resized)?;

    let mut touched = Vec::new();
    for (i, s) in db.slots().iter().enumerate() {
        if s.is_non_empty() && s.sha == sha && s.size[r] == 0 {
            touched.push(i);
        }
    }

    for &i in &touched {
        let s = &mut db.slots_mut()[i];
        s.offset[r] = new_off;
        s.size[r] = new_size;
    }

    for &i in &touched {
        db.write_slot(i)?;
    }

    db.header_mut().version += 1;
    db.write_header()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Header, NON_EMPTY, RES_ORIG};
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

    fn db_with_original(data: &[u8], id: &str) -> (Db, u64) {
        let path = NamedTempFile::new().unwrap().into_temp_path().to_path_buf();
        let mut db = Db::create(&path, Header::new("a.db", 2, [64, 64, 256, 256])).unwrap();
        let offset = db.append_blob(data).unwrap();

        let slot = &mut db.slots_mut()[0];
        slot.pict_id = id.to_string();
        slot.sha = [1u8; 32];
        slot.orig_res = [200, 100];
        slot.size[RES_ORIG] = data.len() as u32;
        slot.offset[RES_ORIG] = offset;
        slot.is_valid = NON_EMPTY;
        db.write_slot(0).unwrap();
        db.write_header().unwrap();

        (db, offset)
    }

    #[test]
    fn materializes_thumb_on_first_call() {
        let data = make_jpeg(200, 100);
        let (mut db, _) = db_with_original(&data, "cat");

        materialize(&mut db, 0, Resolution::Thumb).unwrap();
        let slot = &db.slots()[0];
        assert!(slot.size[Resolution::Thumb.index()] > 0);
        assert!(slot.offset[Resolution::Thumb.index()] != 0);
    }

    #[test]
    fn second_call_is_a_no_op() {
        let data = make_jpeg(200, 100);
        let (mut db, _) = db_with_original(&data, "cat");

        materialize(&mut db, 0, Resolution::Thumb).unwrap();
        let version_after_first = db.header().version;
        let offset_after_first = db.slots()[0].offset[Resolution::Thumb.index()];

        materialize(&mut db, 0, Resolution::Thumb).unwrap();
        assert!(db.header().version == version_after_first);
        assert!(db.slots()[0].offset[Resolution::Thumb.index()] == offset_after_first);
    }

    #[test]
    fn orig_resolution_is_always_a_no_op() {
        let data = make_jpeg(200, 100);
        let (mut db, _) = db_with_original(&data, "cat");
        let version_before = db.header().version;

        materialize(&mut db, 0, Resolution::Orig).unwrap();
        assert!(db.header().version == version_before);
    }

    #[test]
    fn shares_resize_across_slots_with_same_sha() {
        let data = make_jpeg(200, 100);
        let path = NamedTempFile::new().unwrap().into_temp_path().to_path_buf();
        let mut db = Db::create(&path, Header::new("a.db", 2, [64, 64, 256, 256])).unwrap();

        let offset = db.append_blob(&data).unwrap();
        for (i, id) in ["a", "b"].iter().enumerate() {
            let slot = &mut db.slots_mut()[i];
            slot.pict_id = id.to_string();
            slot.sha = [3u8; 32];
            slot.size[RES_ORIG] = data.len() as u32;
            slot.offset[RES_ORIG] = offset;
            slot.is_valid = NON_EMPTY;
            db.write_slot(i).unwrap();
        }

        materialize(&mut db, 0, Resolution::Thumb).unwrap();

        let a = &db.slots()[0];
        let b = &db.slots()[1];
        assert!(a.offset[Resolution::Thumb.index()] == b.offset[Resolution::Thumb.index()]);
        assert!(a.size[Resolution::Thumb.index()] == b.size[Resolution::Thumb.index()]);
    }

    #[test]
    fn rejects_out_of_bounds_index() {
        let data = make_jpeg(200, 100);
        let (mut db, _) = db_with_original(&data, "cat");
        let result = materialize(&mut db, 99, Resolution::Thumb);
        assert!(result.is_err());
    }
}
