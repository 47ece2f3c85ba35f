//! Dedup engine (component C4).
//!
//! Invoked by [`crate::ops::insert`] immediately after the candidate slot has
//! been populated (id, sha, `size[ORIG]`, `is_valid = NON_EMPTY`) but before
//! any blob has been written. Enforces identifier uniqueness and shares
//! offsets across slots with identical content hash.

use crate::db::Db;
use crate::error::{PictDbError, Result};
use crate::layout::{RES_SMALL, RES_THUMB};

/// Runs the dedup algorithm against the just-populated slot at `new_index`.
///
/// On `Err(DuplicateId)` the slot at `new_index` is left untouched; the
/// caller ([`crate::ops::insert`]) is responsible for rolling it back to
/// `EMPTY` before returning, per `spec.md` §4.4/§4.6.
pub fn resolve(db: &mut Db, new_index: usize) -> Result<()> {
    let (pict_id, sha) = {
        let slot = db
            .slots()
            .get(new_index)
            .ok_or(PictDbError::InvalidArgument)?;
        if !slot.is_non_empty() {
            return Err(PictDbError::InvalidArgument);
        }
        (slot.pict_id.clone(), slot.sha)
    };

    if db
        .slots()
        .iter()
        .enumerate()
        .any(|(i, s)| i != new_index && s.is_non_empty() && s.pict_id == pict_id)
    {
        return Err(PictDbError::DuplicateId);
    }

    let content_match = db
        .slots()
        .iter()
        .enumerate()
        .find(|(i, s)| *i != new_index && s.is_non_empty() && s.sha == sha)
        .map(|(_, s)| (s.offset, s.size));

    let slot = &mut db.slots_mut()[new_index];
    if let Some((offset, size)) = content_match {
        slot.offset = offset;
        slot.size = size;
    } else {
        slot.offset = [0; 3];
        slot.size[RES_THUMB] = 0;
        slot.size[RES_SMALL] = 0;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Header, Slot, NON_EMPTY, RES_ORIG};
    use assert2::check as assert;
    use tempfile::NamedTempFile;

    fn new_db(max_files: u32) -> Db {
        let path = NamedTempFile::new().unwrap().into_temp_path().to_path_buf();
        Db::create(path, Header::new("a.db", max_files, [64, 64, 256, 256])).unwrap()
    }

    fn populate(db: &mut Db, index: usize, id: &str, sha: [u8; 32], orig_len: u32) {
        let slot = &mut db.slots_mut()[index];
        slot.pict_id = id.to_string();
        slot.sha = sha;
        slot.size[RES_ORIG] = orig_len;
        slot.is_valid = NON_EMPTY;
    }

    #[test]
    fn rejects_duplicate_id() {
        let mut db = new_db(3);
        populate(&mut db, 0, "cat", [1u8; 32], 10);
        populate(&mut db, 1, "cat", [2u8; 32], 20);

        let result = resolve(&mut db, 1);
        assert!(matches!(result, Err(PictDbError::DuplicateId)));
    }

    #[test]
    fn forces_zero_offset_when_no_content_match() {
        let mut db = new_db(2);
        populate(&mut db, 0, "cat", [1u8; 32], 10);

        resolve(&mut db, 0).unwrap();
        let slot = &db.slots()[0];
        assert!(slot.offset == [0, 0, 0]);
        assert!(slot.size[RES_ORIG] == 10);
    }

    #[test]
    fn adopts_offsets_on_content_match() {
        let mut db = new_db(3);
        populate(&mut db, 0, "a", [9u8; 32], 10);
        db.slots_mut()[0].offset = [0, 0, 500];
        db.slots_mut()[0].size = [0, 0, 10];

        populate(&mut db, 1, "b", [9u8; 32], 10);
        resolve(&mut db, 1).unwrap();

        let slot = &db.slots()[1];
        assert!(slot.offset == [0, 0, 500]);
        assert!(slot.size == [0, 0, 10]);
    }

    #[test]
    fn rejects_empty_slot() {
        let mut db = new_db(1);
        let result = resolve(&mut db, 0);
        assert!(matches!(result, Err(PictDbError::InvalidArgument)));
    }
}
