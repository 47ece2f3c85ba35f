//! Operations (component C6): `create`, `list`, `insert`, `read`, `delete`.
//!
//! Each operation validates its arguments first and, if it mutated the
//! table, ends by rewriting the touched slot(s) and the header.

use sha2::{Digest, Sha256};

use crate::config::DbConfig;
use crate::db::Db;
use crate::dedup;
use crate::error::{PictDbError, Result};
use crate::image_adapter;
use crate::layout::{Header, Slot, MAX_PIC_ID, NON_EMPTY, RES_ORIG};
use crate::resize;
use crate::resolution::Resolution;

/// Selects the shape of [`list`]'s output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// Human-readable dump to stdout; the function returns `None`.
    Stdout,
    /// A `{"Pictures": [...]}` JSON document, returned as a string.
    Json,
}

fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > MAX_PIC_ID {
        return Err(PictDbError::InvalidPicId);
    }
    Ok(())
}

/// Creates a new database file at `path` per `config`.
pub fn create(path: &std::path::Path, config: DbConfig) -> Result<Db> {
    config.validate()?;

    let db_name = path.to_string_lossy().into_owned();
    if db_name.is_empty() || db_name.len() > crate::layout::MAX_DB_NAME {
        return Err(PictDbError::InvalidFilename);
    }

    let header = Header::new(&db_name, config.max_files, config.res_resized());
    Db::create(path, header)
}

/// Lists the contents of `db` per `mode`.
pub fn list(db: &Db, mode: ListMode) -> Result<Option<String>> {
    match mode {
        ListMode::Stdout => {
            print_header(db);
            let any = db.slots().iter().any(|s| s.is_non_empty());
            if !any {
                println!("<< empty database >>");
            } else {
                for slot in db.slots().iter().filter(|s| s.is_non_empty()) {
                    print_metadata(slot);
                }
            }
            Ok(None)
        }
        ListMode::Json => {
            let ids: Vec<&str> = db
                .slots()
                .iter()
                .filter(|s| s.is_non_empty())
                .map(|s| s.pict_id.as_str())
                .collect();
            let doc = serde_json::json!({ "Pictures": ids });
            Ok(Some(doc.to_string()))
        }
    }
}

fn print_header(db: &Db) {
    let h = db.header();
    println!(
        "*****************************************\n\
         **********DATABASE HEADER START**********\n\
         DB NAME: {}\n\
         VERSION: {}\n\
         IMAGE COUNT: {}\t\tMAX IMAGES: {}\n\
         THUMBNAIL: {} x {}\tSMALL: {} x {}\n\
         ***********DATABASE HEADER END***********\n\
         *****************************************",
        h.db_name,
        h.version,
        h.num_files,
        h.max_files,
        h.res_resized[0],
        h.res_resized[1],
        h.res_resized[2],
        h.res_resized[3],
    );
}

fn print_metadata(slot: &Slot) {
    let sha_hex: String = slot.sha.iter().map(|b| format!("{:02x}", b)).collect();
    println!(
        "PICTURE ID: {}\n\
         SHA: {}\n\
         ORIGINAL: {} x {}\n\
         OFFSET ORIG.: {}\t\tSIZE ORIG.: {}\n\
         OFFSET THUMB.: {}\t\tSIZE THUMB.: {}\n\
         OFFSET SMALL: {}\t\tSIZE SMALL: {}\n\
         *****************************************",
        slot.pict_id,
        sha_hex,
        slot.orig_res[0],
        slot.orig_res[1],
        slot.offset[2],
        slot.size[2],
        slot.offset[0],
        slot.size[0],
        slot.offset[1],
        slot.size[1],
    );
}

/// Inserts `bytes` under `id`, deduplicating by identifier and content hash.
pub fn insert(db: &mut Db, id: &str, bytes: &[u8]) -> Result<()> {
    validate_id(id)?;
    if bytes.is_empty() {
        return Err(PictDbError::InvalidArgument);
    }

    if db.header().num_files >= db.header().max_files {
        return Err(PictDbError::FullDatabase);
    }

    let index = db.first_empty().ok_or(PictDbError::FullDatabase)?;

    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let sha: [u8; 32] = hasher.finalize().into();

    {
        let slot = &mut db.slots_mut()[index];
        slot.pict_id = id.to_string();
        slot.sha = sha;
        slot.size[RES_ORIG] = bytes.len() as u32;
        slot.is_valid = NON_EMPTY;
    }

    if let Err(err) = dedup::resolve(db, index) {
        db.slots_mut()[index] = Slot::empty();
        return Err(err);
    }

    if db.slots()[index].offset[RES_ORIG] == 0 {
        let offset = db.append_blob(bytes)?;
        db.slots_mut()[index].offset[RES_ORIG] = offset;
    }

    let (width, height) = image_adapter::get_dimensions(bytes)?;
    db.slots_mut()[index].orig_res = [width, height];

    db.header_mut().version += 1;
    db.header_mut().num_files += 1;
    db.write_slot(index)?;
    db.write_header()?;

    Ok(())
}

/// Reads `id` at `resolution`, lazily materialising non-original
/// resolutions on first access.
pub fn read(db: &mut Db, id: &str, resolution: Resolution) -> Result<Vec<u8>> {
    validate_id(id)?;
    let index = db.find_by_id(id).ok_or(PictDbError::FileNotFound)?;

    let r = resolution.index();
    if resolution != Resolution::Orig && db.slots()[index].size[r] == 0 {
        resize::materialize(db, index, resolution)?;
    }

    let slot = &db.slots()[index];
    let offset = slot.offset[r];
    let size = slot.size[r];
    db.read_blob(offset, size)
}

/// Deletes `id`. Blobs are left in place; [`crate::gc::collect`] reclaims
/// their space.
pub fn delete(db: &mut Db, id: &str) -> Result<()> {
    validate_id(id)?;
    let index = db.find_by_id(id).ok_or(PictDbError::FileNotFound)?;

    db.slots_mut()[index].is_valid = crate::layout::EMPTY;
    db.write_slot(index)?;

    db.header_mut().version += 1;
    db.header_mut().num_files -= 1;
    db.write_header()?;

    Ok(())
}
