//! Database handle (component C2): owns the open file, the in-memory header,
//! and the in-memory metadata table. All disk mutation goes through the
//! primitive I/O methods at the bottom of this file.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{PictDbError, Result};
use crate::layout::{Header, Slot, HEADER_LEN, MAX_MAX_FILES, SLOT_LEN};

/// Whether a database is opened for mutation or for reading only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// No mutating operation may be called on this handle.
    ReadOnly,
    /// Every operation is permitted.
    ReadWrite,
}

/// An open pictDB file: the exclusive owner of its file handle, header, and
/// metadata table. Not safe for concurrent use — see `spec.md` §5.
#[derive(Debug)]
pub struct Db {
    file: Option<File>,
    path: PathBuf,
    mode: OpenMode,
    header: Header,
    slots: Vec<Slot>,
}

impl Db {
    fn table_offset(index: usize) -> u64 {
        (HEADER_LEN + index * SLOT_LEN) as u64
    }

    /// Offset of the first byte past the metadata table — the lowest legal
    /// value for any slot's `offset[ORIG]`.
    pub fn table_end(&self) -> u64 {
        Self::table_offset(self.header.max_files as usize)
    }

    /// Opens an existing database file.
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = match mode {
            OpenMode::ReadOnly => OpenOptions::new().read(true).open(&path)?,
            OpenMode::ReadWrite => OpenOptions::new().read(true).write(true).open(&path)?,
        };

        let mut header_buf = [0u8; HEADER_LEN];
        file.read_exact(&mut header_buf)?;
        let header = Header::from_bytes(&header_buf)?;

        if header.max_files == 0 || header.max_files > MAX_MAX_FILES {
            return Err(PictDbError::MaxFiles);
        }

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(header.max_files as usize)
            .map_err(|_| PictDbError::OutOfMemory)?;

        for _ in 0..header.max_files {
            let mut slot_buf = [0u8; SLOT_LEN];
            file.read_exact(&mut slot_buf)?;
            slots.push(Slot::from_bytes(&slot_buf)?);
        }

        Ok(Self {
            file: Some(file),
            path,
            mode,
            header,
            slots,
        })
    }

    /// Creates a new database file at `path` with the given header and an
    /// all-empty slot table, and writes it out immediately.
    pub fn create<P: AsRef<Path>>(path: P, header: Header) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(header.max_files as usize)
            .map_err(|_| PictDbError::OutOfMemory)?;
        slots.resize_with(header.max_files as usize, Slot::empty);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        let mut db = Self {
            file: Some(file),
            path,
            mode: OpenMode::ReadWrite,
            header,
            slots,
        };

        db.write_header()?;
        for i in 0..db.slots.len() {
            db.write_slot(i)?;
        }
        db.flush()?;

        Ok(db)
    }

    /// Flushes pending writes. Idempotent; safe to call after a partial
    /// failure.
    pub fn flush(&mut self) -> Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }

    /// Closes the handle: flushes, drops the file, releases the metadata
    /// buffer. Idempotent — calling it twice, or after a partially-failed
    /// `open`, is always safe.
    pub fn close(&mut self) -> Result<()> {
        self.flush()?;
        self.file = None;
        self.slots.clear();
        self.slots.shrink_to_fit();
        Ok(())
    }

    /// The path this handle was opened or created from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The mode this handle was opened with.
    pub const fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Read-only view of the current header.
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Read-only view of the metadata table.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Mutable view of the metadata table, for operations (C6/C7/C4) that
    /// need to update slots before writing them back through
    /// [`Db::write_slot`].
    pub fn slots_mut(&mut self) -> &mut [Slot] {
        &mut self.slots
    }

    /// Mutable access to the header, for operations that bump `version`/
    /// `num_files` before calling [`Db::write_header`].
    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn file_mut(&mut self) -> Result<&mut File> {
        self.file.as_mut().ok_or(PictDbError::InvalidArgument)
    }

    // ---- Primitive I/O (the only routes by which the file mutates) ----

    /// Writes the header at offset 0.
    pub fn write_header(&mut self) -> Result<()> {
        let bytes = self.header.to_bytes()?;
        let file = self.file_mut()?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&bytes)?;
        Ok(())
    }

    /// Writes slot `index` at its fixed offset.
    pub fn write_slot(&mut self, index: usize) -> Result<()> {
        let bytes = self.slots[index].to_bytes()?;
        let offset = Self::table_offset(index);
        let file = self.file_mut()?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(&bytes)?;
        Ok(())
    }

    /// Appends `bytes` at the end of the file and returns the offset the
    /// data was written at (the file's pre-append length).
    pub fn append_blob(&mut self, bytes: &[u8]) -> Result<u64> {
        let file = self.file_mut()?;
        let offset = file.seek(SeekFrom::End(0))?;
        file.write_all(bytes)?;
        Ok(offset)
    }

    /// Reads exactly `size` bytes starting at `offset`.
    pub fn read_blob(&mut self, offset: u64, size: u32) -> Result<Vec<u8>> {
        let file = self.file_mut()?;
        file.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; size as usize];
        file.read_exact(&mut buf)?;
        Ok(buf)
    }

    // ---- Index & search (component C3) ----

    /// Finds the table index of the `NON_EMPTY` slot whose `pict_id`
    /// exactly matches `id`, scanning in table order. O(max_files).
    pub fn find_by_id(&self, id: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.is_non_empty() && s.pict_id == id)
    }

    /// Finds the first `EMPTY` slot, scanning in table order.
    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(|s| !s.is_non_empty())
    }
}

impl Drop for Db {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check as assert;
    use tempfile::NamedTempFile;

    fn temp_path() -> PathBuf {
        NamedTempFile::new().unwrap().into_temp_path().to_path_buf()
    }

    #[test]
    fn create_then_open_round_trips_header() {
        let path = temp_path();
        let header = Header::new("a.db", 10, [64, 64, 256, 256]);
        {
            let mut db = Db::create(&path, header.clone()).unwrap();
            db.close().unwrap();
        }

        let db = Db::open(&path, OpenMode::ReadOnly).unwrap();
        assert!(db.header() == &header);
        assert!(db.slots().len() == 10);
        assert!(db.slots().iter().all(|s| !s.is_non_empty()));
    }

    #[test]
    fn open_rejects_zero_max_files() {
        let path = temp_path();
        // `create` validates max_files itself; to exercise `open`'s own
        // bounds check we build a valid table, then corrupt the header
        // field in place and reopen.
        let mut db = Db::create(&path, Header::new("a.db", 1, [64, 64, 256, 256])).unwrap();
        db.header_mut().max_files = 0;
        db.write_header().unwrap();
        db.close().unwrap();

        let result = Db::open(&path, OpenMode::ReadOnly);
        assert!(result.is_err());
    }

    #[test]
    fn find_by_id_and_first_empty() {
        let path = temp_path();
        let mut db = Db::create(&path, Header::new("a.db", 3, [64, 64, 256, 256])).unwrap();

        db.slots_mut()[1].pict_id = "cat".to_string();
        db.slots_mut()[1].is_valid = crate::layout::NON_EMPTY;

        assert!(db.find_by_id("cat") == Some(1));
        assert!(db.find_by_id("dog") == None);
        assert!(db.first_empty() == Some(0));
    }

    #[test]
    fn append_and_read_blob_round_trip() {
        let path = temp_path();
        let mut db = Db::create(&path, Header::new("a.db", 1, [64, 64, 256, 256])).unwrap();

        let offset = db.append_blob(b"hello world").unwrap();
        assert!(offset == db.table_end());

        let data = db.read_blob(offset, 11).unwrap();
        assert!(data == b"hello world");
    }

    #[test]
    fn close_is_idempotent() {
        let path = temp_path();
        let mut db = Db::create(&path, Header::new("a.db", 1, [64, 64, 256, 256])).unwrap();
        db.close().unwrap();
        db.close().unwrap();
    }
}
