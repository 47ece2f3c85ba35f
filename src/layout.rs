//! Binary layout and codec for the pictDB file format (component C1).
//!
//! The file format is header, then exactly `max_files` metadata slots, then
//! appended JPEG blobs. Every multi-byte field is little-endian so the file
//! is portable across hosts of the same endianness regardless of which host
//! wrote it; nothing here relies on the host's native struct layout.

use crate::error::{PictDbError, Result};

/// Maximum length, in bytes, of a database name (not counting the
/// null terminator).
pub const MAX_DB_NAME: usize = 31;

/// Maximum length, in bytes, of a picture identifier (not counting the
/// null terminator).
pub const MAX_PIC_ID: usize = 127;

/// Hard cap on `max_files` accepted by `create`/`open`.
pub const MAX_MAX_FILES: u32 = 100_000;

/// Resolution slot index for the thumbnail.
pub const RES_THUMB: usize = 0;
/// Resolution slot index for the small resolution.
pub const RES_SMALL: usize = 1;
/// Resolution slot index for the original image.
pub const RES_ORIG: usize = 2;
/// Number of resolutions tracked per slot.
pub const NB_RES: usize = 3;

/// Largest accepted thumbnail width/height.
pub const MAX_THUMB_RES: u16 = 128;
/// Largest accepted small-resolution width/height.
pub const MAX_SMALL_RES: u16 = 512;

const DB_NAME_FIELD: usize = MAX_DB_NAME + 1;
const PIC_ID_FIELD: usize = MAX_PIC_ID + 1;
const SHA256_LEN: usize = 32;

/// `is_valid` state: slot holds no picture.
pub const EMPTY: u16 = 0;
/// `is_valid` state: slot holds a picture.
pub const NON_EMPTY: u16 = 1;

/// On-disk byte length of an encoded [`Header`].
pub const HEADER_LEN: usize = DB_NAME_FIELD + 4 + 4 + 4 + 2 * 4 + 4 + 8;

/// On-disk byte length of an encoded [`Slot`].
pub const SLOT_LEN: usize = PIC_ID_FIELD + SHA256_LEN + 2 * 4 + NB_RES * 4 + NB_RES * 8 + 2 + 2;

/// In-memory mirror of the on-disk header record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Short database name, capped at [`MAX_DB_NAME`] bytes.
    pub db_name: String,
    /// Monotonic counter, incremented on every successful mutation.
    pub version: u32,
    /// Count of currently `NON_EMPTY` slots.
    pub num_files: u32,
    /// Table capacity, fixed at creation.
    pub max_files: u32,
    /// `(thumb_width, thumb_height, small_width, small_height)`.
    pub res_resized: [u16; 4],
    reserved_32: u32,
    reserved_64: u64,
}

impl Header {
    /// Builds a fresh header for a newly created database.
    pub fn new(db_name: &str, max_files: u32, res_resized: [u16; 4]) -> Self {
        Self {
            db_name: db_name.to_string(),
            version: 0,
            num_files: 0,
            max_files,
            res_resized,
            reserved_32: 0,
            reserved_64: 0,
        }
    }

    /// Encodes this header into its fixed-size on-disk representation.
    pub fn to_bytes(&self) -> Result<[u8; HEADER_LEN]> {
        if self.db_name.is_empty() || self.db_name.len() > MAX_DB_NAME {
            return Err(PictDbError::InvalidFilename);
        }

        let mut buf = [0u8; HEADER_LEN];
        let mut cursor = 0usize;

        buf[..self.db_name.len()].copy_from_slice(self.db_name.as_bytes());
        cursor += DB_NAME_FIELD;

        write_u32(&mut buf, &mut cursor, self.version);
        write_u32(&mut buf, &mut cursor, self.num_files);
        write_u32(&mut buf, &mut cursor, self.max_files);
        for v in self.res_resized {
            write_u16(&mut buf, &mut cursor, v);
        }
        write_u32(&mut buf, &mut cursor, self.reserved_32);
        write_u64(&mut buf, &mut cursor, self.reserved_64);

        debug_assert_eq!(cursor, HEADER_LEN);
        Ok(buf)
    }

    /// Decodes a header from its fixed-size on-disk representation.
    pub fn from_bytes(buf: &[u8; HEADER_LEN]) -> Result<Self> {
        let mut cursor = 0usize;

        let name_end = buf[..DB_NAME_FIELD]
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(DB_NAME_FIELD);
        if name_end == 0 {
            return Err(PictDbError::InvalidFilename);
        }
        let db_name = std::str::from_utf8(&buf[..name_end])
            .map_err(|_| PictDbError::InvalidFilename)?
            .to_string();
        cursor += DB_NAME_FIELD;

        let version = read_u32(buf, &mut cursor);
        let num_files = read_u32(buf, &mut cursor);
        let max_files = read_u32(buf, &mut cursor);
        let mut res_resized = [0u16; 4];
        for slot in &mut res_resized {
            *slot = read_u16(buf, &mut cursor);
        }
        let reserved_32 = read_u32(buf, &mut cursor);
        let reserved_64 = read_u64(buf, &mut cursor);

        debug_assert_eq!(cursor, HEADER_LEN);

        Ok(Self {
            db_name,
            version,
            num_files,
            max_files,
            res_resized,
            reserved_32,
            reserved_64,
        })
    }
}

/// In-memory mirror of a single on-disk metadata slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Picture identifier, capped at [`MAX_PIC_ID`] bytes.
    pub pict_id: String,
    /// SHA-256 digest of the original image bytes.
    pub sha: [u8; SHA256_LEN],
    /// `(width, height)` of the original image.
    pub orig_res: [u32; 2],
    /// Byte size at each resolution; `0` means "not materialised".
    pub size: [u32; NB_RES],
    /// Absolute file offset for each resolution; `0` means "not
    /// materialised".
    pub offset: [u64; NB_RES],
    /// `EMPTY` or `NON_EMPTY`.
    pub is_valid: u16,
    reserved_16: u16,
}

impl Slot {
    /// An empty slot, as written when a database is first created.
    pub const fn empty() -> Self {
        Self {
            pict_id: String::new(),
            sha: [0; SHA256_LEN],
            orig_res: [0; 2],
            size: [0; NB_RES],
            offset: [0; NB_RES],
            is_valid: EMPTY,
            reserved_16: 0,
        }
    }

    /// True if this slot currently holds a picture.
    pub const fn is_non_empty(&self) -> bool {
        self.is_valid == NON_EMPTY
    }

    /// Encodes this slot into its fixed-size on-disk representation.
    pub fn to_bytes(&self) -> Result<[u8; SLOT_LEN]> {
        if self.is_non_empty() && (self.pict_id.is_empty() || self.pict_id.len() > MAX_PIC_ID) {
            return Err(PictDbError::InvalidPicId);
        }

        let mut buf = [0u8; SLOT_LEN];
        let mut cursor = 0usize;

        buf[..self.pict_id.len()].copy_from_slice(self.pict_id.as_bytes());
        cursor += PIC_ID_FIELD;

        buf[cursor..cursor + SHA256_LEN].copy_from_slice(&self.sha);
        cursor += SHA256_LEN;

        for v in self.orig_res {
            write_u32(&mut buf, &mut cursor, v);
        }
        for v in self.size {
            write_u32(&mut buf, &mut cursor, v);
        }
        for v in self.offset {
            write_u64(&mut buf, &mut cursor, v);
        }
        write_u16(&mut buf, &mut cursor, self.is_valid);
        write_u16(&mut buf, &mut cursor, self.reserved_16);

        debug_assert_eq!(cursor, SLOT_LEN);
        Ok(buf)
    }

    /// Decodes a slot from its fixed-size on-disk representation.
    pub fn from_bytes(buf: &[u8; SLOT_LEN]) -> Result<Self> {
        let mut cursor = 0usize;

        let id_end = buf[..PIC_ID_FIELD]
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(PIC_ID_FIELD);
        let pict_id = std::str::from_utf8(&buf[..id_end])
            .map_err(|_| PictDbError::InvalidPicId)?
            .to_string();
        cursor += PIC_ID_FIELD;

        let mut sha = [0u8; SHA256_LEN];
        sha.copy_from_slice(&buf[cursor..cursor + SHA256_LEN]);
        cursor += SHA256_LEN;

        let mut orig_res = [0u32; 2];
        for slot in &mut orig_res {
            *slot = read_u32(buf, &mut cursor);
        }
        let mut size = [0u32; NB_RES];
        for slot in &mut size {
            *slot = read_u32(buf, &mut cursor);
        }
        let mut offset = [0u64; NB_RES];
        for slot in &mut offset {
            *slot = read_u64(buf, &mut cursor);
        }
        let is_valid = read_u16(buf, &mut cursor);
        let reserved_16 = read_u16(buf, &mut cursor);

        debug_assert_eq!(cursor, SLOT_LEN);

        Ok(Self {
            pict_id,
            sha,
            orig_res,
            size,
            offset,
            is_valid,
            reserved_16,
        })
    }
}

fn write_u16(buf: &mut [u8], cursor: &mut usize, v: u16) {
    buf[*cursor..*cursor + 2].copy_from_slice(&v.to_le_bytes());
    *cursor += 2;
}

fn write_u32(buf: &mut [u8], cursor: &mut usize, v: u32) {
    buf[*cursor..*cursor + 4].copy_from_slice(&v.to_le_bytes());
    *cursor += 4;
}

fn write_u64(buf: &mut [u8], cursor: &mut usize, v: u64) {
    buf[*cursor..*cursor + 8].copy_from_slice(&v.to_le_bytes());
    *cursor += 8;
}

fn read_u16(buf: &[u8], cursor: &mut usize) -> u16 {
    let v = u16::from_le_bytes(buf[*cursor..*cursor + 2].try_into().unwrap());
    *cursor += 2;
    v
}

fn read_u32(buf: &[u8], cursor: &mut usize) -> u32 {
    let v = u32::from_le_bytes(buf[*cursor..*cursor + 4].try_into().unwrap());
    *cursor += 4;
    v
}

fn read_u64(buf: &[u8], cursor: &mut usize) -> u64 {
    let v = u64::from_le_bytes(buf[*cursor..*cursor + 8].try_into().unwrap());
    *cursor += 8;
    v
}
