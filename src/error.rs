//! Error taxonomy shared by every fallible pictDB operation.

use thiserror::Error;

/// Errors returned by the pictDB core library.
///
/// Every operation documented in [`crate::ops`] returns one of these kinds.
/// Nothing is retried internally; propagation is the caller's job.
#[derive(Debug, Error)]
pub enum PictDbError {
    /// A function argument failed a basic sanity check (empty buffer, empty
    /// slot passed to an operation that requires a populated one, etc).
    #[error("invalid argument")]
    InvalidArgument,

    /// `db_name` was empty or longer than [`crate::layout::MAX_DB_NAME`].
    #[error("invalid database filename")]
    InvalidFilename,

    /// `pict_id` was empty or longer than [`crate::layout::MAX_PIC_ID`].
    #[error("invalid picture id")]
    InvalidPicId,

    /// Underlying file I/O failed, including short reads/writes.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The in-memory metadata table could not be allocated.
    #[error("out of memory")]
    OutOfMemory,

    /// No `NON_EMPTY` slot matches the requested `pict_id`.
    #[error("file not found")]
    FileNotFound,

    /// The metadata table has no `EMPTY` slot left.
    #[error("database is full")]
    FullDatabase,

    /// `insert` was asked to create an id that already exists.
    #[error("duplicate picture id")]
    DuplicateId,

    /// `max_files` in a header or `create` request was zero or exceeded the
    /// hard cap.
    #[error("invalid max_files value")]
    MaxFiles,

    /// A resolution tag did not parse, or a resized dimension was out of
    /// bounds for its kind.
    #[error("invalid resolution")]
    Resolutions,

    /// The image codec failed to decode, measure, resize, or encode.
    #[error("image error: {0}")]
    Image(String),

    /// CLI only: too few positional arguments were supplied.
    #[error("not enough arguments")]
    NotEnoughArguments,

    /// CLI only: the subcommand name did not match any known operation.
    #[error("invalid command")]
    InvalidCommand,

    /// HTTP only: a request could not be parsed (malformed multipart,
    /// missing or invalid query parameters). Ambient to the HTTP boundary;
    /// has no core-library equivalent.
    #[error("malformed request: {0}")]
    Http(String),
}

impl PictDbError {
    /// Stable numeric code for process exit statuses, fixed as this enum's
    /// declaration order (0 is reserved for success, so variants start at 1).
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidArgument => 1,
            Self::InvalidFilename => 2,
            Self::InvalidPicId => 3,
            Self::Io(_) => 4,
            Self::OutOfMemory => 5,
            Self::FileNotFound => 6,
            Self::FullDatabase => 7,
            Self::DuplicateId => 8,
            Self::MaxFiles => 9,
            Self::Resolutions => 10,
            Self::Image(_) => 11,
            Self::NotEnoughArguments => 12,
            Self::InvalidCommand => 13,
            Self::Http(_) => 14,
        }
    }
}

/// Convenience alias used throughout the core library.
pub type Result<T> = std::result::Result<T, PictDbError>;
