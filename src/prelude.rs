//! Common re-exports for code working against the pictDB core.

pub use crate::config::DbConfig;
pub use crate::db::{Db, OpenMode};
pub use crate::error::{PictDbError, Result};
pub use crate::layout::{Header, Slot};
pub use crate::ops::{self, ListMode};
pub use crate::resolution::Resolution;
