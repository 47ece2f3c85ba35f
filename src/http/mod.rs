//! `pictdb-server`: a single-threaded HTTP front end over a pictDB file.
//!
//! One [`Db`] handle is opened for the lifetime of the process and every
//! request is served synchronously against it, so there is never more than
//! one in-flight mutation. This mirrors the concurrency model the core
//! library itself assumes (see [`crate::db`]).

pub mod multipart;
pub mod routes;

use std::net::ToSocketAddrs;
use std::path::Path;

use tiny_http::Server;

use crate::db::{Db, OpenMode};
use crate::error::Result;

/// Opens `db_file` and serves it over HTTP at `addr` until the process is
/// killed.
pub fn run(db_file: &Path, addr: impl ToSocketAddrs) -> Result<()> {
    let mut db = Db::open(db_file, OpenMode::ReadWrite)?;
    log::info!(
        "serving {} ({} / {} files)",
        db_file.display(),
        db.header().num_files,
        db.header().max_files
    );

    let server = Server::http(addr).map_err(|err| crate::error::PictDbError::Io(std::io::Error::other(err)))?;

    for request in server.incoming_requests() {
        routes::dispatch(&mut db, request);
    }

    Ok(())
}
