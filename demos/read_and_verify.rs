//! Opens an existing gallery, lists it, and reads every resolution of one
//! picture to confirm lazy resize materialises thumb/small on demand.

use pictdb::{ops, Db, OpenMode, Resolution};

fn main() -> pictdb::Result<()> {
    let mut db = Db::open("gallery.pictdb", OpenMode::ReadWrite)?;

    println!("version: {}", db.header().version);
    println!("files: {} / {}", db.header().num_files, db.header().max_files);

    println!("\n[contents]");
    let json = ops::list(&db, ops::ListMode::Json)?.expect("json list always returns a body");
    println!("{json}");

    println!("\n[resolutions for `sunset`]");
    for resolution in [Resolution::Orig, Resolution::Thumb, Resolution::Small] {
        let bytes = ops::read(&mut db, "sunset", resolution)?;
        println!("  {resolution:?}: {} bytes", bytes.len());
    }

    Ok(())
}
