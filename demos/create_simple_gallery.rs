//! Creates a small gallery and inserts a couple of pictures into it.

use pictdb::{ops, DbConfig};

fn main() -> pictdb::Result<()> {
    let mut db = ops::create(
        std::path::Path::new("gallery.pictdb"),
        DbConfig {
            max_files: 16,
            ..Default::default()
        },
    )?;

    ops::insert(&mut db, "sunset", &std::fs::read("./images/sunset.jpg")?)?;
    ops::insert(&mut db, "mountain", &std::fs::read("./images/mountain.jpg")?)?;

    ops::list(&db, ops::ListMode::Stdout)?;

    Ok(())
}
