//! Command line surface for `pictdbm`.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// pictDB Manager: command line interface for the pictDB core.
#[derive(Parser, Debug)]
#[command(name = "pictdbm", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List pictDB content
    List {
        /// Path to the pictDB file
        db_file: PathBuf,
    },
    /// Create a new pictDB
    Create {
        /// Path to the pictDB file
        db_file: PathBuf,
        /// Maximum number of pictures the database can hold
        #[arg(long, default_value_t = crate::config::DEFAULT_MAX_FILES)]
        max_files: u32,
        /// Thumbnail resolution, as two numbers: WIDTH HEIGHT
        #[arg(long = "thumb_res", num_args = 2, value_names = ["X_RES", "Y_RES"], default_values_t = [64u16, 64u16])]
        thumb_res: Vec<u16>,
        /// Small resolution, as two numbers: WIDTH HEIGHT
        #[arg(long = "small_res", num_args = 2, value_names = ["X_RES", "Y_RES"], default_values_t = [256u16, 256u16])]
        small_res: Vec<u16>,
    },
    /// Read a picture from a pictDB and save it to a file
    Read {
        /// Path to the pictDB file
        db_file: PathBuf,
        /// Identifier of the picture to read
        pict_id: String,
        /// Resolution to read: orig, thumb or small
        #[arg(default_value = "orig")]
        resolution: String,
    },
    /// Insert a new picture into a pictDB
    Insert {
        /// Path to the pictDB file
        db_file: PathBuf,
        /// Identifier to store the picture under
        pict_id: String,
        /// Path to the JPEG file to insert
        image_file: PathBuf,
    },
    /// Delete a picture from a pictDB
    Delete {
        /// Path to the pictDB file
        db_file: PathBuf,
        /// Identifier of the picture to delete
        pict_id: String,
    },
    /// Reclaim space held by deleted pictures
    Gc {
        /// Path to the pictDB file
        db_file: PathBuf,
    },
}

fn as_pair(values: Vec<u16>) -> (u16, u16) {
    match values[..] {
        [w, h] => (w, h),
        _ => unreachable!("num_args = 2 guarantees exactly two values"),
    }
}

/// Parses `argv` and dispatches to the matching subcommand.
pub fn run() -> miette::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List { db_file } => commands::list::execute(&db_file),
        Commands::Create {
            db_file,
            max_files,
            thumb_res,
            small_res,
        } => commands::create::execute(&db_file, max_files, as_pair(thumb_res), as_pair(small_res)),
        Commands::Read {
            db_file,
            pict_id,
            resolution,
        } => commands::read::execute(&db_file, &pict_id, &resolution),
        Commands::Insert {
            db_file,
            pict_id,
            image_file,
        } => commands::insert::execute(&db_file, &pict_id, &image_file),
        Commands::Delete { db_file, pict_id } => commands::delete::execute(&db_file, &pict_id),
        Commands::Gc { db_file } => commands::gc::execute(&db_file),
    }
}

#[cfg(test)]
mod tests {
    use assert2::check as assert;
    use clap::Parser;

    use super::*;

    #[test]
    fn create_accepts_two_separate_numbers_per_resolution_flag() {
        let cli = Cli::try_parse_from([
            "pictdbm",
            "create",
            "gallery.pictdb",
            "--thumb_res",
            "32",
            "48",
            "--small_res",
            "128",
            "192",
        ])
        .unwrap();

        let Commands::Create { thumb_res, small_res, .. } = cli.command else {
            panic!("expected Create command");
        };
        assert!(as_pair(thumb_res) == (32, 48));
        assert!(as_pair(small_res) == (128, 192));
    }

    #[test]
    fn create_falls_back_to_documented_defaults() {
        let cli = Cli::try_parse_from(["pictdbm", "create", "gallery.pictdb"]).unwrap();

        let Commands::Create { thumb_res, small_res, .. } = cli.command else {
            panic!("expected Create command");
        };
        assert!(as_pair(thumb_res) == (64, 64));
        assert!(as_pair(small_res) == (256, 256));
    }
}
