use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

/// Buffer size for variant and reference files, which can be large.
const READER_CAPACITY: usize = 256 * 1024;

/// True for `.gz` and `.bgz` paths. BGZF is a multi-member gzip stream.
pub fn is_gzipped(path: &Path) -> bool {
    matches!(
        path.extension().and_then(OsStr::to_str),
        Some("gz") | Some("bgz")
    )
}

/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped(path) {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::with_capacity(READER_CAPACITY, file))
}

/// Get a reader for either a gzipped, non-gzipped file, or stdin
///
/// # Arguments
///
/// - file_path: path to the file to read, or '-' for stdin
///
/// # Returns
///
/// A `BufReader` object for a given file path or stdin.
pub fn get_dynamic_reader_w_stdin(file_path_str: &str) -> Result<BufReader<Box<dyn Read>>> {
    if file_path_str == "-" {
        Ok(BufReader::with_capacity(
            READER_CAPACITY,
            Box::new(std::io::stdin()) as Box<dyn Read>,
        ))
    } else {
        let file_path = Path::new(file_path_str);
        get_dynamic_reader(file_path)
    }
}

///
/// File name with every extension stripped, e.g. `calls.vcf.gz` -> `calls`.
///
pub fn remove_all_extensions(path: &Path) -> String {
    let mut stem = PathBuf::from(path.file_name().unwrap_or_default());
    while stem.extension().is_some() {
        stem = PathBuf::from(stem.file_stem().unwrap_or_default());
    }
    stem.to_string_lossy().into_owned()
}
