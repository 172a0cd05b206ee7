use std::io::BufRead;
use std::path::Path;

use bio::io::fasta;
use log::{debug, info};
use vcons_core::utils::get_dynamic_reader;

use crate::error::{IoError, Result};

/// One named sequence from a FASTA file.
#[derive(Debug, Clone, PartialEq)]
pub struct FastaRecord {
    pub name: String,
    pub description: Option<String>,
    pub sequence: Vec<u8>,
}

impl FastaRecord {
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

///
/// Read every record of a FASTA stream into memory
///
pub fn read_fasta<R: BufRead>(reader: R) -> Result<Vec<FastaRecord>> {
    let mut records = Vec::new();
    for record in fasta::Reader::from_bufread(reader).records() {
        let record = record?;
        records.push(FastaRecord {
            name: record.id().to_string(),
            description: record.desc().map(String::from),
            sequence: record.seq().to_owned(),
        });
    }
    Ok(records)
}

///
/// Load a FASTA file (plain or gzip'd) with all sequences in memory
///
/// # Arguments
/// - file_path: path to the FASTA file
///
pub fn load_fasta<P: AsRef<Path>>(file_path: P) -> Result<Vec<FastaRecord>> {
    let path = file_path.as_ref();
    let reader = get_dynamic_reader(path).map_err(|e| IoError::Open {
        path: path.display().to_string(),
        reason: format!("{:#}", e),
    })?;

    let records = read_fasta(reader)?;
    if records.is_empty() {
        return Err(IoError::EmptyFasta(path.display().to_string()));
    }

    info!(
        "Loaded {} sequence(s) from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

///
/// Pick the backbone sequence: the contig called `name`, or the first record
/// when no name is given.
///
pub fn select_contig(records: Vec<FastaRecord>, name: Option<&str>) -> Result<FastaRecord> {
    let selected = match name {
        Some(name) => records.into_iter().find(|r| r.name == name),
        None => records.into_iter().next(),
    };
    match selected {
        Some(record) => {
            debug!("Using contig {} ({} bp)", record.name, record.len());
            Ok(record)
        }
        None => Err(IoError::UnknownContig(name.unwrap_or_default().to_string())),
    }
}
