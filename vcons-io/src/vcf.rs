//! Forward-only VCF reader.
//!
//! Reads the header eagerly, then yields one [`VariantRecord`] per data line.
//! Positions are converted from the 1-based VCF `POS` to 0-based coordinates.
//! The underlying file is released when the reader is dropped.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use fxhash::FxHashMap;
use log::debug;
use vcons_core::models::VariantRecord;
use vcons_core::utils::get_dynamic_reader_w_stdin;

use crate::error::{IoError, Result};

/// Minimum number of tab separated columns: CHROM, POS, ID, REF, ALT.
const MIN_COLUMNS: usize = 5;

/// Header metadata of a VCF file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VcfHeader {
    /// `##` meta lines, without the leading `##`
    pub meta: Vec<String>,
    /// Column names from the `#CHROM` line
    pub columns: Vec<String>,
}

impl VcfHeader {
    ///
    /// Value of a simple `##key=value` meta line, e.g. `fileformat`
    ///
    pub fn meta_value(&self, key: &str) -> Option<&str> {
        self.meta.iter().find_map(|line| {
            let (k, v) = line.split_once('=')?;
            (k == key).then_some(v)
        })
    }

    /// Sample names, i.e. the columns after FORMAT.
    pub fn samples(&self) -> &[String] {
        if self.columns.len() > 9 {
            &self.columns[9..]
        } else {
            &[]
        }
    }

    /// Contig IDs declared by `##contig=<ID=...>` lines, in header order.
    pub fn contigs(&self) -> Vec<&str> {
        self.meta
            .iter()
            .filter_map(|line| line.strip_prefix("contig=<"))
            .filter_map(|rest| {
                rest.trim_end_matches('>')
                    .split(',')
                    .find_map(|field| field.strip_prefix("ID="))
            })
            .collect()
    }
}

pub struct VcfReader<R: BufRead> {
    reader: R,
    header: VcfHeader,
    line_buf: String,
    line_number: usize,
}

impl VcfReader<BufReader<Box<dyn Read>>> {
    ///
    /// Open a VCF file, auto-detecting gzip/bgzf compression. `-` reads stdin.
    ///
    pub fn open(path: &str) -> Result<Self> {
        let reader = get_dynamic_reader_w_stdin(path).map_err(|e| IoError::Open {
            path: path.to_string(),
            reason: format!("{:#}", e),
        })?;
        debug!("Opened VCF {}", path);
        VcfReader::new(reader)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        VcfReader::open(&path.as_ref().to_string_lossy())
    }
}

impl<R: BufRead> VcfReader<R> {
    /// Wrap a reader positioned at the start of a VCF stream and consume its header.
    pub fn new(reader: R) -> Result<Self> {
        let mut vcf = VcfReader {
            reader,
            header: VcfHeader::default(),
            line_buf: String::new(),
            line_number: 0,
        };
        vcf.read_header()?;
        Ok(vcf)
    }

    pub fn header(&self) -> &VcfHeader {
        &self.header
    }

    fn read_line(&mut self) -> Result<bool> {
        self.line_buf.clear();
        let bytes = self.reader.read_line(&mut self.line_buf)?;
        if bytes == 0 {
            return Ok(false);
        }
        self.line_number += 1;
        let trimmed = self.line_buf.trim_end_matches(['\n', '\r']).len();
        self.line_buf.truncate(trimmed);
        Ok(true)
    }

    fn read_header(&mut self) -> Result<()> {
        while self.read_line()? {
            if let Some(meta) = self.line_buf.strip_prefix("##") {
                self.header.meta.push(meta.to_string());
            } else if let Some(columns) = self.line_buf.strip_prefix('#') {
                self.header.columns = columns.split('\t').map(String::from).collect();
                debug!(
                    "VCF header: {} meta lines, {} samples",
                    self.header.meta.len(),
                    self.header.samples().len()
                );
                return Ok(());
            } else if !self.line_buf.trim().is_empty() {
                return Err(IoError::MissingHeader);
            }
        }
        Err(IoError::MissingHeader)
    }
}

impl<R: BufRead> Iterator for VcfReader<R> {
    type Item = Result<VariantRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.read_line() {
                Ok(false) => return None,
                Ok(true) => {
                    if self.line_buf.trim().is_empty() || self.line_buf.starts_with('#') {
                        continue;
                    }
                    return Some(parse_record(&self.line_buf, self.line_number));
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

fn malformed(line: usize, reason: String) -> IoError {
    IoError::MalformedRecord { line, reason }
}

///
/// Parse a single VCF data line into a [`VariantRecord`]
///
/// # Arguments
/// - line: the data line, without line terminator
/// - line_number: 1-based line number, used in error messages
///
pub fn parse_record(line: &str, line_number: usize) -> Result<VariantRecord> {
    let fields: Vec<&str> = line.splitn(9, '\t').collect();
    if fields.len() < MIN_COLUMNS {
        return Err(malformed(
            line_number,
            format!("expected at least {} columns, found {}", MIN_COLUMNS, fields.len()),
        ));
    }

    let pos: u64 = fields[1]
        .parse()
        .map_err(|_| malformed(line_number, format!("invalid POS '{}'", fields[1])))?;

    let reference = fields[3];
    if reference.is_empty() || reference == "." {
        return Err(malformed(line_number, "missing REF allele".to_string()));
    }

    let alternates: Vec<Vec<u8>> = fields[4]
        .split(',')
        .map(|alt| alt.as_bytes().to_vec())
        .collect();
    if alternates.iter().any(|alt| alt.is_empty()) {
        return Err(malformed(line_number, format!("empty ALT allele in '{}'", fields[4])));
    }

    let id = match fields[2] {
        "." | "" => None,
        id => Some(id.to_string()),
    };

    let attributes = fields.get(7).map(|info| parse_info(info)).unwrap_or_default();

    Ok(VariantRecord {
        chrom: fields[0].to_string(),
        position: pos.saturating_sub(1), // VCF is 1-based → 0-based
        id,
        reference: reference.as_bytes().to_vec(),
        alternates,
        attributes,
    })
}

fn parse_info(info: &str) -> FxHashMap<String, String> {
    if info == "." {
        return FxHashMap::default();
    }
    info.split(';')
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (entry.to_string(), String::new()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use pretty_assertions::assert_eq;
    use rstest::*;

    const HEADER: &str = "##fileformat=VCFv4.2\n\
##contig=<ID=chr1,length=100>\n\
##contig=<ID=chr2,length=50>\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tsample1\n";

    fn reader(body: &str) -> VcfReader<Cursor<Vec<u8>>> {
        let text = format!("{}{}", HEADER, body);
        VcfReader::new(Cursor::new(text.into_bytes())).unwrap()
    }

    #[rstest]
    fn test_header_metadata() {
        let vcf = reader("");
        let header = vcf.header();
        assert_eq!(header.meta_value("fileformat"), Some("VCFv4.2"));
        assert_eq!(header.contigs(), vec!["chr1", "chr2"]);
        assert_eq!(header.samples(), &["sample1".to_string()]);
        assert_eq!(header.columns[0], "CHROM");
    }

    #[rstest]
    fn test_records_are_zero_based() {
        let records: Vec<VariantRecord> = reader(
            "chr1\t5\trs1\tA\tT\t50\tPASS\tAF=0.5;DB\tGT\t0/1\n\
             chr1\t10\t.\tG\tC,GA\t.\tPASS\t.\n",
        )
        .collect::<Result<Vec<_>>>()
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].position, 4);
        assert_eq!(records[0].id.as_deref(), Some("rs1"));
        assert_eq!(records[0].reference, b"A".to_vec());
        assert_eq!(records[0].alternates, vec![b"T".to_vec()]);
        assert_eq!(records[0].allele_frequency(), Some(0.5));
        assert_eq!(records[0].attribute("DB"), Some(""));

        assert_eq!(records[1].position, 9);
        assert_eq!(records[1].id, None);
        assert_eq!(records[1].alternates, vec![b"C".to_vec(), b"GA".to_vec()]);
        assert!(records[1].attributes.is_empty());
    }

    #[rstest]
    fn test_sites_only_lines() {
        let records: Vec<VariantRecord> = reader("chr2\t1\t.\tAC\tA\n")
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(records[0].position, 0);
        assert_eq!(records[0].allele_frequency(), None);
    }

    #[rstest]
    fn test_blank_lines_are_skipped() {
        let count = reader("\nchr1\t2\t.\tA\tG\t.\t.\t.\n\n").count();
        assert_eq!(count, 1);
    }

    #[rstest]
    #[case("chr1\t5\t.\tA\n")]
    #[case("chr1\tfive\t.\tA\tT\n")]
    #[case("chr1\t5\t.\t.\tT\n")]
    #[case("chr1\t5\t.\tA\tT,\n")]
    fn test_malformed_records(#[case] body: &str) {
        let result = reader(body).next().unwrap();
        match result {
            Err(IoError::MalformedRecord { line, .. }) => assert_eq!(line, 5),
            other => panic!("expected malformed record error, got {:?}", other),
        }
    }

    #[rstest]
    fn test_missing_header() {
        let result = VcfReader::new(Cursor::new(b"chr1\t5\t.\tA\tT\n".to_vec()));
        assert!(matches!(result, Err(IoError::MissingHeader)));

        let result = VcfReader::new(Cursor::new(b"##fileformat=VCFv4.2\n".to_vec()));
        assert!(matches!(result, Err(IoError::MissingHeader)));
    }

    #[rstest]
    fn test_open_gzipped_file() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("calls.vcf.gz");
        let mut encoder =
            GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
        write!(encoder, "{}chr1\t3\t.\tC\tT\t.\tPASS\tAF=0.1\n", HEADER).unwrap();
        encoder.finish().unwrap();

        let records: Vec<VariantRecord> = VcfReader::from_path(&path)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].position, 2);
        assert_eq!(records[0].allele_frequency(), Some(0.1));
    }

    #[rstest]
    fn test_open_missing_file() {
        let result = VcfReader::open("/no/such/calls.vcf");
        assert!(matches!(result, Err(IoError::Open { .. })));
    }
}
