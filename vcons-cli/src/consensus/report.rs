use std::io::{self, Write};

use vcons_consensus::FrequencyBounds;
use vcons_core::models::PositionInterval;

/// Fields of the `|`-separated header line written before the sequence.
#[derive(Debug, Clone, Default)]
pub struct ReportHeader {
    pub name: String,
    pub chrom: Option<String>,
    pub frequency: Option<FrequencyBounds>,
    pub invert: bool,
    pub excluded: Vec<PositionInterval>,
}

impl ReportHeader {
    ///
    /// Render the header, e.g. `>sample|chr1|af=0.2-0.8|invert|exclude=2,10-12`.
    /// Options that are not configured are left out.
    ///
    pub fn as_string(&self) -> String {
        let mut fields = vec![self.name.clone()];
        if let Some(chrom) = &self.chrom {
            fields.push(chrom.clone());
        }
        if let Some(bounds) = &self.frequency {
            fields.push(format!("af={}", bounds));
        }
        if self.invert {
            fields.push("invert".to_string());
        }
        if !self.excluded.is_empty() {
            let excluded: Vec<String> = self.excluded.iter().map(|i| i.to_string()).collect();
            fields.push(format!("exclude={}", excluded.join(",")));
        }
        format!(">{}", fields.join("|"))
    }
}

///
/// Write the consensus as a FASTA-like record
///
/// # Arguments
/// - out: destination
/// - header: header line, or `None` for a bare sequence
/// - sequence: consensus bytes
/// - line_width: bases per line, 0 writes the sequence on a single line
///
pub fn write_consensus<W: Write>(
    out: &mut W,
    header: Option<&ReportHeader>,
    sequence: &[u8],
    line_width: usize,
) -> io::Result<()> {
    if let Some(header) = header {
        writeln!(out, "{}", header.as_string())?;
    }

    if line_width == 0 {
        out.write_all(sequence)?;
        writeln!(out)?;
    } else {
        for line in sequence.chunks(line_width) {
            out.write_all(line)?;
            writeln!(out)?;
        }
    }
    out.flush()
}
