use vcons_core::models::VariantRecord;

use crate::iupac::combine;

/// Opens the unmodified surplus of a reference allele (deletion).
pub const DELETION_OPEN: u8 = b'[';
/// Closes a deletion payload.
pub const DELETION_CLOSE: u8 = b']';
/// Opens the unmodified surplus of an alternate allele (insertion).
pub const INSERTION_OPEN: u8 = b'(';
/// Closes an insertion payload.
pub const INSERTION_CLOSE: u8 = b')';

/// True for the four indel bracket delimiters.
#[inline]
pub fn is_bracket(byte: u8) -> bool {
    matches!(
        byte,
        DELETION_OPEN | DELETION_CLOSE | INSERTION_OPEN | INSERTION_CLOSE
    )
}

///
/// Something that turns one variant call into consensus bytes.
///
/// `alt` is the alternate allele selected by the caller; `record` is
/// passed along so implementations can look at the reference allele and
/// the record attributes.
///
pub trait Encoder: Send + Sync {
    fn encode(&self, record: &VariantRecord, alt: &[u8]) -> Vec<u8>;

    /// Short description of this encoder and what it wraps, for logging.
    fn describe(&self) -> String;
}

///
/// Encode a reference/alternate allele pair.
///
/// The shared prefix is combined position by position into ambiguity codes.
/// Surplus reference bases are appended as `[...]`, surplus alternate bases
/// as `(...)`; neither payload is combined.
///
/// ```
/// use vcons_consensus::encoder::encode_alleles;
///
/// assert_eq!(encode_alleles(b"ACA", b"CT"), b"MY[A]".to_vec());
/// assert_eq!(encode_alleles(b"AC", b"CTA"), b"MY(A)".to_vec());
/// ```
pub fn encode_alleles(reference: &[u8], alt: &[u8]) -> Vec<u8> {
    let shared = reference.len().min(alt.len());
    let mut out = Vec::with_capacity(reference.len().max(alt.len()) + 2);

    out.extend(
        reference[..shared]
            .iter()
            .zip(&alt[..shared])
            .map(|(&r, &a)| combine(r, a)),
    );

    if reference.len() > shared {
        out.push(DELETION_OPEN);
        out.extend_from_slice(&reference[shared..]);
        out.push(DELETION_CLOSE);
    } else if alt.len() > shared {
        out.push(INSERTION_OPEN);
        out.extend_from_slice(&alt[shared..]);
        out.push(INSERTION_CLOSE);
    }

    out
}

/// The innermost encoder of every chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseEncoder;

impl Encoder for BaseEncoder {
    fn encode(&self, record: &VariantRecord, alt: &[u8]) -> Vec<u8> {
        encode_alleles(&record.reference, alt)
    }

    fn describe(&self) -> String {
        "iupac".to_string()
    }
}
