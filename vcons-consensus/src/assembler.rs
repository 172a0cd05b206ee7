//! Assemble the consensus sequence from an ordered stream of variant records.
//!
//! Two modes:
//!
//! - variants only: every record contributes its encoding, concatenated in order
//! - backbone: the reference is copied base by base and records are overlaid at
//!   their positions; a record consumes as many backbone bases as its reference allele

use std::borrow::Cow;
use std::fmt::{self, Display};
use std::str::FromStr;

use log::{debug, info, warn};
use vcons_core::models::VariantRecord;

use crate::chain::EncoderConfig;
use crate::encoder::Encoder;
use crate::exclusion::RegionExclusionFilter;
use crate::iupac::combine;

/// Stop logging individual reference mismatches after this many.
const MAX_MISMATCH_WARNINGS: usize = 20;

/// How records with more than one alternate allele are encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlternatePolicy {
    /// Encode the first usable alternate, ignore the rest
    #[default]
    First,
    /// Fold every alternate into one ambiguity code per position. Only applies
    /// when all alternates have the reference length, otherwise acts like `First`.
    Merge,
}

impl FromStr for AlternatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first" => Ok(AlternatePolicy::First),
            "merge" => Ok(AlternatePolicy::Merge),
            _ => Err(format!("Invalid alternate policy: {}", s)),
        }
    }
}

impl Display for AlternatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlternatePolicy::First => write!(f, "first"),
            AlternatePolicy::Merge => write!(f, "merge"),
        }
    }
}

/// Counters collected during one assembly run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    /// Records read from the source
    pub records: usize,
    /// Records handed to the encoder chain
    pub encoded: usize,
    /// Records at an excluded position, emitted as reference
    pub excluded: usize,
    /// Records without a usable alternate, emitted as reference
    pub passthrough: usize,
    /// Records starting inside reference bases already consumed (backbone mode)
    pub overlapping: usize,
    /// Records starting at or after the end of the backbone
    pub beyond_backbone: usize,
    /// Records whose reference allele disagrees with the backbone
    pub reference_mismatches: usize,
    /// Alternates not used under the `First` policy
    pub ignored_alternates: usize,
    /// Backbone bases copied verbatim
    pub backbone_bases: usize,
}

/// Output of an assembly run.
#[derive(Debug, Clone, PartialEq)]
pub struct Consensus {
    pub sequence: Vec<u8>,
    pub stats: AssemblyStats,
}

pub struct SequenceAssembler {
    encoder: Box<dyn Encoder>,
    filter: RegionExclusionFilter,
    policy: AlternatePolicy,
}

impl SequenceAssembler {
    pub fn new(encoder: Box<dyn Encoder>, filter: RegionExclusionFilter) -> Self {
        SequenceAssembler {
            encoder,
            filter,
            policy: AlternatePolicy::default(),
        }
    }

    pub fn from_config(config: &EncoderConfig, filter: RegionExclusionFilter) -> Self {
        SequenceAssembler::new(config.build_encoder(), filter)
    }

    pub fn with_policy(mut self, policy: AlternatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn encoder(&self) -> &dyn Encoder {
        self.encoder.as_ref()
    }

    pub fn filter(&self) -> &RegionExclusionFilter {
        &self.filter
    }

    ///
    /// Run the assembly over `records`, optionally overlaid on `backbone`.
    ///
    /// Records must come in ascending position order; they are not re-sorted.
    /// The first source error stops the run and is returned unchanged.
    ///
    /// # Arguments
    /// - records: the variant source
    /// - backbone: full reference sequence, indexed by 0-based position
    ///
    pub fn assemble<I, E>(&self, records: I, backbone: Option<&[u8]>) -> Result<Consensus, E>
    where
        I: IntoIterator<Item = Result<VariantRecord, E>>,
    {
        debug!(
            "Assembling with encoder {}, alternates={}, {} excluded interval(s)",
            self.encoder.describe(),
            self.policy,
            self.filter.intervals().len()
        );

        let consensus = match backbone {
            Some(backbone) => self.assemble_on_backbone(records, backbone)?,
            None => self.assemble_variants(records)?,
        };

        let stats = &consensus.stats;
        info!(
            "Consensus of {} bp from {} records ({} encoded, {} excluded, {} passed through)",
            consensus.sequence.len(),
            stats.records,
            stats.encoded,
            stats.excluded,
            stats.passthrough
        );
        if stats.overlapping > 0 || stats.beyond_backbone > 0 {
            warn!(
                "Skipped {} overlapping record(s) and {} record(s) past the end of the reference",
                stats.overlapping, stats.beyond_backbone
            );
        }
        if stats.reference_mismatches > 0 {
            warn!(
                "{} record(s) have a REF allele that differs from the reference",
                stats.reference_mismatches
            );
        }

        Ok(consensus)
    }

    fn assemble_variants<I, E>(&self, records: I) -> Result<Consensus, E>
    where
        I: IntoIterator<Item = Result<VariantRecord, E>>,
    {
        let mut sequence = Vec::new();
        let mut stats = AssemblyStats::default();

        for record in records {
            let record = record?;
            stats.records += 1;
            self.emit(&record, &mut sequence, &mut stats);
        }

        Ok(Consensus { sequence, stats })
    }

    fn assemble_on_backbone<I, E>(&self, records: I, backbone: &[u8]) -> Result<Consensus, E>
    where
        I: IntoIterator<Item = Result<VariantRecord, E>>,
    {
        let mut sequence = Vec::with_capacity(backbone.len());
        let mut stats = AssemblyStats::default();
        let length = backbone.len() as u64;
        let mut cursor: u64 = 0;

        for record in records {
            let record = record?;
            stats.records += 1;

            if record.position >= length {
                stats.beyond_backbone += 1;
                debug!("Dropping {}: past the end of the reference ({} bp)", record, length);
                continue;
            }
            if record.position < cursor {
                stats.overlapping += 1;
                debug!("Skipping {}: overlaps reference consumed up to {}", record, cursor);
                continue;
            }

            let start = record.position as usize;
            sequence.extend_from_slice(&backbone[cursor as usize..start]);
            stats.backbone_bases += start - cursor as usize;

            let end = (record.end() as usize).min(backbone.len());
            if !backbone[start..end].eq_ignore_ascii_case(&record.reference) {
                stats.reference_mismatches += 1;
                if stats.reference_mismatches <= MAX_MISMATCH_WARNINGS {
                    warn!(
                        "REF of {} does not match the reference ({})",
                        record,
                        String::from_utf8_lossy(&backbone[start..end])
                    );
                }
            }

            self.emit(&record, &mut sequence, &mut stats);
            cursor = record.end();
        }

        if cursor < length {
            sequence.extend_from_slice(&backbone[cursor as usize..]);
            stats.backbone_bases += (length - cursor) as usize;
        }

        Ok(Consensus { sequence, stats })
    }

    ///
    /// Append the contribution of one record.
    ///
    /// A record is kept as its reference allele when any position of its
    /// reference span is excluded, so a multi-base record starting before an
    /// excluded position cannot substitute it.
    ///
    fn emit(&self, record: &VariantRecord, out: &mut Vec<u8>, stats: &mut AssemblyStats) {
        let last = record.end().saturating_sub(1).max(record.position);
        if self.filter.overlaps(record.position, last) {
            stats.excluded += 1;
            out.extend_from_slice(&record.reference);
            return;
        }

        match self.select_alternate(record, stats) {
            Some(alt) => {
                stats.encoded += 1;
                out.extend(self.encoder.encode(record, &alt));
            }
            None => {
                stats.passthrough += 1;
                out.extend_from_slice(&record.reference);
            }
        }
    }

    fn select_alternate<'a>(
        &self,
        record: &'a VariantRecord,
        stats: &mut AssemblyStats,
    ) -> Option<Cow<'a, [u8]>> {
        let usable: Vec<&[u8]> = record.usable_alternates().collect();
        let first = *usable.first()?;

        if self.policy == AlternatePolicy::Merge
            && usable.len() > 1
            && usable.iter().all(|alt| alt.len() == record.reference.len())
        {
            let merged = (0..first.len())
                .map(|i| usable.iter().skip(1).fold(first[i], |acc, alt| combine(acc, alt[i])))
                .collect();
            return Some(Cow::Owned(merged));
        }

        stats.ignored_alternates += usable.len() - 1;
        Some(Cow::Borrowed(first))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorators::FrequencyBounds;
    use crate::encoder::BaseEncoder;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::convert::Infallible;

    fn ok(records: Vec<VariantRecord>) -> Vec<Result<VariantRecord, Infallible>> {
        records.into_iter().map(Ok).collect()
    }

    fn snv(position: u64, reference: &[u8], alt: &[u8], af: &str) -> VariantRecord {
        VariantRecord::new("chr1", position, reference, &[alt]).with_attribute("AF", af)
    }

    fn plain() -> SequenceAssembler {
        SequenceAssembler::new(Box::new(BaseEncoder), RegionExclusionFilter::empty())
    }

    #[fixture]
    fn het_calls() -> Vec<VariantRecord> {
        vec![
            snv(0, b"A", b"G", "0.96"),
            snv(1, b"G", b"A", "0.96"),
            snv(2, b"C", b"G", "0.96"),
        ]
    }

    #[rstest]
    fn test_variants_only_concatenates(het_calls: Vec<VariantRecord>) {
        let consensus = plain().assemble(ok(het_calls), None).unwrap();
        assert_eq!(consensus.sequence, b"RRS".to_vec());
        assert_eq!(consensus.stats.records, 3);
        assert_eq!(consensus.stats.encoded, 3);
    }

    // an encoded position always contains the reference base, so the
    // reference-only run "AGC" is the only fully unencoded outcome
    #[rstest]
    #[case("0-0.93", "AGC")]
    #[case("0.95-1", "RRS")]
    #[case("0.93-0.95", "AGC")]
    #[case("0.96-0.96", "RRS")]
    fn test_frequency_bounds_gate_whole_run(
        het_calls: Vec<VariantRecord>,
        #[case] bounds: &str,
        #[case] expected: &str,
    ) {
        let config = EncoderConfig {
            invert: false,
            frequency: Some(bounds.parse::<FrequencyBounds>().unwrap()),
        };
        let assembler = SequenceAssembler::from_config(&config, RegionExclusionFilter::empty());
        let consensus = assembler.assemble(ok(het_calls), None).unwrap();
        assert_eq!(String::from_utf8(consensus.sequence).unwrap(), expected);
    }

    #[rstest]
    fn test_excluded_position_keeps_reference() {
        let backbone = b"ACGTA";
        let records = vec![snv(1, b"C", b"T", "0.5"), snv(2, b"G", b"A", "0.5"), snv(4, b"A", b"C", "0.5")];
        let filter = RegionExclusionFilter::new(["2"]).unwrap();
        let assembler = SequenceAssembler::new(Box::new(BaseEncoder), filter);

        let consensus = assembler.assemble(ok(records), Some(backbone.as_slice())).unwrap();
        assert_eq!(consensus.sequence, b"AYGTM".to_vec());
        assert_eq!(consensus.stats.excluded, 1);
        assert_eq!(consensus.stats.encoded, 2);
        assert_eq!(consensus.stats.backbone_bases, 2);
    }

    #[rstest]
    fn test_exclusion_covers_whole_reference_span() {
        // CG at 1 spans the excluded position 2
        let records = vec![
            VariantRecord::new("chr1", 1, b"CG", &[b"TA"]),
            snv(3, b"T", b"C", "0.5"),
        ];
        let filter = RegionExclusionFilter::new(["2"]).unwrap();
        let assembler = SequenceAssembler::new(Box::new(BaseEncoder), filter);

        let consensus = assembler.assemble(ok(records), Some(b"ACGTA".as_slice())).unwrap();
        assert_eq!(consensus.sequence, b"ACGYA".to_vec());
        assert_eq!(consensus.stats.excluded, 1);
    }

    #[rstest]
    fn test_backbone_copies_uncovered_positions() {
        let consensus = plain()
            .assemble(ok(vec![snv(3, b"T", b"C", "1")]), Some(b"ACGTACGT".as_slice()))
            .unwrap();
        assert_eq!(consensus.sequence, b"ACGYACGT".to_vec());
    }

    #[rstest]
    fn test_backbone_without_records() {
        let consensus = plain().assemble(ok(vec![]), Some(b"ACGT".as_slice())).unwrap();
        assert_eq!(consensus.sequence, b"ACGT".to_vec());
        assert_eq!(consensus.stats.backbone_bases, 4);
    }

    #[rstest]
    fn test_backbone_deletion_consumes_reference() {
        // ref CGT at 1 replaced by C: the G and T are not copied again
        let records = vec![VariantRecord::new("chr1", 1, b"CGT", &[b"C"])];
        let consensus = plain().assemble(ok(records), Some(b"ACGTAC".as_slice())).unwrap();
        assert_eq!(consensus.sequence, b"AC[GT]AC".to_vec());
    }

    #[rstest]
    fn test_backbone_insertion() {
        let records = vec![VariantRecord::new("chr1", 0, b"A", &[b"ATT"])];
        let consensus = plain().assemble(ok(records), Some(b"ACG".as_slice())).unwrap();
        assert_eq!(consensus.sequence, b"A(TT)CG".to_vec());
    }

    #[rstest]
    fn test_backbone_skips_overlapping_records() {
        let records = vec![
            VariantRecord::new("chr1", 1, b"CG", &[b"C"]),
            VariantRecord::new("chr1", 2, b"G", &[b"A"]),
            VariantRecord::new("chr1", 3, b"T", &[b"A"]),
        ];
        let consensus = plain().assemble(ok(records), Some(b"ACGTA".as_slice())).unwrap();
        assert_eq!(consensus.sequence, b"AC[G]WA".to_vec());
        assert_eq!(consensus.stats.overlapping, 1);
        assert_eq!(consensus.stats.encoded, 2);
    }

    #[rstest]
    fn test_backbone_drops_records_past_end() {
        let records = vec![snv(1, b"C", b"A", "1"), snv(10, b"A", b"G", "1")];
        let consensus = plain().assemble(ok(records), Some(b"ACG".as_slice())).unwrap();
        assert_eq!(consensus.sequence, b"AMG".to_vec());
        assert_eq!(consensus.stats.beyond_backbone, 1);
    }

    #[rstest]
    fn test_backbone_reference_mismatch_is_counted() {
        let records = vec![snv(0, b"G", b"T", "1"), snv(1, b"c", b"T", "1")];
        let consensus = plain().assemble(ok(records), Some(b"AC".as_slice())).unwrap();
        assert_eq!(consensus.sequence, b"KY".to_vec());
        assert_eq!(consensus.stats.reference_mismatches, 1);
    }

    #[rstest]
    fn test_record_without_usable_alternate_passes_through() {
        let records = vec![
            VariantRecord::new("chr1", 0, b"A", &[b"<DEL>"]),
            VariantRecord::new("chr1", 1, b"C", &[b"*", b"T"]),
        ];
        let consensus = plain().assemble(ok(records), None).unwrap();
        assert_eq!(consensus.sequence, b"AY".to_vec());
        assert_eq!(consensus.stats.passthrough, 1);
    }

    #[rstest]
    #[case(AlternatePolicy::First, "R", 1)]
    #[case(AlternatePolicy::Merge, "V", 0)]
    fn test_alternate_policy(#[case] policy: AlternatePolicy, #[case] expected: &str, #[case] ignored: usize) {
        let records = vec![VariantRecord::new("chr1", 0, b"A", &[b"G", b"C"])];
        let consensus = plain().with_policy(policy).assemble(ok(records), None).unwrap();
        assert_eq!(String::from_utf8(consensus.sequence).unwrap(), expected);
        assert_eq!(consensus.stats.ignored_alternates, ignored);
    }

    #[rstest]
    fn test_frequency_gate_reads_encoded_alternate() {
        let config = EncoderConfig {
            invert: false,
            frequency: Some("0.5-1".parse().unwrap()),
        };
        // the spanning deletion is skipped, T carries AF 0.9
        let records = vec![
            VariantRecord::new("chr1", 0, b"C", &[b"*", b"T"]).with_attribute("AF", "0.1,0.9"),
            VariantRecord::new("chr1", 1, b"A", &[b"*", b"G"]).with_attribute("AF", "0.9,0.1"),
        ];
        let assembler = SequenceAssembler::from_config(&config, RegionExclusionFilter::empty());
        let consensus = assembler.assemble(ok(records), None).unwrap();
        assert_eq!(consensus.sequence, b"YA".to_vec());
    }

    #[rstest]
    #[case("0.3,0.3", "V")]
    #[case("0.2,0.2", "A")]
    fn test_frequency_gate_on_merged_alternates(#[case] af: &str, #[case] expected: &str) {
        let config = EncoderConfig {
            invert: false,
            frequency: Some("0.5-1".parse().unwrap()),
        };
        let records = vec![VariantRecord::new("chr1", 0, b"A", &[b"G", b"C"]).with_attribute("AF", af)];
        let consensus = SequenceAssembler::from_config(&config, RegionExclusionFilter::empty())
            .with_policy(AlternatePolicy::Merge)
            .assemble(ok(records), None)
            .unwrap();
        assert_eq!(String::from_utf8(consensus.sequence).unwrap(), expected);
    }

    #[rstest]
    fn test_merge_falls_back_for_indels() {
        let records = vec![VariantRecord::new("chr1", 0, b"AC", &[b"A", b"GC"])];
        let consensus = plain()
            .with_policy(AlternatePolicy::Merge)
            .assemble(ok(records), None)
            .unwrap();
        assert_eq!(consensus.sequence, b"A[C]".to_vec());
        assert_eq!(consensus.stats.ignored_alternates, 1);
    }

    #[rstest]
    fn test_source_error_stops_the_run() {
        let records: Vec<Result<VariantRecord, String>> = vec![
            Ok(snv(0, b"A", b"G", "1")),
            Err("truncated file".to_string()),
            Ok(snv(1, b"C", b"T", "1")),
        ];
        let result = plain().assemble(records, Some(b"ACGT".as_slice()));
        assert_eq!(result.unwrap_err(), "truncated file");
    }

    #[rstest]
    #[case("first", AlternatePolicy::First)]
    #[case("MERGE", AlternatePolicy::Merge)]
    fn test_parse_policy(#[case] raw: &str, #[case] expected: AlternatePolicy) {
        assert_eq!(raw.parse::<AlternatePolicy>().unwrap(), expected);
        assert!("all".parse::<AlternatePolicy>().is_err());
    }
}
