use fxhash::FxHashMap;
use std::fmt::{self, Display};

/// INFO key holding the allele frequency.
pub const ALLELE_FREQUENCY_KEY: &str = "AF";

///
/// VariantRecord struct, one variant call as reported by a variant source
///
/// `position` is 0-based. Alleles are stored as raw bytes, the way
/// they appear in the source file.
#[derive(PartialEq, Debug, Clone)]
pub struct VariantRecord {
    pub chrom: String,
    pub position: u64,
    pub id: Option<String>,
    pub reference: Vec<u8>,
    pub alternates: Vec<Vec<u8>>,

    /// INFO attributes; flags map to an empty string
    pub attributes: FxHashMap<String, String>,
}

impl VariantRecord {
    pub fn new(chrom: &str, position: u64, reference: &[u8], alternates: &[&[u8]]) -> Self {
        VariantRecord {
            chrom: chrom.to_string(),
            position,
            id: None,
            reference: reference.to_vec(),
            alternates: alternates.iter().map(|a| a.to_vec()).collect(),
            attributes: FxHashMap::default(),
        }
    }

    /// Builder-style helper to attach an INFO attribute.
    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|v| v.as_str())
    }

    ///
    /// Allele frequency from the `AF` attribute. Multi-allelic records carry one
    /// value per alternate; the first one is used. Missing or unparsable values give `None`.
    ///
    pub fn allele_frequency(&self) -> Option<f64> {
        let raw = self.attribute(ALLELE_FREQUENCY_KEY)?;
        raw.split(',').next()?.trim().parse::<f64>().ok()
    }

    ///
    /// Allele frequency of the alternate `alt`. `AF` holds one value per alternate
    /// (`Number=A`), so the value is picked by the index of `alt`; a single value
    /// applies to every alternate. An allele that is not one of the alternates, i.e.
    /// several merged into one, gets the summed frequency of the usable alternates.
    ///
    pub fn allele_frequency_of(&self, alt: &[u8]) -> Option<f64> {
        let raw = self.attribute(ALLELE_FREQUENCY_KEY)?;
        let values: Vec<&str> = raw.split(',').collect();
        if values.len() == 1 {
            return raw.trim().parse::<f64>().ok();
        }
        let value_at = |index: usize| values.get(index)?.trim().parse::<f64>().ok();

        match self.alternates.iter().position(|a| a.as_slice() == alt) {
            Some(index) => value_at(index),
            None => self
                .alternates
                .iter()
                .enumerate()
                .filter(|(_, a)| is_sequence_allele(a))
                .map(|(index, _)| value_at(index))
                .sum::<Option<f64>>()
                .map(|af| af.min(1.0)),
        }
    }

    /// Position one past the last reference base covered by this record.
    pub fn end(&self) -> u64 {
        self.position + self.reference.len() as u64
    }

    ///
    /// Alternates that can be encoded: missing (`.`), spanning deletions (`*`)
    /// and symbolic alleles (`<DEL>`, breakends) are skipped.
    ///
    pub fn usable_alternates(&self) -> impl Iterator<Item = &[u8]> {
        self.alternates
            .iter()
            .map(|a| a.as_slice())
            .filter(|a| is_sequence_allele(a))
    }
}

fn is_sequence_allele(allele: &[u8]) -> bool {
    !allele.is_empty()
        && allele != b"."
        && allele != b"*"
        && !allele.contains(&b'<')
        && !allele.contains(&b'[')
        && !allele.contains(&b']')
}

impl Display for VariantRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alts: Vec<String> = self
            .alternates
            .iter()
            .map(|a| String::from_utf8_lossy(a).into_owned())
            .collect();
        write!(
            f,
            "{}:{} {}>{}",
            self.chrom,
            self.position,
            String::from_utf8_lossy(&self.reference),
            alts.join(",")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("0.25", Some(0.25))]
    #[case("0.5,0.1", Some(0.5))]
    #[case("1", Some(1.0))]
    #[case(".", None)]
    #[case("", None)]
    fn test_allele_frequency(#[case] raw: &str, #[case] expected: Option<f64>) {
        let record = VariantRecord::new("chr1", 0, b"A", &[b"G"]).with_attribute("AF", raw);
        assert_eq!(record.allele_frequency(), expected);
    }

    #[rstest]
    fn test_allele_frequency_absent() {
        let record = VariantRecord::new("chr1", 0, b"A", &[b"G"]);
        assert_eq!(record.allele_frequency(), None);
    }

    #[rstest]
    #[case("*,T", "0.1,0.9", "T", Some(0.9))]
    #[case("*,T", "0.1,0.9", "*", Some(0.1))]
    #[case("G,T", "0.4", "T", Some(0.4))]
    #[case("G,T", "0.4,.", "T", None)]
    #[case("G,T", "0.4", "C", Some(0.4))]
    fn test_allele_frequency_of(
        #[case] alternates: &str,
        #[case] raw: &str,
        #[case] alt: &str,
        #[case] expected: Option<f64>,
    ) {
        let alternates: Vec<&[u8]> = alternates.split(',').map(str::as_bytes).collect();
        let record = VariantRecord::new("chr1", 0, b"C", &alternates).with_attribute("AF", raw);
        assert_eq!(record.allele_frequency_of(alt.as_bytes()), expected);
    }

    #[rstest]
    fn test_allele_frequency_of_merged_alternates() {
        let record = VariantRecord::new("chr1", 0, b"A", &[b"G", b"<DEL>", b"C"])
            .with_attribute("AF", "0.25,0.1,0.5");
        // S is neither G nor C: the usable alternates are summed
        assert_eq!(record.allele_frequency_of(b"S"), Some(0.75));

        let saturated = record.clone().with_attribute("AF", "0.75,0.1,0.5");
        assert_eq!(saturated.allele_frequency_of(b"S"), Some(1.0));
    }

    #[rstest]
    fn test_usable_alternates_skips_symbolic() {
        let record = VariantRecord::new("chr1", 3, b"A", &[b"<DEL>", b"*", b"C", b".", b"G]chr2:5]", b"T"]);
        let usable: Vec<&[u8]> = record.usable_alternates().collect();
        assert_eq!(usable, vec![b"C".as_slice(), b"T".as_slice()]);
    }

    #[rstest]
    fn test_end_and_display() {
        let record = VariantRecord::new("chr2", 10, b"ACG", &[b"A", b"T"]);
        assert_eq!(record.end(), 13);
        assert_eq!(record.to_string(), "chr2:10 ACG>A,T");
    }
}
