//! Encoders that wrap another encoder and change its behaviour.
//!
//! Each decorator owns the encoder it wraps, so a chain is a single value
//! built once at configuration time.

use std::fmt::{self, Display};
use std::str::FromStr;

use vcons_core::ConfigError;
use vcons_core::models::VariantRecord;

use crate::encoder::{Encoder, is_bracket};
use crate::iupac::complement;

/// Complements the output of the wrapped encoder symbol by symbol.
pub struct InversionDecorator {
    inner: Box<dyn Encoder>,
}

impl InversionDecorator {
    pub fn new(inner: Box<dyn Encoder>) -> Self {
        InversionDecorator { inner }
    }
}

impl Encoder for InversionDecorator {
    fn encode(&self, record: &VariantRecord, alt: &[u8]) -> Vec<u8> {
        // indel payloads are complemented too; delimiters stay in place
        self.inner
            .encode(record, alt)
            .into_iter()
            .map(|b| if is_bracket(b) { b } else { complement(b) })
            .collect()
    }

    fn describe(&self) -> String {
        format!("invert({})", self.inner.describe())
    }
}

/// Closed allele frequency interval `[lower, upper]`, both within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyBounds {
    lower: f64,
    upper: f64,
}

impl FrequencyBounds {
    pub fn new(lower: f64, upper: f64) -> Result<Self, ConfigError> {
        for bound in [lower, upper] {
            if !(0.0..=1.0).contains(&bound) {
                return Err(ConfigError::FrequencyOutOfRange(bound));
            }
        }
        if lower > upper {
            return Err(ConfigError::InvalidFrequencyBounds { lower, upper });
        }
        Ok(FrequencyBounds { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Inclusive on both ends.
    #[inline]
    pub fn contains(&self, frequency: f64) -> bool {
        self.lower <= frequency && frequency <= self.upper
    }
}

impl FromStr for FrequencyBounds {
    type Err = ConfigError;

    ///
    /// Parse `"lower-upper"`, e.g. `"0.2-0.8"`
    ///
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidFrequencySpec(s.to_string());
        let (lower, upper) = s.trim().split_once('-').ok_or_else(invalid)?;
        let lower: f64 = lower.trim().parse().map_err(|_| invalid())?;
        let upper: f64 = upper.trim().parse().map_err(|_| invalid())?;
        FrequencyBounds::new(lower, upper)
    }
}

impl Display for FrequencyBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lower, self.upper)
    }
}

///
/// Delegates only for records whose allele frequency lies within the bounds.
///
/// The frequency is the one of the alternate being encoded. Records outside the
/// bounds, or without an `AF` value for that alternate, come out as their
/// unmodified reference allele.
///
pub struct AlleleFrequencyDecorator {
    bounds: FrequencyBounds,
    inner: Box<dyn Encoder>,
}

impl AlleleFrequencyDecorator {
    pub fn new(bounds: FrequencyBounds, inner: Box<dyn Encoder>) -> Self {
        AlleleFrequencyDecorator { bounds, inner }
    }

    /// Validate raw bounds and wrap `inner`.
    pub fn with_bounds(lower: f64, upper: f64, inner: Box<dyn Encoder>) -> Result<Self, ConfigError> {
        Ok(AlleleFrequencyDecorator::new(FrequencyBounds::new(lower, upper)?, inner))
    }

    pub fn bounds(&self) -> FrequencyBounds {
        self.bounds
    }

    /// True if `alt` of `record` passes the frequency gate.
    pub fn accepts(&self, record: &VariantRecord, alt: &[u8]) -> bool {
        record
            .allele_frequency_of(alt)
            .is_some_and(|af| self.bounds.contains(af))
    }
}

impl Encoder for AlleleFrequencyDecorator {
    fn encode(&self, record: &VariantRecord, alt: &[u8]) -> Vec<u8> {
        if self.accepts(record, alt) {
            self.inner.encode(record, alt)
        } else {
            record.reference.clone()
        }
    }

    fn describe(&self) -> String {
        format!("af[{}]({})", self.bounds, self.inner.describe())
    }
}
