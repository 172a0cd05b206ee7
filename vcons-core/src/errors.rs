use thiserror::Error;

/// Raised while validating configuration, before any variant is processed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid region '{spec}': {reason}")]
    InvalidRegion { spec: String, reason: String },

    #[error("Invalid allele frequency bounds '{0}': expected LOWER-UPPER, e.g. 0.2-0.8")]
    InvalidFrequencySpec(String),

    #[error("Lower allele frequency bound {lower} is greater than upper bound {upper}")]
    InvalidFrequencyBounds { lower: f64, upper: f64 },

    #[error("Allele frequency bound {0} is outside of [0, 1]")]
    FrequencyOutOfRange(f64),
}
