//! Consensus encoding engine.
//!
//! Turns an ordered stream of variant calls into a single nucleotide sequence,
//! writing heterozygous positions as IUPAC ambiguity codes:
//!
//! - [`iupac`]: 4-bit base set algebra (`combine`, `complement`)
//! - [`encoder`]: per-variant encoding with `[deletion]` / `(insertion)` brackets
//! - [`decorators`]: allele frequency gating and strand inversion
//! - [`exclusion`]: reference positions that are never encoded
//! - [`assembler`]: drives the whole run, with or without a reference backbone
//!
//! # Example
//!
//! ```
//! use vcons_consensus::{EncoderConfig, RegionExclusionFilter, SequenceAssembler};
//! use vcons_core::models::VariantRecord;
//!
//! let config = EncoderConfig { invert: false, frequency: Some("0.2-0.8".parse().unwrap()) };
//! let filter = RegionExclusionFilter::new(["3"]).unwrap();
//! let assembler = SequenceAssembler::from_config(&config, filter);
//!
//! let records = vec![
//!     VariantRecord::new("chr1", 1, b"C", &[b"T"]).with_attribute("AF", "0.5"),
//!     VariantRecord::new("chr1", 3, b"T", &[b"G"]).with_attribute("AF", "0.5"),
//! ];
//! let consensus = assembler
//!     .assemble(records.into_iter().map(Ok::<_, std::convert::Infallible>), Some(b"ACGTA".as_slice()))
//!     .unwrap();
//! assert_eq!(consensus.sequence, b"AYGTA".to_vec());
//! ```

pub mod assembler;
pub mod chain;
pub mod decorators;
pub mod encoder;
pub mod exclusion;
pub mod iupac;

// re-exports
pub use assembler::{AlternatePolicy, AssemblyStats, Consensus, SequenceAssembler};
pub use chain::EncoderConfig;
pub use decorators::{AlleleFrequencyDecorator, FrequencyBounds, InversionDecorator};
pub use encoder::{BaseEncoder, Encoder, encode_alleles};
pub use exclusion::RegionExclusionFilter;
