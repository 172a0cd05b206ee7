//! # Input utilities for vcons.
//!
//! Readers for the two inputs of a consensus run: a forward-only VCF cursor that
//! yields [`VariantRecord`](vcons_core::models::VariantRecord)s in file order, and a
//! FASTA loader that provides the reference backbone. Both accept plain or gzip'd files.
//!
pub mod error;
pub mod fasta;
pub mod vcf;

// re-expose core functions
pub use error::*;
pub use fasta::*;
pub use vcf::*;
