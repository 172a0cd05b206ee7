//! Build IUPAC consensus sequences from variant calls.
//!
//! This crate re-exports the workspace crates behind features:
//!
//! - `core`: variant records, position intervals and input helpers
//! - `io`: VCF and FASTA readers
//! - `consensus`: the encoder chain and the sequence assembler

#[cfg(feature = "core")]
#[doc(inline)]
pub use vcons_core as core;

#[cfg(feature = "io")]
#[doc(inline)]
pub use vcons_io as io;

#[cfg(feature = "consensus")]
#[doc(inline)]
pub use vcons_consensus as consensus;
