//! Provides readers and writers for the text formats the pipeline exchanges
//! with its collaborators.
//!
//! Every format implements the [`traits::TextFormat`] interface: FASTA protein
//! sequences ([`fasta`]), binding-predictor score tables ([`scores`]) and
//! allele lists ([`alleles`]).

pub mod alleles;
pub mod fasta;
pub mod scores;
pub mod traits;
