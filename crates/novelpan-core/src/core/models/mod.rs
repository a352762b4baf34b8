//! # Core Models Module
//!
//! Plain data types shared by every stage of the novelty pipeline.
//!
//! - [`record`] - One row of binding-predictor output and the binder threshold
//! - [`variant`] - Single amino-acid substitutions and their compact string form
//! - [`sequence`] - Protein sequences with FASTA-derived metadata
//! - [`allele`] - The allele set a batch is evaluated against
//!
//! All of these are immutable once constructed by the parsers in [`crate::core::io`].

pub mod allele;
pub mod record;
pub mod sequence;
pub mod variant;
