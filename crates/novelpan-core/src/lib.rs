//! # novelpan Core Library
//!
//! Detection of novel MHC-II epitopes created by single amino-acid variants and
//! classification of their cross-reactivity with the reference proteome.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`BindingRecord`,
//!   `VariantDescriptor`, `ProteinSequence`), file formats (FASTA, predictor score
//!   tables, allele lists), anchor masks and variant windowing.
//!
//! - **[`engine`]: The Logic Core.** Runs the external binding predictor behind a
//!   content-addressed cache, eliminates binders that the endogenous sequence
//!   already presents, searches the proteome for masked-core homologs and
//!   classifies the result.
//!
//! - **[`workflows`]: The Public API.** Drives a whole batch of variants and
//!   alleles, optionally in parallel, and collects results and per-unit failures
//!   into a single report.

pub mod core;
pub mod engine;
pub mod workflows;
