//! # Core Module
//!
//! Stateless building blocks of the novelty pipeline: data models, file
//! formats, and the positional arithmetic the engine relies on.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Binding records, variants, sequences and allele sets
//! - **File I/O** ([`io`]) - FASTA, score-table and allele-list readers/writers
//! - **Score Stores** ([`store`]) - Immutable, queryable predictor output
//! - **Core Masks** ([`anchors`]) - Anchor-position masked comparison of binding cores
//! - **Windowing** ([`window`]) - Substitution index, local position and protected anchor offsets
//! - **Lookups** ([`utils`]) - Amino-acid code tables
//!
//! Nothing in this layer invokes external tools or keeps state between calls.

pub mod anchors;
pub mod io;
pub mod models;
pub mod store;
pub mod utils;
pub mod window;
