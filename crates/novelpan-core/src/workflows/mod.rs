//! # Workflows Module
//!
//! High-level entry points that tie the [`core`](crate::core) and
//! [`engine`](crate::engine) layers into a complete novelty analysis.
//!
//! - **Novelty Workflow** ([`novelty`]) - Window preparation, prediction,
//!   elimination, proteome matching and classification for every
//!   (variant, allele) pair, with per-unit failure isolation.

pub mod novelty;
