//! # Engine Module
//!
//! The stateful half of the pipeline: it runs the external predictor through a
//! content-addressed cache, eliminates tolerated epitopes, matches survivors
//! against the reference proteome and classifies the outcome.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Window size, prediction type, score code and cache location
//! - **Prediction** ([`predictor`], [`cache`]) - Predictor invocation and idempotent, atomic publication of its output
//! - **Elimination** ([`elimination`]) - Filtering of variant binders against the endogenous window
//! - **Proteome Matching** ([`proteome`]) - Masked-core homolog search with a run-scoped memo
//! - **Classification** ([`classifier`]) - Primary and secondary peptides and the novelty label
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine errors and their recoverability

pub mod cache;
pub mod classifier;
pub mod config;
pub mod context;
pub mod elimination;
pub mod error;
pub mod predictor;
pub mod progress;
pub mod proteome;
