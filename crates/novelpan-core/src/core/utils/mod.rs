//! Small lookup helpers shared by the models and parsers.

pub mod identifiers;
