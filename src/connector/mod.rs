//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Embedding generation (ONNX Runtime, plus a deterministic mock)
//! - Input files (line-delimited JSON corpus, tab-separated candidate run)
//! - Output file (comma-separated run)

pub mod adapter;

pub use adapter::*;
