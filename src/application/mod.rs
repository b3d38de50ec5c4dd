//! # Application Layer
//!
//! Interfaces for the external collaborators and the re-ranking use case
//! that orchestrates them.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
