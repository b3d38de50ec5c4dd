//! # Domain Layer
//!
//! Core models, errors and the pure scoring functions used by re-ranking.
//! This layer is independent of file formats and embedding models.

mod error;
pub mod models;
pub mod services;

pub use error::*;
pub use models::*;
pub use services::*;
