//! Data layer: core types, loading, and replicate averaging.
//!
//! Architecture:
//! ```text
//!  .csv / .json acquisition exports
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → SpectralRecord (mode conversion, band filter)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────────┐
//!   │ DatasetCollection │  key → DatasetEntry
//!   └──────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ averaged  │  merge replicates in linear transmittance space
//!   └──────────┘
//! ```
pub mod collection;
pub mod loader;
pub mod model;
