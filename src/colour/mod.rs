//! Colour engine: spectra → tristimulus → perceptual coordinates + metrics.
//!
//! Architecture:
//! ```text
//!   (wavelength, value) pairs
//!        │
//!        ▼
//!   ┌──────────┐     ┌─────────────┐
//!   │ convert   │ ◄── │ illuminant   │  D65 / A / E / blackbody / custom
//!   └──────────┘     └─────────────┘
//!        │                 ▲
//!        ▼                 │
//!   ┌──────────┐     ┌──────────┐
//!   │ metrics   │     │   cie     │  embedded CMF + D65 tables
//!   └──────────┘     └──────────┘
//!
//!   adapt     – white-point correction matrices (independent helper)
//!   weighting – manual CMF-weighting path for raw power spectra
//! ```
pub mod adapt;
pub mod cie;
pub mod convert;
pub mod illuminant;
pub mod metrics;
pub mod weighting;
