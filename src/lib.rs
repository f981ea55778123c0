//! Spectral colourimetry pipeline.
//!
//! Ingests transmittance/absorbance spectra (acquisition file exports or
//! inline literal data), converts them to CIE XYZ / L*a*b* / sRGB under
//! configurable illuminants, derives whiteness, tint, chroma and
//! colour-difference metrics, and groups and averages replicate
//! measurements. Rendering of the derived results is left to external
//! presentation layers.

pub mod colour;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;

pub use colour::illuminant::{Illuminant, IlluminantLibrary};
pub use colour::metrics::ColourMetrics;
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use pipeline::{ColourResult, Pipeline};
