//! Externally supplied configuration: directory descriptors, dataset
//! groups, labels, reference colours and custom illuminants. Nothing
//! experiment-specific is hard-coded into the core.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::{AcquisitionMode, MeasurementKind};

/// Reference L*a*b* used for ΔE/ΔC when the config does not override it
/// (the white calibration standard of the original measurement campaign).
pub const DEFAULT_REFERENCE_LAB: [f64; 3] = [99.7798957, 0.0374284143, -7.90433837];

/// One directory of acquisition exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    pub name: String,
    pub path: PathBuf,
    #[serde(default = "default_mode")]
    pub mode: AcquisitionMode,
    #[serde(default = "default_measurement")]
    pub measurement: MeasurementKind,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_replicate_suffix")]
    pub replicate_suffix: String,
}

fn default_mode() -> AcquisitionMode {
    AcquisitionMode::A
}

fn default_measurement() -> MeasurementKind {
    MeasurementKind::Transmittance
}

fn default_extension() -> String {
    ".csv".to_string()
}

fn default_replicate_suffix() -> String {
    "#".to_string()
}

/// Which pool a group pulls its entries from. Closed set, validated at
/// config parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourcePool {
    /// Every raw entry across all loaded directories.
    All,
    /// The replicate-averaged pool.
    Averaged,
}

impl SourcePool {
    /// Parse the pool tag of an assignment descriptor.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "all" => Some(SourcePool::All),
            "averaged" => Some(SourcePool::Averaged),
            _ => None,
        }
    }
}

impl fmt::Display for SourcePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourcePool::All => write!(f, "all"),
            SourcePool::Averaged => write!(f, "averaged"),
        }
    }
}

/// A named view over one of the pools: an ordered key list plus optional
/// cross-pool assignments (`target_key` → `"pool:key"` descriptor).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    pub source: SourcePool,
    pub keys: Vec<String>,
    #[serde(default)]
    pub assignments: BTreeMap<String, String>,
}

/// An inline literal spectrum (absorbance series), for data embedded
/// directly in the configuration rather than read from files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineSpectrum {
    #[serde(default)]
    pub name: Option<String>,
    pub wavelengths: Vec<f64>,
    pub absorbances: Vec<f64>,
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub directories: Vec<DirectoryConfig>,
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
    #[serde(default)]
    pub inline_samples: Vec<InlineSpectrum>,
    /// Sample key → human label; an explicit `null` suppresses labelling.
    #[serde(default)]
    pub labels: BTreeMap<String, Option<String>>,
    #[serde(default = "default_reference_lab")]
    pub reference_lab: [f64; 3],
    /// Custom illuminant SPDs as `[wavelength, power]` pairs, merged over
    /// (and able to override) the standard table.
    #[serde(default)]
    pub illuminants: BTreeMap<String, Vec<[f64; 2]>>,
}

fn default_reference_lab() -> [f64; 3] {
    DEFAULT_REFERENCE_LAB
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            directories: Vec::new(),
            groups: Vec::new(),
            inline_samples: Vec::new(),
            labels: BTreeMap::new(),
            reference_lab: DEFAULT_REFERENCE_LAB,
            illuminants: BTreeMap::new(),
        }
    }
}

impl PipelineConfig {
    /// Read a configuration from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))
    }
}
