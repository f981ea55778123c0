//! Pipeline orchestrator: load → average → group → analyse.
//!
//! Each stage recomputes its output wholesale from current inputs; calling
//! a stage again rebuilds its pools or maps from scratch. The accumulated
//! `results` store spans invocations with last-write-per-key semantics.

use std::collections::BTreeMap;

use anyhow::Result;
use log::{error, warn};
use serde::Serialize;

use crate::colour::illuminant::{Illuminant, IlluminantLibrary};
use crate::colour::metrics::{compute_colour_metrics, ColourMetrics};
use crate::config::{PipelineConfig, SourcePool};
use crate::data::collection::{DatasetCollection, DatasetEntry};
use crate::data::loader::load_directory;
use crate::data::model::{MeasurementKind, MetadataValue, SpectralRecord};
use crate::error::PipelineError;

/// Fixed reference colour for the decolouring score: rgb (68, 77, 55)/255.
const DECOLOURING_REFERENCE_RGB: [f64; 3] = [68.0 / 255.0, 77.0 / 255.0, 55.0 / 255.0];

// ---------------------------------------------------------------------------
// ColourResult
// ---------------------------------------------------------------------------

/// Per-sample analysis output: the colour metrics plus two percentage
/// scores derived from rgb.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColourResult {
    pub name: String,
    pub metrics: ColourMetrics,
    pub decolouring_percentage: f64,
    pub white_distance: f64,
}

impl ColourResult {
    /// rgb as 0–255 integers, rounded.
    pub fn rgb_int(&self) -> [u8; 3] {
        let channel = |v: f64| (v * 255.0).round() as u8;
        [
            channel(self.metrics.rgb[0]),
            channel(self.metrics.rgb[1]),
            channel(self.metrics.rgb[2]),
        ]
    }
}

/// Decolouring % and white-distance % of a clipped rgb triple.
pub fn colour_distances(rgb: [f64; 3]) -> (f64, f64) {
    let rgb_sum: f64 = rgb.iter().sum();
    let reference_sum: f64 = DECOLOURING_REFERENCE_RGB.iter().sum();
    let decolouring = (rgb_sum - reference_sum) / (3.0 - reference_sum) * 100.0;
    let white_distance = (1.0 - rgb_sum / 3.0) * 100.0;
    (decolouring, white_distance)
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Owns the dataset pools, group views, illuminant table and the
/// accumulating result store. Single-threaded; one orchestrator instance
/// per batch run.
pub struct Pipeline {
    config: PipelineConfig,
    illuminants: IlluminantLibrary,
    raw_collections: BTreeMap<String, DatasetCollection>,
    all_data: DatasetCollection,
    averaged_data: DatasetCollection,
    groups: BTreeMap<String, DatasetCollection>,
    results: BTreeMap<String, ColourResult>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let mut illuminants = IlluminantLibrary::standard();
        for (name, pairs) in &config.illuminants {
            let pairs: Vec<(f64, f64)> = pairs.iter().map(|p| (p[0], p[1])).collect();
            illuminants.insert(Illuminant::from_pairs(name.clone(), &pairs));
        }
        Pipeline {
            config,
            illuminants,
            raw_collections: BTreeMap::new(),
            all_data: DatasetCollection::new(),
            averaged_data: DatasetCollection::new(),
            groups: BTreeMap::new(),
            results: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn all_data(&self) -> &DatasetCollection {
        &self.all_data
    }

    pub fn averaged_data(&self) -> &DatasetCollection {
        &self.averaged_data
    }

    pub fn group(&self, name: &str) -> Option<&DatasetCollection> {
        self.groups.get(name)
    }

    /// The accumulated result store (last write per sample key wins).
    pub fn results(&self) -> &BTreeMap<String, ColourResult> {
        &self.results
    }

    // ------------------------------------------------------------------
    // Loading and preparation
    // ------------------------------------------------------------------

    /// Rebuild the raw pools from the configured directories. A missing
    /// directory is skipped with a warning; the averaged pool is rebuilt
    /// afterwards.
    pub fn load_directories(&mut self) -> Result<()> {
        self.raw_collections.clear();
        self.all_data = DatasetCollection::new();

        for directory in &self.config.directories {
            if !directory.path.exists() {
                warn!(
                    "directory {} does not exist; skipping",
                    directory.path.display()
                );
                continue;
            }
            let collection = load_directory(directory)?;
            self.all_data.extend(collection.clone());
            self.raw_collections.insert(directory.name.clone(), collection);
        }
        self.rebuild_averaged();
        Ok(())
    }

    /// Add the inline literal spectra from the config to the raw pool,
    /// overwriting entries with the same key (idempotent re-entry).
    pub fn load_inline_samples(&mut self) {
        for (index, sample) in self.config.inline_samples.iter().enumerate() {
            let name = sample
                .name
                .clone()
                .unwrap_or_else(|| format!("sample_{:02}", index + 1));
            let record = SpectralRecord::from_absorbance(
                sample.wavelengths.clone(),
                sample.absorbances.clone(),
            );
            let mut entry = DatasetEntry::new(record, MeasurementKind::Absorbance);
            entry
                .metadata
                .insert("source".to_string(), MetadataValue::String("inline".to_string()));
            self.all_data.add(name, entry);
        }
        self.rebuild_averaged();
    }

    /// The averaged pool is shared across directories, so a single
    /// separator applies: the `replicate_suffix` of the first directory
    /// descriptor (or `"#"` when no directories are configured).
    /// Differing suffixes on later descriptors are not consulted.
    fn rebuild_averaged(&mut self) {
        if self.all_data.is_empty() {
            return;
        }
        let separator = self
            .config
            .directories
            .first()
            .map(|d| d.replicate_suffix.clone())
            .unwrap_or_else(|| "#".to_string());
        self.averaged_data = self.all_data.averaged(&separator);
    }

    /// Rebuild the group map from the configured group descriptors.
    /// Missing keys and unresolvable assignments are logged and omitted.
    pub fn build_groups(&mut self) {
        self.groups.clear();
        for group in &self.config.groups {
            let mut subset = self.pool(group.source).subset(&group.keys);

            for (target_key, descriptor) in &group.assignments {
                let Some((pool_tag, source_key)) = descriptor.split_once(':') else {
                    error!("invalid assignment descriptor '{descriptor}'");
                    continue;
                };
                let Some(pool) = SourcePool::parse(pool_tag) else {
                    warn!("assignment {descriptor} -> {target_key} could not be resolved");
                    continue;
                };
                match self.pool(pool).get(source_key) {
                    Some(entry) => subset.add(target_key.clone(), entry.clone()),
                    None => {
                        warn!("assignment {descriptor} -> {target_key} could not be resolved")
                    }
                }
            }
            self.groups.insert(group.name.clone(), subset);
        }
    }

    fn pool(&self, source: SourcePool) -> &DatasetCollection {
        match source {
            SourcePool::All => &self.all_data,
            SourcePool::Averaged => &self.averaged_data,
        }
    }

    // ------------------------------------------------------------------
    // Analysis
    // ------------------------------------------------------------------

    /// Analyse every entry of a built group under a named illuminant and
    /// accumulate the results into the shared store.
    pub fn analyse_group(
        &mut self,
        group_name: &str,
        illuminant_name: &str,
        use_absorbance: bool,
    ) -> Result<BTreeMap<String, ColourResult>, PipelineError> {
        let illuminant = self
            .illuminants
            .get(illuminant_name)
            .ok_or_else(|| PipelineError::UnknownIlluminant(illuminant_name.to_string()))?
            .clone();
        self.analyse_group_with(group_name, &illuminant, use_absorbance)
    }

    /// Analyse a group under a directly supplied spectral distribution.
    pub fn analyse_group_with(
        &mut self,
        group_name: &str,
        illuminant: &Illuminant,
        use_absorbance: bool,
    ) -> Result<BTreeMap<String, ColourResult>, PipelineError> {
        let group = self
            .groups
            .get(group_name)
            .ok_or_else(|| PipelineError::UnknownGroup(group_name.to_string()))?;

        let results = analyse_collection(
            group,
            illuminant,
            use_absorbance,
            self.config.reference_lab,
        );
        for (key, result) in &results {
            self.results.insert(key.clone(), result.clone());
        }
        Ok(results)
    }

    /// Cross product: illuminant name → sample → result.
    pub fn analyse_group_under_illuminants(
        &mut self,
        group_name: &str,
        illuminant_names: &[&str],
        use_absorbance: bool,
    ) -> Result<BTreeMap<String, BTreeMap<String, ColourResult>>, PipelineError> {
        let mut output = BTreeMap::new();
        for &name in illuminant_names {
            let results = self.analyse_group(group_name, name, use_absorbance)?;
            output.insert(name.to_string(), results);
        }
        Ok(output)
    }

    /// Analyse a group under a synthetic blackbody radiator at the given
    /// colour temperature. Returns its map without touching the shared
    /// result store.
    pub fn analyse_blackbody(
        &self,
        group_name: &str,
        temperature: f64,
        use_absorbance: bool,
    ) -> Result<BTreeMap<String, ColourResult>, PipelineError> {
        let group = self
            .groups
            .get(group_name)
            .ok_or_else(|| PipelineError::UnknownGroup(group_name.to_string()))?;
        let illuminant = Illuminant::blackbody(temperature);
        Ok(analyse_collection(
            group,
            &illuminant,
            use_absorbance,
            self.config.reference_lab,
        ))
    }

    /// Metric bundles only, keyed illuminant → sample, for presentation
    /// layers that render comparative charts.
    pub fn colour_dataset(
        &mut self,
        group_name: &str,
        illuminant_names: &[&str],
        use_absorbance: bool,
    ) -> Result<BTreeMap<String, BTreeMap<String, ColourMetrics>>, PipelineError> {
        let mut dataset = BTreeMap::new();
        for &name in illuminant_names {
            let analysis = self.analyse_group(group_name, name, use_absorbance)?;
            dataset.insert(
                name.to_string(),
                analysis
                    .into_iter()
                    .map(|(key, result)| (key, result.metrics))
                    .collect(),
            );
        }
        Ok(dataset)
    }
}

fn analyse_collection(
    group: &DatasetCollection,
    illuminant: &Illuminant,
    use_absorbance: bool,
    reference_lab: [f64; 3],
) -> BTreeMap<String, ColourResult> {
    let kind = if use_absorbance {
        MeasurementKind::Absorbance
    } else {
        MeasurementKind::Transmittance
    };
    let mut results = BTreeMap::new();
    for (key, entry) in group.iter() {
        let spectrum = entry.record.pairs(kind);
        let metrics = compute_colour_metrics(&spectrum, kind, illuminant, reference_lab);
        let (decolouring_percentage, white_distance) = colour_distances(metrics.rgb);
        results.insert(
            key.clone(),
            ColourResult {
                name: key.clone(),
                metrics,
                decolouring_percentage,
                white_distance,
            },
        );
    }
    results
}
