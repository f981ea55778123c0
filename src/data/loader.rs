use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::debug;
use serde::Deserialize;

use crate::config::DirectoryConfig;

use super::collection::{DatasetCollection, DatasetEntry};
use super::model::{MetadataValue, SpectralRecord};

// ---------------------------------------------------------------------------
// Acquisition files
// ---------------------------------------------------------------------------
//
// SPC binary parsing lives outside this crate; acquisitions arrive as plain
// wavelength/amplitude exports, one sample per file (file stem = sample key).

/// Raw parser output for one acquisition: wavelength and amplitude arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAcquisition {
    pub wavelengths: Vec<f64>,
    pub amplitudes: Vec<f64>,
}

/// Load a single acquisition file. Dispatch by extension.
///
/// Supported formats:
/// * `.json` – `{ "wavelength": [...], "amplitude": [...] }`
/// * `.csv`  – header `wavelength,amplitude`, one point per row
pub fn load_acquisition(path: &Path) -> Result<RawAcquisition> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let acquisition = match ext.as_str() {
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    if acquisition.wavelengths.len() != acquisition.amplitudes.len() {
        bail!(
            "{}: wavelength has {} values but amplitude has {}",
            path.display(),
            acquisition.wavelengths.len(),
            acquisition.amplitudes.len()
        );
    }
    Ok(acquisition)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct JsonAcquisition {
    wavelength: Vec<f64>,
    amplitude: Vec<f64>,
}

fn load_json(path: &Path) -> Result<RawAcquisition> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let parsed: JsonAcquisition = serde_json::from_str(&text)
        .with_context(|| format!("parsing JSON acquisition {}", path.display()))?;
    Ok(RawAcquisition {
        wavelengths: parsed.wavelength,
        amplitudes: parsed.amplitude,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<RawAcquisition> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let wl_idx = headers
        .iter()
        .position(|h| h == "wavelength")
        .context("CSV missing 'wavelength' column")?;
    let amp_idx = headers
        .iter()
        .position(|h| h == "amplitude")
        .context("CSV missing 'amplitude' column")?;

    let mut wavelengths = Vec::new();
    let mut amplitudes = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        wavelengths.push(parse_float(record.get(wl_idx), row_no, "wavelength")?);
        amplitudes.push(parse_float(record.get(amp_idx), row_no, "amplitude")?);
    }

    Ok(RawAcquisition {
        wavelengths,
        amplitudes,
    })
}

fn parse_float(field: Option<&str>, row: usize, col: &str) -> Result<f64> {
    let tok = field.unwrap_or("").trim();
    tok.parse::<f64>()
        .with_context(|| format!("row {row}, {col}: '{tok}' is not a number"))
}

// ---------------------------------------------------------------------------
// Directory loading
// ---------------------------------------------------------------------------

/// Load every acquisition file with the configured extension from a
/// directory into a new collection. Files are visited in sorted order and
/// keyed by file stem; each entry carries provenance metadata.
pub fn load_directory(config: &DirectoryConfig) -> Result<DatasetCollection> {
    let mut paths: Vec<_> = std::fs::read_dir(&config.path)
        .with_context(|| format!("scanning directory {}", config.path.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| matches_extension(p, &config.extension))
        .collect();
    paths.sort();

    let mut collection = DatasetCollection::new();
    for path in paths {
        let key = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_string(),
            None => continue,
        };
        let raw = load_acquisition(&path)?;
        let record =
            SpectralRecord::from_amplitudes(config.mode, &raw.wavelengths, &raw.amplitudes);
        debug!(
            "loaded '{key}' from {} ({} points after band filter)",
            path.display(),
            record.len()
        );

        let mut metadata = BTreeMap::new();
        metadata.insert(
            "source".to_string(),
            MetadataValue::String(config.name.clone()),
        );
        metadata.insert(
            "mode".to_string(),
            MetadataValue::String(config.mode.to_string()),
        );
        collection.add(
            key,
            DatasetEntry::with_metadata(record, config.measurement, metadata),
        );
    }
    Ok(collection)
}

fn matches_extension(path: &Path, extension: &str) -> bool {
    let wanted = extension.trim_start_matches('.').to_ascii_lowercase();
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase() == wanted)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DirectoryConfig;
    use crate::data::model::AcquisitionMode;
    use crate::data::model::MeasurementKind;
    use std::io::Write;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("rusty-chroma-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn csv_acquisition_round_trip() {
        let dir = scratch_dir("csv");
        let path = dir.join("sample_a.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "wavelength,amplitude").unwrap();
        writeln!(file, "400,0.5").unwrap();
        writeln!(file, "500,0.25").unwrap();
        drop(file);

        let raw = load_acquisition(&path).unwrap();
        assert_eq!(raw.wavelengths, vec![400.0, 500.0]);
        assert_eq!(raw.amplitudes, vec![0.5, 0.25]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn json_acquisition_round_trip() {
        let dir = scratch_dir("json");
        let path = dir.join("sample_b.json");
        std::fs::write(&path, r#"{"wavelength": [400, 500], "amplitude": [1.0, 0.0]}"#).unwrap();

        let raw = load_acquisition(&path).unwrap();
        assert_eq!(raw.wavelengths, vec![400.0, 500.0]);
        assert_eq!(raw.amplitudes, vec![1.0, 0.0]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let dir = scratch_dir("ext");
        let path = dir.join("sample.spc");
        std::fs::write(&path, b"binary").unwrap();

        assert!(load_acquisition(&path).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn directory_scan_keys_by_file_stem() {
        let dir = scratch_dir("scan");
        std::fs::write(
            dir.join("first.json"),
            r#"{"wavelength": [400, 500], "amplitude": [0.1, 0.2]}"#,
        )
        .unwrap();
        std::fs::write(dir.join("notes.txt"), b"ignored").unwrap();

        let config = DirectoryConfig {
            name: "scan".to_string(),
            path: dir.clone(),
            mode: AcquisitionMode::A,
            measurement: MeasurementKind::Transmittance,
            extension: ".json".to_string(),
            replicate_suffix: "#".to_string(),
        };
        let collection = load_directory(&config).unwrap();
        assert_eq!(collection.len(), 1);
        let entry = collection.get("first").unwrap();
        assert_eq!(entry.record.wavelengths(), &[400.0, 500.0]);
        assert_eq!(
            entry.metadata.get("source"),
            Some(&MetadataValue::String("scan".to_string()))
        );

        let _ = std::fs::remove_dir_all(&dir);
    }
}
