use std::collections::BTreeMap;

use log::warn;

use super::model::{MeasurementKind, MetadataValue, SpectralRecord};

// ---------------------------------------------------------------------------
// DatasetEntry – a stored spectrum plus provenance
// ---------------------------------------------------------------------------

/// A stored spectrum together with its measurement kind and open metadata.
#[derive(Debug, Clone)]
pub struct DatasetEntry {
    pub record: SpectralRecord,
    pub measurement: MeasurementKind,
    pub metadata: BTreeMap<String, MetadataValue>,
}

impl DatasetEntry {
    pub fn new(record: SpectralRecord, measurement: MeasurementKind) -> Self {
        DatasetEntry {
            record,
            measurement,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(
        record: SpectralRecord,
        measurement: MeasurementKind,
        metadata: BTreeMap<String, MetadataValue>,
    ) -> Self {
        DatasetEntry {
            record,
            measurement,
            metadata,
        }
    }
}

// ---------------------------------------------------------------------------
// DatasetCollection – keyed container of entries
// ---------------------------------------------------------------------------

/// A keyed container of [`DatasetEntry`] objects. Keys are unique sample
/// identifiers, possibly replicate-suffixed (e.g. `"sample_#1"`).
/// Iteration order is deterministic key order.
#[derive(Debug, Clone, Default)]
pub struct DatasetCollection {
    entries: BTreeMap<String, DatasetEntry>,
}

impl DatasetCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, entry: DatasetEntry) {
        self.entries.insert(key.into(), entry);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&DatasetEntry> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DatasetEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Union with another collection; entries from `other` overwrite on key
    /// collision.
    pub fn extend(&mut self, other: DatasetCollection) {
        self.entries.extend(other.entries);
    }

    /// Keyed subsetting. Keys absent from the collection are logged and
    /// omitted, never an error.
    pub fn subset(&self, keys: &[String]) -> DatasetCollection {
        let mut subset = DatasetCollection::new();
        for key in keys {
            match self.entries.get(key) {
                Some(entry) => subset.add(key.clone(), entry.clone()),
                None => warn!("key '{key}' not found in source collection"),
            }
        }
        subset
    }

    /// Replicate averaging: entries whose keys share a prefix before the
    /// first occurrence of `separator` are merged into one entry.
    ///
    /// Wavelengths and transmittances are averaged arithmetically in linear
    /// transmittance space; absorbance is then recomputed as
    /// `-log10(mean T)`, deliberately *not* the mean of the absorbances.
    /// Singleton groups pass through unchanged; merged entries carry the
    /// replicate count under the `"replicates"` metadata key. Replicates
    /// with mismatched grid lengths cannot be stacked; the first replicate
    /// is kept and the rest are logged and dropped.
    pub fn averaged(&self, separator: &str) -> DatasetCollection {
        let mut grouped: BTreeMap<String, Vec<&DatasetEntry>> = BTreeMap::new();
        for (key, entry) in &self.entries {
            let root = if !separator.is_empty() {
                match key.split_once(separator) {
                    Some((prefix, _)) => prefix.to_string(),
                    None => key.clone(),
                }
            } else {
                key.clone()
            };
            grouped.entry(root).or_default().push(entry);
        }

        let mut averaged = DatasetCollection::new();
        for (root, entries) in grouped {
            if entries.len() == 1 {
                averaged.add(root, entries[0].clone());
                continue;
            }

            let n_points = entries[0].record.len();
            if entries.iter().any(|e| e.record.len() != n_points) {
                warn!(
                    "replicates of '{root}' have mismatched grids; keeping the first unaveraged"
                );
                averaged.add(root, entries[0].clone());
                continue;
            }

            let n = entries.len() as f64;
            let mut mean_wl = vec![0.0; n_points];
            let mut mean_t = vec![0.0; n_points];
            for entry in &entries {
                for (acc, &wl) in mean_wl.iter_mut().zip(entry.record.wavelengths()) {
                    *acc += wl / n;
                }
                for (acc, &t) in mean_t.iter_mut().zip(entry.record.transmittances()) {
                    *acc += t / n;
                }
            }

            let record = SpectralRecord::from_transmittance(mean_wl, mean_t);
            let mut metadata = entries[0].metadata.clone();
            metadata.insert(
                "replicates".to_string(),
                MetadataValue::Integer(entries.len() as i64),
            );
            averaged.add(
                root,
                DatasetEntry::with_metadata(record, MeasurementKind::Transmittance, metadata),
            );
        }
        averaged
    }
}

/// Union of several collections, in iteration order of the map.
pub fn merge_collections(collections: &BTreeMap<String, DatasetCollection>) -> DatasetCollection {
    let mut merged = DatasetCollection::new();
    for collection in collections.values() {
        merged.extend(collection.clone());
    }
    merged
}
