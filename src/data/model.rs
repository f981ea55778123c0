use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MetadataValue – a single provenance cell on a dataset entry
// ---------------------------------------------------------------------------

/// A dynamically-typed metadata value (source directory, instrument mode,
/// replicate count, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    String(String),
    Integer(i64),
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => write!(f, "{s}"),
            MetadataValue::Integer(i) => write!(f, "{i}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Measurement kinds
// ---------------------------------------------------------------------------

/// Which quantity was primary at acquisition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementKind {
    Absorbance,
    Transmittance,
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementKind::Absorbance => write!(f, "absorbance"),
            MeasurementKind::Transmittance => write!(f, "transmittance"),
        }
    }
}

/// Instrument acquisition mode, controlling how raw amplitudes are turned
/// into the absorbance/transmittance pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcquisitionMode {
    /// Amplitudes are absorbance.
    A,
    /// Amplitudes are transmittance.
    T,
    /// Amplitudes are reflectance; absorbance is taken as `1 - amplitude`
    /// (simplified relation inherited from the acquisition workflow).
    R,
}

impl fmt::Display for AcquisitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquisitionMode::A => write!(f, "A"),
            AcquisitionMode::T => write!(f, "T"),
            AcquisitionMode::R => write!(f, "R"),
        }
    }
}

// ---------------------------------------------------------------------------
// SpectralRecord – one measured spectrum in three co-derived quantities
// ---------------------------------------------------------------------------

/// Transmittances this small are clamped before taking log10 so absorbance
/// stays finite.
const MIN_TRANSMITTANCE: f64 = 1e-12;

/// Instrument-valid wavelength band for parsed acquisitions, nm.
pub const ACQUISITION_BAND: (f64, f64) = (250.0, 800.0);

/// A single spectral acquisition: equal-length wavelength (nm, ascending),
/// absorbance and transmittance series with `T = 10^(-A)` holding pairwise.
/// Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralRecord {
    wavelengths: Vec<f64>,
    absorbances: Vec<f64>,
    transmittances: Vec<f64>,
}

impl SpectralRecord {
    /// Build a record from raw instrument amplitudes.
    ///
    /// Applies the mode conversion, then keeps only integer-valued
    /// wavelengths inside [`ACQUISITION_BAND`], sorted ascending with
    /// duplicates dropped (first occurrence wins).
    pub fn from_amplitudes(mode: AcquisitionMode, wavelengths: &[f64], amplitudes: &[f64]) -> Self {
        debug_assert_eq!(wavelengths.len(), amplitudes.len());

        let (absorbances, transmittances): (Vec<f64>, Vec<f64>) = amplitudes
            .iter()
            .map(|&amp| match mode {
                AcquisitionMode::A => (amp, 10f64.powf(-amp)),
                AcquisitionMode::T => (-amp.max(MIN_TRANSMITTANCE).log10(), amp),
                AcquisitionMode::R => {
                    let a = 1.0 - amp;
                    (a, 10f64.powf(-a))
                }
            })
            .unzip();

        let (lo, hi) = ACQUISITION_BAND;
        let rows = wavelengths
            .iter()
            .copied()
            .zip(absorbances.into_iter().zip(transmittances))
            .map(|(wl, (a, t))| (wl, a, t))
            .filter(|&(wl, _, _)| wl.fract() == 0.0 && wl >= lo && wl <= hi)
            .collect();
        Self::from_rows(rows)
    }

    /// Build a record from literal absorbance data (inline spectra).
    /// No band filtering is applied, but the grid is still sorted
    /// ascending with duplicate wavelengths dropped (first occurrence
    /// wins).
    pub fn from_absorbance(wavelengths: Vec<f64>, absorbances: Vec<f64>) -> Self {
        debug_assert_eq!(wavelengths.len(), absorbances.len());
        let rows = wavelengths
            .into_iter()
            .zip(absorbances)
            .map(|(wl, a)| (wl, a, 10f64.powf(-a)))
            .collect();
        Self::from_rows(rows)
    }

    /// Build a record from transmittance data, recomputing absorbance as
    /// `-log10(T)` with near-zero transmittance clamped. Sorted and
    /// deduplicated like [`SpectralRecord::from_absorbance`].
    pub fn from_transmittance(wavelengths: Vec<f64>, transmittances: Vec<f64>) -> Self {
        debug_assert_eq!(wavelengths.len(), transmittances.len());
        let rows = wavelengths
            .into_iter()
            .zip(transmittances)
            .map(|(wl, t)| (wl, -t.max(MIN_TRANSMITTANCE).log10(), t))
            .collect();
        Self::from_rows(rows)
    }

    /// Every constructor funnels through here so the ascending,
    /// duplicate-free wavelength invariant holds no matter how the data
    /// arrived. The sort is stable, so the first occurrence of a
    /// duplicated wavelength wins.
    fn from_rows(mut rows: Vec<(f64, f64, f64)>) -> Self {
        rows.sort_by(|a, b| a.0.total_cmp(&b.0));
        rows.dedup_by(|a, b| a.0 == b.0);

        let mut record = SpectralRecord {
            wavelengths: Vec::with_capacity(rows.len()),
            absorbances: Vec::with_capacity(rows.len()),
            transmittances: Vec::with_capacity(rows.len()),
        };
        for (wl, a, t) in rows {
            record.wavelengths.push(wl);
            record.absorbances.push(a);
            record.transmittances.push(t);
        }
        record
    }

    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn absorbances(&self) -> &[f64] {
        &self.absorbances
    }

    pub fn transmittances(&self) -> &[f64] {
        &self.transmittances
    }

    /// Wavelength/value pairs for the requested quantity.
    pub fn pairs(&self, kind: MeasurementKind) -> Vec<(f64, f64)> {
        let values = match kind {
            MeasurementKind::Absorbance => &self.absorbances,
            MeasurementKind::Transmittance => &self.transmittances,
        };
        self.wavelengths
            .iter()
            .copied()
            .zip(values.iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorbance_transmittance_round_trip() {
        for a in [0.0, 0.301, 1.0, 2.5] {
            let t = 10f64.powf(-a);
            let recovered = -t.log10();
            assert!(
                (recovered - a).abs() < 1e-12,
                "A={a} recovered as {recovered}"
            );
        }
    }

    #[test]
    fn amplitude_band_filter_keeps_integer_wavelengths_in_range() {
        let wl = [249.0, 250.0, 400.0, 800.0, 801.0];
        let amp = [0.1, 0.2, 0.3, 0.4, 0.5];
        let record = SpectralRecord::from_amplitudes(AcquisitionMode::A, &wl, &amp);
        assert_eq!(record.wavelengths(), &[250.0, 400.0, 800.0]);
        assert_eq!(record.absorbances(), &[0.2, 0.3, 0.4]);
    }

    #[test]
    fn amplitude_filter_drops_fractional_wavelengths_and_duplicates() {
        let wl = [400.5, 400.0, 400.0, 500.0, 300.0];
        let amp = [0.9, 0.1, 0.7, 0.2, 0.3];
        let record = SpectralRecord::from_amplitudes(AcquisitionMode::A, &wl, &amp);
        assert_eq!(record.wavelengths(), &[300.0, 400.0, 500.0]);
        // first occurrence of 400 nm wins
        assert_eq!(record.absorbances(), &[0.3, 0.1, 0.2]);
    }

    #[test]
    fn transmittance_mode_recomputes_absorbance() {
        let record = SpectralRecord::from_amplitudes(AcquisitionMode::T, &[500.0], &[0.5]);
        assert!((record.absorbances()[0] - 0.5f64.log10().abs()).abs() < 1e-12);
        assert_eq!(record.transmittances(), &[0.5]);
    }

    #[test]
    fn reflectance_mode_uses_one_minus_amplitude() {
        let record = SpectralRecord::from_amplitudes(AcquisitionMode::R, &[500.0], &[0.8]);
        assert!((record.absorbances()[0] - 0.2).abs() < 1e-12);
        assert!((record.transmittances()[0] - 10f64.powf(-0.2)).abs() < 1e-12);
    }

    #[test]
    fn literal_constructors_sort_and_dedup_the_grid() {
        let record = SpectralRecord::from_absorbance(
            vec![500.0, 400.0, 600.0, 400.0],
            vec![0.2, 0.1, 0.3, 0.9],
        );
        assert_eq!(record.wavelengths(), &[400.0, 500.0, 600.0]);
        // first occurrence of 400 nm wins
        assert_eq!(record.absorbances(), &[0.1, 0.2, 0.3]);

        let sorted = SpectralRecord::from_transmittance(
            vec![400.0, 500.0],
            vec![0.5, 0.25],
        );
        let shuffled = SpectralRecord::from_transmittance(
            vec![500.0, 400.0],
            vec![0.25, 0.5],
        );
        assert_eq!(shuffled, sorted);
    }

    #[test]
    fn pairs_selects_requested_quantity() {
        let record = SpectralRecord::from_absorbance(vec![400.0, 500.0], vec![1.0, 0.0]);
        let pairs = record.pairs(MeasurementKind::Transmittance);
        assert_eq!(pairs, vec![(400.0, 0.1), (500.0, 1.0)]);
    }
}
