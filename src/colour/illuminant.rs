use std::collections::BTreeMap;

use super::cie::{interpolate, ILLUMINANT_D65_SPD};

// ---------------------------------------------------------------------------
// Illuminant – a named sampled spectral power distribution
// ---------------------------------------------------------------------------

/// A reference light-source spectral distribution used as the integration
/// weight when converting a transmissive sample to absolute colour.
#[derive(Debug, Clone, PartialEq)]
pub struct Illuminant {
    name: String,
    wavelengths: Vec<f64>,
    values: Vec<f64>,
}

impl Illuminant {
    /// Build from explicit (wavelength, power) pairs.
    pub fn from_pairs(name: impl Into<String>, pairs: &[(f64, f64)]) -> Self {
        let (wavelengths, values) = pairs.iter().copied().unzip();
        Illuminant {
            name: name.into(),
            wavelengths,
            values,
        }
    }

    /// CIE standard illuminant D65 (tabulated).
    pub fn d65() -> Self {
        let (wavelengths, values) = ILLUMINANT_D65_SPD
            .iter()
            .map(|row| (row[0], row[1]))
            .unzip();
        Illuminant {
            name: "D65".to_string(),
            wavelengths,
            values,
        }
    }

    /// CIE standard illuminant A (analytic form, 2856 K tungsten), sampled
    /// 300–850 nm at 1 nm and normalized to 100 at 560 nm.
    pub fn a() -> Self {
        // S_A(λ) = 100 (560/λ)^5 · (exp(1.435e7 / (2848·560)) − 1)
        //                        / (exp(1.435e7 / (2848·λ)) − 1)
        let numerator = (1.435e7_f64 / (2848.0 * 560.0)).exp() - 1.0;
        let value = |wl: f64| {
            100.0 * (560.0 / wl).powi(5) * numerator / ((1.435e7 / (2848.0 * wl)).exp() - 1.0)
        };
        let wavelengths: Vec<f64> = (300..=850).map(|wl| wl as f64).collect();
        let values = wavelengths.iter().map(|&wl| value(wl)).collect();
        Illuminant {
            name: "A".to_string(),
            wavelengths,
            values,
        }
    }

    /// Equal-energy illuminant E.
    pub fn e() -> Self {
        let wavelengths: Vec<f64> = (300..=850).map(|wl| wl as f64).collect();
        let values = vec![100.0; wavelengths.len()];
        Illuminant {
            name: "E".to_string(),
            wavelengths,
            values,
        }
    }

    /// Ideal blackbody radiator at the given colour temperature (Planck's
    /// law), sampled 300–850 nm at 1 nm and normalized to 100 at 560 nm.
    pub fn blackbody(temperature: f64) -> Self {
        const H: f64 = 6.62607015e-34;
        const C: f64 = 2.99792458e8;
        const K_B: f64 = 1.380649e-23;
        let radiance = |wl_nm: f64| {
            let wl = wl_nm * 1e-9;
            (2.0 * H * C * C) / (wl.powi(5) * ((H * C / (wl * K_B * temperature)).exp() - 1.0))
        };
        let reference = radiance(560.0);
        let wavelengths: Vec<f64> = (300..=850).map(|wl| wl as f64).collect();
        let values = wavelengths
            .iter()
            .map(|&wl| 100.0 * radiance(wl) / reference)
            .collect();
        Illuminant {
            name: format!("Blackbody {temperature}K"),
            wavelengths,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Relative power at a wavelength, linearly interpolated and clamped to
    /// the endpoint values outside the sampled range.
    pub fn value_at(&self, wavelength: f64) -> f64 {
        interpolate(wavelength, &self.wavelengths, &self.values)
    }
}

// ---------------------------------------------------------------------------
// IlluminantLibrary – name-keyed lookup table
// ---------------------------------------------------------------------------

/// Name-keyed table of illuminants consulted at analysis time.
#[derive(Debug, Clone, Default)]
pub struct IlluminantLibrary {
    illuminants: BTreeMap<String, Illuminant>,
}

impl IlluminantLibrary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard set: D65, A, E.
    pub fn standard() -> Self {
        let mut library = Self::default();
        for illuminant in [Illuminant::d65(), Illuminant::a(), Illuminant::e()] {
            library.insert(illuminant);
        }
        library
    }

    /// Insert or override an illuminant under its own name.
    pub fn insert(&mut self, illuminant: Illuminant) {
        self.illuminants
            .insert(illuminant.name().to_string(), illuminant);
    }

    pub fn get(&self, name: &str) -> Option<&Illuminant> {
        self.illuminants.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.illuminants.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn d65_is_normalized_at_560nm() {
        let d65 = Illuminant::d65();
        assert!((d65.value_at(560.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn illuminant_a_is_redder_than_blue() {
        let a = Illuminant::a();
        assert!(a.value_at(700.0) > a.value_at(450.0));
        assert!((a.value_at(560.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn blackbody_peak_follows_wien_displacement() {
        // λ_max ≈ 2.898e6 / T nm; for 6500 K that is ≈ 446 nm.
        let bb = Illuminant::blackbody(6500.0);
        let peak_wl = (300..=850)
            .map(|wl| wl as f64)
            .max_by(|&a, &b| bb.value_at(a).total_cmp(&bb.value_at(b)))
            .unwrap();
        assert!((peak_wl - 446.0).abs() <= 2.0, "peak at {peak_wl} nm");
    }

    #[test]
    fn value_at_clamps_outside_sampled_range() {
        let illuminant = Illuminant::from_pairs("custom", &[(400.0, 1.0), (500.0, 2.0)]);
        assert_eq!(illuminant.value_at(350.0), 1.0);
        assert_eq!(illuminant.value_at(550.0), 2.0);
    }

    #[test]
    fn standard_library_contains_the_usual_names() {
        let library = IlluminantLibrary::standard();
        for name in ["D65", "A", "E"] {
            assert!(library.get(name).is_some(), "missing {name}");
        }
        assert!(library.get("F11").is_none());
    }
}
