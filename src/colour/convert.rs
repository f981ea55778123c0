//! Full spectral → tristimulus → perceptual conversion path.
//!
//! A measured transmittance spectrum is integrated against the CIE 1931 2°
//! colour-matching functions under a chosen illuminant, then mapped to
//! L*a*b* and clipped sRGB through the `palette` backend.

use palette::white_point::D65;
use palette::{FromColor, Lab, Srgb, Xyz};

use crate::data::model::MeasurementKind;

use super::cie::cmf_at;
use super::illuminant::Illuminant;

/// Wavelength band used for the colourimetric integration, nm.
pub const INTEGRATION_BAND: (f64, f64) = (360.0, 800.0);

/// Convert a spectrum to `(rgb, lab, xyz)`.
///
/// Wavelengths outside [`INTEGRATION_BAND`] are silently dropped before
/// integration. Absorbance input is converted to transmittance via
/// `T = 10^(-A)`. The tristimulus integral is normalized so a perfectly
/// transmitting sample has Y = 100, then scaled to a 0–1 range; rgb is
/// clipped to the sRGB gamut.
pub fn spectrum_to_xyz(
    spectrum: &[(f64, f64)],
    kind: MeasurementKind,
    illuminant: &Illuminant,
) -> ([f64; 3], [f64; 3], [f64; 3]) {
    let (lo, hi) = INTEGRATION_BAND;
    let points: Vec<(f64, f64)> = spectrum
        .iter()
        .filter(|(wl, _)| *wl >= lo && *wl <= hi)
        .map(|&(wl, value)| {
            let transmittance = match kind {
                MeasurementKind::Absorbance => 10f64.powf(-value),
                MeasurementKind::Transmittance => value,
            };
            (wl, transmittance)
        })
        .collect();

    let xyz = integrate_tristimulus(&points, illuminant);
    xyz_to_perceptual(xyz)
}

/// Trapezoidal integration of T(λ)·S(λ)·{x̄,ȳ,z̄}(λ) over the sample's own
/// wavelength grid, normalized by k = 100 / ∫S(λ)ȳ(λ)dλ and scaled to a
/// 0–1 Y range.
fn integrate_tristimulus(points: &[(f64, f64)], illuminant: &Illuminant) -> [f64; 3] {
    if points.len() < 2 {
        return [0.0; 3];
    }

    let integrand: Vec<[f64; 4]> = points
        .iter()
        .map(|&(wl, t)| {
            let s = illuminant.value_at(wl);
            let (x_bar, y_bar, z_bar) = cmf_at(wl);
            [t * s * x_bar, t * s * y_bar, t * s * z_bar, s * y_bar]
        })
        .collect();

    let mut sums = [0.0f64; 4];
    for (window, rows) in points.windows(2).zip(integrand.windows(2)) {
        let dw = window[1].0 - window[0].0;
        for (sum, i) in sums.iter_mut().zip(0..4) {
            *sum += 0.5 * (rows[0][i] + rows[1][i]) * dw;
        }
    }

    let normalization = sums[3];
    if normalization == 0.0 {
        return [0.0; 3];
    }
    // ×100/k then /100 collapse to a plain ratio
    [
        sums[0] / normalization,
        sums[1] / normalization,
        sums[2] / normalization,
    ]
}

/// Map 0–1-scaled XYZ to clipped sRGB and L*a*b* through `palette`.
fn xyz_to_perceptual(xyz: [f64; 3]) -> ([f64; 3], [f64; 3], [f64; 3]) {
    let tristimulus: Xyz<D65, f64> = Xyz::new(xyz[0], xyz[1], xyz[2]);
    let lab: Lab<D65, f64> = Lab::from_color(tristimulus);
    let rgb: Srgb<f64> = Srgb::from_color(tristimulus);
    (
        [
            rgb.red.clamp(0.0, 1.0),
            rgb.green.clamp(0.0, 1.0),
            rgb.blue.clamp(0.0, 1.0),
        ],
        [lab.l, lab.a, lab.b],
        xyz,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_transmittance_spectrum() -> Vec<(f64, f64)> {
        (360..=800)
            .step_by(5)
            .map(|wl| (wl as f64, 1.0))
            .collect()
    }

    #[test]
    fn perfect_transmittance_under_d65_is_white() {
        let (rgb, lab, xyz) = spectrum_to_xyz(
            &flat_transmittance_spectrum(),
            MeasurementKind::Transmittance,
            &Illuminant::d65(),
        );
        assert!((xyz[1] - 1.0).abs() < 1e-9, "Y = {}", xyz[1]);
        for channel in rgb {
            assert!(channel > 0.95, "rgb = {rgb:?}");
        }
        assert!(lab[0] > 99.0);
        assert!(lab[1].abs() < 2.0 && lab[2].abs() < 2.0, "lab = {lab:?}");
    }

    #[test]
    fn zero_absorbance_matches_unit_transmittance() {
        let absorbance: Vec<(f64, f64)> = (360..=800).step_by(5).map(|wl| (wl as f64, 0.0)).collect();
        let (rgb_a, lab_a, xyz_a) =
            spectrum_to_xyz(&absorbance, MeasurementKind::Absorbance, &Illuminant::d65());
        let (rgb_t, lab_t, xyz_t) = spectrum_to_xyz(
            &flat_transmittance_spectrum(),
            MeasurementKind::Transmittance,
            &Illuminant::d65(),
        );
        assert_eq!(xyz_a, xyz_t);
        assert_eq!(lab_a, lab_t);
        assert_eq!(rgb_a, rgb_t);
    }

    #[test]
    fn out_of_band_wavelengths_are_silently_dropped() {
        let mut padded = flat_transmittance_spectrum();
        padded.insert(0, (300.0, 0.0));
        padded.push((900.0, 0.0));
        let trimmed = flat_transmittance_spectrum();

        let with_padding =
            spectrum_to_xyz(&padded, MeasurementKind::Transmittance, &Illuminant::d65());
        let without =
            spectrum_to_xyz(&trimmed, MeasurementKind::Transmittance, &Illuminant::d65());
        assert_eq!(with_padding, without);
    }

    #[test]
    fn d65_chromaticity_is_recovered_from_a_flat_sample() {
        let (_, _, xyz) = spectrum_to_xyz(
            &flat_transmittance_spectrum(),
            MeasurementKind::Transmittance,
            &Illuminant::d65(),
        );
        let total = xyz[0] + xyz[1] + xyz[2];
        let x = xyz[0] / total;
        let y = xyz[1] / total;
        assert!((x - 0.3127).abs() < 0.005, "x = {x}");
        assert!((y - 0.3290).abs() < 0.005, "y = {y}");
    }

    #[test]
    fn an_absorbing_sample_is_darker() {
        let dark: Vec<(f64, f64)> = (360..=800).step_by(5).map(|wl| (wl as f64, 1.0)).collect();
        let (_, lab, _) = spectrum_to_xyz(&dark, MeasurementKind::Absorbance, &Illuminant::d65());
        assert!(lab[0] < 50.0, "L* = {}", lab[0]);
    }

    #[test]
    fn degenerate_spectra_produce_zero_tristimulus() {
        let (rgb, _, xyz) = spectrum_to_xyz(
            &[(500.0, 1.0)],
            MeasurementKind::Transmittance,
            &Illuminant::d65(),
        );
        assert_eq!(xyz, [0.0; 3]);
        assert_eq!(rgb, [0.0; 3]);
    }
}
