//! Scalar colour metrics derived from tristimulus and L*a*b* values.

use serde::Serialize;

use crate::data::model::MeasurementKind;

use super::cie::WHITENESS_REFERENCE_XY;
use super::convert::spectrum_to_xyz;
use super::illuminant::Illuminant;

/// Per-sample colour analysis output. Derived once per (sample, illuminant)
/// pair; never merged across illuminants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColourMetrics {
    /// Clipped sRGB, each channel in [0, 1].
    pub rgb: [f64; 3],
    pub lab: [f64; 3],
    pub xyz: [f64; 3],
    pub whiteness: f64,
    pub tint: f64,
    pub lightness: f64,
    pub chroma: f64,
    pub delta_e: f64,
    pub delta_c: f64,
}

/// CIE 2004 whiteness and tint of a sample, relative to a reference
/// chromaticity. Y is taken on the same scale as the supplied xyz.
/// Degenerate tristimulus (X+Y+Z ≈ 0) is a caller contract violation.
pub fn whiteness_tint(xyz: [f64; 3], reference_xy: (f64, f64)) -> (f64, f64) {
    let total = xyz[0] + xyz[1] + xyz[2];
    let x = xyz[0] / total;
    let y = xyz[1] / total;
    let (xn, yn) = reference_xy;
    let whiteness = xyz[1] + 800.0 * (xn - x) + 1700.0 * (yn - y);
    let tint = 1000.0 * (xn - x) - 650.0 * (yn - y);
    (whiteness, tint)
}

/// Lightness is L* directly; chroma is the Euclidean norm of (a*, b*).
pub fn lightness_chroma(lab: [f64; 3]) -> (f64, f64) {
    (lab[0], lab[1].hypot(lab[2]))
}

/// Euclidean colour difference in full L*a*b* space.
pub fn delta_e(sample: [f64; 3], reference: [f64; 3]) -> f64 {
    let dl = sample[0] - reference[0];
    let da = sample[1] - reference[1];
    let db = sample[2] - reference[2];
    (dl * dl + da * da + db * db).sqrt()
}

/// Euclidean colour difference restricted to the (a*, b*) plane.
pub fn delta_c(sample: [f64; 3], reference: [f64; 3]) -> f64 {
    (sample[1] - reference[1]).hypot(sample[2] - reference[2])
}

/// Format a clipped [0, 1] rgb triple as `#rrggbb` (lowercase).
pub fn rgb_to_hex(rgb: [f64; 3]) -> String {
    let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(rgb[0]),
        channel(rgb[1]),
        channel(rgb[2])
    )
}

/// Run the full conversion path and bundle all derived metrics.
pub fn compute_colour_metrics(
    spectrum: &[(f64, f64)],
    kind: MeasurementKind,
    illuminant: &Illuminant,
    reference_lab: [f64; 3],
) -> ColourMetrics {
    let (rgb, lab, xyz) = spectrum_to_xyz(spectrum, kind, illuminant);
    let (whiteness, tint) = whiteness_tint(xyz, WHITENESS_REFERENCE_XY);
    let (lightness, chroma) = lightness_chroma(lab);
    ColourMetrics {
        rgb,
        lab,
        xyz,
        whiteness,
        tint,
        lightness,
        chroma,
        delta_e: delta_e(lab, reference_lab),
        delta_c: delta_c(lab, reference_lab),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_e_is_symmetric() {
        let cases = [
            ([50.0, 10.0, -10.0], [60.0, -5.0, 5.0]),
            ([0.0, 0.0, 0.0], [100.0, 0.0, 0.0]),
            ([99.8, 0.04, -7.9], [75.0, 3.0, 2.0]),
        ];
        for (a, b) in cases {
            assert!((delta_e(a, b) - delta_e(b, a)).abs() < 1e-12);
            assert!((delta_c(a, b) - delta_c(b, a)).abs() < 1e-12);
        }
    }

    #[test]
    fn delta_c_equals_delta_e_of_the_chroma_projection() {
        let a = [50.0, 10.0, -10.0];
        let b = [80.0, -5.0, 5.0];
        let projected_a = [0.0, a[1], a[2]];
        let projected_b = [0.0, b[1], b[2]];
        assert!((delta_c(a, b) - delta_e(projected_a, projected_b)).abs() < 1e-12);
    }

    #[test]
    fn delta_e_of_identical_colours_is_zero() {
        let lab = [42.0, 1.5, -3.5];
        assert_eq!(delta_e(lab, lab), 0.0);
        assert_eq!(delta_c(lab, lab), 0.0);
    }

    #[test]
    fn lightness_chroma_is_the_cylindrical_projection() {
        let (lightness, chroma) = lightness_chroma([61.0, 3.0, 4.0]);
        assert_eq!(lightness, 61.0);
        assert!((chroma - 5.0).abs() < 1e-12);
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(rgb_to_hex([1.0, 0.0, 0.0]), "#ff0000");
        assert_eq!(rgb_to_hex([0.0, 0.0, 0.0]), "#000000");
        assert_eq!(rgb_to_hex([1.0, 1.0, 1.0]), "#ffffff");
        // out-of-range channels are clipped before formatting
        assert_eq!(rgb_to_hex([1.7, -0.2, 0.5]), "#ff0080");
    }

    #[test]
    fn whiteness_of_the_reference_point_reduces_to_y() {
        // At the reference chromaticity both correction terms vanish.
        let (xn, yn) = WHITENESS_REFERENCE_XY;
        let y = 0.9;
        let sum = 2.5;
        let xyz = [xn * sum, yn * sum, (1.0 - xn - yn) * sum];
        let scale = y / xyz[1];
        let xyz = [xyz[0] * scale, xyz[1] * scale, xyz[2] * scale];
        let (whiteness, tint) = whiteness_tint(xyz, WHITENESS_REFERENCE_XY);
        assert!((whiteness - y).abs() < 1e-9);
        assert!(tint.abs() < 1e-9);
    }

    #[test]
    fn greenish_samples_have_positive_tint() {
        // Shift chromaticity toward smaller x: tint goes positive.
        let xyz = [0.28, 0.34, 0.38];
        let (_, tint) = whiteness_tint(xyz, WHITENESS_REFERENCE_XY);
        assert!(tint > 0.0);
    }
}
