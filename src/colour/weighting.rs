//! Manual tristimulus integration for raw power spectra.
//!
//! A simpler, self-contained path for data that arrives as raw instrument
//! counts rather than absorbance/transmittance: the tabulated CIE weighting
//! curves are interpolated onto the sample's own grid and integrated with
//! the trapezoidal rule. Shares no code with the full conversion path.

use palette::white_point::D65;
use palette::{FromColor, Srgb, Xyz};

use super::cie::cmf_at;
use super::metrics::rgb_to_hex;

/// Raw (unnormalized) XYZ of a power SPD: trapezoidal integration of
/// power × weighting over wavelength for each of X, Y, Z.
pub fn xyz_from_power_spd(spd: &[(f64, f64)]) -> [f64; 3] {
    let weighted: Vec<[f64; 3]> = spd
        .iter()
        .map(|&(wl, power)| {
            let (x_bar, y_bar, z_bar) = cmf_at(wl);
            [power * x_bar, power * y_bar, power * z_bar]
        })
        .collect();

    let mut xyz = [0.0f64; 3];
    for (window, rows) in spd.windows(2).zip(weighted.windows(2)) {
        let dw = window[1].0 - window[0].0;
        for (sum, i) in xyz.iter_mut().zip(0..3) {
            *sum += 0.5 * (rows[0][i] + rows[1][i]) * dw;
        }
    }
    xyz
}

/// Approximate display colour of a raw count spectrum.
///
/// Counts are normalized by their maximum, integrated to XYZ, mapped to
/// sRGB and clipped; returns the clipped rgb triple and its hex string.
pub fn approximate_colour(wavelengths: &[f64], amplitudes: &[f64]) -> ([f64; 3], String) {
    debug_assert_eq!(wavelengths.len(), amplitudes.len());
    let peak = amplitudes.iter().copied().fold(f64::MIN, f64::max);
    let spd: Vec<(f64, f64)> = wavelengths
        .iter()
        .zip(amplitudes)
        .map(|(&wl, &amp)| (wl, amp / peak))
        .collect();

    let xyz = xyz_from_power_spd(&spd);
    let tristimulus: Xyz<D65, f64> = Xyz::new(xyz[0], xyz[1], xyz[2]);
    let srgb: Srgb<f64> = Srgb::from_color(tristimulus);
    let rgb = [
        srgb.red.clamp(0.0, 1.0),
        srgb.green.clamp(0.0, 1.0),
        srgb.blue.clamp(0.0, 1.0),
    ];
    let hex = rgb_to_hex(rgb);
    (rgb, hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_energy_spd_lands_on_the_equal_energy_chromaticity() {
        let spd: Vec<(f64, f64)> = (360..=800).map(|wl| (wl as f64, 1.0)).collect();
        let xyz = xyz_from_power_spd(&spd);
        let total = xyz[0] + xyz[1] + xyz[2];
        let x = xyz[0] / total;
        let y = xyz[1] / total;
        assert!((x - 1.0 / 3.0).abs() < 0.01, "x = {x}");
        assert!((y - 1.0 / 3.0).abs() < 0.01, "y = {y}");
    }

    #[test]
    fn a_red_biased_spd_integrates_more_x_than_z() {
        let spd: Vec<(f64, f64)> = (600..=700).map(|wl| (wl as f64, 1.0)).collect();
        let xyz = xyz_from_power_spd(&spd);
        assert!(xyz[0] > xyz[1]);
        assert!(xyz[2] < 0.01 * xyz[0]);
    }

    #[test]
    fn approximate_colour_yields_a_well_formed_hex_string() {
        let wavelengths: Vec<f64> = (360..=800).map(|wl| wl as f64).collect();
        let amplitudes = vec![1.0; wavelengths.len()];
        let (rgb, hex) = approximate_colour(&wavelengths, &amplitudes);
        assert_eq!(hex.len(), 7);
        assert!(hex.starts_with('#'));
        assert_eq!(hex, hex.to_lowercase());
        for channel in rgb {
            assert!((0.0..=1.0).contains(&channel));
        }
    }

    #[test]
    fn saturated_broadband_counts_clip_to_white() {
        // Raw XYZ is far above 1; the sRGB mapping clips every channel.
        let wavelengths: Vec<f64> = (360..=800).map(|wl| wl as f64).collect();
        let amplitudes = vec![1000.0; wavelengths.len()];
        let (rgb, hex) = approximate_colour(&wavelengths, &amplitudes);
        assert_eq!(rgb, [1.0, 1.0, 1.0]);
        assert_eq!(hex, "#ffffff");
    }
}
