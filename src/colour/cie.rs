//! Embedded CIE reference data.
//!
//! CIE 1931 2° standard-observer colour-matching functions and the CIE D65
//! relative spectral power distribution, both tabulated at 5 nm over the
//! 360–800 nm band the conversion layer operates on. Values per CIE 15.

/// Rows of `(wavelength nm, x̄, ȳ, z̄)`.
pub const CMF_CIE_1931_2DEG: [[f64; 4]; 89] = [
    [360.0, 0.000130, 0.000004, 0.000606],
    [365.0, 0.000232, 0.000007, 0.001086],
    [370.0, 0.000415, 0.000012, 0.001946],
    [375.0, 0.000742, 0.000022, 0.003486],
    [380.0, 0.001368, 0.000039, 0.006450],
    [385.0, 0.002236, 0.000064, 0.010550],
    [390.0, 0.004243, 0.000120, 0.020050],
    [395.0, 0.007650, 0.000217, 0.036210],
    [400.0, 0.014310, 0.000396, 0.067850],
    [405.0, 0.023190, 0.000640, 0.110200],
    [410.0, 0.043510, 0.001210, 0.207400],
    [415.0, 0.077630, 0.002180, 0.371300],
    [420.0, 0.134380, 0.004000, 0.645600],
    [425.0, 0.214770, 0.007300, 1.039050],
    [430.0, 0.283900, 0.011600, 1.385600],
    [435.0, 0.328500, 0.016840, 1.622960],
    [440.0, 0.348280, 0.023000, 1.747060],
    [445.0, 0.348060, 0.029800, 1.782600],
    [450.0, 0.336200, 0.038000, 1.772110],
    [455.0, 0.318700, 0.048000, 1.744100],
    [460.0, 0.290800, 0.060000, 1.669200],
    [465.0, 0.251100, 0.073900, 1.528100],
    [470.0, 0.195360, 0.090980, 1.287640],
    [475.0, 0.142100, 0.112600, 1.041900],
    [480.0, 0.095640, 0.139020, 0.812950],
    [485.0, 0.057950, 0.169300, 0.616200],
    [490.0, 0.032010, 0.208020, 0.465180],
    [495.0, 0.014700, 0.258600, 0.353300],
    [500.0, 0.004900, 0.323000, 0.272000],
    [505.0, 0.002400, 0.407300, 0.212300],
    [510.0, 0.009300, 0.503000, 0.158200],
    [515.0, 0.029100, 0.608200, 0.111700],
    [520.0, 0.063270, 0.710000, 0.078250],
    [525.0, 0.109600, 0.793200, 0.057250],
    [530.0, 0.165500, 0.862000, 0.042160],
    [535.0, 0.225750, 0.914850, 0.029840],
    [540.0, 0.290400, 0.954000, 0.020300],
    [545.0, 0.359700, 0.980300, 0.013400],
    [550.0, 0.433450, 0.994950, 0.008750],
    [555.0, 0.512050, 1.000000, 0.005750],
    [560.0, 0.594500, 0.995000, 0.003900],
    [565.0, 0.678400, 0.978600, 0.002750],
    [570.0, 0.762100, 0.952000, 0.002100],
    [575.0, 0.842500, 0.915400, 0.001800],
    [580.0, 0.916300, 0.870000, 0.001650],
    [585.0, 0.978600, 0.816300, 0.001400],
    [590.0, 1.026300, 0.757000, 0.001100],
    [595.0, 1.056700, 0.694900, 0.001000],
    [600.0, 1.062200, 0.631000, 0.000800],
    [605.0, 1.045600, 0.566800, 0.000600],
    [610.0, 1.002600, 0.503000, 0.000340],
    [615.0, 0.938400, 0.441200, 0.000240],
    [620.0, 0.854450, 0.381000, 0.000190],
    [625.0, 0.751400, 0.321000, 0.000100],
    [630.0, 0.642400, 0.265000, 0.000050],
    [635.0, 0.541900, 0.217000, 0.000030],
    [640.0, 0.447900, 0.175000, 0.000020],
    [645.0, 0.360800, 0.138200, 0.000010],
    [650.0, 0.283500, 0.107000, 0.000000],
    [655.0, 0.218700, 0.081600, 0.000000],
    [660.0, 0.164900, 0.061000, 0.000000],
    [665.0, 0.121200, 0.044580, 0.000000],
    [670.0, 0.087400, 0.032000, 0.000000],
    [675.0, 0.063600, 0.023200, 0.000000],
    [680.0, 0.046770, 0.017000, 0.000000],
    [685.0, 0.032900, 0.011920, 0.000000],
    [690.0, 0.022700, 0.008210, 0.000000],
    [695.0, 0.015840, 0.005723, 0.000000],
    [700.0, 0.011359, 0.004102, 0.000000],
    [705.0, 0.008111, 0.002929, 0.000000],
    [710.0, 0.005790, 0.002091, 0.000000],
    [715.0, 0.004109, 0.001484, 0.000000],
    [720.0, 0.002899, 0.001047, 0.000000],
    [725.0, 0.002049, 0.000740, 0.000000],
    [730.0, 0.001440, 0.000520, 0.000000],
    [735.0, 0.001000, 0.000361, 0.000000],
    [740.0, 0.000690, 0.000249, 0.000000],
    [745.0, 0.000476, 0.000172, 0.000000],
    [750.0, 0.000332, 0.000120, 0.000000],
    [755.0, 0.000235, 0.000085, 0.000000],
    [760.0, 0.000166, 0.000060, 0.000000],
    [765.0, 0.000117, 0.000042, 0.000000],
    [770.0, 0.000083, 0.000030, 0.000000],
    [775.0, 0.000059, 0.000021, 0.000000],
    [780.0, 0.000042, 0.000015, 0.000000],
    [785.0, 0.000029, 0.000011, 0.000000],
    [790.0, 0.000021, 0.000007, 0.000000],
    [795.0, 0.000015, 0.000005, 0.000000],
    [800.0, 0.000011, 0.000004, 0.000000],
];

/// Rows of `(wavelength nm, relative power)`, normalized to 100 at 560 nm.
pub const ILLUMINANT_D65_SPD: [[f64; 2]; 89] = [
    [360.0, 46.6383],
    [365.0, 49.3637],
    [370.0, 52.0891],
    [375.0, 51.0323],
    [380.0, 49.9755],
    [385.0, 52.3118],
    [390.0, 54.6482],
    [395.0, 68.7015],
    [400.0, 82.7549],
    [405.0, 87.1204],
    [410.0, 91.4860],
    [415.0, 92.4589],
    [420.0, 93.4318],
    [425.0, 90.0570],
    [430.0, 86.6823],
    [435.0, 95.7736],
    [440.0, 104.8650],
    [445.0, 110.9360],
    [450.0, 117.0080],
    [455.0, 117.4100],
    [460.0, 117.8120],
    [465.0, 116.3360],
    [470.0, 114.8610],
    [475.0, 115.3920],
    [480.0, 115.9230],
    [485.0, 112.3670],
    [490.0, 108.8110],
    [495.0, 109.0820],
    [500.0, 109.3540],
    [505.0, 108.5780],
    [510.0, 107.8020],
    [515.0, 106.2960],
    [520.0, 104.7900],
    [525.0, 106.2390],
    [530.0, 107.6890],
    [535.0, 106.0470],
    [540.0, 104.4050],
    [545.0, 104.2250],
    [550.0, 104.0460],
    [555.0, 102.0230],
    [560.0, 100.0000],
    [565.0, 98.1671],
    [570.0, 96.3342],
    [575.0, 96.0611],
    [580.0, 95.7880],
    [585.0, 92.2368],
    [590.0, 88.6856],
    [595.0, 89.3459],
    [600.0, 90.0062],
    [605.0, 89.8026],
    [610.0, 89.5991],
    [615.0, 88.6489],
    [620.0, 87.6987],
    [625.0, 85.4936],
    [630.0, 83.2886],
    [635.0, 83.4939],
    [640.0, 83.6992],
    [645.0, 81.8630],
    [650.0, 80.0268],
    [655.0, 80.1207],
    [660.0, 80.2146],
    [665.0, 81.2462],
    [670.0, 82.2778],
    [675.0, 80.2810],
    [680.0, 78.2842],
    [685.0, 74.0027],
    [690.0, 69.7213],
    [695.0, 70.6652],
    [700.0, 71.6091],
    [705.0, 72.9790],
    [710.0, 74.3490],
    [715.0, 67.9765],
    [720.0, 61.6040],
    [725.0, 65.7448],
    [730.0, 69.8856],
    [735.0, 72.4863],
    [740.0, 75.0870],
    [745.0, 69.3398],
    [750.0, 63.5927],
    [755.0, 55.0054],
    [760.0, 46.4182],
    [765.0, 56.6118],
    [770.0, 66.8054],
    [775.0, 65.0941],
    [780.0, 63.3828],
    [785.0, 63.8434],
    [790.0, 64.3040],
    [795.0, 61.8779],
    [800.0, 59.4519],
];

/// Default reference chromaticity for the CIE 2004 whiteness formula
/// (near the D65 daylight locus).
pub const WHITENESS_REFERENCE_XY: (f64, f64) = (0.3139, 0.3311);

/// Linearly interpolate a sampled series at `x`, clamping to the endpoint
/// values outside the tabulated range.
pub fn interpolate(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    debug_assert!(!xs.is_empty());
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[xs.len() - 1] {
        return ys[ys.len() - 1];
    }
    let hi = xs.partition_point(|&v| v < x);
    let lo = hi - 1;
    let span = xs[hi] - xs[lo];
    if span == 0.0 {
        return ys[lo];
    }
    let t = (x - xs[lo]) / span;
    ys[lo] + t * (ys[hi] - ys[lo])
}

/// Interpolated colour-matching functions `(x̄, ȳ, z̄)` at a wavelength.
pub fn cmf_at(wavelength: f64) -> (f64, f64, f64) {
    (
        interpolate_column(wavelength, &CMF_CIE_1931_2DEG, 1),
        interpolate_column(wavelength, &CMF_CIE_1931_2DEG, 2),
        interpolate_column(wavelength, &CMF_CIE_1931_2DEG, 3),
    )
}

fn interpolate_column(x: f64, table: &[[f64; 4]], col: usize) -> f64 {
    if x <= table[0][0] {
        return table[0][col];
    }
    let last = table.len() - 1;
    if x >= table[last][0] {
        return table[last][col];
    }
    let hi = table.partition_point(|row| row[0] < x);
    let lo = hi - 1;
    let t = (x - table[lo][0]) / (table[hi][0] - table[lo][0]);
    table[lo][col] + t * (table[hi][col] - table[lo][col])
}
