//! Chromatic adaptation (von Kries scaling in Bradford cone space).
//!
//! Builds the 3×3 transform that corrects tristimulus values computed under
//! one reference white point to their appearance under another, and derives
//! an XYZ→RGB conversion matrix that accounts for the adapted white.

/// Row-major 3×3 matrix.
pub type Mat3 = [[f64; 3]; 3];

/// Bradford cone-response matrix.
pub const BRADFORD: Mat3 = [
    [0.8951, 0.2664, -0.1614],
    [-0.7502, 1.7135, 0.0367],
    [0.0389, -0.0685, 1.0296],
];

/// sRGB linear RGB → XYZ primary matrix (D65).
const SRGB_TO_XYZ: Mat3 = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];

pub fn mat_mul(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

pub fn mat_vec(m: &Mat3, v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// Cofactor-expansion inverse. Singular input is a caller contract
/// violation and yields non-finite entries rather than a guard.
pub fn mat_inv(m: &Mat3) -> Mat3 {
    let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);
    let inv_det = 1.0 / det;
    [
        [
            (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
        ],
        [
            (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
            (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
            (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
        ],
        [
            (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
            (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
            (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
        ],
    ]
}

/// Build the adaptation matrix taking XYZ under `source_wp` to XYZ under
/// `target_wp`: M⁻¹ · diag(target cone / source cone) · M.
///
/// Source white-point components must be strictly positive; a zero or
/// near-zero cone response produces non-finite output.
pub fn chromatic_adaptation_matrix(source_wp: [f64; 3], target_wp: [f64; 3]) -> Mat3 {
    let source_cone = mat_vec(&BRADFORD, source_wp);
    let target_cone = mat_vec(&BRADFORD, target_wp);
    let scaling: Mat3 = [
        [target_cone[0] / source_cone[0], 0.0, 0.0],
        [0.0, target_cone[1] / source_cone[1], 0.0],
        [0.0, 0.0, target_cone[2] / source_cone[2]],
    ];
    mat_mul(&mat_inv(&BRADFORD), &mat_mul(&scaling, &BRADFORD))
}

/// Derive an XYZ→RGB conversion matrix for a sample: adapt the sample's
/// tristimulus, scale the sRGB primary matrix by the reciprocal of the
/// adapted sum, and invert.
pub fn xyz_to_rgb_matrix(xyz: [f64; 3], adaptation: &Mat3) -> Mat3 {
    let adapted = mat_vec(adaptation, xyz);
    let total = adapted[0] + adapted[1] + adapted[2];
    let mut rgb_to_xyz = SRGB_TO_XYZ;
    for row in &mut rgb_to_xyz {
        for cell in row.iter_mut() {
            *cell /= total;
        }
    }
    mat_inv(&rgb_to_xyz)
}

#[cfg(test)]
mod tests {
    use super::*;

    const D65: [f64; 3] = [0.95047, 1.0, 1.08883];
    const D50: [f64; 3] = [0.96422, 1.0, 0.82521];
    const A: [f64; 3] = [1.09850, 1.0, 0.35585];

    fn assert_mat_close(a: &Mat3, b: &Mat3, tolerance: f64) {
        for i in 0..3 {
            for j in 0..3 {
                assert!(
                    (a[i][j] - b[i][j]).abs() < tolerance,
                    "[{i}][{j}]: {} vs {}",
                    a[i][j],
                    b[i][j]
                );
            }
        }
    }

    #[test]
    fn adapting_to_the_same_white_point_is_identity() {
        let identity: Mat3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let same = chromatic_adaptation_matrix(D65, D65);
        assert_mat_close(&same, &identity, 1e-9);
    }

    #[test]
    fn adaptation_maps_source_white_to_target_white() {
        let d65_to_d50 = chromatic_adaptation_matrix(D65, D50);
        let mapped = mat_vec(&d65_to_d50, D65);
        for (got, want) in mapped.iter().zip(D50) {
            assert!((got - want).abs() < 1e-9, "{got} vs {want}");
        }

        let d65_to_a = chromatic_adaptation_matrix(D65, A);
        let mapped = mat_vec(&d65_to_a, D65);
        for (got, want) in mapped.iter().zip(A) {
            assert!((got - want).abs() < 1e-9);
        }
    }

    #[test]
    fn adaptation_round_trip_is_identity() {
        let forward = chromatic_adaptation_matrix(D65, D50);
        let backward = chromatic_adaptation_matrix(D50, D65);
        let round_trip = mat_mul(&backward, &forward);
        let identity: Mat3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        assert_mat_close(&round_trip, &identity, 1e-9);
    }

    #[test]
    fn inverse_times_matrix_is_identity() {
        let inv = mat_inv(&BRADFORD);
        let product = mat_mul(&inv, &BRADFORD);
        let identity: Mat3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        assert_mat_close(&product, &identity, 1e-12);
    }

    #[test]
    fn xyz_to_rgb_matrix_inverts_the_scaled_primaries() {
        let identity_adaptation = chromatic_adaptation_matrix(D65, D65);
        let matrix = xyz_to_rgb_matrix(D65, &identity_adaptation);
        // Applying the forward scaled primaries after the derived inverse
        // must reproduce the input.
        let total: f64 = D65.iter().sum();
        let mut forward = SRGB_TO_XYZ;
        for row in &mut forward {
            for cell in row.iter_mut() {
                *cell /= total;
            }
        }
        let round_trip = mat_mul(&forward, &matrix);
        let identity: Mat3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        assert_mat_close(&round_trip, &identity, 1e-9);
    }
}
