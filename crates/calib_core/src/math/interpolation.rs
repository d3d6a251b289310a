//! Piecewise-linear interpolation over irregular meshes.
//!
//! Integrated metrics interpolate the model output onto the reference mesh.
//! Meshes may be monotonically increasing or decreasing; decreasing meshes
//! are flipped together with their ordinates. Extrapolation is forbidden.

use crate::types::InterpolationError;

/// Linearly interpolate `ys(xs)` at a single point.
///
/// `xs` must be sorted in ascending order with at least two points.
///
/// # Errors
///
/// - [`InterpolationError::InsufficientData`] with fewer than two points
/// - [`InterpolationError::MismatchedLengths`] when lengths differ
/// - [`InterpolationError::OutOfDomain`] when `x` lies outside `xs`
///
/// # Example
///
/// ```
/// use calib_core::math::interpolate_linear;
///
/// let y = interpolate_linear(&[0.0, 1.0, 3.0], &[2.0, 3.0, 4.0], 2.0).unwrap();
/// assert!((y - 3.5).abs() < 1e-12);
/// ```
pub fn interpolate_linear(xs: &[f64], ys: &[f64], x: f64) -> Result<f64, InterpolationError> {
    if xs.len() != ys.len() {
        return Err(InterpolationError::MismatchedLengths {
            xs: xs.len(),
            ys: ys.len(),
        });
    }
    if xs.len() < 2 {
        return Err(InterpolationError::InsufficientData {
            got: xs.len(),
            need: 2,
        });
    }
    let (lower, upper) = (xs[0], xs[xs.len() - 1]);
    if x < lower || x > upper {
        return Err(InterpolationError::OutOfDomain { x, lower, upper });
    }

    // Binary search for the bracketing segment.
    let idx = match xs.partition_point(|&v| v <= x) {
        0 => 0,
        i if i >= xs.len() => xs.len() - 2,
        i => i - 1,
    };
    let (x0, x1) = (xs[idx], xs[idx + 1]);
    let (y0, y1) = (ys[idx], ys[idx + 1]);
    if x1 == x0 {
        return Ok(y0);
    }
    let t = (x - x0) / (x1 - x0);
    Ok(y0 + t * (y1 - y0))
}

/// Interpolate `ys(xs)` at every point of `targets`.
pub fn interpolate_onto(
    xs: &[f64],
    ys: &[f64],
    targets: &[f64],
) -> Result<Vec<f64>, InterpolationError> {
    targets
        .iter()
        .map(|&x| interpolate_linear(xs, ys, x))
        .collect()
}

/// Return an ascending copy of a mesh and its ordinates.
///
/// A monotonically decreasing mesh is reversed together with `ys`; an
/// ascending mesh is copied as is.
///
/// # Errors
///
/// - [`InterpolationError::MismatchedLengths`] when lengths differ
/// - [`InterpolationError::NonMonotonicMesh`] when the mesh is neither
///   increasing nor decreasing
pub fn ensure_ascending(
    mesh: &[f64],
    ys: &[f64],
) -> Result<(Vec<f64>, Vec<f64>), InterpolationError> {
    if mesh.len() != ys.len() {
        return Err(InterpolationError::MismatchedLengths {
            xs: mesh.len(),
            ys: ys.len(),
        });
    }
    if mesh.windows(2).all(|w| w[1] >= w[0]) {
        return Ok((mesh.to_vec(), ys.to_vec()));
    }
    if mesh.windows(2).all(|w| w[1] < w[0]) {
        let mut mesh = mesh.to_vec();
        let mut ys = ys.to_vec();
        mesh.reverse();
        ys.reverse();
        return Ok((mesh, ys));
    }
    Err(InterpolationError::NonMonotonicMesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interpolate_at_nodes() {
        let xs = [0.0, 1.0, 3.0];
        let ys = [2.0, 3.0, 4.0];
        for (x, y) in xs.iter().zip(&ys) {
            assert_relative_eq!(interpolate_linear(&xs, &ys, *x).unwrap(), *y);
        }
    }

    #[test]
    fn test_interpolate_between_nodes() {
        let xs = [0.0, 1.0, 3.0];
        let ys = [2.0, 3.0, 4.0];
        assert_relative_eq!(interpolate_linear(&xs, &ys, 0.5).unwrap(), 2.5);
        assert_relative_eq!(interpolate_linear(&xs, &ys, 2.0).unwrap(), 3.5);
    }

    #[test]
    fn test_no_extrapolation() {
        let xs = [0.0, 1.0];
        let ys = [0.0, 1.0];
        assert!(matches!(
            interpolate_linear(&xs, &ys, -0.1),
            Err(InterpolationError::OutOfDomain { .. })
        ));
        assert!(matches!(
            interpolate_linear(&xs, &ys, 1.1),
            Err(InterpolationError::OutOfDomain { .. })
        ));
    }

    #[test]
    fn test_insufficient_data() {
        assert!(matches!(
            interpolate_linear(&[0.0], &[1.0], 0.0),
            Err(InterpolationError::InsufficientData { got: 1, need: 2 })
        ));
    }

    #[test]
    fn test_interpolate_onto() {
        let xs = [0.0, 1.0, 3.0];
        let ys = [2.0, 3.0, 4.0];
        let out = interpolate_onto(&xs, &ys, &[0.0, 3.0]).unwrap();
        assert_eq!(out, vec![2.0, 4.0]);
    }

    #[test]
    fn test_ensure_ascending_flips_decreasing() {
        let (mesh, ys) = ensure_ascending(&[3.0, 1.0, 0.0], &[4.0, 3.0, 2.0]).unwrap();
        assert_eq!(mesh, vec![0.0, 1.0, 3.0]);
        assert_eq!(ys, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_ensure_ascending_keeps_increasing() {
        let (mesh, ys) = ensure_ascending(&[0.0, 1.0], &[2.0, 3.0]).unwrap();
        assert_eq!(mesh, vec![0.0, 1.0]);
        assert_eq!(ys, vec![2.0, 3.0]);
    }

    #[test]
    fn test_ensure_ascending_rejects_non_monotonic() {
        assert!(matches!(
            ensure_ascending(&[0.0, 2.0, 1.0], &[1.0, 2.0, 3.0]),
            Err(InterpolationError::NonMonotonicMesh)
        ));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn mesh_strategy() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
            prop::collection::vec((0.01f64..10.0, -100.0f64..100.0), 2..8).prop_map(|pairs| {
                let mut x = 0.0;
                let mut xs = Vec::with_capacity(pairs.len());
                let mut ys = Vec::with_capacity(pairs.len());
                for (step, y) in pairs {
                    x += step;
                    xs.push(x);
                    ys.push(y);
                }
                (xs, ys)
            })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(500))]

            #[test]
            fn test_interpolation_stays_within_ordinate_range(
                (xs, ys) in mesh_strategy(),
                t in 0.0f64..1.0
            ) {
                let x = xs[0] + t * (xs[xs.len() - 1] - xs[0]);
                let y = interpolate_linear(&xs, &ys, x).unwrap();
                let lo = ys.iter().copied().fold(f64::INFINITY, f64::min);
                let hi = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                prop_assert!(y >= lo - 1e-9 && y <= hi + 1e-9);
            }

            #[test]
            fn test_interpolation_reproduces_affine_data(
                (xs, _) in mesh_strategy(),
                a in -10.0f64..10.0,
                b in -10.0f64..10.0,
                t in 0.0f64..1.0
            ) {
                let ys: Vec<f64> = xs.iter().map(|&x| a * x + b).collect();
                let x = xs[0] + t * (xs[xs.len() - 1] - xs[0]);
                let y = interpolate_linear(&xs, &ys, x).unwrap();
                prop_assert!((y - (a * x + b)).abs() < 1e-7);
            }
        }
    }
}
