//! Trapezoidal quadrature over irregular meshes.

/// Integrate sampled values with the composite trapezoidal rule.
///
/// `xs` is the mesh (ascending), `ys` the sampled integrand. Slices shorter
/// than two points integrate to zero.
///
/// # Example
///
/// ```
/// use calib_core::math::trapezoid;
///
/// // Integral of f(x) = x over [0, 2]
/// let value = trapezoid(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0]);
/// assert!((value - 2.0).abs() < 1e-12);
/// ```
pub fn trapezoid(ys: &[f64], xs: &[f64]) -> f64 {
    debug_assert_eq!(ys.len(), xs.len());
    xs.windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| 0.5 * (y[0] + y[1]) * (x[1] - x[0]))
        .sum()
}
