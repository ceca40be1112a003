/// Iterates `z ← z² + c` from `z = 0` with `c = (x0, y0)`.
///
/// Returns the iteration count at which `|z|² ≥ 4`, or `max_iterations` if the
/// orbit never escaped (the point is treated as inside the set).
#[must_use]
#[inline]
pub fn escape_iterations(x0: f64, y0: f64, max_iterations: u32) -> u32 {
    let mut x = 0.0_f64;
    let mut y = 0.0_f64;
    let mut x2 = 0.0_f64;
    let mut y2 = 0.0_f64;
    let mut iteration = 0;

    // NaN compares false, so non-finite input stops immediately.
    while x2 + y2 < 4.0 && iteration < max_iterations {
        y = 2.0 * x * y + y0;
        x = x2 - y2 + x0;
        x2 = x * x;
        y2 = y * y;
        iteration += 1;
    }

    iteration
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::complex::Complex;

    fn reference_escape_iterations(c: Complex, max_iterations: u32) -> u32 {
        let mut z = Complex::ZERO;
        let mut iteration = 0;

        while z.magnitude_squared() < 4.0 && iteration < max_iterations {
            z = z * z + c;
            iteration += 1;
        }

        iteration
    }

    #[test]
    fn test_origin_never_escapes() {
        for max_iterations in [1, 2, 100, 1000, 5000] {
            assert_eq!(escape_iterations(0.0, 0.0, max_iterations), max_iterations);
        }
    }

    #[test]
    fn test_points_outside_radius_two_escape_immediately() {
        assert_eq!(escape_iterations(3.0, 0.0, 1000), 1);
        assert_eq!(escape_iterations(-2.0, 1.5, 1000), 1);
        assert_eq!(escape_iterations(0.0, -2.5, 1000), 1);
    }

    #[test]
    fn test_known_escape_counts() {
        // c = 1: z = 1, 2 -> |z|² = 4 escapes on the second step
        assert_eq!(escape_iterations(1.0, 0.0, 1000), 2);
        // c = 0.5: 0.5, 0.75, 1.0625, 1.628..., 3.153...
        assert_eq!(escape_iterations(0.5, 0.0, 1000), 5);
    }

    #[test]
    fn test_points_inside_the_set_reach_max() {
        assert_eq!(escape_iterations(-1.0, 0.0, 1000), 1000);
        assert_eq!(escape_iterations(-0.3125, 0.25, 1000), 1000);
        assert_eq!(escape_iterations(0.25, 0.0, 500), 500);
    }

    #[test]
    fn test_iterations_increase_towards_boundary_along_real_ray() {
        // Approaching the cusp at c = 0.25 from the right.
        let ray = [2.0, 1.0, 0.5, 0.3, 0.26, 0.2501];
        let counts: Vec<u32> = ray.iter().map(|&x0| escape_iterations(x0, 0.0, 5000)).collect();

        for pair in counts.windows(2) {
            assert!(pair[0] < pair[1], "expected increasing counts, got {:?}", counts);
        }
        assert!(*counts.last().unwrap() < 5000);
    }

    #[test]
    fn test_iterations_increase_towards_boundary_along_imaginary_ray() {
        // The set meets the imaginary axis at c = i.
        let ray = [2.0, 1.5, 1.2, 1.1];
        let counts: Vec<u32> = ray.iter().map(|&y0| escape_iterations(0.0, y0, 5000)).collect();

        for pair in counts.windows(2) {
            assert!(pair[0] <= pair[1], "expected non-decreasing counts, got {:?}", counts);
        }
        assert!(counts[0] < counts[3]);
    }

    #[test]
    fn test_matches_complex_reference() {
        let points = [
            (-0.75, 0.1),
            (-1.25, 0.3),
            (0.3, 0.5),
            (-0.1, 0.9),
            (0.4, -0.3),
            (-1.9, 0.0),
        ];

        for (x0, y0) in points {
            assert_eq!(
                escape_iterations(x0, y0, 1000),
                reference_escape_iterations(Complex::new(x0, y0), 1000),
                "mismatch at ({}, {})",
                x0,
                y0
            );
        }
    }

    #[test]
    fn test_non_finite_input_does_not_hang() {
        assert_eq!(escape_iterations(f64::NAN, 0.0, 1000), 1);
        assert_eq!(escape_iterations(f64::INFINITY, 0.0, 1000), 1);
    }

    #[test]
    fn test_zero_max_iterations_returns_zero() {
        assert_eq!(escape_iterations(5.0, 5.0, 0), 0);
    }
}
