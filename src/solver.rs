// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Inverting the swept area: day ratio → orbital angle and angular speed.
//!
//! By Kepler's second law the area swept per unit time is constant,
//! `dA/dt = MaxArea / T`. A day at year fraction `r` therefore sits at the
//! angle `θ` with `area(θ) = MaxArea · r`, found here by Newton iteration
//! using `rate` as the exact derivative of `area`. The angular speed follows
//! from the same law: `dθ/dt = (dA/dt) / rate(θ)`.

use crate::area::SweptArea;
use crate::error::{Result, RotationError};
use crate::params::OrbitParameters;
use crate::ratio::DateRatio;
use qtty::{Day, Degree, Degrees, Frequency, Radian, Radians};
use std::f64::consts::TAU;
use tracing::trace;

#[cfg(feature = "serde")]
use serde::{ser::SerializeStruct, Serialize, Serializer};

/// Angular speed in degrees per day.
pub type DegreesPerDay = Frequency<Degree, Day>;

/// Outcome of [`newton`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonRoot {
    /// Last iterate.
    pub root: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// `f(root)` at the last evaluation.
    pub residual: f64,
    /// Whether the step size fell below the tolerance.
    pub converged: bool,
}

/// Newton iteration for `f(x) = 0` starting at `x0`.
///
/// Stops when `f(x)` is exactly zero or a step is no larger than `tolerance`.
/// A vanishing or non-finite derivative, a non-finite iterate, or running
/// out of iterations ends the search with `converged == false`.
///
/// ```
/// use keplerday::solver::newton;
///
/// let r = newton(|x| x * x - 2.0, |x| 2.0 * x, 1.0, 1e-14, 50);
/// assert!(r.converged);
/// assert!((r.root - 2f64.sqrt()).abs() < 1e-14);
/// ```
pub fn newton<F, D>(f: F, fprime: D, x0: f64, tolerance: f64, max_iterations: usize) -> NewtonRoot
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut x = x0;
    let mut residual = f(x);
    let mut iterations = 0;
    while iterations < max_iterations {
        if residual == 0.0 {
            break;
        }
        let slope = fprime(x);
        if slope == 0.0 || !slope.is_finite() {
            break;
        }
        let next = x - residual / slope;
        if !next.is_finite() {
            break;
        }
        let step = (next - x).abs();
        x = next;
        residual = f(x);
        iterations += 1;
        if step <= tolerance {
            return NewtonRoot {
                root: x,
                iterations,
                residual,
                converged: true,
            };
        }
    }
    NewtonRoot {
        root: x,
        iterations,
        residual,
        converged: residual == 0.0,
    }
}

/// Solved orbital state for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationEntry {
    /// Orbital angle measured from the anchor day.
    pub angle: Degrees,
    /// Instantaneous angular speed.
    pub speed: DegreesPerDay,
    /// Year fraction the angle was solved from.
    pub ratio: f64,
    /// Newton iterations spent.
    pub iterations: usize,
}

impl RotationEntry {
    /// Angle in radians.
    #[inline]
    pub fn angle_radians(&self) -> Radians {
        self.angle.to::<Radian>()
    }

    /// Angle as a plain number of degrees.
    #[inline]
    pub fn angle_degrees(&self) -> f64 {
        self.angle.value()
    }

    /// Speed as a plain number of degrees per day.
    #[inline]
    pub fn speed_degrees_per_day(&self) -> f64 {
        self.speed.value()
    }
}

#[cfg(feature = "serde")]
impl Serialize for RotationEntry {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("RotationEntry", 3)?;
        s.serialize_field("angle_deg", &self.angle.value())?;
        s.serialize_field("speed_deg_per_day", &self.speed.value())?;
        s.serialize_field("ratio", &self.ratio)?;
        s.end()
    }
}

/// Solves day ratios against a fixed swept-area model.
#[derive(Debug, Clone, Copy)]
pub struct RotationSolver {
    model: SweptArea,
    tropical_year: f64,
    tolerance: f64,
    max_iterations: usize,
}

impl RotationSolver {
    /// Builds the model for `params`, integrating the full-orbit area once.
    pub fn new(params: &OrbitParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            model: SweptArea::new(params.eccentricity, params.quadrature_tolerance),
            tropical_year: params.tropical_year_days,
            tolerance: params.solver_tolerance,
            max_iterations: params.solver_max_iterations,
        })
    }

    /// Underlying swept-area model.
    #[inline]
    pub fn model(&self) -> &SweptArea {
        &self.model
    }

    /// Angle and speed for one day.
    ///
    /// # Errors
    ///
    /// [`RotationError::Convergence`] if Newton iteration fails for this day.
    pub fn solve(&self, day: DateRatio) -> Result<RotationEntry> {
        let max_area = self.model.max_area();
        let target = max_area * day.ratio;

        let found = newton(
            |theta| self.model.area_rad(theta) - target,
            |theta| self.model.rate_rad(theta),
            TAU * day.ratio,
            self.tolerance,
            self.max_iterations,
        );
        if !found.converged {
            return Err(RotationError::Convergence {
                key: day.key,
                iterations: found.iterations,
                residual: found.residual,
            });
        }
        trace!(
            key = %day.key,
            iterations = found.iterations,
            residual = found.residual,
            "solved day"
        );

        let theta = found.root;
        let rad_per_day = max_area / self.model.rate_rad(theta) / self.tropical_year;
        let speed: DegreesPerDay = Frequency::<Radian, Day>::new(rad_per_day).to();

        Ok(RotationEntry {
            angle: Radians::new(theta).to::<Degree>(),
            speed,
            ratio: day.ratio,
            iterations: found.iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarKey;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn day(key: &str, ratio: f64) -> DateRatio {
        DateRatio {
            key: key.parse::<CalendarKey>().unwrap(),
            ratio,
        }
    }

    #[test]
    fn test_newton_converges_on_cubic() {
        let r = newton(|x| x * x * x - x - 2.0, |x| 3.0 * x * x - 1.0, 1.5, 1e-14, 50);
        assert!(r.converged);
        assert_abs_diff_eq!(r.root * r.root * r.root - r.root - 2.0, 0.0, epsilon = 1e-13);
    }

    #[test]
    fn test_newton_exact_start_takes_no_steps() {
        let r = newton(|x| x - 3.0, |_| 1.0, 3.0, 1e-14, 50);
        assert!(r.converged);
        assert_eq!(r.iterations, 0);
        assert_eq!(r.root, 3.0);
    }

    #[test]
    fn test_newton_reports_flat_derivative() {
        let r = newton(|x| x * x + 1.0, |_| 0.0, 1.0, 1e-14, 50);
        assert!(!r.converged);
        assert_eq!(r.residual, 2.0);
    }

    #[test]
    fn test_newton_reports_exhausted_budget() {
        // x² + 1 has no real root; Newton wanders forever.
        let r = newton(|x| x * x + 1.0, |x| 2.0 * x, 0.5, 1e-14, 20);
        assert!(!r.converged);
        assert_eq!(r.iterations, 20);
    }

    #[test]
    fn test_circular_orbit_is_uniform() {
        let solver = RotationSolver::new(&OrbitParameters::default().with_eccentricity(0.0)).unwrap();
        let entry = solver.solve(day("10-01", 0.25)).unwrap();
        assert_abs_diff_eq!(entry.angle.value(), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(entry.speed.value(), 360.0 / 365.2425, epsilon = 1e-12);
        assert_eq!(entry.angle_degrees(), entry.angle.value());
        assert_eq!(entry.speed_degrees_per_day(), entry.speed.value());
        assert_abs_diff_eq!(entry.angle_radians().value(), std::f64::consts::FRAC_PI_2, epsilon = 1e-10);
        assert_eq!(solver.model().eccentricity(), 0.0);
    }

    #[test]
    fn test_solution_is_self_consistent() {
        let solver = RotationSolver::new(&OrbitParameters::default()).unwrap();
        for ratio in [0.0, 0.1, 0.33, 0.5, 0.77, 0.999] {
            let entry = solver.solve(day("01-01", ratio)).unwrap();
            let area = solver.model().area(entry.angle_radians());
            assert_abs_diff_eq!(area, solver.model().max_area() * ratio, epsilon = 1e-11);
        }
    }

    #[test]
    fn test_half_year_lands_on_half_turn() {
        let solver = RotationSolver::new(&OrbitParameters::default()).unwrap();
        let entry = solver.solve(day("01-02", 0.5)).unwrap();
        assert_abs_diff_eq!(entry.angle.value(), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_speed_is_slowest_at_anchor() {
        let solver = RotationSolver::new(&OrbitParameters::default()).unwrap();
        let at_anchor = solver.solve(day("07-04", 0.0)).unwrap();
        let opposite = solver.solve(day("01-02", 0.5)).unwrap();
        let e = OrbitParameters::default().eccentricity;
        assert!(at_anchor.speed < opposite.speed);
        // speed ∝ 1/rate ∝ (1 − e·cos θ)²
        assert_relative_eq!(
            opposite.speed.value() / at_anchor.speed.value(),
            ((1.0 + e) / (1.0 - e)).powi(2),
            max_relative = 1e-10
        );
    }

    #[test]
    fn test_convergence_failure_names_the_day() {
        let params = OrbitParameters::default().with_solver(1e-300, 1);
        let solver = RotationSolver::new(&params).unwrap();
        let err = solver.solve(day("03-15", 0.7)).unwrap_err();
        match err {
            RotationError::Convergence { key, iterations, .. } => {
                assert_eq!(key.to_string(), "03-15");
                assert_eq!(iterations, 1);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let err = RotationSolver::new(&OrbitParameters::default().with_eccentricity(1.2)).unwrap_err();
        assert!(matches!(err, RotationError::InvalidParameters { .. }));
    }
}
