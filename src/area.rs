// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Swept-area model of the orbit.
//!
//! The area-sweep rate at orbital angle `θ` is
//!
//! ```text
//! rate(θ) = 0.5 / (1 − e·cos θ)²
//! ```
//!
//! and the swept area is its integral from `θ = 0`. The conventional
//! `(1 − e²)` normalisation is absent: every consumer uses the
//! area as a ratio against [`SweptArea::max_area`], which is computed with the
//! same formula, so the model stays self-consistent. Adding the factor would
//! shift every derived angle and speed.
//!
//! For reference the full-orbit integral has the closed form
//! `π / (1 − e²)^{3/2}`.

use crate::quadrature::{integrate, QuadratureResult};
use qtty::{Degrees, Radian, Radians};
use std::f64::consts::TAU;

/// Swept-area function for a fixed eccentricity.
///
/// Cheap to copy; the full-orbit area is integrated once in [`SweptArea::new`].
///
/// ```
/// use keplerday::SweptArea;
/// use qtty::Radians;
///
/// let circle = SweptArea::new(0.0, 1e-13);
/// assert!((circle.rate(Radians::new(1.0)) - 0.5).abs() < 1e-15);
/// assert!((circle.max_area() - std::f64::consts::PI).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweptArea {
    eccentricity: f64,
    tolerance: f64,
    max_area: f64,
}

impl SweptArea {
    /// Builds the model for eccentricity `e` (expected in `[0, 1)`) and a
    /// quadrature tolerance.
    pub fn new(eccentricity: f64, tolerance: f64) -> Self {
        let mut model = Self {
            eccentricity,
            tolerance,
            max_area: 0.0,
        };
        model.max_area = model.area(Radians::new(TAU));
        model
    }

    /// Eccentricity used by this model.
    #[inline]
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// Area-sweep rate at `angle`.
    #[inline]
    pub fn rate(&self, angle: Radians) -> f64 {
        self.rate_rad(angle.value())
    }

    #[inline]
    pub(crate) fn rate_rad(&self, theta: f64) -> f64 {
        let d = 1.0 - self.eccentricity * theta.cos();
        0.5 / (d * d)
    }

    /// Area swept from `0` to `angle`.
    #[inline]
    pub fn area(&self, angle: Radians) -> f64 {
        self.area_rad(angle.value())
    }

    #[inline]
    pub(crate) fn area_rad(&self, theta: f64) -> f64 {
        integrate(|t| self.rate_rad(t), 0.0, theta, self.tolerance).value
    }

    /// Area from `0` to `angle` with the quadrature's error estimate.
    pub fn integrate_to(&self, angle: Radians) -> QuadratureResult {
        integrate(|t| self.rate_rad(t), 0.0, angle.value(), self.tolerance)
    }

    /// Area swept over one full revolution.
    #[inline]
    pub fn max_area(&self) -> f64 {
        self.max_area
    }

    /// Fraction of the full-orbit area swept by `angle`.
    #[inline]
    pub fn area_fraction(&self, angle: Degrees) -> f64 {
        self.area(angle.to::<Radian>()) / self.max_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::EARTH_ECCENTRICITY;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::PI;

    fn earth() -> SweptArea {
        SweptArea::new(EARTH_ECCENTRICITY, 1e-13)
    }

    #[test]
    fn test_rate_is_positive_and_periodic() {
        let model = earth();
        for i in -40..=40 {
            let theta = i as f64 * 0.37;
            let r = model.rate_rad(theta);
            assert!(r > 0.0);
            assert_relative_eq!(r, model.rate_rad(theta + TAU), max_relative = 1e-12);
        }
    }

    #[test]
    fn test_rate_extremes() {
        let model = earth();
        let e = EARTH_ECCENTRICITY;
        let at_zero = 0.5 / ((1.0 - e) * (1.0 - e));
        let at_half_turn = 0.5 / ((1.0 + e) * (1.0 + e));
        assert_relative_eq!(model.rate_rad(0.0), at_zero, max_relative = 1e-15);
        assert_relative_eq!(model.rate_rad(PI), at_half_turn, max_relative = 1e-15);
    }

    #[test]
    fn test_area_at_zero_is_zero() {
        assert_eq!(earth().area(Radians::new(0.0)), 0.0);
    }

    #[test]
    fn test_max_area_matches_closed_form() {
        let e = EARTH_ECCENTRICITY;
        let exact = PI / (1.0 - e * e).powf(1.5);
        assert_relative_eq!(earth().max_area(), exact, max_relative = 1e-12);
    }

    #[test]
    fn test_circular_orbit_area_is_linear() {
        let model = SweptArea::new(0.0, 1e-13);
        for i in 0..=16 {
            let theta = TAU * i as f64 / 16.0;
            assert_abs_diff_eq!(model.area_rad(theta), theta / 2.0, epsilon = 1e-13);
        }
        assert_abs_diff_eq!(model.max_area(), PI, epsilon = 1e-13);
    }

    #[test]
    fn test_area_is_strictly_increasing() {
        let model = earth();
        let mut previous = model.area_rad(0.0);
        for i in 1..=720 {
            let area = model.area_rad(TAU * i as f64 / 720.0);
            assert!(area > previous, "area not increasing at step {i}");
            previous = area;
        }
    }

    #[test]
    fn test_half_orbit_is_symmetric() {
        // rate is even in θ, so the two halves of the orbit sweep equal areas.
        let model = earth();
        assert_relative_eq!(model.area_rad(PI), model.max_area() / 2.0, max_relative = 1e-12);
    }

    #[test]
    fn test_area_error_estimate_within_tolerance() {
        let r = earth().integrate_to(Radians::new(4.0));
        assert!(r.meets(1e-13), "error estimate {}", r.abs_error);
    }

    #[test]
    fn test_area_fraction_accepts_degrees() {
        let model = earth();
        assert_eq!(model.eccentricity(), EARTH_ECCENTRICITY);
        assert_abs_diff_eq!(model.area_fraction(Degrees::new(180.0)), 0.5, epsilon = 1e-13);
        assert_abs_diff_eq!(model.area_fraction(Degrees::new(360.0)), 1.0, epsilon = 1e-12);
    }
}
