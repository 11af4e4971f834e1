// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Orbit and solver parameters fixed for the lifetime of a table.

use crate::calendar::{CalendarKey, KEY_COUNT};
use crate::error::{Result, RotationError};
use qtty::Days;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Earth's orbital eccentricity.
pub const EARTH_ECCENTRICITY: f64 = 0.0167086;

/// Length of the tropical year in days.
pub const TROPICAL_YEAR: Days = Days::new(365.2425);

/// Ratio step shared by February 28 and 29: `(1 + 0.2425) / 2`.
///
/// The fractional quarter-day of the tropical year is folded into these two
/// days so the ratio sequence has no full-day jump at the leap day.
pub const LEAP_DAY_STEP: f64 = (1.0 + 0.2425) / 2.0;

/// Calendar anchor for aphelion (July 4).
pub const APHELION: CalendarKey = match CalendarKey::new(7, 4) {
    Some(key) => key,
    None => unreachable!(),
};

/// February 29. A walk anchored there would skip itself, so it is rejected.
const LEAP_DAY: CalendarKey = match CalendarKey::new(2, 29) {
    Some(key) => key,
    None => unreachable!(),
};

/// Rounding allowance when comparing the tropical year with a full walk.
const WALK_SLACK: f64 = 1e-9;

/// Parameters of the swept-area model and its solver.
///
/// [`OrbitParameters::default`] describes Earth. Custom values are mainly
/// useful for checking the model against closed forms (e.g. a circular
/// orbit with `eccentricity = 0`).
///
/// ```
/// use keplerday::OrbitParameters;
///
/// let circular = OrbitParameters::default().with_eccentricity(0.0);
/// assert!(circular.validate().is_ok());
/// assert!(OrbitParameters::default().with_eccentricity(1.0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct OrbitParameters {
    /// Orbital eccentricity, `0 <= e < 1`.
    pub eccentricity: f64,
    /// Tropical year length in days.
    pub tropical_year_days: f64,
    /// Ratio decrement applied on February 28 and 29.
    pub leap_day_step: f64,
    /// Day the backward count starts from.
    pub anchor: CalendarKey,
    /// Absolute step size (radians) at which Newton iteration stops.
    pub solver_tolerance: f64,
    /// Newton iteration budget per day.
    pub solver_max_iterations: usize,
    /// Absolute tolerance requested from the area quadrature.
    pub quadrature_tolerance: f64,
}

impl Default for OrbitParameters {
    fn default() -> Self {
        Self {
            eccentricity: EARTH_ECCENTRICITY,
            tropical_year_days: TROPICAL_YEAR.value(),
            leap_day_step: LEAP_DAY_STEP,
            anchor: APHELION,
            solver_tolerance: 1e-12,
            solver_max_iterations: 50,
            quadrature_tolerance: 1e-13,
        }
    }
}

impl OrbitParameters {
    /// Replace the eccentricity.
    pub fn with_eccentricity(mut self, eccentricity: f64) -> Self {
        self.eccentricity = eccentricity;
        self
    }

    /// Replace the tropical year length.
    pub fn with_tropical_year(mut self, year: Days) -> Self {
        self.tropical_year_days = year.value();
        self
    }

    /// Replace the Newton stopping tolerance and iteration budget.
    pub fn with_solver(mut self, tolerance: f64, max_iterations: usize) -> Self {
        self.solver_tolerance = tolerance;
        self.solver_max_iterations = max_iterations;
        self
    }

    /// Replace the day the backward count starts from.
    pub fn with_anchor(mut self, anchor: CalendarKey) -> Self {
        self.anchor = anchor;
        self
    }

    /// Tropical year as a typed quantity.
    #[inline]
    pub fn tropical_year(&self) -> Days {
        Days::new(self.tropical_year_days)
    }

    /// Checks every field against its domain.
    pub fn validate(&self) -> Result<()> {
        let invalid = |name, value| Err(RotationError::InvalidParameters { name, value });

        if !(0.0..1.0).contains(&self.eccentricity) {
            return invalid("eccentricity", self.eccentricity);
        }
        if !self.leap_day_step.is_finite() || self.leap_day_step <= 0.0 {
            return invalid("leap_day_step", self.leap_day_step);
        }
        // A full backward walk spends 364 whole days plus two leap-day steps.
        let full_walk = (KEY_COUNT - 2) as f64 + 2.0 * self.leap_day_step;
        if !self.tropical_year_days.is_finite()
            || self.tropical_year_days < full_walk - WALK_SLACK
        {
            return invalid("tropical_year_days", self.tropical_year_days);
        }
        if self.anchor == LEAP_DAY {
            return invalid("anchor", self.anchor.ordinal() as f64);
        }
        if !self.solver_tolerance.is_finite() || self.solver_tolerance <= 0.0 {
            return invalid("solver_tolerance", self.solver_tolerance);
        }
        if self.solver_max_iterations == 0 {
            return invalid("solver_max_iterations", 0.0);
        }
        if !self.quadrature_tolerance.is_finite() || self.quadrature_tolerance <= 0.0 {
            return invalid("quadrature_tolerance", self.quadrature_tolerance);
        }
        Ok(())
    }
}
