// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The per-day rotation table.
//!
//! [`RotationTable::build`] runs the whole pipeline once (ratio sequence,
//! then one Newton solve per day) and either returns a complete table or an
//! error; there is no partially filled state. The table is immutable after
//! construction and can be shared across threads behind `&` or `Arc`.
//!
//! ```
//! use keplerday::RotationTable;
//!
//! let table = RotationTable::build(Some(2024)).unwrap();
//! assert_eq!(table.len(), 366);
//!
//! let angle = table.angle_degrees("09-23").unwrap();
//! assert!(angle.value() > 0.0 && angle.value() < 360.0);
//! assert!(table.angle_degrees("13-40").is_err());
//! ```

use crate::calendar::{current_reference_year, reference_leap_year, CalendarKey, KEY_COUNT};
use crate::error::{Result, RotationError};
use crate::params::OrbitParameters;
use crate::ratio::DateRatios;
use crate::solver::{DegreesPerDay, RotationEntry, RotationSolver};
use qtty::Degrees;
use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{ser::SerializeMap, Serialize, Serializer};

/// Rotation angle and speed for each of the 366 calendar keys.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationTable {
    reference_year: i32,
    params: OrbitParameters,
    max_area: f64,
    /// Indexed by [`CalendarKey::ordinal`].
    entries: Vec<RotationEntry>,
}

impl RotationTable {
    /// Builds the table for Earth.
    ///
    /// With `None` the reference year is the latest leap year not after the
    /// current year, read from the clock at call time. A common year is moved
    /// back to the preceding leap year.
    ///
    /// # Errors
    ///
    /// [`RotationError::Convergence`] if any day fails to solve.
    pub fn build(reference_year: Option<i32>) -> Result<Self> {
        Self::build_with(OrbitParameters::default(), reference_year)
    }

    /// Builds the table for custom parameters.
    ///
    /// # Errors
    ///
    /// [`RotationError::InvalidParameters`] for out-of-domain parameters or
    /// when the ratio sequence does not cover all 366 keys, and
    /// [`RotationError::Convergence`] if any day fails to solve.
    #[tracing::instrument(skip(params), fields(eccentricity = params.eccentricity))]
    pub fn build_with(params: OrbitParameters, reference_year: Option<i32>) -> Result<Self> {
        let reference_year = reference_year
            .map(reference_leap_year)
            .unwrap_or_else(current_reference_year);
        let solver = RotationSolver::new(&params)?;
        debug!(
            reference_year,
            max_area = solver.model().max_area(),
            "integrated full orbit"
        );

        let mut slots: Vec<Option<RotationEntry>> = vec![None; KEY_COUNT];
        for day in DateRatios::new(reference_year, &params)? {
            slots[day.key.ordinal()] = Some(solver.solve(day)?);
        }

        let entries: Vec<RotationEntry> = slots.into_iter().flatten().collect();
        if entries.len() != KEY_COUNT {
            return Err(RotationError::InvalidParameters {
                name: "tropical_year_days",
                value: params.tropical_year_days,
            });
        }

        let table = Self {
            reference_year,
            params,
            max_area: solver.model().max_area(),
            entries,
        };
        let (slowest, fastest) = table.speed_range();
        info!(
            reference_year,
            entries = table.len(),
            max_area = table.max_area,
            slowest_deg_per_day = slowest.value(),
            fastest_deg_per_day = fastest.value(),
            "rotation table built"
        );
        Ok(table)
    }

    /// Leap year the ratio sequence was anchored in.
    #[inline]
    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Parameters the table was built with.
    #[inline]
    pub fn params(&self) -> &OrbitParameters {
        &self.params
    }

    /// Full-orbit swept area of the underlying model.
    #[inline]
    pub fn max_area(&self) -> f64 {
        self.max_area
    }

    /// Always 366 for a built table.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true for a built table.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for `key`.
    #[inline]
    pub fn get(&self, key: CalendarKey) -> Result<&RotationEntry> {
        self.entries
            .get(key.ordinal())
            .ok_or_else(|| RotationError::NotFound {
                key: key.to_string(),
            })
    }

    /// Entry for an `"MM-DD"` string.
    ///
    /// # Errors
    ///
    /// [`RotationError::NotFound`] unless `key` is one of the 366 canonical
    /// keys.
    pub fn lookup(&self, key: &str) -> Result<&RotationEntry> {
        self.get(key.parse()?)
    }

    /// Orbital angle for an `"MM-DD"` key.
    pub fn angle_degrees(&self, key: &str) -> Result<Degrees> {
        self.lookup(key).map(|entry| entry.angle)
    }

    /// Angular speed for an `"MM-DD"` key.
    pub fn speed_degrees_per_day(&self, key: &str) -> Result<DegreesPerDay> {
        self.lookup(key).map(|entry| entry.speed)
    }

    /// Angle of `key` measured from the angle of `reference`, in `[0, 360)`.
    ///
    /// Useful for orienting a drawing so that `reference` (e.g. an equinox)
    /// sits at a fixed position.
    pub fn relative_angle(&self, key: CalendarKey, reference: CalendarKey) -> Result<Degrees> {
        let delta = self.get(key)?.angle.value() - self.get(reference)?.angle.value();
        Ok(Degrees::new(delta.rem_euclid(360.0)))
    }

    /// Entries in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (CalendarKey, &RotationEntry)> {
        CalendarKey::all().zip(self.entries.iter())
    }

    /// Slowest and fastest angular speed over the year.
    pub fn speed_range(&self) -> (DegreesPerDay, DegreesPerDay) {
        self.entries.iter().fold(
            (
                DegreesPerDay::new(f64::INFINITY),
                DegreesPerDay::new(f64::NEG_INFINITY),
            ),
            |(lo, hi), entry| {
                (
                    if entry.speed < lo { entry.speed } else { lo },
                    if entry.speed > hi { entry.speed } else { hi },
                )
            },
        )
    }
}

impl<'a> IntoIterator for &'a RotationTable {
    type Item = (CalendarKey, &'a RotationEntry);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Serialises as a map from `"MM-DD"` to entry, in calendar order.
#[cfg(feature = "serde")]
impl Serialize for RotationTable {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, entry) in self.iter() {
            map.serialize_entry(&key, entry)?;
        }
        map.end()
    }
}
