// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Fraction of the tropical year elapsed for each calendar day.
//!
//! Counting starts at the aphelion anchor of a reference leap year and walks
//! backward one calendar day at a time. A running counter starts at one
//! tropical year and loses one day per step, except on February 28 and 29
//! which share the [`LEAP_DAY_STEP`](crate::params::LEAP_DAY_STEP) so the
//! year's fractional quarter-day is spread over the leap day instead of
//! showing up as a jump. The ratio for a day is the counter after its step
//! divided by the tropical year; the anchor day itself ends the walk with a
//! ratio of exactly zero.

use crate::calendar::{reference_leap_year, CalendarKey, KEY_COUNT};
use crate::error::{Result, RotationError};
use crate::params::OrbitParameters;
use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Ordinal of February 29 in a leap year.
const LEAP_DAY_ORDINAL: usize = 59;

/// A calendar day and the fraction of the tropical year it sits at.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DateRatio {
    /// Calendar day.
    pub key: CalendarKey,
    /// Fraction of the tropical year, `0 <= ratio < 1`.
    pub ratio: f64,
}

/// Lazy backward walk from the anchor day.
///
/// Yields at most one item per canonical key; with the default parameters it
/// yields exactly 366, from the day before the anchor back to the anchor.
#[derive(Debug, Clone)]
pub struct DateRatios {
    cursor: NaiveDate,
    remaining: f64,
    tropical_year: f64,
    leap_day_step: f64,
    emitted: usize,
}

impl DateRatios {
    /// Starts the walk for `reference_year`, which is first moved back to the
    /// nearest leap year if needed.
    ///
    /// An anchor before February 29 is placed in the following year so the
    /// walk still crosses the leap day of the reference year.
    ///
    /// # Errors
    ///
    /// [`RotationError::InvalidParameters`] if `params` fails validation.
    pub fn new(reference_year: i32, params: &OrbitParameters) -> Result<Self> {
        params.validate()?;
        let year = reference_leap_year(reference_year);
        let start_year = if params.anchor.ordinal() < LEAP_DAY_ORDINAL {
            year.saturating_add(1)
        } else {
            year
        };
        let cursor = params
            .anchor
            .in_year(start_year)
            .ok_or(RotationError::InvalidParameters {
                name: "anchor",
                value: params.anchor.ordinal() as f64,
            })?;
        Ok(Self {
            cursor,
            remaining: params.tropical_year_days,
            tropical_year: params.tropical_year_days,
            leap_day_step: params.leap_day_step,
            emitted: 0,
        })
    }
}

impl Iterator for DateRatios {
    type Item = DateRatio;

    fn next(&mut self) -> Option<DateRatio> {
        if self.remaining <= 0.0 || self.emitted >= KEY_COUNT {
            return None;
        }
        self.cursor = self.cursor.pred_opt()?;
        let key = CalendarKey::from_date(self.cursor);
        self.remaining -= if key.is_leap_smoothed() {
            self.leap_day_step
        } else {
            1.0
        };
        self.emitted += 1;
        // Rounding can leave the counter a hair below zero on the last step.
        Some(DateRatio {
            key,
            ratio: self.remaining.max(0.0) / self.tropical_year,
        })
    }
}

/// Collects the full ratio sequence for `reference_year`.
pub fn date_ratios(reference_year: i32, params: &OrbitParameters) -> Result<Vec<DateRatio>> {
    Ok(DateRatios::new(reference_year, params)?.collect())
}
