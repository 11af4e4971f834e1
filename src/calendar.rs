// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Calendar keys over the 366 days of a leap year.
//!
//! A [`CalendarKey`] is a year-less `(month, day)` pair, canonically written
//! `"MM-DD"`. Its domain is fixed to the days of a leap year so that
//! `02-29` is always representable; whether a particular year actually has a
//! February 29 is the caller's concern.

use crate::error::{Result, RotationError};
use chrono::{Datelike, Local, NaiveDate};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Number of canonical calendar keys (days in a leap year).
pub const KEY_COUNT: usize = 366;

/// Days per month in a leap year.
const LEAP_MONTH_DAYS: [u8; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Zero-based ordinal of the first day of each month in a leap year.
const LEAP_MONTH_START: [u16; 12] = [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

/// A `(month, day)` pair valid in a leap year.
///
/// Ordering follows the calendar (`01-01 < 02-29 < 12-31`).
///
/// ```
/// use keplerday::CalendarKey;
///
/// let key: CalendarKey = "02-29".parse().unwrap();
/// assert_eq!(key.month(), 2);
/// assert_eq!(key.to_string(), "02-29");
/// assert_eq!(key.ordinal(), 59);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarKey {
    month: u8,
    day: u8,
}

impl CalendarKey {
    /// Creates a key, or `None` if `(month, day)` is not a day of a leap year.
    pub const fn new(month: u8, day: u8) -> Option<Self> {
        if month == 0 || month > 12 || day == 0 || day > LEAP_MONTH_DAYS[month as usize - 1] {
            return None;
        }
        Some(Self { month, day })
    }

    /// Key for a concrete calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        // chrono guarantees month in 1..=12 and a day valid for that month,
        // which is always valid in a leap year too.
        Self {
            month: date.month() as u8,
            day: date.day() as u8,
        }
    }

    /// Key for the local wall-clock date at the moment of the call.
    pub fn today() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// Key at zero-based position `ordinal` within a leap year.
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        if ordinal >= KEY_COUNT {
            return None;
        }
        let ordinal = ordinal as u16;
        let month_idx = LEAP_MONTH_START
            .iter()
            .rposition(|&start| start <= ordinal)?;
        let day = (ordinal - LEAP_MONTH_START[month_idx]) as u8 + 1;
        Some(Self {
            month: month_idx as u8 + 1,
            day,
        })
    }

    /// Month, 1..=12.
    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Day of month, 1..=31.
    #[inline]
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// Zero-based position within a leap year (`01-01` is 0, `12-31` is 365).
    #[inline]
    pub const fn ordinal(&self) -> usize {
        LEAP_MONTH_START[self.month as usize - 1] as usize + self.day as usize - 1
    }

    /// `true` for the two days that share the leap-day smoothing step.
    #[inline]
    pub const fn is_leap_smoothed(&self) -> bool {
        self.month == 2 && (self.day == 28 || self.day == 29)
    }

    /// All 366 keys in calendar order.
    pub fn all() -> impl Iterator<Item = CalendarKey> {
        (0..KEY_COUNT).filter_map(Self::from_ordinal)
    }

    /// Concrete date for this key in `year`, or `None` for `02-29` in a
    /// common year.
    pub fn in_year(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month as u32, self.day as u32)
    }
}

impl fmt::Display for CalendarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl From<NaiveDate> for CalendarKey {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

/// Parses the canonical `"MM-DD"` form only: two digits, a dash, two digits.
impl FromStr for CalendarKey {
    type Err = RotationError;

    fn from_str(s: &str) -> Result<Self> {
        let not_found = || RotationError::NotFound { key: s.to_string() };
        let bytes = s.as_bytes();
        if bytes.len() != 5 || bytes[2] != b'-' {
            return Err(not_found());
        }
        let two_digits = |hi: u8, lo: u8| -> Option<u8> {
            (hi.is_ascii_digit() && lo.is_ascii_digit()).then(|| (hi - b'0') * 10 + (lo - b'0'))
        };
        let month = two_digits(bytes[0], bytes[1]).ok_or_else(not_found)?;
        let day = two_digits(bytes[3], bytes[4]).ok_or_else(not_found)?;
        Self::new(month, day).ok_or_else(not_found)
    }
}

#[cfg(feature = "serde")]
impl Serialize for CalendarKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for CalendarKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct KeyVisitor;

        impl de::Visitor<'_> for KeyVisitor {
            type Value = CalendarKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a calendar key in MM-DD form")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<CalendarKey, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(KeyVisitor)
    }
}

// ── Reference year ────────────────────────────────────────────────────────

/// Gregorian leap-year rule.
#[inline]
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Most recent leap year not later than `year`.
pub fn reference_leap_year(year: i32) -> i32 {
    let mut year = year;
    while !is_leap_year(year) {
        year -= 1;
    }
    year
}

/// Most recent leap year not later than the current local year.
///
/// The clock is read on every call.
pub fn current_reference_year() -> i32 {
    reference_leap_year(Local::now().year())
}
