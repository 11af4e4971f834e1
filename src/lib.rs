// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Orbital position of the Earth for every calendar day
//!
//! This crate computes, for each of the 366 `"MM-DD"` keys of a leap year,
//! the angle the Earth has travelled along its orbit since the aphelion and
//! its instantaneous angular speed, using Kepler's second law over a
//! simplified elliptical model.
//!
//! # Core types
//!
//! - [`RotationTable`] — the immutable per-day table, built once.
//! - [`RotationEntry`] — angle ([`qtty::Degrees`]) and speed ([`DegreesPerDay`]) of one day.
//! - [`CalendarKey`] — a validated `"MM-DD"` key.
//! - [`OrbitParameters`] — eccentricity, tropical year and solver settings.
//! - [`SweptArea`] — the swept-area model `area(θ) = ∫₀^θ rate(φ) dφ`.
//! - [`DateRatios`] — the year-fraction sequence walking back from the aphelion.
//! - [`RotationError`] — every failure the pipeline can report.
//!
//! # Pipeline
//!
//! | Step | Module |
//! |------|--------|
//! | numeric integration | [`quadrature`] |
//! | swept area | [`area`] |
//! | year fraction per day | [`ratio`] |
//! | area inversion, speed | [`solver`] |
//! | assembly and lookup | [`table`] |
//! | JSON number rendering | [`format`] |
//!
//! ```
//! use keplerday::{format_number, RotationTable};
//!
//! let table = RotationTable::build(Some(2024)).unwrap();
//! let entry = table.lookup("01-03").unwrap();
//! let angle = format_number(entry.angle.value(), Some("%.2f")).unwrap();
//! assert!(angle.starts_with("18"));
//! ```

pub mod area;
pub mod calendar;
mod error;
pub mod format;
pub mod params;
pub mod quadrature;
pub mod ratio;
pub mod solver;
mod table;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use area::SweptArea;
pub use calendar::{current_reference_year, is_leap_year, reference_leap_year, CalendarKey, KEY_COUNT};
pub use error::{Result, RotationError};
pub use format::{format_number, is_json_number, NumberSpec};
pub use params::{OrbitParameters, APHELION, EARTH_ECCENTRICITY, LEAP_DAY_STEP, TROPICAL_YEAR};
pub use ratio::{date_ratios, DateRatio, DateRatios};
pub use solver::{DegreesPerDay, RotationEntry, RotationSolver};
pub use table::RotationTable;
