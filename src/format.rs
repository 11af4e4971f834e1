// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Rendering numbers as JSON number literals.
//!
//! [`format_number`] renders an `f64` either with Rust's shortest round-trip
//! representation or with a printf-style specifier such as `"%.3f"`, and
//! then checks the result against the JSON number grammar
//!
//! ```text
//! -?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?
//! ```
//!
//! A rendering that does not match (`NaN`, `inf`, padding, a leading `+`,
//! literal text around the number, a bare trailing `.`) is an error rather
//! than something to patch up.
//!
//! ## Specifier syntax
//!
//! `%[flags][width][.precision]conversion`, where flags are any of
//! `-`, `+`, space, `0`, `#` and the conversion is one of `f F e E g G d i`.
//! Exactly one conversion must appear; `%%` stands for a literal percent
//! sign. Semantics follow C's `printf`.

use crate::error::{Result, RotationError};
use regex::Regex;
use std::sync::OnceLock;

/// Default precision for `f`, `e` and `g` conversions.
const DEFAULT_PRECISION: usize = 6;

/// Largest accepted field width.
const MAX_WIDTH: usize = 64;

/// Largest accepted precision; enough for every digit of the smallest
/// subnormal `f64` in fixed notation.
const MAX_PRECISION: usize = 340;

fn json_number() -> &'static Regex {
    static JSON_NUMBER: OnceLock<Regex> = OnceLock::new();
    JSON_NUMBER.get_or_init(|| {
        Regex::new(r"^-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?$")
            .expect("JSON number pattern is valid")
    })
}

/// `true` if `s` is a complete JSON number literal.
pub fn is_json_number(s: &str) -> bool {
    json_number().is_match(s)
}

/// Renders `value` as a JSON number, optionally through a printf-style
/// specifier.
///
/// # Errors
///
/// [`RotationError::InvalidSpecifier`] if `spec` cannot be parsed and
/// [`RotationError::Format`] if the rendering is not a JSON number.
///
/// ```
/// use keplerday::format_number;
///
/// assert_eq!(format_number(1.0, None).unwrap(), "1");
/// assert_eq!(format_number(-0.5, Some("%.3f")).unwrap(), "-0.500");
/// assert!(format_number(f64::NAN, None).is_err());
/// ```
pub fn format_number(value: f64, spec: Option<&str>) -> Result<String> {
    let rendered = match spec {
        None => value.to_string(),
        Some(spec) => NumberSpec::parse(spec)?.render(value),
    };
    if !value.is_finite() {
        return Err(RotationError::Format {
            rendered,
            reason: "not a finite number",
        });
    }
    if !is_json_number(&rendered) {
        return Err(RotationError::Format {
            rendered,
            reason: "does not match the JSON number grammar",
        });
    }
    Ok(rendered)
}

/// printf conversion character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// `f` / `F`: fixed point.
    Fixed { upper: bool },
    /// `e` / `E`: scientific.
    Exponent { upper: bool },
    /// `g` / `G`: shortest of fixed and scientific.
    General { upper: bool },
    /// `d` / `i`: integer part.
    Integer,
}

/// A parsed printf-style specifier with its surrounding literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberSpec {
    prefix: String,
    suffix: String,
    left_align: bool,
    plus_sign: bool,
    space_sign: bool,
    zero_pad: bool,
    alternate: bool,
    width: usize,
    precision: Option<usize>,
    conversion: Conversion,
}

impl NumberSpec {
    /// Parses a specifier.
    ///
    /// # Errors
    ///
    /// [`RotationError::InvalidSpecifier`] for zero or several conversions,
    /// an unknown conversion character, a truncated specifier, or a width or
    /// precision beyond what an `f64` can use.
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = |reason| RotationError::InvalidSpecifier {
            spec: spec.to_string(),
            reason,
        };

        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut parsed: Option<Self> = None;
        let mut chars = spec.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                match parsed {
                    None => prefix.push(c),
                    Some(_) => suffix.push(c),
                }
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                match parsed {
                    None => prefix.push('%'),
                    Some(_) => suffix.push('%'),
                }
                continue;
            }
            if parsed.is_some() {
                return Err(invalid("more than one conversion"));
            }

            let mut next = Self {
                prefix: String::new(),
                suffix: String::new(),
                left_align: false,
                plus_sign: false,
                space_sign: false,
                zero_pad: false,
                alternate: false,
                width: 0,
                precision: None,
                conversion: Conversion::Integer,
            };
            while let Some(&flag) = chars.peek() {
                match flag {
                    '-' => next.left_align = true,
                    '+' => next.plus_sign = true,
                    ' ' => next.space_sign = true,
                    '0' => next.zero_pad = true,
                    '#' => next.alternate = true,
                    _ => break,
                }
                chars.next();
            }
            next.width = take_digits(&mut chars).unwrap_or(0);
            if next.width > MAX_WIDTH {
                return Err(invalid("field width too large"));
            }
            if chars.peek() == Some(&'.') {
                chars.next();
                let precision = take_digits(&mut chars).unwrap_or(0);
                if precision > MAX_PRECISION {
                    return Err(invalid("precision too large"));
                }
                next.precision = Some(precision);
            }
            next.conversion = match chars.next() {
                Some('f') => Conversion::Fixed { upper: false },
                Some('F') => Conversion::Fixed { upper: true },
                Some('e') => Conversion::Exponent { upper: false },
                Some('E') => Conversion::Exponent { upper: true },
                Some('g') => Conversion::General { upper: false },
                Some('G') => Conversion::General { upper: true },
                Some('d') | Some('i') => Conversion::Integer,
                Some(_) => return Err(invalid("unsupported conversion")),
                None => return Err(invalid("truncated conversion")),
            };
            parsed = Some(next);
        }

        let mut parsed = parsed.ok_or_else(|| invalid("no conversion"))?;
        parsed.prefix = prefix;
        parsed.suffix = suffix;
        Ok(parsed)
    }

    /// Conversion character of this specifier.
    pub fn conversion(&self) -> Conversion {
        self.conversion
    }

    /// Renders `value` without checking the result.
    pub fn render(&self, value: f64) -> String {
        let negative = value.is_sign_negative() && !value.is_nan();
        let body = if value.is_finite() {
            self.render_magnitude(value.abs())
        } else {
            let text = if value.is_nan() { "nan" } else { "inf" };
            if self.is_upper() {
                text.to_uppercase()
            } else {
                text.to_string()
            }
        };

        // `%d` of a value in (-1, 0] prints "0" without a sign, as C's int cast does.
        let negative = negative && !(self.conversion == Conversion::Integer && body == "0");
        let sign = if negative {
            "-"
        } else if self.plus_sign {
            "+"
        } else if self.space_sign {
            " "
        } else {
            ""
        };

        let len = sign.len() + body.len();
        let padded = if len >= self.width {
            format!("{sign}{body}")
        } else if self.left_align {
            format!("{sign}{body}{}", " ".repeat(self.width - len))
        } else if self.zero_pad && value.is_finite() {
            format!("{sign}{}{body}", "0".repeat(self.width - len))
        } else {
            format!("{}{sign}{body}", " ".repeat(self.width - len))
        };
        format!("{}{padded}{}", self.prefix, self.suffix)
    }

    fn is_upper(&self) -> bool {
        matches!(
            self.conversion,
            Conversion::Fixed { upper: true }
                | Conversion::Exponent { upper: true }
                | Conversion::General { upper: true }
        )
    }

    fn render_magnitude(&self, magnitude: f64) -> String {
        match self.conversion {
            Conversion::Fixed { .. } => {
                fixed(magnitude, self.precision.unwrap_or(DEFAULT_PRECISION), self.alternate)
            }
            Conversion::Exponent { upper } => exponent(
                magnitude,
                self.precision.unwrap_or(DEFAULT_PRECISION),
                self.alternate,
                upper,
            ),
            Conversion::General { upper } => general(
                magnitude,
                self.precision.unwrap_or(DEFAULT_PRECISION),
                self.alternate,
                upper,
            ),
            Conversion::Integer => format!("{:.0}", magnitude.trunc()),
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(d as usize));
        chars.next();
    }
    value
}

fn fixed(magnitude: f64, precision: usize, alternate: bool) -> String {
    let mut s = format!("{magnitude:.precision$}");
    if alternate && precision == 0 {
        s.push('.');
    }
    s
}

/// Splits Rust's `{:e}` output into mantissa and decimal exponent.
fn scientific_parts(magnitude: f64, precision: usize) -> (String, i32) {
    let s = format!("{magnitude:.precision$e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => (mantissa.to_string(), exp.parse().unwrap_or(0)),
        None => (s, 0),
    }
}

fn join_exponent(mantissa: &str, exp: i32, upper: bool) -> String {
    let e = if upper { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}{e}{sign}{:02}", exp.unsigned_abs())
}

fn exponent(magnitude: f64, precision: usize, alternate: bool, upper: bool) -> String {
    let (mut mantissa, exp) = scientific_parts(magnitude, precision);
    if alternate && precision == 0 {
        mantissa.push('.');
    }
    join_exponent(&mantissa, exp, upper)
}

fn general(magnitude: f64, precision: usize, alternate: bool, upper: bool) -> String {
    let p = precision.max(1);
    let (mantissa, exp) = scientific_parts(magnitude, p - 1);
    if (-4..p as i32).contains(&exp) {
        let decimals = (p as i32 - 1 - exp) as usize;
        let mut s = format!("{magnitude:.decimals$}");
        if alternate {
            if decimals == 0 {
                s.push('.');
            }
        } else {
            strip_fraction_zeros(&mut s);
        }
        s
    } else {
        let mut mantissa = mantissa;
        if alternate {
            if p == 1 {
                mantissa.push('.');
            }
        } else {
            strip_fraction_zeros(&mut mantissa);
        }
        join_exponent(&mantissa, exp, upper)
    }
}

fn strip_fraction_zeros(s: &mut String) {
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(value: f64, spec: &str) -> String {
        NumberSpec::parse(spec).unwrap().render(value)
    }

    #[test]
    fn test_default_rendering() {
        assert_eq!(format_number(1.0, None).unwrap(), "1");
        assert_eq!(format_number(-0.5, None).unwrap(), "-0.5");
        assert_eq!(format_number(0.1 + 0.2, None).unwrap(), "0.30000000000000004");
        assert_eq!(format_number(1e-7, None).unwrap(), "0.0000001");
        assert!(is_json_number(&format_number(1e300, None).unwrap()));
    }

    #[test]
    fn test_fixed() {
        assert_eq!(format_number(-0.5, Some("%.3f")).unwrap(), "-0.500");
        assert_eq!(fmt(3.14159, "%f"), "3.141590");
        assert_eq!(fmt(2.4, "%.0f"), "2");
        assert_eq!(fmt(2.0, "%#.0f"), "2.");
        assert_eq!(fmt(-0.0, "%.1f"), "-0.0");
    }

    #[test]
    fn test_exponent() {
        assert_eq!(fmt(1234.5678, "%.3e"), "1.235e+03");
        assert_eq!(fmt(0.00012, "%E"), "1.200000E-04");
        assert_eq!(fmt(0.0, "%.2e"), "0.00e+00");
        assert_eq!(fmt(1e100, "%.1e"), "1.0e+100");
        assert_eq!(format_number(1234.5678, Some("%.3e")).unwrap(), "1.235e+03");
    }

    #[test]
    fn test_general() {
        assert_eq!(fmt(0.0001, "%g"), "0.0001");
        assert_eq!(fmt(0.00001, "%g"), "1e-05");
        assert_eq!(fmt(123456.0, "%g"), "123456");
        assert_eq!(fmt(1234567.0, "%g"), "1.23457e+06");
        assert_eq!(fmt(100.0, "%.3g"), "100");
        assert_eq!(fmt(1.5, "%#.3g"), "1.50");
        assert_eq!(fmt(0.0, "%g"), "0");
        assert_eq!(fmt(1e-10, "%G"), "1E-10");
    }

    #[test]
    fn test_integer() {
        assert_eq!(fmt(2.7, "%d"), "2");
        assert_eq!(fmt(-2.7, "%i"), "-2");
        assert_eq!(fmt(-0.5, "%d"), "0");
        assert_eq!(format_number(359.99, Some("%d")).unwrap(), "359");
    }

    #[test]
    fn test_flags_and_width() {
        assert_eq!(fmt(1.5, "%+.1f"), "+1.5");
        assert_eq!(fmt(1.5, "% .1f"), " 1.5");
        assert_eq!(fmt(1.5, "%6.1f"), "   1.5");
        assert_eq!(fmt(1.5, "%-6.1f"), "1.5   ");
        assert_eq!(fmt(-1.5, "%06.1f"), "-001.5");
        assert_eq!(fmt(1.5, "%3.1f"), "1.5");
    }

    #[test]
    fn test_literal_text() {
        assert_eq!(fmt(12.0, "angle=%.1f deg"), "angle=12.0 deg");
        assert_eq!(fmt(50.0, "%.0f%%"), "50%");
    }

    #[test]
    fn test_non_json_renderings_are_errors() {
        for (value, spec) in [
            (1.5, "%+.1f"),
            (1.5, "%6.1f"),
            (-1.5, "%06.1f"),
            (12.0, "%.1fdeg"),
            (2.0, "%#.0f"),
            (50.0, "%.0f%%"),
        ] {
            let err = format_number(value, Some(spec)).unwrap_err();
            assert!(
                matches!(err, RotationError::Format { .. }),
                "{spec}: {err}"
            );
        }
    }

    #[test]
    fn test_non_finite_values_are_errors() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            for spec in [None, Some("%f"), Some("%e"), Some("%d")] {
                let err = format_number(value, spec).unwrap_err();
                assert!(
                    matches!(err, RotationError::Format { reason: "not a finite number", .. }),
                    "{value} {spec:?}: {err}"
                );
            }
        }
        assert_eq!(fmt(f64::NAN, "%F"), "NAN");
        assert_eq!(fmt(f64::NEG_INFINITY, "%f"), "-inf");
    }

    #[test]
    fn test_oversized_width_and_precision_are_rejected() {
        for spec in [
            "%99999999999999999999f",
            "%300000000f",
            "%.70000f",
            "%.200000000e",
            "%65.1g",
        ] {
            let err = format_number(1.0, Some(spec)).unwrap_err();
            assert!(
                matches!(err, RotationError::InvalidSpecifier { .. }),
                "{spec}: {err}"
            );
        }
        assert!(format_number(5e-324, Some("%.340f")).is_ok());
        assert!(format_number(1.5, Some("%.340e")).is_ok());
        assert_eq!(fmt(1.5, "%64.1f").len(), 64);
    }

    #[test]
    fn test_conversion_kind() {
        assert_eq!(
            NumberSpec::parse("%.2E").unwrap().conversion(),
            Conversion::Exponent { upper: true }
        );
        assert_eq!(NumberSpec::parse("x%ix").unwrap().conversion(), Conversion::Integer);
        assert_eq!(
            NumberSpec::parse("%g").unwrap().conversion(),
            Conversion::General { upper: false }
        );
    }

    #[test]
    fn test_bad_specifiers() {
        for spec in ["", "%", "%.3", "%s", "%f %f", "plain"] {
            let err = NumberSpec::parse(spec).unwrap_err();
            assert!(
                matches!(err, RotationError::InvalidSpecifier { .. }),
                "{spec:?}: {err}"
            );
        }
    }

    #[test]
    fn test_json_grammar() {
        for ok in ["0", "-0", "1", "-0.5", "10.25", "1e5", "1.5E-3", "2e+10"] {
            assert!(is_json_number(ok), "{ok}");
        }
        for bad in ["", "01", "+1", "1.", ".5", "1e", "NaN", "inf", " 1", "1 ", "0x10", "١"] {
            assert!(!is_json_number(bad), "{bad}");
        }
    }
}
