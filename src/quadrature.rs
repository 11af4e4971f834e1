// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Adaptive Gauss–Kronrod quadrature.
//!
//! Each panel is integrated with the 15-point Kronrod rule and its embedded
//! 7-point Gauss rule; `|K15 − G7|` is the panel's error estimate. The panel
//! with the largest estimate is bisected until the summed estimate meets the
//! tolerance or the panel budget runs out.
//!
//! ## References
//! * Piessens, de Doncker-Kapenga, Überhuber & Kahaner (1983): *QUADPACK*,
//!   routine `QK15`.

/// Maximum number of panels before giving up on the requested tolerance.
const MAX_PANELS: usize = 256;

/// Kronrod abscissae on `[0, 1]`; odd indices are the Gauss nodes.
#[rustfmt::skip]
const XGK: [f64; 8] = [
    0.991_455_371_120_812_639_206_854_697_526_329,
    0.949_107_912_342_758_524_526_189_684_047_851,
    0.864_864_423_359_769_072_789_712_788_640_926,
    0.741_531_185_599_394_439_863_864_773_280_788,
    0.586_087_235_467_691_130_294_144_845_693_013,
    0.405_845_151_377_397_166_906_606_412_076_961,
    0.207_784_955_007_898_467_600_689_403_773_245,
    0.0,
];

/// Kronrod weights matching [`XGK`].
#[rustfmt::skip]
const WGK: [f64; 8] = [
    0.022_935_322_010_529_224_963_732_008_058_970,
    0.063_092_092_629_978_553_290_700_663_189_204,
    0.104_790_010_322_250_183_839_876_322_541_518,
    0.140_653_259_715_525_918_745_189_590_510_238,
    0.169_004_726_639_267_902_826_583_426_598_550,
    0.190_350_578_064_785_409_913_256_402_421_014,
    0.204_432_940_075_298_892_414_161_999_234_649,
    0.209_482_141_084_727_828_012_999_174_891_714,
];

/// 7-point Gauss weights for `XGK[1]`, `XGK[3]`, `XGK[5]`, `XGK[7]`.
#[rustfmt::skip]
const WG: [f64; 4] = [
    0.129_484_966_168_869_693_270_611_432_679_082,
    0.279_705_391_489_276_667_901_467_771_423_780,
    0.381_830_050_505_118_944_950_369_775_488_975,
    0.417_959_183_673_469_387_755_102_040_816_327,
];

/// Outcome of [`integrate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureResult {
    /// Estimated integral.
    pub value: f64,
    /// Estimated absolute error of `value`.
    pub abs_error: f64,
    /// Panels used.
    pub panels: usize,
}

impl QuadratureResult {
    /// `true` when the error estimate is within `tolerance`.
    #[inline]
    pub fn meets(&self, tolerance: f64) -> bool {
        self.abs_error <= target_error(tolerance, self.value)
    }
}

#[derive(Debug, Clone, Copy)]
struct Panel {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

#[inline]
fn target_error(tolerance: f64, value: f64) -> f64 {
    tolerance.max(tolerance * value.abs())
}

/// One K15/G7 evaluation over `[a, b]`.
fn kronrod15<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64) -> Panel {
    let center = 0.5 * (a + b);
    let half = 0.5 * (b - a);

    let fc = f(center);
    let mut kronrod = fc * WGK[7];
    let mut gauss = fc * WG[3];

    for (j, (&x, &w)) in XGK[..7].iter().zip(&WGK[..7]).enumerate() {
        let dx = half * x;
        let pair = f(center - dx) + f(center + dx);
        kronrod += w * pair;
        if j % 2 == 1 {
            gauss += WG[j / 2] * pair;
        }
    }

    Panel {
        a,
        b,
        value: kronrod * half,
        error: ((kronrod - gauss) * half).abs(),
    }
}

/// Integrates `f` over `[a, b]`.
///
/// `tolerance` is applied both absolutely and relative to the magnitude of
/// the result, whichever is looser. Reversed bounds negate the integral.
/// If [`MAX_PANELS`] is reached first the best estimate is still returned;
/// check [`QuadratureResult::meets`].
///
/// ```
/// use keplerday::quadrature::integrate;
///
/// let r = integrate(|x: f64| x.sin(), 0.0, std::f64::consts::PI, 1e-12);
/// assert!((r.value - 2.0).abs() < 1e-12);
/// ```
pub fn integrate<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, tolerance: f64) -> QuadratureResult {
    if a == b {
        return QuadratureResult {
            value: 0.0,
            abs_error: 0.0,
            panels: 0,
        };
    }
    if a > b {
        let r = integrate(f, b, a, tolerance);
        return QuadratureResult {
            value: -r.value,
            ..r
        };
    }

    let mut panels = vec![kronrod15(&f, a, b)];
    loop {
        let value: f64 = panels.iter().map(|p| p.value).sum();
        let error: f64 = panels.iter().map(|p| p.error).sum();

        if error <= target_error(tolerance, value) || panels.len() >= MAX_PANELS {
            return QuadratureResult {
                value,
                abs_error: error,
                panels: panels.len(),
            };
        }

        let worst = panels
            .iter()
            .enumerate()
            .max_by(|(_, x), (_, y)| x.error.total_cmp(&y.error))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let Panel { a, b, .. } = panels[worst];
        let mid = 0.5 * (a + b);
        if mid <= a || mid >= b {
            // Panel can no longer be split in floating point.
            return QuadratureResult {
                value,
                abs_error: error,
                panels: panels.len(),
            };
        }
        panels.swap_remove(worst);
        panels.push(kronrod15(&f, a, mid));
        panels.push(kronrod15(&f, mid, b));
    }
}
