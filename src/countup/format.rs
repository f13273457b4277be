//! Rendering strategies turning an animated value into display text.

use super::options::{CountUpOptions, MAX_DECIMALS};

/// Turns the current animated value into the text shown by the element.
pub trait ValueFormatter {
    fn format(&self, value: f64) -> String;
}

impl<F> ValueFormatter for F
where
    F: Fn(f64) -> String,
{
    fn format(&self, value: f64) -> String {
        self(value)
    }
}

/// Fixed-point rendering wrapped in a prefix and suffix, e.g. `$12.3k`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedDecimals {
    pub decimals: usize,
    pub prefix: String,
    pub suffix: String,
}

impl FixedDecimals {
    pub fn new(decimals: usize) -> Self {
        Self {
            decimals: decimals.min(MAX_DECIMALS),
            ..Self::default()
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

impl From<&CountUpOptions> for FixedDecimals {
    fn from(options: &CountUpOptions) -> Self {
        FixedDecimals::new(options.decimals)
            .prefix(options.prefix.clone())
            .suffix(options.suffix.clone())
    }
}

impl ValueFormatter for FixedDecimals {
    fn format(&self, value: f64) -> String {
        format!(
            "{}{}{}",
            self.prefix,
            to_fixed(value, self.decimals),
            self.suffix
        )
    }
}

/// Bare integer rendering of the value rounded towards negative infinity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntegerFloor;

impl ValueFormatter for IntegerFloor {
    fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return non_finite(value).to_string();
        }
        let floored = value.floor();
        // Avoid rendering "-0"
        if floored == 0.0 {
            "0".to_string()
        } else {
            format!("{}", floored)
        }
    }
}

/// Render `value` in fixed-point notation with exactly `decimals` digits.
///
/// Exact ties round away from zero (`2.5` renders as `3`). Negative values
/// keep their sign even when they round to zero (`-0.004` at two digits is
/// `-0.00`); negative zero renders without a sign.
pub fn to_fixed(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return non_finite(value).to_string();
    }
    let decimals = decimals.min(MAX_DECIMALS);
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = round_ties_up(value.abs(), decimals);
    format!("{}{:.*}", sign, decimals, magnitude)
}

/// Nudge an exact decimal tie upwards so the standard formatter, which
/// rounds ties to even, rounds it away from zero instead. Every other value
/// is already rounded correctly from its exact binary expansion.
fn round_ties_up(magnitude: f64, decimals: usize) -> f64 {
    if is_exact_tie(magnitude, decimals) {
        // The next float up lies strictly past the midpoint
        f64::from_bits(magnitude.to_bits() + 1)
    } else {
        magnitude
    }
}

/// True when `magnitude` sits exactly halfway between two multiples of
/// `10^-decimals`.
///
/// Writing a finite, positive `magnitude` as `m * 2^e` with `m` odd, the
/// value is a tie iff `magnitude * 2 * 10^decimals = m * 5^decimals *
/// 2^(e + decimals + 1)` is an odd integer, i.e. iff `e == -(decimals + 1)`.
fn is_exact_tie(magnitude: f64, decimals: usize) -> bool {
    let bits = magnitude.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };
    if mantissa == 0 {
        return false;
    }
    exponent + i64::from(mantissa.trailing_zeros()) == -(decimals as i64 + 1)
}

fn non_finite(value: f64) -> &'static str {
    if value.is_nan() {
        "NaN"
    } else if value > 0.0 {
        "Infinity"
    } else {
        "-Infinity"
    }
}
