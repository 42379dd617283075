//! Text forms of floating point and arbitrary precision numbers.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use crate::FloatFormat;

/// Formats `value` as `%e`, `%f` or `%g` would, honoring [`FloatFormat`].
///
/// A negative precision selects the shortest representation that round-trips.
/// Non-finite values are spelled `NaN`, `+Inf` and `-Inf`.
pub fn format_f64(value: f64, format: FloatFormat) -> String {
    format_float(value, format, value.to_string(), format!("{value:e}"))
}

/// Like [`format_f64`], shortest forms computed at `f32` precision.
pub fn format_f32(value: f32, format: FloatFormat) -> String {
    format_float(value as f64, format, value.to_string(), format!("{value:e}"))
}

fn format_float(value: f64, format: FloatFormat, shortest: String, shortest_exp: String) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_owned();
    }
    let precision = usize::try_from(format.precision).ok();
    let text = match (format.format.to_ascii_lowercase(), precision) {
        (b'e', None) => shortest_exp,
        (b'e', Some(p)) => format!("{value:.p$e}"),
        (b'f', None) => shortest,
        (b'f', Some(p)) => format!("{value:.p$}"),
        (_, None) => {
            let magnitude = value.abs();
            if magnitude != 0.0 && !(1e-4..1e21).contains(&magnitude) {
                shortest_exp
            } else {
                shortest
            }
        }
        (_, Some(p)) => format_general(value, p.max(1)),
    };
    if format.format.is_ascii_uppercase() {
        text.to_ascii_uppercase()
    } else {
        text
    }
}

/// `%g` with `precision` significant digits and trailing zeros removed.
fn format_general(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if exponent < -4 || exponent >= precision as i32 {
        format!("{}e{exponent}", trim_fraction(mantissa))
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_owned()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Parses text produced by [`format_f64`], including the non-finite spellings.
pub fn parse_f64(text: &str) -> Option<f64> {
    match text {
        "NaN" | "NAN" => Some(f64::NAN),
        "+Inf" | "+INF" | "Inf" | "INF" => Some(f64::INFINITY),
        "-Inf" | "-INF" => Some(f64::NEG_INFINITY),
        _ => text.parse().ok(),
    }
}

/// Exact `n/d` text when `precision` is negative, otherwise a decimal rounded
/// half away from zero to `precision` digits.
pub fn format_rat(value: &BigRational, precision: i32) -> String {
    let Ok(digits) = u32::try_from(precision) else {
        return value.to_string();
    };
    let scale = BigInt::from(10u8).pow(digits);
    let scaled = (value * BigRational::from_integer(scale.clone())).round();
    let negative = scaled.is_negative();
    let magnitude = scaled.to_integer().abs();
    let integer = &magnitude / &scale;
    let fraction = (&magnitude % &scale).to_string();
    let sign = if negative && !magnitude.is_zero() { "-" } else { "" };
    if digits == 0 {
        format!("{sign}{integer}")
    } else {
        format!(
            "{sign}{integer}.{fraction:0>width$}",
            width = digits as usize
        )
    }
}

/// Parses `n/d`, an integer or a decimal with an optional exponent.
pub fn parse_rat(text: &str) -> Option<BigRational> {
    let text = text.trim();
    if let Some((numerator, denominator)) = text.split_once('/') {
        let numerator = BigInt::from_str(numerator.trim()).ok()?;
        let denominator = BigInt::from_str(denominator.trim()).ok()?;
        if denominator.is_zero() {
            return None;
        }
        return Some(BigRational::new(numerator, denominator));
    }
    let decimal = BigDecimal::from_str(text).ok()?;
    let (digits, scale) = decimal.as_bigint_and_exponent();
    let ten = BigInt::from(10u8);
    Some(if scale >= 0 {
        BigRational::new(digits, ten.pow(u32::try_from(scale).ok()?))
    } else {
        BigRational::from_integer(digits * ten.pow(u32::try_from(-scale).ok()?))
    })
}

/// Text of a big decimal: exact when the precision is negative, `precision`
/// digits after the point for `f`, `precision` significant digits otherwise.
pub fn format_big_float(value: &BigDecimal, format: FloatFormat) -> String {
    let Ok(precision) = u64::try_from(format.precision) else {
        return value.normalized().to_string();
    };
    match format.format {
        b'f' | b'F' => value.with_scale(precision as i64).to_string(),
        _ => value.with_prec(precision.max(1)).normalized().to_string(),
    }
}

pub fn parse_big_float(text: &str) -> Option<BigDecimal> {
    BigDecimal::from_str(text.trim()).ok()
}
