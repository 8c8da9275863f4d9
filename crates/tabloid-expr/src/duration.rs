//! Human duration parsing.
//!
//! Ages printed by `kubectl` and `docker` look like `3d`, `25m`, `3d4h` or
//! `2y45d`. A duration is a sequence of `<number><unit>` pairs; numbers may
//! have a fractional part and a bare `0` is accepted on its own.
//!
//! | Unit | Meaning |
//! |------|---------|
//! | `ns` | nanoseconds |
//! | `us`, `µs` | microseconds |
//! | `ms` | milliseconds |
//! | `s` | seconds |
//! | `m` | minutes |
//! | `h` | hours |
//! | `d` | days |
//! | `w` | weeks |
//! | `y` | 365 days |

use std::time::Duration;

use crate::error::{ExprError, Result};

const NANOSECOND: u128 = 1;
const MICROSECOND: u128 = 1_000 * NANOSECOND;
const MILLISECOND: u128 = 1_000 * MICROSECOND;
const SECOND: u128 = 1_000 * MILLISECOND;
const MINUTE: u128 = 60 * SECOND;
const HOUR: u128 = 60 * MINUTE;
const DAY: u128 = 24 * HOUR;
const WEEK: u128 = 7 * DAY;
const YEAR: u128 = 365 * DAY;

fn unit_nanos(unit: &str) -> Option<u128> {
    let nanos = match unit {
        "ns" => NANOSECOND,
        "us" | "µs" | "μs" => MICROSECOND,
        "ms" => MILLISECOND,
        "s" => SECOND,
        "m" => MINUTE,
        "h" => HOUR,
        "d" => DAY,
        "w" => WEEK,
        "y" => YEAR,
        _ => return None,
    };
    Some(nanos)
}

/// Parses a human duration such as `1h30m`, `3d` or `2w`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tabloid_expr::parse_duration;
///
/// assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(90 * 60));
/// assert_eq!(parse_duration("2w").unwrap(), Duration::from_secs(14 * 24 * 3600));
/// assert!(parse_duration("10").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<Duration> {
    let text = input.trim();
    let text = text.strip_prefix('+').unwrap_or(text);

    if text == "0" {
        return Ok(Duration::ZERO);
    }
    if text.is_empty() {
        return Err(ExprError::duration(input, "empty duration"));
    }
    if text.starts_with('-') {
        return Err(ExprError::duration(input, "negative durations are not supported"));
    }

    let mut total: u128 = 0;
    let mut rest = text;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        if number.is_empty() || number == "." || number.matches('.').count() > 1 {
            return Err(ExprError::duration(input, format!("invalid number in {rest:?}")));
        }

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        if unit.is_empty() {
            return Err(ExprError::duration(input, format!("missing unit after {number:?}")));
        }
        let scale = unit_nanos(unit)
            .ok_or_else(|| ExprError::duration(input, format!("unknown unit {unit:?}")))?;

        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| ExprError::duration(input, "duration out of range"))?
        };
        let mut nanos = whole
            .checked_mul(scale)
            .ok_or_else(|| ExprError::duration(input, "duration out of range"))?;
        if !fraction.is_empty() {
            let fraction: f64 = format!("0.{fraction}")
                .parse()
                .map_err(|_| ExprError::duration(input, format!("invalid number {number:?}")))?;
            nanos = nanos
                .checked_add((fraction * scale as f64) as u128)
                .ok_or_else(|| ExprError::duration(input, "duration out of range"))?;
        }

        total = total
            .checked_add(nanos)
            .ok_or_else(|| ExprError::duration(input, "duration out of range"))?;
        rest = tail;
    }

    let total = u64::try_from(total).map_err(|_| ExprError::duration(input, "duration out of range"))?;
    Ok(Duration::from_nanos(total))
}
